/**
 * COMMANDES - Mutations optimistes avec confirmation explicite
 *
 * RÔLE :
 * Les pages Alerts / Configuration / UserManagement / Settings modifient leur
 * état local tout de suite puis attendent une confirmation (locale pour les
 * mocks admin, POST pour Settings).
 *
 * FONCTIONNEMENT :
 * - `Command<S>` décrit une mutation sur l'état S
 * - `optimistic()` prend un snapshot, applique, rend un `Pending`
 * - `settle()` : Confirmed → commit, Rejected → rollback vers le snapshot
 * - Le résultat est toujours une `Notice` (popup succès / erreur)
 */

use std::fmt;
use tracing::{info, warn};

use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{ConfigMap, ConfigValue};

pub trait Command<S> {
    /// Applique la mutation ; renvoie le texte de succès
    fn apply(&self, state: &mut S) -> ConsoleResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "✓ {}", self.message),
            NoticeKind::Error => write!(f, "✗ {}", self.message),
        }
    }
}

/// Mutation appliquée mais pas encore confirmée
#[must_use = "a pending mutation must be committed or rolled back"]
#[derive(Debug)]
pub struct Pending<S> {
    snapshot: S,
    message: String,
}

impl<S> Pending<S> {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn commit(self) -> String {
        self.message
    }

    pub fn rollback(self, state: &mut S) {
        *state = self.snapshot;
    }
}

/// Applique `command` sur `state` en gardant de quoi revenir en arrière
pub fn optimistic<S, C>(state: &mut S, command: &C) -> ConsoleResult<Pending<S>>
where
    S: Clone,
    C: Command<S> + ?Sized,
{
    let snapshot = state.clone();
    match command.apply(state) {
        Ok(message) => Ok(Pending { snapshot, message }),
        Err(e) => {
            // une commande refusée ne laisse rien derrière elle
            *state = snapshot;
            Err(e)
        }
    }
}

/// Réponse de la source de vérité à une mutation
#[derive(Debug)]
pub enum Dispatch {
    Confirmed(Option<String>),
    Rejected(ConsoleError),
}

impl Dispatch {
    pub fn from_result<T>(result: ConsoleResult<T>, message: impl FnOnce(T) -> Option<String>) -> Self {
        match result {
            Ok(reply) => Dispatch::Confirmed(message(reply)),
            Err(e) => Dispatch::Rejected(e),
        }
    }
}

pub fn settle<S>(pending: Pending<S>, state: &mut S, outcome: Dispatch) -> Notice {
    match outcome {
        Dispatch::Confirmed(reply) => {
            let message = reply.unwrap_or_else(|| pending.commit());
            info!("mutation confirmed: {}", message);
            Notice::success(message)
        }
        Dispatch::Rejected(e) => {
            warn!("mutation rejected, rolling back: {}", e);
            pending.rollback(state);
            Notice::error(e.banner())
        }
    }
}

/// Confirmation locale (pages sans backend)
pub fn run_local<S, C>(state: &mut S, command: &C) -> Notice
where
    S: Clone,
    C: Command<S> + ?Sized,
{
    match optimistic(state, command) {
        Ok(pending) => settle(pending, state, Dispatch::Confirmed(None)),
        Err(e) => Notice::error(e.banner()),
    }
}

/// Modifie une clé d'une table de configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SetConfig {
    pub key: String,
    pub value: ConfigValue,
}

impl Command<ConfigMap> for SetConfig {
    fn apply(&self, state: &mut ConfigMap) -> ConsoleResult<String> {
        if self.key.trim().is_empty() {
            return Err(ConsoleError::InvalidValue("parameter name is empty".into()));
        }
        state.insert(self.key.clone(), self.value.clone());
        Ok(format!("{} set to {}", self.key, self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Push(u32);

    impl Command<Vec<u32>> for Push {
        fn apply(&self, state: &mut Vec<u32>) -> ConsoleResult<String> {
            if self.0 == 0 {
                return Err(ConsoleError::InvalidValue("zero".into()));
            }
            state.push(self.0);
            Ok(format!("pushed {}", self.0))
        }
    }

    #[test]
    fn test_confirmed_keeps_mutation() {
        let mut state: Vec<u32> = vec![1];
        let pending = optimistic(&mut state, &Push(2)).unwrap();
        assert_eq!(state, vec![1, 2]);
        let notice = settle(pending, &mut state, Dispatch::Confirmed(None));
        assert_eq!(notice, Notice::success("pushed 2"));
        assert_eq!(state, vec![1, 2]);
    }

    #[test]
    fn test_rejected_rolls_back() {
        let mut state: Vec<u32> = vec![1];
        let pending = optimistic(&mut state, &Push(2)).unwrap();
        let notice = settle(
            pending,
            &mut state,
            Dispatch::Rejected(ConsoleError::Rejected("server said no".into())),
        );
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "server said no");
        assert_eq!(state, vec![1]);
    }

    #[test]
    fn test_invalid_command_leaves_state() {
        let mut state: Vec<u32> = vec![1];
        assert!(optimistic(&mut state, &Push(0)).is_err());
        assert_eq!(state, vec![1]);
        assert!(!run_local(&mut state, &Push(0)).is_success());
    }

    #[test]
    fn test_confirmation_message_wins() {
        let mut state: Vec<u32> = Vec::new();
        let pending = optimistic(&mut state, &Push(7)).unwrap();
        let notice = settle(pending, &mut state, Dispatch::Confirmed(Some("Configuration updated".into())));
        assert_eq!(notice.message, "Configuration updated");
    }

    #[test]
    fn test_set_config() {
        let mut config = ConfigMap::new();
        let notice = run_local(
            &mut config,
            &SetConfig {
                key: "maxRetries".into(),
                value: ConfigValue::Integer(5),
            },
        );
        assert!(notice.is_success());
        assert_eq!(config.get("maxRetries"), Some(&ConfigValue::Integer(5)));
    }
}
