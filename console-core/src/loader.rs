/**
 * LOADER - Contrat de chargement partagé par toutes les pages
 *
 * RÔLE :
 * Un loader possède l'état de vue d'une donnée distante : en cours de
 * chargement, prête, ou en échec avec un message lisible. Les trois sont
 * mutuellement exclusifs.
 *
 * FONCTIONNEMENT :
 * - `begin()` émet un jeton de requête monotone
 * - `commit(jeton, résultat)` n'applique que la réponse de la requête la plus
 *   récente ; une réponse plus ancienne qui arrive en retard est jetée
 * - succès = remplacement complet (snapshot), l'erreur précédente disparaît
 * - échec = message d'erreur, les anciennes données ne sont plus présentées
 */

use tracing::{debug, warn};

use crate::error::ConsoleError;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Jeton d'une requête émise par un loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug)]
pub struct Loader<T> {
    state: LoadState<T>,
    issued: u64,
    committed: u64,
    revision: u64,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            issued: 0,
            committed: 0,
            revision: 0,
        }
    }

    /// Loader déjà prêt (données locales, sans requête)
    pub fn ready(data: T) -> Self {
        Self {
            state: LoadState::Ready(data),
            issued: 0,
            committed: 0,
            revision: 1,
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    /// Accès mutable aux données prêtes (mutations optimistes)
    pub fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Incrémenté à chaque changement visible de l'état
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn begin(&mut self) -> RequestToken {
        self.issued += 1;
        RequestToken(self.issued)
    }

    /// Applique un résultat ; `false` si la réponse est périmée et a été ignorée
    pub fn commit(&mut self, token: RequestToken, result: Result<T, ConsoleError>) -> bool {
        if token.0 != self.issued || token.0 <= self.committed {
            warn!(
                "dropping stale response (token {}, latest {})",
                token.0, self.issued
            );
            return false;
        }
        self.committed = token.0;
        self.revision += 1;
        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(e) => {
                debug!("load failed: {}", e);
                LoadState::Failed(e.banner())
            }
        };
        true
    }

    /// Signale une modification locale de l'état (mutation, rollback)
    pub fn touch(&mut self) {
        self.revision += 1;
    }
}
