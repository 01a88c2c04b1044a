//! Alert lifecycle.
//!
//! `active → acknowledged → resolved` or straight `active → resolved`.
//! Resolved is terminal: it exposes no actions and cannot be acknowledged.

use std::fmt;

use crate::commands::Command;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{AlertEntry, AlertStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    Acknowledge,
    Resolve,
}

impl AlertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Acknowledge => "acknowledge",
            AlertAction::Resolve => "resolve",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn available_actions(status: AlertStatus) -> &'static [AlertAction] {
    match status {
        AlertStatus::Active => &[AlertAction::Acknowledge, AlertAction::Resolve],
        AlertStatus::Acknowledged => &[AlertAction::Resolve],
        AlertStatus::Resolved => &[],
    }
}

pub fn transition(status: AlertStatus, action: AlertAction) -> ConsoleResult<AlertStatus> {
    match (status, action) {
        (AlertStatus::Resolved, AlertAction::Acknowledge) => Err(ConsoleError::InvalidTransition {
            action: action.to_string(),
            status: status.to_string(),
        }),
        (_, AlertAction::Acknowledge) => Ok(AlertStatus::Acknowledged),
        // résoudre deux fois ne change rien
        (_, AlertAction::Resolve) => Ok(AlertStatus::Resolved),
    }
}

/// Acquittement / résolution d'une alerte de la liste, par id
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCommand {
    pub id: String,
    pub action: AlertAction,
}

impl AlertCommand {
    pub fn acknowledge(id: &str) -> Self {
        Self {
            id: id.to_string(),
            action: AlertAction::Acknowledge,
        }
    }

    pub fn resolve(id: &str) -> Self {
        Self {
            id: id.to_string(),
            action: AlertAction::Resolve,
        }
    }
}

impl Command<Vec<AlertEntry>> for AlertCommand {
    fn apply(&self, state: &mut Vec<AlertEntry>) -> ConsoleResult<String> {
        let alert = state
            .iter_mut()
            .find(|a| a.id == self.id)
            .ok_or_else(|| ConsoleError::NotFound(format!("alert {}", self.id)))?;
        alert.status = transition(alert.status, self.action)?;
        Ok(match self.action {
            AlertAction::Acknowledge => format!("Alert {} acknowledged successfully", self.id),
            AlertAction::Resolve => format!("Alert {} resolved successfully", self.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run_local;
    use crate::fixtures::mock_alerts;
    use chrono::Utc;

    #[test]
    fn test_full_lifecycle() {
        let mut alerts = mock_alerts(10, Utc::now());
        // alerts[1] (id "2") est active
        assert_eq!(alerts[1].status, AlertStatus::Active);

        assert!(run_local(&mut alerts, &AlertCommand::acknowledge("2")).is_success());
        assert_eq!(alerts[1].status, AlertStatus::Acknowledged);
        assert_eq!(available_actions(alerts[1].status), &[AlertAction::Resolve]);

        assert!(run_local(&mut alerts, &AlertCommand::resolve("2")).is_success());
        assert_eq!(alerts[1].status, AlertStatus::Resolved);
        assert!(available_actions(alerts[1].status).is_empty());
    }

    #[test]
    fn test_resolve_twice_is_idempotent() {
        let mut alerts = mock_alerts(10, Utc::now());
        run_local(&mut alerts, &AlertCommand::resolve("3"));
        let once = alerts.clone();
        assert!(run_local(&mut alerts, &AlertCommand::resolve("3")).is_success());
        assert_eq!(alerts, once);
    }

    #[test]
    fn test_resolved_cannot_be_acknowledged() {
        let mut alerts = mock_alerts(10, Utc::now());
        // id "1" est résolue d'origine (i % 4 == 0)
        let notice = run_local(&mut alerts, &AlertCommand::acknowledge("1"));
        assert!(!notice.is_success());
        assert_eq!(notice.message, "Cannot acknowledge an alert that is resolved");
        assert_eq!(alerts[0].status, AlertStatus::Resolved);
    }

    #[test]
    fn test_unknown_alert() {
        let mut alerts = mock_alerts(3, Utc::now());
        let notice = run_local(&mut alerts, &AlertCommand::resolve("nope"));
        assert_eq!(notice.message, "Not found: alert nope");
    }

    #[test]
    fn test_active_actions() {
        assert_eq!(
            available_actions(AlertStatus::Active),
            &[AlertAction::Acknowledge, AlertAction::Resolve]
        );
    }
}
