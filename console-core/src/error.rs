/**
 * ERREURS CONSOLE - Taxonomie plate des échecs côté console
 *
 * RÔLE :
 * Toutes les erreurs (réseau, HTTP non-2xx, JSON invalide, fixture absente,
 * transition refusée...) finissent en une seule chaîne affichée dans le
 * bandeau d'erreur de la page qui a émis la requête.
 *
 * FONCTIONNEMENT :
 * - Variantes typées pour les logs et les tests
 * - `Display` = texte du bandeau, pas de codes structurés côté UI
 * - Aucune distinction transitoire / permanente : pas de retry
 */

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Network error on {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {endpoint} failed with status {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No fixture registered for {0}")]
    Fixture(String),
    #[error("{0}")]
    Simulated(String),
    #[error("Endpoint {0} is not served by this data source")]
    Unsupported(String),
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Cannot {action} an alert that is {status}")]
    InvalidTransition { action: String, status: String },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Action not available on this page: {0}")]
    UnsupportedAction(String),
}

impl ConsoleError {
    /// Texte du bandeau d'erreur (taxonomie plate)
    pub fn banner(&self) -> String {
        self.to_string()
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_is_display_text() {
        let err = ConsoleError::Status {
            endpoint: "/api/status".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(
            err.banner(),
            "Request to /api/status failed with status 500 Internal Server Error"
        );

        let err = ConsoleError::InvalidTransition {
            action: "acknowledge".into(),
            status: "resolved".into(),
        };
        assert_eq!(err.banner(), "Cannot acknowledge an alert that is resolved");
    }

    #[test]
    fn test_decode_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: ConsoleError = parse.unwrap_err().into();
        assert!(err.banner().starts_with("Invalid response payload"));
    }
}
