/**
 * DATA SOURCES - Interface unifiée entre les pages et leurs données
 *
 * RÔLE :
 * Les pages ne savent pas si elles parlent à une vraie API REST ou à des
 * données fixtures : elles passent toutes par le trait `DataSource`.
 *
 * FONCTIONNEMENT :
 * - Endpoint = catalogue fermé des routes consommées (méthode + chemin + query)
 * - RemoteSource = client HTTP (reqwest) vers `/api/...`
 * - FixtureSource = réponses en mémoire + journal des appels (tests, mode offline,
 *   pages admin qui n'ont jamais eu de backend)
 *
 * UTILITÉ :
 * 🎯 Même chemin de code pour les mocks et le réseau
 * 🎯 Les tests injectent des fixtures sans brancher sur "backend présent ou non"
 */

pub mod fixture;
pub mod remote;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::ConsoleResult;

pub use fixture::{FixtureReply, FixtureSource, RecordedCall};
pub use remote::RemoteSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Routes consommées par les deux consoles
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AdminStatus,
    AdminMetrics,
    AdminMonitoring,
    AdminUsers,
    // Pages admin servies uniquement par fixtures
    AdminLogs,
    AdminAlerts,
    AdminConfig,
    Status,
    Logs { limit: usize },
    Alerts,
    Trends,
    SelfHealing,
    Config,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::SelfHealing | Endpoint::Config => Method::Post,
            _ => Method::Get,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::AdminStatus => "/api/admin/status",
            Endpoint::AdminMetrics => "/api/admin/metrics",
            Endpoint::AdminMonitoring => "/api/admin/monitoring",
            Endpoint::AdminUsers => "/api/admin/users",
            Endpoint::AdminLogs => "/api/admin/logs",
            Endpoint::AdminAlerts => "/api/admin/alerts",
            Endpoint::AdminConfig => "/api/admin/config",
            Endpoint::Status => "/api/status",
            Endpoint::Logs { .. } => "/api/logs",
            Endpoint::Alerts => "/api/alerts",
            Endpoint::Trends => "/api/trends",
            Endpoint::SelfHealing => "/api/self-healing",
            Endpoint::Config => "/api/config",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Logs { limit } => vec![("limit", limit.to_string())],
            _ => Vec::new(),
        }
    }

    /// Faux pour les pages qui n'ont jamais appelé de vrai endpoint
    pub fn is_remote(&self) -> bool {
        !matches!(self, Endpoint::AdminLogs | Endpoint::AdminAlerts | Endpoint::AdminConfig)
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            Endpoint::Logs { limit } => Some(*limit),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())?;
        let query = self.query();
        for (i, (key, value)) in query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Source de données JSON ; réseau ou mémoire, même contrat
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, endpoint: &Endpoint) -> ConsoleResult<Value>;

    async fn post(&self, endpoint: &Endpoint, body: Value) -> ConsoleResult<Value>;
}

/// Lecture typée d'un endpoint
pub async fn fetch<T: DeserializeOwned>(source: &dyn DataSource, endpoint: &Endpoint) -> ConsoleResult<T> {
    let value = source.get(endpoint).await?;
    Ok(serde_json::from_value(value)?)
}

/// Écriture typée : sérialise le corps, désérialise la réponse
pub async fn submit<B, T>(source: &dyn DataSource, endpoint: &Endpoint, body: &B) -> ConsoleResult<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = serde_json::to_value(body)?;
    let value = source.post(endpoint, body).await?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        assert_eq!(Endpoint::Logs { limit: 5 }.to_string(), "/api/logs?limit=5");
        assert_eq!(Endpoint::AdminStatus.to_string(), "/api/admin/status");
        assert_eq!(Endpoint::Config.method(), Method::Post);
        assert_eq!(Endpoint::Trends.method(), Method::Get);
    }

    #[test]
    fn test_fixture_only_endpoints() {
        assert!(!Endpoint::AdminLogs.is_remote());
        assert!(!Endpoint::AdminConfig.is_remote());
        assert!(Endpoint::AdminUsers.is_remote());
        assert!(Endpoint::SelfHealing.is_remote());
    }
}
