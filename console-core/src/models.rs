//! Snapshots de vue transitoires : rien n'est persisté, tout vit et meurt
//! avec la page qui l'a chargé.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConsoleError;

// Les ids arrivent tantôt en nombre (mocks admin), tantôt en chaîne ("alert-1")
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

fn unknown_status() -> String {
    "unknown".to_string()
}

fn active_user() -> String {
    "active".to_string()
}

/// Lecture complète de l'état système. Chaque poll remplace la précédente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub disk_usage: f64,
    #[serde(default)]
    pub process_count: u64,
    #[serde(default = "unknown_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub history: Vec<HistorySample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub timestamp: String,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub disk_usage: f64,
}

/// Réponse de /api/admin/monitoring : statut + historique + alertes système
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    #[serde(flatten)]
    pub status: StatusSnapshot,
    #[serde(default)]
    pub alerts: Vec<AlertEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub timestamp: String,
    pub level: LogLevel,
    #[serde(default)]
    pub service: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "INFO",
            AlertLevel::Warning => "WARNING",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    pub level: AlertLevel,
    pub message: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: AlertStatus,
}

/// Valeur scalaire de configuration (chaîne, nombre ou booléen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ConfigValue {
    /// Saisie pour un champ numérique : refuse ce qui n'est pas un entier
    pub fn parse_integer(input: &str) -> Result<Self, ConsoleError> {
        input
            .trim()
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|_| ConsoleError::InvalidValue(format!("'{}' is not an integer", input)))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

pub type ConfigMap = BTreeMap<String, ConfigValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: String,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Le backend renvoie `{"forecast": [...]}` ; une séquence nue est aussi acceptée
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Forecast {
    Points(Vec<ForecastPoint>),
    Nested {
        #[serde(default)]
        forecast: Vec<ForecastPoint>,
    },
}

impl Forecast {
    pub fn points(&self) -> &[ForecastPoint] {
        match self {
            Forecast::Points(points) => points,
            Forecast::Nested { forecast } => forecast,
        }
    }
}

impl Default for Forecast {
    fn default() -> Self {
        Forecast::Points(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub metric: String,
    #[serde(default)]
    pub trend: TrendSummary,
    #[serde(default)]
    pub forecast: Forecast,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "active_user")]
    pub status: String,
}

/// L'UI admin lit `{users: [...]}` alors que le backend admin répond une liste nue
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UsersPayload {
    Wrapped {
        #[serde(default)]
        users: Vec<User>,
    },
    Bare(Vec<User>),
}

impl UsersPayload {
    pub fn into_users(self) -> Vec<User> {
        match self {
            UsersPayload::Wrapped { users } => users,
            UsersPayload::Bare(users) => users,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfHealingAction {
    OptimizeResources,
    RestartService,
    ClearCache,
}

impl SelfHealingAction {
    pub fn all() -> &'static [SelfHealingAction] {
        &[
            SelfHealingAction::OptimizeResources,
            SelfHealingAction::RestartService,
            SelfHealingAction::ClearCache,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelfHealingAction::OptimizeResources => "optimize_resources",
            SelfHealingAction::RestartService => "restart_service",
            SelfHealingAction::ClearCache => "clear_cache",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SelfHealingAction::OptimizeResources => "Optimize Resources",
            SelfHealingAction::RestartService => "Restart Service",
            SelfHealingAction::ClearCache => "Clear Cache",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ConsoleError> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == input)
            .ok_or_else(|| ConsoleError::InvalidValue(format!("unknown self-healing action '{}'", input)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelfHealingRequest {
    pub action: SelfHealingAction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelfHealingReply {
    #[serde(default)]
    pub result: serde_json::Value,
}

impl SelfHealingReply {
    pub fn summary(&self) -> String {
        match &self.result {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "no result".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigUpdate {
    pub parameter: String,
    pub value: ConfigValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigReply {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_defaults() {
        let snapshot: StatusSnapshot = serde_json::from_value(json!({
            "cpu_usage": 12.5,
            "memory_usage": 40.0,
            "disk_usage": 70.25,
            "status": "healthy"
        }))
        .unwrap();
        assert_eq!(snapshot.process_count, 0);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.status, "healthy");
    }

    #[test]
    fn test_monitoring_flattens_status() {
        let snapshot: MonitoringSnapshot = serde_json::from_value(json!({
            "cpu_usage": 10.0,
            "memory_usage": 20.0,
            "disk_usage": 30.0,
            "process_count": 120,
            "status": "healthy",
            "history": [{"timestamp": "0:00", "cpu_usage": 10.0, "memory_usage": 20.0, "disk_usage": 30.0}],
            "alerts": [{"id": "alert-1", "level": "WARNING", "message": "High CPU usage detected",
                        "source": "system_monitor", "timestamp": "2024-01-01T00:00:00"}]
        }))
        .unwrap();
        assert_eq!(snapshot.status.process_count, 120);
        assert_eq!(snapshot.status.history.len(), 1);
        assert_eq!(snapshot.alerts[0].status, AlertStatus::Active);
    }

    #[test]
    fn test_ids_accept_numbers() {
        let alert: AlertEntry = serde_json::from_value(json!({
            "id": 7, "timestamp": "t", "level": "CRITICAL", "message": "m", "source": "s", "status": "resolved"
        }))
        .unwrap();
        assert_eq!(alert.id, "7");
        assert_eq!(alert.status, AlertStatus::Resolved);

        let log: LogEntry = serde_json::from_value(json!({
            "timestamp": "t", "level": "INFO", "service": "WebDashboard", "message": "m"
        }))
        .unwrap();
        assert_eq!(log.id, "");
    }

    #[test]
    fn test_config_value_parse_integer() {
        assert!(ConfigValue::parse_integer("abc").is_err());
        assert_eq!(ConfigValue::parse_integer(" 10 ").unwrap(), ConfigValue::Integer(10));
    }

    #[test]
    fn test_forecast_shapes() {
        let nested: TrendReport = serde_json::from_value(json!({
            "metric": "cpu_usage",
            "trend": {"mean": 42.0, "slope": 0.1},
            "forecast": {"forecast": [{"timestamp": "2024-01-02T00:00:00", "predicted": 45.0, "lower": 40.0, "upper": 50.0}]},
            "risk_level": "medium",
            "recommendations": ["Scale up"]
        }))
        .unwrap();
        assert_eq!(nested.forecast.points().len(), 1);
        assert_eq!(nested.trend.mean, Some(42.0));
        assert!(nested.trend.extra.contains_key("slope"));

        let bare: TrendReport = serde_json::from_value(json!({
            "metric": "memory_usage",
            "forecast": [],
            "risk_level": "unknown"
        }))
        .unwrap();
        assert!(bare.forecast.points().is_empty());
        assert_eq!(bare.risk_level, RiskLevel::Unknown);

        let empty: TrendReport = serde_json::from_value(json!({"metric": "disk", "forecast": {}})).unwrap();
        assert!(empty.forecast.points().is_empty());
    }

    #[test]
    fn test_users_payload_shapes() {
        let wrapped: UsersPayload = serde_json::from_value(json!({
            "users": [{"id": "1", "username": "admin", "email": "admin@example.com", "role": "admin", "status": "active"}]
        }))
        .unwrap();
        assert_eq!(wrapped.into_users().len(), 1);

        let bare: UsersPayload = serde_json::from_value(json!([
            {"id": 2, "username": "user1", "email": "user1@example.com", "role": "user"}
        ]))
        .unwrap();
        let users = bare.into_users();
        assert_eq!(users[0].id, "2");
        assert_eq!(users[0].status, "active");
    }

    #[test]
    fn test_self_healing_action_wire_name() {
        let body = serde_json::to_value(SelfHealingRequest { action: SelfHealingAction::ClearCache }).unwrap();
        assert_eq!(body, json!({"action": "clear_cache"}));
        assert_eq!(SelfHealingAction::parse("restart_service").unwrap(), SelfHealingAction::RestartService);
        assert!(SelfHealingAction::parse("reboot").is_err());
    }
}
