//! Données de démonstration déterministes.
//!
//! Les pages admin Logs / Alerts / Configuration n'ont jamais eu de backend :
//! leurs données sont générées ici à partir d'un instant de référence, ce qui
//! rend le rendu reproductible dans les tests.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::models::{
    AlertEntry, AlertLevel, AlertStatus, ConfigMap, ConfigValue, Forecast, ForecastPoint,
    HistorySample, LogEntry, LogLevel, MonitoringSnapshot, RiskLevel, StatusSnapshot, TrendReport,
    TrendSummary, User,
};

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `count` entrées, une par minute en remontant ; i%5==0 → ERROR, i%3==0 → WARNING
pub fn mock_logs(count: usize, now: DateTime<Utc>) -> Vec<LogEntry> {
    (0..count)
        .map(|i| {
            let (level, kind) = if i % 5 == 0 {
                (LogLevel::Error, "critical error")
            } else if i % 3 == 0 {
                (LogLevel::Warning, "warning")
            } else {
                (LogLevel::Info, "informational")
            };
            LogEntry {
                id: (i + 1).to_string(),
                timestamp: iso(now - Duration::minutes(i as i64)),
                level,
                service: format!("service_{}", i % 5),
                message: format!("Log message {} - This is a {} message", i + 1, kind),
            }
        })
        .collect()
}

/// `count` alertes, une par heure en remontant ; i%4==0 déjà résolues
pub fn mock_alerts(count: usize, now: DateTime<Utc>) -> Vec<AlertEntry> {
    (0..count)
        .map(|i| {
            let (level, text) = if i % 3 == 0 {
                (AlertLevel::Critical, "Critical system failure")
            } else if i % 2 == 0 {
                (AlertLevel::Warning, "High resource usage")
            } else {
                (AlertLevel::Info, "Informational alert")
            };
            AlertEntry {
                id: (i + 1).to_string(),
                timestamp: iso(now - Duration::hours(i as i64)),
                level,
                message: format!("Alert {} - {}", i + 1, text),
                source: format!("source_{}", i % 4),
                status: if i % 4 == 0 { AlertStatus::Resolved } else { AlertStatus::Active },
            }
        })
        .collect()
}

/// Configuration admin initiale
pub fn mock_config() -> ConfigMap {
    let mut config = ConfigMap::new();
    config.insert("logLevel".into(), ConfigValue::Text("INFO".into()));
    config.insert("maxRetries".into(), ConfigValue::Integer(3));
    config.insert("cacheTTL".into(), ConfigValue::Integer(3600));
    config.insert("rateLimit".into(), ConfigValue::Integer(100));
    config
}

/// Réglages locaux de la console frontend
pub fn default_settings() -> ConfigMap {
    let mut config = ConfigMap::new();
    config.insert("logLevel".into(), ConfigValue::Text("INFO".into()));
    config.insert("alertThreshold".into(), ConfigValue::Integer(80));
    config.insert("autoRecovery".into(), ConfigValue::Bool(true));
    config
}

pub fn mock_users() -> Vec<User> {
    [("1", "admin", "admin"), ("2", "user1", "user"), ("3", "manager", "manager")]
        .iter()
        .map(|(id, username, role)| User {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role: role.to_string(),
            status: "active".to_string(),
        })
        .collect()
}

/// 24 points horaires "0:00".."23:00" qui dérivent depuis la valeur courante
pub fn mock_history(cpu: f64, memory: f64, disk: f64) -> Vec<HistorySample> {
    (0..24)
        .map(|i| {
            let step = i as f64;
            HistorySample {
                timestamp: format!("{}:00", i),
                cpu_usage: cpu + step * 0.5,
                memory_usage: memory + step * 0.3,
                disk_usage: disk + step * 0.2,
            }
        })
        .collect()
}

pub fn mock_status(now: DateTime<Utc>) -> StatusSnapshot {
    StatusSnapshot {
        cpu_usage: 23.4,
        memory_usage: 61.2,
        disk_usage: 48.7,
        process_count: 212,
        status: "healthy".to_string(),
        timestamp: Some(iso(now)),
        history: Vec::new(),
    }
}

pub fn mock_metrics(now: DateTime<Utc>) -> StatusSnapshot {
    let mut status = mock_status(now);
    status.history = mock_history(status.cpu_usage, status.memory_usage, status.disk_usage);
    status
}

pub fn mock_monitoring(now: DateTime<Utc>) -> MonitoringSnapshot {
    let alert = |id: &str, level, message: &str| AlertEntry {
        id: id.to_string(),
        timestamp: iso(now),
        level,
        message: message.to_string(),
        source: "system_monitor".to_string(),
        status: AlertStatus::Active,
    };
    MonitoringSnapshot {
        status: mock_metrics(now),
        alerts: vec![
            alert("alert-1", AlertLevel::Warning, "High CPU usage detected"),
            alert("alert-2", AlertLevel::Info, "Memory usage increasing"),
        ],
    }
}

pub fn mock_trends(now: DateTime<Utc>) -> Vec<TrendReport> {
    let forecast = |base: f64| {
        (1..=7)
            .map(|day| {
                let predicted = base + day as f64 * 1.5;
                ForecastPoint {
                    timestamp: iso(now + Duration::days(day)),
                    predicted,
                    lower: predicted - 5.0,
                    upper: predicted + 5.0,
                }
            })
            .collect::<Vec<_>>()
    };
    let summary = |mean: f64| TrendSummary { mean: Some(mean), extra: Default::default() };

    vec![
        TrendReport {
            metric: "cpu_usage".to_string(),
            trend: summary(35.0),
            forecast: Forecast::Nested { forecast: forecast(35.0) },
            risk_level: RiskLevel::Medium,
            recommendations: vec!["CPU usage trending upward; review scheduled batch jobs".to_string()],
        },
        TrendReport {
            metric: "memory_usage".to_string(),
            trend: summary(62.0),
            forecast: Forecast::Nested { forecast: forecast(62.0) },
            risk_level: RiskLevel::High,
            recommendations: vec![
                "Memory expected to exceed 75% within a week".to_string(),
                "Increase cache eviction or add capacity".to_string(),
            ],
        },
    ]
}
