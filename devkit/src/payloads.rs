/*!
Builders de payloads JSON au format du backend `/api/...`

Les valeurs sont construites en `serde_json::Value` brut pour que les tests
exercent la désérialisation réelle des consoles.
*/

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Helper pour créer des réponses de test conformes au backend
pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Réponse de /api/status et /api/admin/status
    pub fn status(cpu: f64, memory: f64, disk: f64, processes: u64) -> Value {
        json!({
            "cpu_usage": cpu,
            "memory_usage": memory,
            "disk_usage": disk,
            "process_count": processes,
            "status": "healthy",
            "timestamp": iso(Utc::now()),
        })
    }

    /// Statut + `points` échantillons horaires (réponse de /api/admin/metrics)
    pub fn metrics(cpu: f64, memory: f64, disk: f64, points: usize) -> Value {
        let now = Utc::now();
        let history: Vec<Value> = (0..points)
            .rev()
            .map(|i| {
                json!({
                    "timestamp": iso(now - Duration::hours(i as i64)),
                    "cpu_usage": cpu,
                    "memory_usage": memory,
                    "disk_usage": disk,
                })
            })
            .collect();

        let mut status = Self::status(cpu, memory, disk, 120);
        status["history"] = Value::Array(history);
        status
    }

    /// Réponse de /api/admin/monitoring : métriques + alertes système
    pub fn monitoring(cpu: f64, alerts: Value) -> Value {
        let mut payload = Self::metrics(cpu, 50.0, 40.0, 6);
        payload["alerts"] = alerts;
        payload
    }

    pub fn log(id: u64, level: &str, service: &str, message: &str) -> Value {
        json!({
            "id": id,
            "timestamp": iso(Utc::now()),
            "level": level,
            "service": service,
            "message": message,
        })
    }

    /// `count` logs INFO numérotés à partir de 1
    pub fn logs(count: usize) -> Value {
        Value::Array(
            (1..=count as u64)
                .map(|i| Self::log(i, "INFO", "api", &format!("Log message {}", i)))
                .collect(),
        )
    }

    pub fn alert(id: &str, level: &str, status: &str) -> Value {
        json!({
            "id": id,
            "timestamp": iso(Utc::now()),
            "level": level,
            "message": format!("Alert {}", id),
            "source": "monitor",
            "status": status,
        })
    }

    pub fn alerts(ids: &[&str]) -> Value {
        Value::Array(ids.iter().map(|id| Self::alert(id, "WARNING", "active")).collect())
    }

    /// Un rapport de tendance avec une prévision de `days` jours
    pub fn trend(metric: &str, mean: f64, risk: &str, days: usize) -> Value {
        let now = Utc::now();
        let forecast: Vec<Value> = (1..=days)
            .map(|d| {
                json!({
                    "timestamp": iso(now + Duration::days(d as i64)),
                    "predicted": mean,
                    "lower": mean - 5.0,
                    "upper": mean + 5.0,
                })
            })
            .collect();
        json!({
            "metric": metric,
            "trend": { "mean": mean, "slope": 0.1 },
            "forecast": { "forecast": forecast },
            "risk_level": risk,
            "recommendations": [format!("Monitor {}", metric)],
        })
    }

    pub fn user(id: u64, username: &str, role: &str) -> Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{}@example.com", username),
            "role": role,
            "status": "active",
        })
    }

    /// Forme enveloppée `{users: [...]}`
    pub fn users(names: &[&str]) -> Value {
        let users: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Self::user(i as u64 + 1, name, "user"))
            .collect();
        json!({ "users": users })
    }

    pub fn self_healing_reply(result: &str) -> Value {
        json!({ "status": "success", "result": result })
    }

    pub fn config_reply(message: &str) -> Value {
        json!({ "status": "success", "message": message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_builders() {
        let metrics = PayloadBuilder::metrics(25.0, 60.0, 40.0, 24);
        assert_eq!(metrics["cpu_usage"], 25.0);
        assert_eq!(metrics["history"].as_array().unwrap().len(), 24);

        let logs = PayloadBuilder::logs(3);
        assert_eq!(logs[2]["id"], 3);
        assert_eq!(logs[0]["level"], "INFO");

        let trend = PayloadBuilder::trend("cpu", 42.0, "high", 7);
        assert_eq!(trend["forecast"]["forecast"].as_array().unwrap().len(), 7);
        assert_eq!(trend["risk_level"], "high");

        let users = PayloadBuilder::users(&["alice", "bob"]);
        assert_eq!(users["users"][1]["email"], "bob@example.com");
    }
}
