//! In-memory data source.
//!
//! Serves canned JSON per (method, path), records every call, and can be told
//! to fail an endpoint. `Logs { limit }` truncates array fixtures the way the
//! real endpoint honours `?limit=`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

use super::{DataSource, Endpoint, Method};
use crate::error::{ConsoleError, ConsoleResult};
use crate::fixtures;

#[derive(Debug, Clone)]
pub enum FixtureReply {
    Json(Value),
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub endpoint: Endpoint,
    pub body: Option<Value>,
}

pub struct FixtureSource {
    name: String,
    replies: Mutex<HashMap<(Method, &'static str), FixtureReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FixtureSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Données des pages admin sans backend (logs, alertes, configuration)
    pub fn admin_mocks(now: DateTime<Utc>) -> Self {
        let source = Self::new("admin-mocks");
        source.set_value(&Endpoint::AdminLogs, &fixtures::mock_logs(50, now));
        source.set_value(&Endpoint::AdminAlerts, &fixtures::mock_alerts(10, now));
        source.set_value(&Endpoint::AdminConfig, &fixtures::mock_config());
        source
    }

    /// Mode offline : tous les endpoints des deux consoles
    pub fn demo(now: DateTime<Utc>) -> Self {
        let mut source = Self::admin_mocks(now);
        source.name = "demo".to_string();
        source.set_value(&Endpoint::AdminStatus, &fixtures::mock_status(now));
        source.set_value(&Endpoint::AdminMetrics, &fixtures::mock_metrics(now));
        source.set_value(&Endpoint::AdminMonitoring, &fixtures::mock_monitoring(now));
        source.set_json(&Endpoint::AdminUsers, json!({ "users": fixtures::mock_users() }));
        source.set_value(&Endpoint::Status, &fixtures::mock_status(now));
        source.set_value(&Endpoint::Logs { limit: 0 }, &fixtures::mock_logs(50, now));
        source.set_value(&Endpoint::Alerts, &fixtures::mock_alerts(10, now));
        source.set_value(&Endpoint::Trends, &fixtures::mock_trends(now));
        source.set_json(
            &Endpoint::SelfHealing,
            json!({ "status": "success", "result": "Action completed" }),
        );
        source.set_json(
            &Endpoint::Config,
            json!({ "status": "success", "message": "Configuration updated successfully" }),
        );
        source
    }

    pub fn with_json(self, endpoint: &Endpoint, value: Value) -> Self {
        self.set_json(endpoint, value);
        self
    }

    pub fn with_failure(self, endpoint: &Endpoint, message: &str) -> Self {
        self.set_failure(endpoint, message);
        self
    }

    pub fn set_json(&self, endpoint: &Endpoint, value: Value) {
        self.replies
            .lock()
            .insert((endpoint.method(), endpoint.path()), FixtureReply::Json(value));
    }

    // Les fixtures sont des types du crate : la sérialisation ne peut pas échouer
    fn set_value<T: Serialize>(&self, endpoint: &Endpoint, value: &T) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.set_json(endpoint, value);
    }

    pub fn set_failure(&self, endpoint: &Endpoint, message: &str) {
        self.replies
            .lock()
            .insert((endpoint.method(), endpoint.path()), FixtureReply::Fail(message.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Nombre d'appels sur un chemin, quelle que soit la query
    pub fn call_count(&self, endpoint: &Endpoint) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint.path() == endpoint.path())
            .count()
    }

    fn reply(&self, method: Method, endpoint: &Endpoint, body: Option<Value>) -> ConsoleResult<Value> {
        self.calls.lock().push(RecordedCall {
            method,
            endpoint: endpoint.clone(),
            body,
        });
        debug!("[{}] {} {}", self.name, method, endpoint);

        let reply = self.replies.lock().get(&(method, endpoint.path())).cloned();
        match reply {
            Some(FixtureReply::Json(value)) => Ok(truncate(value, endpoint.limit())),
            Some(FixtureReply::Fail(message)) => Err(ConsoleError::Simulated(message)),
            None => Err(ConsoleError::Fixture(endpoint.to_string())),
        }
    }
}

fn truncate(value: Value, limit: Option<usize>) -> Value {
    match (value, limit) {
        (Value::Array(mut items), Some(limit)) => {
            items.truncate(limit);
            Value::Array(items)
        }
        (value, _) => value,
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, endpoint: &Endpoint) -> ConsoleResult<Value> {
        self.reply(Method::Get, endpoint, None)
    }

    async fn post(&self, endpoint: &Endpoint, body: Value) -> ConsoleResult<Value> {
        self.reply(Method::Post, endpoint, Some(body))
    }
}
