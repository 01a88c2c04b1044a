/*!
Stub du backend REST pour développement sans serveur Python

Sert des réponses préenregistrées par (méthode, chemin) et enregistre toutes
les requêtes reçues pour permettre des assertions dans les tests.
*/

use axum::body::Bytes;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{extract::State, Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use anyhow::Result;

/// Réponse programmée pour une route
#[derive(Debug, Clone)]
pub enum StubReply {
    Json(Value),
    /// Code HTTP sans corps exploitable (ex: 500)
    Status(u16),
    /// Corps brut, pour simuler un JSON invalide
    Raw(String),
    /// Même réponse, servie après un délai
    Delayed(Duration, Box<StubReply>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Valeur d'un paramètre de query (`limit=5` → "5")
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then(|| v.to_string())
        })
    }
}

#[derive(Default)]
struct StubState {
    replies: HashMap<(String, String), StubReply>,
    requests: Vec<RecordedRequest>,
}

/// Backend simulé ; clonable, toutes les copies partagent le même état
#[derive(Clone, Default)]
pub struct ApiStub {
    state: Arc<Mutex<StubState>>,
}

impl ApiStub {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reply(&self, method: &str, path: &str, reply: StubReply) -> &Self {
        self.state()
            .replies
            .insert((method.to_uppercase(), path.to_string()), reply);
        self
    }

    pub fn reply_json(&self, method: &str, path: &str, value: Value) -> &Self {
        self.reply(method, path, StubReply::Json(value))
    }

    pub fn reply_status(&self, method: &str, path: &str, status: u16) -> &Self {
        self.reply(method, path, StubReply::Status(status))
    }

    pub fn reply_raw(&self, method: &str, path: &str, body: &str) -> &Self {
        self.reply(method, path, StubReply::Raw(body.to_string()))
    }

    /// Toutes les requêtes reçues (pour assertions de tests)
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Requêtes reçues sur un chemin donné, quelle que soit la query
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.state().requests.iter().filter(|r| r.path == path).count()
    }

    pub fn last_body(&self, path: &str) -> Option<Value> {
        self.requests_to(path).into_iter().rev().find_map(|r| r.body)
    }

    /// Reset des requêtes enregistrées (les réponses restent programmées)
    pub fn clear(&self) {
        self.state().requests.clear();
    }

    fn record(&self, method: &Method, uri: &Uri, body: &Bytes) -> Option<StubReply> {
        let request = RecordedRequest {
            method: method.as_str().to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            body: serde_json::from_slice(body).ok(),
        };
        log::info!("📥 [STUB] {} {}", request.method, uri);

        let mut state = self.state();
        let key = (request.method.clone(), request.path.clone());
        state.requests.push(request);
        state.replies.get(&key).cloned()
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(handle).with_state(self.clone())
    }

    /// Démarre le stub sur 127.0.0.1 avec un port choisi par l'OS
    pub async fn serve(self) -> Result<StubServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = self.router();

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                log::error!("❌ [STUB] server stopped: {}", e);
            }
        });

        log::info!("🚀 [STUB] listening on http://{}", addr);
        Ok(StubServer {
            base_url: format!("http://{}", addr),
            stub: self,
            task,
        })
    }
}

async fn handle(State(stub): State<ApiStub>, method: Method, uri: Uri, body: Bytes) -> Response {
    match stub.record(&method, &uri, &body) {
        Some(reply) => respond(reply).await,
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Not Found" })),
        )
            .into_response(),
    }
}

async fn respond(mut reply: StubReply) -> Response {
    loop {
        match reply {
            StubReply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
            StubReply::Json(value) => return Json(value).into_response(),
            StubReply::Status(code) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                return (status, Json(serde_json::json!({ "detail": "stub error" }))).into_response();
            }
            StubReply::Raw(body) => {
                return ([(axum::http::header::CONTENT_TYPE, "application/json")], body).into_response()
            }
        }
    }
}

/// Stub en cours d'exécution ; arrêté au drop
pub struct StubServer {
    pub base_url: String,
    pub stub: ApiStub,
    task: JoinHandle<()>,
}

impl StubServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_stub_serves_and_records() {
        let stub = ApiStub::new();
        stub.reply_json("GET", "/api/status", json!({ "cpu_usage": 12.5 }));
        let server = stub.serve().await.unwrap();

        let body: Value = reqwest::get(server.url("/api/status?verbose=1"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["cpu_usage"], 12.5);

        let requests = server.stub.requests_to("/api/status");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].query_param("verbose").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = ApiStub::new().serve().await.unwrap();
        let response = reqwest::get(server.url("/api/nope")).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(server.stub.request_count("/api/nope"), 1);
    }

    #[tokio::test]
    async fn test_status_and_post_body() {
        let stub = ApiStub::new();
        stub.reply_status("POST", "/api/config", 500);
        let server = stub.serve().await.unwrap();

        let response = reqwest::Client::new()
            .post(server.url("/api/config"))
            .json(&json!({ "parameter": "logLevel", "value": "DEBUG" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(
            server.stub.last_body("/api/config"),
            Some(json!({ "parameter": "logLevel", "value": "DEBUG" }))
        );
    }
}
