/*!
Test Harness pour les consoles

Facilite l'écriture de tests d'intégration avec:
- Démarrage automatique du stub HTTP
- Attentes sur le nombre de requêtes reçues par route
- Attente active (bornée) des requêtes émises par un poller
*/

use crate::api_stub::{ApiStub, StubServer};
use std::time::Duration;
use anyhow::Result;

/// Harness de test : un stub démarré + des attentes à vérifier
pub struct TestHarness {
    pub server: StubServer,
    expectations: Vec<Expectation>,
}

#[derive(Debug)]
struct Expectation {
    path: String,
    expected_count: usize,
}

impl TestHarness {
    /// Démarre un stub vide
    pub async fn new() -> Result<Self> {
        Self::with_stub(ApiStub::new()).await
    }

    /// Démarre un stub déjà programmé
    pub async fn with_stub(stub: ApiStub) -> Result<Self> {
        env_logger::try_init().ok(); // Init logging pour tests

        Ok(Self {
            server: stub.serve().await?,
            expectations: Vec::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.server.base_url
    }

    pub fn stub(&self) -> &ApiStub {
        &self.server.stub
    }

    /// Ajoute une expectation: on s'attend à recevoir N requêtes sur un chemin
    pub fn expect_requests(&mut self, path: &str, count: usize) -> &mut Self {
        self.expectations.push(Expectation {
            path: path.to_string(),
            expected_count: count,
        });
        self
    }

    /// Attend qu'au moins `count` requêtes soient arrivées sur `path`
    pub async fn wait_for_requests(&self, path: &str, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();

        while start.elapsed() < Duration::from_millis(timeout_ms) {
            if self.stub().request_count(path) >= count {
                log::info!("✅ Received {} requests on {}", count, path);
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        log::warn!("⏰ Timeout waiting for {} requests on {}", count, path);
        false
    }

    /// Vérifie toutes les expectations configurées
    pub fn verify_expectations(&self) -> Result<()> {
        log::info!("🔍 Verifying {} expectations...", self.expectations.len());

        for expectation in &self.expectations {
            let actual_count = self.stub().request_count(&expectation.path);
            if actual_count != expectation.expected_count {
                anyhow::bail!(
                    "Expectation failed for path '{}': expected {} requests, got {}",
                    expectation.path, expectation.expected_count, actual_count
                );
            }
            log::info!("✅ Path '{}': {} requests as expected", expectation.path, actual_count);
        }

        Ok(())
    }

    /// Reset le harness pour un nouveau scénario
    pub fn reset(&mut self) {
        self.stub().clear();
        self.expectations.clear();
        log::info!("🧹 Test harness reset");
    }
}
