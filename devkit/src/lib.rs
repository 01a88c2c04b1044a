/*!
# BackLog DevKit - Stubs et Utilitaires pour Développement

Bibliothèque facilitant le développement et les tests des consoles avec:
- Stub HTTP (axum) qui imite le backend `/api/...` sur un port éphémère
- Builders de payloads JSON au format du backend
- Harness de tests (attentes sur les requêtes reçues)
*/

pub mod api_stub;
pub mod payloads;
pub mod test_utils;

pub use api_stub::{ApiStub, RecordedRequest, StubReply, StubServer};
pub use payloads::PayloadBuilder;
pub use test_utils::TestHarness;
