/*!
# BackLog Console Core - Contrat de rafraîchissement des consoles

Cœur des deux consoles (panneau admin et console frontend) :
- Sources de données (API REST via reqwest, fixtures en mémoire)
- Loader à jetons de requête + poller annulable
- Commandes optimistes (commit / rollback explicites)
- Modèles de vue des pages et routeur
*/

pub mod alerts;
pub mod charts;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod loader;
pub mod models;
pub mod pages;
pub mod poller;
pub mod shell;
pub mod source;
pub mod state;
pub mod users;

pub use commands::{Notice, NoticeKind};
pub use config::{load_config, ConsoleConfig};
pub use error::{ConsoleError, ConsoleResult};
pub use loader::{LoadState, Loader, RequestToken};
pub use pages::{Page, PageAction, PageContext, PageView, Section, ViewBody};
pub use poller::{spawn_polling, PollHandle};
pub use shell::{AppKind, HeaderStatus, PageKind, Shell, StatusBar};
pub use source::{DataSource, Endpoint, FixtureSource, RemoteSource};
