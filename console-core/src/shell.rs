/**
 * SHELL - Routeur, navigation et barre d'état des deux consoles
 *
 * RÔLE :
 * Monte une page par route, garde la barre d'état de l'en-tête à jour
 * (poll toutes les 30s) et démonte proprement la page précédente.
 *
 * FONCTIONNEMENT :
 * - table de routes fixe par application, "/" = Dashboard
 * - route inconnue → ConsoleError::UnknownRoute
 * - `StatusBar` : "connecting" avant le premier poll, l'erreur remplace le statut
 *   jusqu'au prochain succès
 * - pages mock-only servies par les fixtures, le reste par la source configurée
 */

use chrono::Utc;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::info;

use crate::commands::Notice;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::StatusSnapshot;
use crate::pages::alerts::AlertsPage;
use crate::pages::logs::LogsPage;
use crate::pages::{admin, frontend, Page, PageAction, PageContext, PageView};
use crate::poller::{spawn_polling, PollHandle};
use crate::source::{DataSource, Endpoint, FixtureSource, RemoteSource};
use crate::state::{new_state, Shared};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Admin,
    Frontend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Dashboard,
    UserManagement,
    SystemMonitoring,
    Configuration,
    Logs,
    Alerts,
    Trends,
    Settings,
}

impl PageKind {
    pub fn label(&self) -> &'static str {
        match self {
            PageKind::Dashboard => "Dashboard",
            PageKind::UserManagement => "User Management",
            PageKind::SystemMonitoring => "System Monitoring",
            PageKind::Configuration => "Configuration",
            PageKind::Logs => "Logs",
            PageKind::Alerts => "Alerts",
            PageKind::Trends => "Trends",
            PageKind::Settings => "Settings",
        }
    }

    /// "User Management" → "user-management"
    pub fn slug(&self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }

    pub fn path(&self) -> String {
        format!("/{}", self.slug())
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl AppKind {
    pub fn title(&self) -> &'static str {
        match self {
            AppKind::Admin => "AI_BackLog_Assistant Admin Panel",
            AppKind::Frontend => "AI_BackLog_Assistant Dashboard",
        }
    }

    /// Entrées de navigation, dans l'ordre du menu latéral
    pub fn pages(&self) -> &'static [PageKind] {
        match self {
            AppKind::Admin => &[
                PageKind::Dashboard,
                PageKind::UserManagement,
                PageKind::SystemMonitoring,
                PageKind::Configuration,
                PageKind::Logs,
                PageKind::Alerts,
            ],
            AppKind::Frontend => &[
                PageKind::Dashboard,
                PageKind::Logs,
                PageKind::Alerts,
                PageKind::Trends,
                PageKind::Settings,
            ],
        }
    }

    pub fn status_endpoint(&self) -> Endpoint {
        match self {
            AppKind::Admin => Endpoint::AdminStatus,
            AppKind::Frontend => Endpoint::Status,
        }
    }

    /// Table de routes complète : "/" puis un chemin par entrée de navigation
    pub fn routes(&self) -> Vec<(String, PageKind)> {
        let mut routes = vec![("/".to_string(), PageKind::Dashboard)];
        routes.extend(self.pages().iter().map(|page| (page.path(), *page)));
        routes
    }

    pub fn resolve(&self, path: &str) -> ConsoleResult<PageKind> {
        let normalized = match path.trim() {
            "" => "/",
            p if p.len() > 1 => p.trim_end_matches('/'),
            p => p,
        };
        self.routes()
            .into_iter()
            .find(|(route, _)| route == normalized)
            .map(|(_, page)| page)
            .ok_or_else(|| ConsoleError::UnknownRoute(path.to_string()))
    }

    pub fn build(&self, page: PageKind) -> ConsoleResult<Box<dyn Page>> {
        let built: Box<dyn Page> = match (self, page) {
            (AppKind::Admin, PageKind::Dashboard) => Box::new(admin::Dashboard::new()),
            (AppKind::Admin, PageKind::UserManagement) => Box::new(admin::UserManagement::new()),
            (AppKind::Admin, PageKind::SystemMonitoring) => Box::new(admin::SystemMonitoring::new()),
            (AppKind::Admin, PageKind::Configuration) => Box::new(admin::Configuration::new()),
            (AppKind::Admin, PageKind::Logs) => Box::new(LogsPage::admin()),
            (AppKind::Admin, PageKind::Alerts) => Box::new(AlertsPage::admin()),
            (AppKind::Frontend, PageKind::Dashboard) => Box::new(frontend::Dashboard::new()),
            (AppKind::Frontend, PageKind::Logs) => Box::new(LogsPage::frontend()),
            (AppKind::Frontend, PageKind::Alerts) => Box::new(AlertsPage::frontend()),
            (AppKind::Frontend, PageKind::Trends) => Box::new(frontend::Trends::new()),
            (AppKind::Frontend, PageKind::Settings) => Box::new(frontend::Settings::new()),
            (_, page) => return Err(ConsoleError::UnknownRoute(page.path())),
        };
        Ok(built)
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppKind::Admin => f.write_str("admin"),
            AppKind::Frontend => f.write_str("frontend"),
        }
    }
}

impl FromStr for AppKind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(AppKind::Admin),
            "frontend" => Ok(AppKind::Frontend),
            other => Err(ConsoleError::InvalidValue(format!("unknown application '{}'", other))),
        }
    }
}

// ============================================================================
// BARRE D'ÉTAT
// ============================================================================

/// Ce que l'en-tête doit afficher après le dernier poll
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderStatus {
    Connecting,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Default)]
struct HeaderState {
    snapshot: Option<StatusSnapshot>,
    error: Option<String>,
    revision: u64,
}

pub struct StatusBar {
    state: Shared<HeaderState>,
    poller: Option<PollHandle>,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            state: new_state(HeaderState::default()),
            poller: None,
        }
    }

    pub fn start(&mut self, endpoint: Endpoint, ctx: &PageContext) {
        let state = self.state.clone();
        let failed = self.state.clone();
        let changed = ctx.changed.clone();
        let notify_failure = ctx.changed.clone();
        let source = ctx.source_for(&endpoint);
        self.poller = Some(spawn_polling(
            source,
            endpoint,
            ctx.interval,
            move |snapshot: StatusSnapshot| {
                let mut header = state.lock();
                header.snapshot = Some(snapshot);
                header.error = None;
                header.revision += 1;
                changed.notify_one();
            },
            // le dernier statut n'est plus affiché comme actuel
            move |e| {
                let mut header = failed.lock();
                header.snapshot = None;
                header.error = Some(e.to_string());
                header.revision += 1;
                notify_failure.notify_one();
            },
        ));
    }

    pub fn stop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_cancelled())
    }

    pub fn snapshot(&self) -> Option<StatusSnapshot> {
        self.state.lock().snapshot.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// "CPU: 12.3% | Memory: 45.6% | Disk: 78.9%", absent tant que le dernier poll n'a pas réussi
    pub fn line(&self) -> Option<String> {
        self.state.lock().snapshot.as_ref().map(|s| {
            format!(
                "CPU: {:.1}% | Memory: {:.1}% | Disk: {:.1}%",
                s.cpu_usage, s.memory_usage, s.disk_usage
            )
        })
    }

    pub fn status(&self) -> HeaderStatus {
        if let Some(e) = self.error() {
            return HeaderStatus::Failed(e);
        }
        match self.line() {
            Some(line) => HeaderStatus::Ready(line),
            None => HeaderStatus::Connecting,
        }
    }
}

// ============================================================================
// SHELL
// ============================================================================

pub struct Shell {
    app: AppKind,
    ctx: PageContext,
    header: StatusBar,
    current: Option<(PageKind, Box<dyn Page>)>,
}

impl Shell {
    pub fn new(app: AppKind, ctx: PageContext) -> Self {
        Self {
            app,
            ctx,
            header: StatusBar::new(),
            current: None,
        }
    }

    /// Source distante (ou fixtures si `offline`) + mocks pour les pages sans backend
    pub fn connect(app: AppKind, config: &ConsoleConfig, offline: bool) -> ConsoleResult<Self> {
        let now = Utc::now();
        let api: Arc<dyn DataSource> = if offline {
            Arc::new(FixtureSource::demo(now))
        } else {
            Arc::new(RemoteSource::from_config(config)?)
        };
        let mocks = Arc::new(FixtureSource::admin_mocks(now));
        info!("{} console using '{}' data source", app, api.name());
        Ok(Self::new(app, PageContext::new(api, mocks, config)))
    }

    pub fn app(&self) -> AppKind {
        self.app
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn header(&self) -> &StatusBar {
        &self.header
    }

    /// Démarre le poll de la barre d'état
    pub fn start(&mut self) {
        if !self.header.is_running() {
            self.header.start(self.app.status_endpoint(), &self.ctx);
        }
    }

    pub fn current(&self) -> Option<PageKind> {
        self.current.as_ref().map(|(kind, _)| *kind)
    }

    /// Démonte la page courante puis monte celle de `path`
    pub async fn open(&mut self, path: &str) -> ConsoleResult<PageKind> {
        let kind = self.app.resolve(path)?;
        let mut page = self.app.build(kind)?;
        self.unmount_current();

        info!("mounting {} ({})", kind, kind.path());
        page.mount(&self.ctx).await;
        self.current = Some((kind, page));
        Ok(kind)
    }

    fn unmount_current(&mut self) {
        if let Some((kind, mut page)) = self.current.take() {
            page.unmount();
            info!("unmounted {}", kind);
        }
    }

    pub fn view(&self) -> Option<PageView> {
        self.current.as_ref().map(|(_, page)| page.view())
    }

    pub fn revision(&self) -> u64 {
        let page = self.current.as_ref().map(|(_, page)| page.revision()).unwrap_or(0);
        page + self.header.revision()
    }

    pub async fn dispatch(&mut self, action: PageAction) -> ConsoleResult<Option<Notice>> {
        match self.current.as_mut() {
            Some((_, page)) => page.handle(action, &self.ctx).await,
            None => Err(ConsoleError::UnsupportedAction(format!("{} (no page mounted)", action.name()))),
        }
    }

    /// Attend un changement (page ou en-tête) ; `false` si rien avant le délai
    pub async fn changed(&self, within: Duration) -> bool {
        tokio::time::timeout(within, self.ctx.changed.notified()).await.is_ok()
    }

    /// Attend que la page courante ait fini son premier chargement
    pub async fn wait_loaded(&self, within: Duration) -> bool {
        let deadline = Instant::now() + within;
        loop {
            match self.view() {
                Some(view) if !view.is_loading() => return true,
                None => return false,
                _ => {}
            }
            if timeout_at(deadline, self.ctx.changed.notified()).await.is_err() {
                return false;
            }
        }
    }

    pub fn close(&mut self) {
        self.unmount_current();
        self.header.stop();
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.close();
    }
}
