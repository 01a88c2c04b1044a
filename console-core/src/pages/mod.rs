/**
 * PAGES - Modèles de vue des deux consoles
 *
 * RÔLE :
 * Chaque page possède son état (loaders), le charge au montage, le rend en
 * `PageView` neutre (lignes, tableaux, graphes, bandeaux) et traite les
 * actions utilisateur. Aucun état partagé entre pages.
 *
 * FONCTIONNEMENT :
 * - `mount()` : fetch initial (et poller pour SystemMonitoring)
 * - `view()` : Loading | Error | Content, mutuellement exclusifs
 * - `handle()` : actions (filtre, ack/resolve, config, utilisateurs...)
 * - `unmount()` : annule les pollers de la page
 */

pub mod admin;
pub mod alerts;
pub mod frontend;
pub mod logs;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::charts::ChartData;
use crate::commands::{optimistic, settle, Command, Dispatch, Notice};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::loader::{LoadState, Loader};
use crate::models::{AlertLevel, LogLevel, SelfHealingAction};
use crate::source::{DataSource, Endpoint, FixtureSource};
use crate::state::Shared;
use crate::users::UserDraft;

/// Sources et réglages transmis aux pages montées
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn DataSource>,
    pub mocks: Arc<dyn DataSource>,
    pub interval: Duration,
    pub dashboard_limit: usize,
    pub page_limit: usize,
    pub changed: Arc<Notify>,
}

impl PageContext {
    pub fn new(api: Arc<dyn DataSource>, mocks: Arc<dyn DataSource>, config: &ConsoleConfig) -> Self {
        Self {
            api,
            mocks,
            interval: config.poll_interval(),
            dashboard_limit: config.logs.dashboard_limit,
            page_limit: config.logs.page_limit,
            changed: Arc::new(Notify::new()),
        }
    }

    /// Tout servi par fixtures (mode offline, tests)
    pub fn offline(now: DateTime<Utc>, config: &ConsoleConfig) -> Self {
        Self::new(
            Arc::new(FixtureSource::demo(now)),
            Arc::new(FixtureSource::admin_mocks(now)),
            config,
        )
    }

    /// Les endpoints sans backend partent toujours vers les mocks
    pub fn source_for(&self, endpoint: &Endpoint) -> Arc<dyn DataSource> {
        if endpoint.is_remote() {
            self.api.clone()
        } else {
            self.mocks.clone()
        }
    }

    pub fn notify_changed(&self) {
        self.changed.notify_one();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Info,
    Warning,
    Critical,
    Muted,
}

impl Tone {
    pub fn of_log(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Tone::Critical,
            LogLevel::Warning => Tone::Warning,
            LogLevel::Info => Tone::Normal,
        }
    }

    pub fn of_alert(level: AlertLevel) -> Self {
        match level {
            AlertLevel::Critical => Tone::Critical,
            AlertLevel::Warning => Tone::Warning,
            AlertLevel::Info => Tone::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<String>,
    pub tone: Tone,
    pub actions: Vec<String>,
}

impl Row {
    pub fn new(key: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            key: key.into(),
            cells,
            tone: Tone::Normal,
            actions: Vec::new(),
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.key == key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Lines { title: String, lines: Vec<String> },
    Table { title: String, table: Table },
    Chart { title: String, chart: ChartData },
    Banner { tone: Tone, text: String },
    Empty { title: String, text: String },
    /// Échec local à une section (le reste de la page reste affiché)
    Error { title: String, text: String },
}

impl Section {
    pub fn title(&self) -> Option<&str> {
        match self {
            Section::Lines { title, .. }
            | Section::Table { title, .. }
            | Section::Chart { title, .. }
            | Section::Empty { title, .. }
            | Section::Error { title, .. } => Some(title),
            Section::Banner { .. } => None,
        }
    }

    pub fn lines(title: &str, lines: Vec<String>) -> Self {
        Section::Lines {
            title: title.to_string(),
            lines,
        }
    }

    pub fn empty(title: &str, text: &str) -> Self {
        Section::Empty {
            title: title.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewBody {
    Loading,
    Error(String),
    Content(Vec<Section>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: String,
    pub body: ViewBody,
}

impl PageView {
    pub fn loading(title: &str) -> Self {
        Self {
            title: title.to_string(),
            body: ViewBody::Loading,
        }
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            body: ViewBody::Error(message.to_string()),
        }
    }

    pub fn content(title: &str, sections: Vec<Section>) -> Self {
        Self {
            title: title.to_string(),
            body: ViewBody::Content(sections),
        }
    }

    /// Rendu standard d'un loader : spinner, bandeau d'erreur ou contenu
    pub fn from_state<T>(title: &str, state: &LoadState<T>, render: impl FnOnce(&T) -> Vec<Section>) -> Self {
        match state {
            LoadState::Loading => Self::loading(title),
            LoadState::Failed(message) => Self::error(title, message),
            LoadState::Ready(data) => Self::content(title, render(data)),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, ViewBody::Loading)
    }

    pub fn error_text(&self) -> Option<&str> {
        match &self.body {
            ViewBody::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        match &self.body {
            ViewBody::Content(sections) => sections,
            _ => &[],
        }
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections().iter().find(|s| s.title() == Some(title))
    }

    pub fn table(&self, title: &str) -> Option<&Table> {
        match self.section(title) {
            Some(Section::Table { table, .. }) => Some(table),
            _ => None,
        }
    }
}

/// Actions utilisateur qu'une page peut accepter
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    Refresh,
    Filter(String),
    Acknowledge(String),
    Resolve(String),
    /// Modification locale d'un champ de configuration
    SetField { key: String, value: String },
    SaveLocal,
    /// Envoi au backend (`POST /api/config`)
    UpdateConfig { parameter: String, value: String },
    SelfHeal(SelfHealingAction),
    AddUser(UserDraft),
    EditUser { id: String, draft: UserDraft },
    DeleteUser(String),
}

impl PageAction {
    pub fn name(&self) -> &'static str {
        match self {
            PageAction::Refresh => "refresh",
            PageAction::Filter(_) => "filter",
            PageAction::Acknowledge(_) => "ack",
            PageAction::Resolve(_) => "resolve",
            PageAction::SetField { .. } => "set",
            PageAction::SaveLocal => "save",
            PageAction::UpdateConfig { .. } => "update",
            PageAction::SelfHeal(_) => "heal",
            PageAction::AddUser(_) => "add-user",
            PageAction::EditUser { .. } => "edit-user",
            PageAction::DeleteUser(_) => "delete-user",
        }
    }

    pub fn unsupported(&self) -> ConsoleError {
        ConsoleError::UnsupportedAction(self.name().to_string())
    }
}

#[async_trait]
pub trait Page: Send {
    fn title(&self) -> &'static str;

    /// Chargement initial ; les pages pollées démarrent aussi leur poller
    async fn mount(&mut self, ctx: &PageContext);

    fn view(&self) -> PageView;

    /// Change à chaque modification visible (rechargement, mutation)
    fn revision(&self) -> u64;

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>>;

    fn unmount(&mut self) {}
}

/// Données générées localement, prêtes dès le montage
pub(crate) fn ready_loader<T>(data: T) -> Shared<Loader<T>> {
    crate::state::new_state(Loader::ready(data))
}

/// Mutation locale confirmée d'office sur les données d'un loader
pub(crate) fn mutate_loaded<T, C>(
    loader: &Shared<Loader<T>>,
    command: &C,
    confirmation: Option<String>,
) -> ConsoleResult<Notice>
where
    T: Clone,
    C: Command<T> + ?Sized,
{
    let mut guard = loader.lock();
    let data = guard
        .data_mut()
        .ok_or_else(|| ConsoleError::Rejected("Data is not loaded yet".to_string()))?;
    let notice = match optimistic(data, command) {
        Ok(pending) => settle(pending, data, Dispatch::Confirmed(confirmation)),
        Err(e) => Notice::error(e.banner()),
    };
    guard.touch();
    Ok(notice)
}

/// Lignes "CPU Usage: 12.3%" communes aux vues de statut
pub(crate) fn usage_lines(cpu: f64, memory: f64, disk: f64) -> Vec<String> {
    vec![
        format!("CPU Usage: {:.1}%", cpu),
        format!("Memory Usage: {:.1}%", memory),
        format!("Disk Usage: {:.1}%", disk),
    ]
}

/// Horodatage lisible pour les tableaux ; texte brut sinon
pub(crate) fn display_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(ts) => ts.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_state_is_exclusive() {
        let loading: LoadState<u32> = LoadState::Loading;
        assert!(PageView::from_state("T", &loading, |_| vec![]).is_loading());

        let failed: LoadState<u32> = LoadState::Failed("boom".into());
        let view = PageView::from_state("T", &failed, |_| vec![Section::lines("x", vec![])]);
        assert_eq!(view.error_text(), Some("boom"));
        assert!(view.sections().is_empty());
    }

    #[test]
    fn test_display_time() {
        assert_eq!(display_time("2024-05-01T12:00:00.000Z"), "2024-05-01 12:00:00");
        assert_eq!(display_time("yesterday"), "yesterday");
    }

    #[test]
    fn test_source_for_routes_mock_endpoints() {
        let ctx = PageContext::offline(Utc::now(), &ConsoleConfig::default());
        assert_eq!(ctx.source_for(&Endpoint::AdminLogs).name(), "admin-mocks");
        assert_eq!(ctx.source_for(&Endpoint::Status).name(), "demo");
    }
}
