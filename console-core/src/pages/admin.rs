/**
 * PAGES ADMIN - Dashboard, utilisateurs, monitoring, configuration
 *
 * RÔLE :
 * Pages propres au panneau d'administration. Logs et Alerts sont partagées
 * avec la console frontend (voir `logs` et `alerts`).
 *
 * FONCTIONNEMENT :
 * - Dashboard : `/api/admin/metrics` au montage
 * - UserManagement : `/api/admin/users`, ajout / édition / suppression locales
 * - SystemMonitoring : `/api/admin/monitoring` re-fetché toutes les 30s
 * - Configuration : table mock, modifications locales confirmées d'office
 */

use async_trait::async_trait;
use tracing::info;

use super::{
    mutate_loaded, ready_loader, usage_lines, Page, PageAction, PageContext, PageView, Row, Section, Table, Tone,
};
use crate::charts::resource_chart;
use crate::commands::{Notice, SetConfig};
use crate::error::{ConsoleError, ConsoleResult};
use crate::loader::Loader;
use crate::models::{ConfigMap, ConfigValue, MonitoringSnapshot, StatusSnapshot, User, UsersPayload};
use crate::poller::{load_into, load_mapped, poll_into, PollHandle};
use crate::source::Endpoint;
use crate::state::{new_state, Shared};
use crate::users::UserCommand;

// ============================================================================
// DASHBOARD
// ============================================================================

pub struct Dashboard {
    metrics: Shared<Loader<StatusSnapshot>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            metrics: new_state(Loader::new()),
        }
    }

    async fn load(&self, ctx: &PageContext) {
        let source = ctx.source_for(&Endpoint::AdminMetrics);
        load_into(&self.metrics, source.as_ref(), &Endpoint::AdminMetrics).await;
        ctx.notify_changed();
    }
}

fn render_dashboard(metrics: &StatusSnapshot) -> Vec<Section> {
    let mut health = usage_lines(metrics.cpu_usage, metrics.memory_usage, metrics.disk_usage);
    health.push(format!("Status: {}", metrics.status));

    let chart = if metrics.history.is_empty() {
        Section::empty("System Metrics (Last 24h)", "No system metrics available")
    } else {
        Section::Chart {
            title: "System Metrics (Last 24h)".to_string(),
            chart: resource_chart(&metrics.history, false),
        }
    };
    vec![Section::lines("System Health", health), chart]
}

#[async_trait]
impl Page for Dashboard {
    fn title(&self) -> &'static str {
        "Admin Dashboard"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        self.load(ctx).await;
    }

    fn view(&self) -> PageView {
        PageView::from_state(self.title(), self.metrics.lock().state(), render_dashboard)
    }

    fn revision(&self) -> u64 {
        self.metrics.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::Refresh => {
                self.load(ctx).await;
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }
}

// ============================================================================
// USER MANAGEMENT
// ============================================================================

pub struct UserManagement {
    users: Shared<Loader<Vec<User>>>,
}

impl Default for UserManagement {
    fn default() -> Self {
        Self::new()
    }
}

impl UserManagement {
    pub fn new() -> Self {
        Self {
            users: new_state(Loader::new()),
        }
    }

    async fn load(&self, ctx: &PageContext) {
        let source = ctx.source_for(&Endpoint::AdminUsers);
        load_mapped(&self.users, source.as_ref(), &Endpoint::AdminUsers, UsersPayload::into_users).await;
        ctx.notify_changed();
    }

    fn apply(&self, command: UserCommand, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        let notice = mutate_loaded(&self.users, &command, None)?;
        ctx.notify_changed();
        Ok(Some(notice))
    }
}

fn render_users(users: &Vec<User>) -> Vec<Section> {
    if users.is_empty() {
        return vec![Section::empty("Users", "No users found")];
    }
    let mut table = Table::new(&["ID", "Username", "Email", "Role", "Status"]);
    table.rows = users
        .iter()
        .map(|u| {
            Row::new(
                u.id.clone(),
                vec![u.id.clone(), u.username.clone(), u.email.clone(), u.role.clone(), u.status.clone()],
            )
            .actions(["edit", "delete"])
        })
        .collect();
    vec![Section::Table {
        title: "Users".to_string(),
        table,
    }]
}

#[async_trait]
impl Page for UserManagement {
    fn title(&self) -> &'static str {
        "User Management"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        self.load(ctx).await;
    }

    fn view(&self) -> PageView {
        PageView::from_state(self.title(), self.users.lock().state(), render_users)
    }

    fn revision(&self) -> u64 {
        self.users.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::AddUser(draft) => self.apply(UserCommand::Add(draft), ctx),
            PageAction::EditUser { id, draft } => self.apply(UserCommand::Edit { id, draft }, ctx),
            PageAction::DeleteUser(id) => self.apply(UserCommand::Delete { id }, ctx),
            PageAction::Refresh => {
                self.load(ctx).await;
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }
}

// ============================================================================
// SYSTEM MONITORING (pollé)
// ============================================================================

pub struct SystemMonitoring {
    snapshot: Shared<Loader<MonitoringSnapshot>>,
    poller: Option<PollHandle>,
}

impl Default for SystemMonitoring {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMonitoring {
    pub fn new() -> Self {
        Self {
            snapshot: new_state(Loader::new()),
            poller: None,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_cancelled())
    }
}

fn render_monitoring(snapshot: &MonitoringSnapshot) -> Vec<Section> {
    let status = &snapshot.status;
    let mut current = usage_lines(status.cpu_usage, status.memory_usage, status.disk_usage);
    current.push(format!("Process Count: {}", status.process_count));
    current.push(format!("Status: {}", status.status));

    let alerts = if snapshot.alerts.is_empty() {
        Section::empty("System Alerts", "No active alerts")
    } else {
        let mut table = Table::new(&["Level", "Message", "Source"]);
        table.rows = snapshot
            .alerts
            .iter()
            .map(|a| {
                Row::new(a.id.clone(), vec![a.level.to_string(), a.message.clone(), a.source.clone()])
                    .tone(Tone::of_alert(a.level))
            })
            .collect();
        Section::Table {
            title: "System Alerts".to_string(),
            table,
        }
    };

    vec![
        Section::lines("Current System Status", current),
        Section::Chart {
            title: "Resource Utilization".to_string(),
            chart: resource_chart(&status.history, true),
        },
        alerts,
    ]
}

#[async_trait]
impl Page for SystemMonitoring {
    fn title(&self) -> &'static str {
        "System Monitoring"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        let endpoint = Endpoint::AdminMonitoring;
        let source = ctx.source_for(&endpoint);
        self.poller = Some(poll_into(
            self.snapshot.clone(),
            source,
            endpoint,
            ctx.interval,
            |snapshot: MonitoringSnapshot| snapshot,
            ctx.changed.clone(),
        ));
        info!("system monitoring polling every {:?}", ctx.interval);
    }

    fn view(&self) -> PageView {
        PageView::from_state(self.title(), self.snapshot.lock().state(), render_monitoring)
    }

    fn revision(&self) -> u64 {
        self.snapshot.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::Refresh => {
                let source = ctx.source_for(&Endpoint::AdminMonitoring);
                load_into(&self.snapshot, source.as_ref(), &Endpoint::AdminMonitoring).await;
                ctx.notify_changed();
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }

    fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
            info!("system monitoring polling stopped");
        }
    }
}

// ============================================================================
// CONFIGURATION (mock)
// ============================================================================

/// (clé, libellé, numérique)
const GENERAL_FIELDS: &[(&str, &str, bool)] = &[
    ("logLevel", "Log Level", false),
    ("maxRetries", "Max Retries", true),
    ("cacheTTL", "Cache TTL (seconds)", true),
    ("rateLimit", "Rate Limit (requests/min)", true),
];

const ADVANCED_FIELDS: &[(&str, &str, bool)] = &[
    ("dbConnection", "Database Connection String", false),
    ("apiTimeout", "API Timeout (ms)", true),
];

fn config_field(key: &str) -> Option<&'static (&'static str, &'static str, bool)> {
    GENERAL_FIELDS.iter().chain(ADVANCED_FIELDS).find(|(k, _, _)| *k == key)
}

pub struct Configuration {
    config: Shared<Loader<ConfigMap>>,
    last_notice: Option<Notice>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            config: new_state(Loader::new()),
            last_notice: None,
        }
    }

    /// Page déjà chargée avec une table donnée
    pub fn with_config(config: ConfigMap) -> Self {
        Self {
            config: ready_loader(config),
            last_notice: None,
        }
    }

    fn set_field(&mut self, key: &str, raw: &str) -> ConsoleResult<Notice> {
        let (key, _, numeric) =
            config_field(key).ok_or_else(|| ConsoleError::InvalidValue(format!("unknown configuration field '{}'", key)))?;
        let value = if *numeric {
            ConfigValue::parse_integer(raw)?
        } else {
            ConfigValue::Text(raw.to_string())
        };
        let command = SetConfig {
            key: key.to_string(),
            value,
        };
        mutate_loaded(
            &self.config,
            &command,
            Some(format!("Configuration {} updated successfully", key)),
        )
    }

    fn render(&self, config: &ConfigMap) -> Vec<Section> {
        let table = |fields: &[(&str, &str, bool)]| {
            let mut table = Table::new(&["Setting", "Value"]);
            table.rows = fields
                .iter()
                .map(|(key, label, _)| {
                    let value = config.get(*key).map(ConfigValue::to_string).unwrap_or_default();
                    Row::new(*key, vec![label.to_string(), value]).actions(["set"])
                })
                .collect();
            table
        };

        let mut sections = Vec::new();
        if let Some(notice) = &self.last_notice {
            sections.push(Section::Banner {
                tone: if notice.is_success() { Tone::Info } else { Tone::Critical },
                text: notice.message.clone(),
            });
        }
        sections.push(Section::Table {
            title: "General Settings".to_string(),
            table: table(GENERAL_FIELDS),
        });
        sections.push(Section::Table {
            title: "Advanced Settings".to_string(),
            table: table(ADVANCED_FIELDS),
        });
        sections
    }
}

#[async_trait]
impl Page for Configuration {
    fn title(&self) -> &'static str {
        "System Configuration"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        let source = ctx.source_for(&Endpoint::AdminConfig);
        load_into(&self.config, source.as_ref(), &Endpoint::AdminConfig).await;
        ctx.notify_changed();
    }

    fn view(&self) -> PageView {
        let config = self.config.lock();
        PageView::from_state(self.title(), config.state(), |data| self.render(data))
    }

    fn revision(&self) -> u64 {
        self.config.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::SetField { key, value } => {
                let notice = match self.set_field(&key, &value) {
                    Ok(notice) => notice,
                    Err(e) => Notice::error(e.banner()),
                };
                self.last_notice = Some(notice.clone());
                self.config.lock().touch();
                ctx.notify_changed();
                Ok(Some(notice))
            }
            other => Err(other.unsupported()),
        }
    }
}
