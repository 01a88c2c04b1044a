//! Frontend console pages: Dashboard, Trends and Settings.
//!
//! Logs and Alerts live in their own modules, shared with the admin panel.

use async_trait::async_trait;
use tracing::info;

use super::{display_time, usage_lines, Page, PageAction, PageContext, PageView, Row, Section, Table, Tone};
use crate::charts::forecast_chart;
use crate::commands::{optimistic, settle, Dispatch, Notice, SetConfig};
use crate::error::{ConsoleError, ConsoleResult};
use crate::fixtures::default_settings;
use crate::loader::{LoadState, Loader};
use crate::models::{
    AlertEntry, ConfigMap, ConfigReply, ConfigUpdate, ConfigValue, LogEntry, RiskLevel, SelfHealingAction,
    SelfHealingReply, SelfHealingRequest, StatusSnapshot, TrendReport,
};
use crate::poller::load_into;
use crate::source::{submit, Endpoint};
use crate::state::{new_state, Shared};

// ============================================================================
// DASHBOARD
// ============================================================================

/// Trois sections chargées séparément : une section en échec n'efface pas les autres
pub struct Dashboard {
    status: Shared<Loader<StatusSnapshot>>,
    logs: Shared<Loader<Vec<LogEntry>>>,
    alerts: Shared<Loader<Vec<AlertEntry>>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            status: new_state(Loader::new()),
            logs: new_state(Loader::new()),
            alerts: new_state(Loader::new()),
        }
    }

    async fn load(&self, ctx: &PageContext) {
        // séquentiel, dans l'ordre d'affichage
        let logs = Endpoint::Logs {
            limit: ctx.dashboard_limit,
        };
        load_into(&self.status, ctx.source_for(&Endpoint::Status).as_ref(), &Endpoint::Status).await;
        load_into(&self.logs, ctx.source_for(&logs).as_ref(), &logs).await;
        load_into(&self.alerts, ctx.source_for(&Endpoint::Alerts).as_ref(), &Endpoint::Alerts).await;
        ctx.notify_changed();
    }

    async fn heal(&self, action: SelfHealingAction, ctx: &PageContext) -> Notice {
        let source = ctx.source_for(&Endpoint::SelfHealing);
        let reply: ConsoleResult<SelfHealingReply> =
            submit(source.as_ref(), &Endpoint::SelfHealing, &SelfHealingRequest { action }).await;
        match reply {
            Ok(reply) => {
                info!("self-healing {} triggered", action.as_str());
                Notice::success(format!("Self-healing action triggered: {}", reply.summary()))
            }
            Err(e) => Notice::error(format!("Failed to trigger self-healing: {}", e)),
        }
    }
}

/// Section depuis un loader : chargement, erreur locale ou contenu
fn section_from<T>(title: &str, state: &LoadState<T>, render: impl FnOnce(&T) -> Section) -> Section {
    match state {
        LoadState::Loading => Section::lines(title, vec!["Loading...".to_string()]),
        LoadState::Failed(message) => Section::Error {
            title: title.to_string(),
            text: message.clone(),
        },
        LoadState::Ready(data) => render(data),
    }
}

fn render_status(status: &StatusSnapshot) -> Section {
    let mut lines = usage_lines(status.cpu_usage, status.memory_usage, status.disk_usage);
    lines.push(format!("Processes: {}", status.process_count));
    lines.push(format!("Status: {}", status.status));
    Section::lines("System Status", lines)
}

fn render_recent_logs(logs: &Vec<LogEntry>) -> Section {
    if logs.is_empty() {
        return Section::empty("Recent Logs", "No recent logs");
    }
    let lines = logs
        .iter()
        .map(|log| format!("{} - {}: {}", display_time(&log.timestamp), log.level, log.message))
        .collect();
    Section::lines("Recent Logs", lines)
}

fn render_active_alerts(alerts: &Vec<AlertEntry>) -> Section {
    if alerts.is_empty() {
        return Section::empty("Active Alerts", "No active alerts");
    }
    let mut table = Table::new(&["Level", "Message"]);
    table.rows = alerts
        .iter()
        .map(|a| Row::new(a.id.clone(), vec![a.level.to_string(), a.message.clone()]).tone(Tone::Warning))
        .collect();
    Section::Table {
        title: "Active Alerts".to_string(),
        table,
    }
}

#[async_trait]
impl Page for Dashboard {
    fn title(&self) -> &'static str {
        "Dashboard"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        self.load(ctx).await;
    }

    fn view(&self) -> PageView {
        let status = self.status.lock();
        let logs = self.logs.lock();
        let alerts = self.alerts.lock();
        if status.state().is_loading() && logs.state().is_loading() && alerts.state().is_loading() {
            return PageView::loading(self.title());
        }

        let actions = SelfHealingAction::all()
            .iter()
            .map(|a| format!("{} ({})", a.label(), a.as_str()))
            .collect();
        PageView::content(
            self.title(),
            vec![
                section_from("System Status", status.state(), render_status),
                Section::lines("Self-Healing Actions", actions),
                section_from("Recent Logs", logs.state(), render_recent_logs),
                section_from("Active Alerts", alerts.state(), render_active_alerts),
            ],
        )
    }

    fn revision(&self) -> u64 {
        self.status.lock().revision() + self.logs.lock().revision() + self.alerts.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::SelfHeal(action) => Ok(Some(self.heal(action, ctx).await)),
            PageAction::Refresh => {
                self.load(ctx).await;
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }
}

// ============================================================================
// TRENDS
// ============================================================================

pub struct Trends {
    trends: Shared<Loader<Vec<TrendReport>>>,
}

impl Default for Trends {
    fn default() -> Self {
        Self::new()
    }
}

impl Trends {
    pub fn new() -> Self {
        Self {
            trends: new_state(Loader::new()),
        }
    }
}

pub fn risk_tone(risk: RiskLevel) -> Tone {
    match risk {
        RiskLevel::High => Tone::Critical,
        RiskLevel::Medium => Tone::Warning,
        _ => Tone::Info,
    }
}

fn render_trends(trends: &Vec<TrendReport>) -> Vec<Section> {
    if trends.is_empty() {
        return vec![Section::empty("Trends", "No trend data available")];
    }

    let mut sections = Vec::new();
    for trend in trends {
        let title = format!("{} Trend Analysis", trend.metric);
        sections.push(Section::Banner {
            tone: risk_tone(trend.risk_level),
            text: format!("{}: Risk Level: {}", trend.metric, trend.risk_level.as_str()),
        });

        let mut lines = Vec::new();
        if let Some(mean) = trend.trend.mean {
            lines.push(format!("Mean: {:.1}", mean));
        }
        if !trend.recommendations.is_empty() {
            lines.push("Recommendations:".to_string());
            lines.extend(trend.recommendations.iter().map(|r| format!("- {}", r)));
        }
        sections.push(Section::Lines { title, lines });

        let chart = forecast_chart(trend);
        sections.push(if chart.is_empty() {
            Section::empty(&format!("{} Forecast", trend.metric), "No forecast available")
        } else {
            Section::Chart {
                title: format!("{} Forecast", trend.metric),
                chart,
            }
        });
    }
    sections
}

#[async_trait]
impl Page for Trends {
    fn title(&self) -> &'static str {
        "Trend Analysis"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        load_into(&self.trends, ctx.source_for(&Endpoint::Trends).as_ref(), &Endpoint::Trends).await;
        ctx.notify_changed();
    }

    fn view(&self) -> PageView {
        PageView::from_state(self.title(), self.trends.lock().state(), render_trends)
    }

    fn revision(&self) -> u64 {
        self.trends.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::Refresh => {
                self.mount(ctx).await;
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Réglages locaux + formulaire d'envoi `POST /api/config`
pub struct Settings {
    config: ConfigMap,
    revision: u64,
    last_notice: Option<Notice>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            config: default_settings(),
            // état local, affichable dès la création
            revision: 1,
            last_notice: None,
        }
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    fn parse_local(key: &str, raw: &str) -> ConsoleResult<ConfigValue> {
        match key {
            "logLevel" => Ok(ConfigValue::Text(raw.to_string())),
            "alertThreshold" => ConfigValue::parse_integer(raw),
            "autoRecovery" => match raw.trim().to_lowercase().as_str() {
                "true" | "enabled" | "on" => Ok(ConfigValue::Bool(true)),
                "false" | "disabled" | "off" => Ok(ConfigValue::Bool(false)),
                _ => Err(ConsoleError::InvalidValue(format!("'{}' is not enabled/disabled", raw))),
            },
            other => Err(ConsoleError::InvalidValue(format!("unknown setting '{}'", other))),
        }
    }

    fn record(&mut self, notice: Notice) -> Option<Notice> {
        self.revision += 1;
        self.last_notice = Some(notice.clone());
        Some(notice)
    }

    async fn update_remote(&mut self, parameter: String, raw: String, ctx: &PageContext) -> Notice {
        // la valeur part telle que saisie, sous forme de chaîne
        let update = ConfigUpdate {
            parameter,
            value: ConfigValue::Text(raw),
        };
        let command = SetConfig {
            key: update.parameter.clone(),
            value: update.value.clone(),
        };
        let pending = match optimistic(&mut self.config, &command) {
            Ok(pending) => pending,
            Err(e) => return Notice::error(format!("Failed to update configuration: {}", e)),
        };

        let source = ctx.source_for(&Endpoint::Config);
        let reply: ConsoleResult<ConfigReply> = submit(source.as_ref(), &Endpoint::Config, &update).await;
        let outcome = Dispatch::from_result(reply, |r| Some(format!("Configuration updated: {}", r.message)));
        let mut notice = settle(pending, &mut self.config, outcome);
        if !notice.is_success() {
            notice.message = format!("Failed to update configuration: {}", notice.message);
        }
        notice
    }

    fn render(&self) -> Vec<Section> {
        let mut sections = Vec::new();
        if let Some(notice) = &self.last_notice {
            sections.push(Section::Banner {
                tone: if notice.is_success() { Tone::Info } else { Tone::Critical },
                text: notice.message.clone(),
            });
        }

        let mut table = Table::new(&["Setting", "Value"]);
        table.rows = self
            .config
            .iter()
            .map(|(key, value)| {
                let shown = match (key.as_str(), value) {
                    ("autoRecovery", ConfigValue::Bool(true)) => "Enabled".to_string(),
                    ("autoRecovery", ConfigValue::Bool(false)) => "Disabled".to_string(),
                    _ => value.to_string(),
                };
                Row::new(key.clone(), vec![setting_label(key), shown])
            })
            .collect();
        sections.push(Section::Table {
            title: "System Configuration".to_string(),
            table,
        });
        sections
    }
}

fn setting_label(key: &str) -> String {
    match key {
        "logLevel" => "Log Level".to_string(),
        "alertThreshold" => "Alert Threshold (%)".to_string(),
        "autoRecovery" => "Auto Recovery".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Page for Settings {
    fn title(&self) -> &'static str {
        "Settings"
    }

    async fn mount(&mut self, ctx: &PageContext) {
        ctx.notify_changed();
    }

    fn view(&self) -> PageView {
        PageView::content(self.title(), self.render())
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        let notice = match action {
            PageAction::SetField { key, value } => {
                let value = Self::parse_local(&key, &value)?;
                self.config.insert(key, value);
                self.revision += 1;
                return Ok(None);
            }
            PageAction::SaveLocal => Notice::success("Configuration saved locally"),
            PageAction::UpdateConfig { parameter, value } => self.update_remote(parameter, value, ctx).await,
            other => return Err(other.unsupported()),
        };
        Ok(self.record(notice))
    }
}
