//! Alert table with acknowledge / resolve, shared by both consoles.
//!
//! Transitions are applied locally and confirmed immediately: neither console
//! has an endpoint that persists them.

use async_trait::async_trait;

use super::{display_time, mutate_loaded, Page, PageAction, PageContext, PageView, Row, Section, Table, Tone};
use crate::alerts::{available_actions, AlertAction, AlertCommand};
use crate::commands::Notice;
use crate::error::ConsoleResult;
use crate::loader::Loader;
use crate::models::{AlertEntry, AlertStatus};
use crate::poller::load_into;
use crate::source::Endpoint;
use crate::state::{new_state, Shared};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertsFlavor {
    Admin,
    Frontend,
}

pub struct AlertsPage {
    flavor: AlertsFlavor,
    alerts: Shared<Loader<Vec<AlertEntry>>>,
    last_notice: Option<Notice>,
}

impl AlertsPage {
    pub fn admin() -> Self {
        Self::new(AlertsFlavor::Admin)
    }

    pub fn frontend() -> Self {
        Self::new(AlertsFlavor::Frontend)
    }

    fn new(flavor: AlertsFlavor) -> Self {
        Self {
            flavor,
            alerts: new_state(Loader::new()),
            last_notice: None,
        }
    }

    fn endpoint(&self) -> Endpoint {
        match self.flavor {
            AlertsFlavor::Admin => Endpoint::AdminAlerts,
            AlertsFlavor::Frontend => Endpoint::Alerts,
        }
    }

    async fn load(&self, ctx: &PageContext) {
        let endpoint = self.endpoint();
        let source = ctx.source_for(&endpoint);
        load_into(&self.alerts, source.as_ref(), &endpoint).await;
        ctx.notify_changed();
    }

    fn apply(&mut self, command: AlertCommand, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        let confirmation = match self.flavor {
            AlertsFlavor::Admin => None,
            AlertsFlavor::Frontend => Some(format!("Alert {} action: {}", command.id, command.action)),
        };
        let notice = mutate_loaded(&self.alerts, &command, confirmation)?;
        self.last_notice = Some(notice.clone());
        ctx.notify_changed();
        Ok(Some(notice))
    }

    fn render(&self, alerts: &[AlertEntry]) -> Vec<Section> {
        let mut sections = Vec::new();
        if let Some(notice) = &self.last_notice {
            let tone = if notice.is_success() { Tone::Info } else { Tone::Critical };
            sections.push(Section::Banner {
                tone,
                text: notice.message.clone(),
            });
        }

        if alerts.is_empty() {
            sections.push(Section::empty("Alerts", "No alerts found"));
            return sections;
        }

        let mut table = Table::new(&["Timestamp", "Level", "Message", "Source", "Status"]);
        table.rows = alerts
            .iter()
            .map(|alert| {
                let tone = if alert.status == AlertStatus::Resolved {
                    Tone::Muted
                } else {
                    Tone::of_alert(alert.level)
                };
                Row::new(
                    alert.id.clone(),
                    vec![
                        display_time(&alert.timestamp),
                        alert.level.to_string(),
                        alert.message.clone(),
                        alert.source.clone(),
                        alert.status.to_string(),
                    ],
                )
                .tone(tone)
                .actions(available_actions(alert.status).iter().map(AlertAction::as_str))
            })
            .collect();
        sections.push(Section::Table {
            title: "Alerts".to_string(),
            table,
        });
        sections
    }
}

#[async_trait]
impl Page for AlertsPage {
    fn title(&self) -> &'static str {
        match self.flavor {
            AlertsFlavor::Admin => "Alert Management",
            AlertsFlavor::Frontend => "Active Alerts",
        }
    }

    async fn mount(&mut self, ctx: &PageContext) {
        self.load(ctx).await;
    }

    fn view(&self) -> PageView {
        let alerts = self.alerts.lock();
        PageView::from_state(self.title(), alerts.state(), |data| self.render(data))
    }

    fn revision(&self) -> u64 {
        self.alerts.lock().revision()
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::Acknowledge(id) => self.apply(AlertCommand::acknowledge(&id), ctx),
            PageAction::Resolve(id) => self.apply(AlertCommand::resolve(&id), ctx),
            PageAction::Refresh => {
                self.last_notice = None;
                self.load(ctx).await;
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }
}
