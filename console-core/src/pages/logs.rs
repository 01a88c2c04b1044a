//! Log table with a client-side filter, shared by both consoles.
//!
//! The admin flavour reads the generated mock logs; the frontend flavour
//! reads `/api/logs?limit=N`. Filtering never refetches.

use async_trait::async_trait;
use tracing::info;

use super::{display_time, Page, PageAction, PageContext, PageView, Row, Section, Table, Tone};
use crate::commands::Notice;
use crate::error::ConsoleResult;
use crate::filter::filter_logs;
use crate::loader::Loader;
use crate::models::LogEntry;
use crate::poller::load_into;
use crate::source::Endpoint;
use crate::state::{new_state, Shared};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogsFlavor {
    Admin,
    Frontend,
}

pub struct LogsPage {
    flavor: LogsFlavor,
    endpoint: Option<Endpoint>,
    logs: Shared<Loader<Vec<LogEntry>>>,
    filter: String,
    filter_rev: u64,
}

impl LogsPage {
    pub fn admin() -> Self {
        Self::new(LogsFlavor::Admin)
    }

    pub fn frontend() -> Self {
        Self::new(LogsFlavor::Frontend)
    }

    fn new(flavor: LogsFlavor) -> Self {
        Self {
            flavor,
            endpoint: None,
            logs: new_state(Loader::new()),
            filter: String::new(),
            filter_rev: 0,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    async fn load(&self, ctx: &PageContext) {
        if let Some(endpoint) = &self.endpoint {
            let source = ctx.source_for(endpoint);
            load_into(&self.logs, source.as_ref(), endpoint).await;
            ctx.notify_changed();
        }
    }

    fn render(&self, logs: &[LogEntry]) -> Vec<Section> {
        let mut sections = Vec::new();
        if !self.filter.is_empty() {
            sections.push(Section::lines("Filter", vec![format!("Filter logs: {}", self.filter)]));
        }

        let visible = filter_logs(logs, &self.filter);
        if visible.is_empty() {
            sections.push(Section::empty("Logs", "No logs found matching your filter"));
            return sections;
        }

        let mut table = Table::new(&["Timestamp", "Level", "Service", "Message"]);
        table.rows = visible
            .into_iter()
            .map(|log| {
                Row::new(
                    log.id.clone(),
                    vec![
                        display_time(&log.timestamp),
                        log.level.to_string(),
                        log.service.clone(),
                        log.message.clone(),
                    ],
                )
                .tone(Tone::of_log(log.level))
            })
            .collect();
        sections.push(Section::Table {
            title: "Logs".to_string(),
            table,
        });
        sections
    }
}

#[async_trait]
impl Page for LogsPage {
    fn title(&self) -> &'static str {
        match self.flavor {
            LogsFlavor::Admin => "Log Management",
            LogsFlavor::Frontend => "System Logs",
        }
    }

    async fn mount(&mut self, ctx: &PageContext) {
        self.endpoint = Some(match self.flavor {
            LogsFlavor::Admin => Endpoint::AdminLogs,
            LogsFlavor::Frontend => Endpoint::Logs { limit: ctx.page_limit },
        });
        self.load(ctx).await;
    }

    fn view(&self) -> PageView {
        let logs = self.logs.lock();
        PageView::from_state(self.title(), logs.state(), |data| self.render(data))
    }

    fn revision(&self) -> u64 {
        self.logs.lock().revision() + self.filter_rev
    }

    async fn handle(&mut self, action: PageAction, ctx: &PageContext) -> ConsoleResult<Option<Notice>> {
        match action {
            PageAction::Filter(term) => {
                info!("log filter set to '{}'", term);
                self.filter = term;
                self.filter_rev += 1;
                Ok(None)
            }
            PageAction::Refresh => {
                self.load(ctx).await;
                Ok(None)
            }
            other => Err(other.unsupported()),
        }
    }
}
