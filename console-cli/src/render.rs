//! Plain-text rendering of page views for the terminal.

use backlog_console_core::charts::ChartData;
use backlog_console_core::pages::{Row, Table, Tone};
use backlog_console_core::{AppKind, HeaderStatus, Notice, PageKind, PageView, Section, ViewBody};

fn mark(tone: Tone) -> &'static str {
    match tone {
        Tone::Critical => "!!",
        Tone::Warning => " !",
        Tone::Info => " i",
        Tone::Muted => " ~",
        Tone::Normal => "  ",
    }
}

/// Barre de titre + ligne d'état (header) ; "connecting..." avant le premier poll
pub fn header(app: AppKind, status: &HeaderStatus) -> String {
    let line = match status {
        HeaderStatus::Connecting => "Status: connecting...".to_string(),
        HeaderStatus::Ready(line) => line.clone(),
        HeaderStatus::Failed(message) => format!("{} Status error: {}", mark(Tone::Critical), message),
    };
    format!("== {} ==\n{}\n", app.title(), line)
}

pub fn navigation(app: AppKind, current: Option<PageKind>) -> String {
    let entries: Vec<String> = app
        .pages()
        .iter()
        .map(|page| {
            if Some(*page) == current {
                format!("[{}]", page.label())
            } else {
                page.label().to_string()
            }
        })
        .collect();
    entries.join(" | ")
}

pub fn notice(notice: &Notice) -> String {
    notice.to_string()
}

pub fn view(view: &PageView) -> String {
    let mut out = format!("-- {} --\n", view.title);
    match &view.body {
        ViewBody::Loading => out.push_str("Loading...\n"),
        ViewBody::Error(message) => out.push_str(&format!("Error: {}\n", message)),
        ViewBody::Content(sections) => {
            for section in sections {
                out.push('\n');
                out.push_str(&self::section(section));
            }
        }
    }
    out
}

pub fn section(section: &Section) -> String {
    match section {
        Section::Lines { title, lines } => {
            let mut out = format!("{}\n", title);
            for line in lines {
                out.push_str(&format!("  {}\n", line));
            }
            out
        }
        Section::Table { title, table } => format!("{}\n{}", title, self::table(table)),
        Section::Chart { title, chart } => format!("{}\n{}", title, self::chart(chart)),
        Section::Banner { tone, text } => format!("{} {}\n", mark(*tone), text),
        Section::Empty { title, text } => format!("{}\n  {}\n", title, text),
        Section::Error { title, text } => format!("{}\n  Error: {}\n", title, text),
    }
}

fn row_cells(row: &Row, keyed: bool) -> Vec<String> {
    let mut cells = Vec::with_capacity(row.cells.len() + 2);
    if keyed {
        cells.push(row.key.clone());
    }
    cells.extend(row.cells.iter().cloned());
    if keyed {
        cells.push(row.actions.join(", "));
    }
    cells
}

/// Colonnes alignées ; clé et actions ajoutées quand une ligne est actionnable
pub fn table(table: &Table) -> String {
    let keyed = table.rows.iter().any(|r| !r.actions.is_empty());
    let mut headers = Vec::new();
    if keyed {
        headers.push("#".to_string());
    }
    headers.extend(table.headers.iter().cloned());
    if keyed {
        headers.push("Actions".to_string());
    }

    let rows: Vec<(Tone, Vec<String>)> = table.rows.iter().map(|r| (r.tone, row_cells(r, keyed))).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for (_, cells) in &rows {
        for (i, cell) in cells.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let used = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        cells[..used]
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("   {}\n", line(&headers));
    for (tone, cells) in &rows {
        out.push_str(&format!("{} {}\n", mark(*tone), line(cells)));
    }
    out
}

/// Une ligne par abscisse, une colonne par série
pub fn chart(chart: &ChartData) -> String {
    let mut headers = vec!["".to_string()];
    headers.extend(chart.series.iter().map(|s| s.name.clone()));

    let mut table = Table {
        headers,
        rows: Vec::new(),
    };
    table.rows = chart
        .x
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let mut cells = vec![x.clone()];
            cells.extend(
                chart
                    .series
                    .iter()
                    .map(|s| s.values.get(i).map(|v| format!("{:.1}", v)).unwrap_or_default()),
            );
            Row::new(x.clone(), cells)
        })
        .collect();
    self::table(&table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlog_console_core::charts::Series;

    #[test]
    fn test_header_before_and_after_status() {
        assert_eq!(
            header(AppKind::Admin, &HeaderStatus::Connecting),
            "== AI_BackLog_Assistant Admin Panel ==\nStatus: connecting...\n"
        );
        let line = "CPU: 1.0% | Memory: 2.0% | Disk: 3.0%";
        assert!(header(AppKind::Frontend, &HeaderStatus::Ready(line.into())).ends_with(&format!("{}\n", line)));
    }

    #[test]
    fn test_header_failed_poll_hides_status() {
        let text = header(AppKind::Frontend, &HeaderStatus::Failed("Network Error".into()));
        assert_eq!(text, "== AI_BackLog_Assistant Dashboard ==\n!! Status error: Network Error\n");
        assert!(!text.contains("CPU:"));
    }

    #[test]
    fn test_navigation_marks_current() {
        assert_eq!(
            navigation(AppKind::Frontend, Some(PageKind::Trends)),
            "Dashboard | Logs | Alerts | [Trends] | Settings"
        );
    }

    #[test]
    fn test_loading_and_error_bodies() {
        assert_eq!(view(&PageView::loading("Trend Analysis")), "-- Trend Analysis --\nLoading...\n");
        assert_eq!(
            view(&PageView::error("Dashboard", "Network Error")),
            "-- Dashboard --\nError: Network Error\n"
        );
    }

    #[test]
    fn test_table_with_actions_shows_keys() {
        let mut t = Table::new(&["Level", "Message"]);
        t.rows.push(
            Row::new("7", vec!["CRITICAL".into(), "disk full".into()])
                .tone(Tone::Critical)
                .actions(["acknowledge", "resolve"]),
        );
        t.rows.push(Row::new("8", vec!["INFO".into(), "ok".into()]).tone(Tone::Muted));

        let text = table(&t);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "   # | Level    | Message   | Actions");
        assert_eq!(lines[1], "!! 7 | CRITICAL | disk full | acknowledge, resolve");
        assert_eq!(lines[2], " ~ 8 | INFO     | ok");
    }

    #[test]
    fn test_chart_as_columns() {
        let data = ChartData {
            x: vec!["10:00".into(), "11:00".into()],
            series: vec![Series {
                name: "CPU".into(),
                values: vec![12.0, 15.5],
            }],
        };
        let text = chart(&data);
        assert!(text.contains("11:00 | 15.5"));
    }

    #[test]
    fn test_section_error_keeps_title() {
        let s = Section::Error {
            title: "Active Alerts".into(),
            text: "Network Error".into(),
        };
        assert_eq!(section(&s), "Active Alerts\n  Error: Network Error\n");
    }
}
