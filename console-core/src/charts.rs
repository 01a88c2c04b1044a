//! Chart projection: turn snapshots and forecasts into named series.
//!
//! Pure functions, no rendering. Labels on the x axis are shortened when the
//! timestamp is RFC 3339, otherwise passed through ("3:00").

use chrono::DateTime;
use serde::Serialize;

use crate::models::{HistorySample, TrendReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    pub x: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

fn label(timestamp: &str, format: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(ts) => ts.format(format).to_string(),
        Err(_) => timestamp.to_string(),
    }
}

fn series<T>(name: &str, points: &[T], value: impl Fn(&T) -> f64) -> Series {
    Series {
        name: name.to_string(),
        values: points.iter().map(value).collect(),
    }
}

/// Historique CPU / mémoire (/ disque) sur 24h
pub fn resource_chart(history: &[HistorySample], with_disk: bool) -> ChartData {
    let mut chart = ChartData {
        x: history.iter().map(|s| label(&s.timestamp, "%H:%M")).collect(),
        series: vec![
            series("CPU", history, |s| s.cpu_usage),
            series("Memory", history, |s| s.memory_usage),
        ],
    };
    if with_disk {
        chart.series.push(series("Disk", history, |s| s.disk_usage));
    }
    chart
}

/// Prévision d'une métrique : valeur prédite et bornes
pub fn forecast_chart(report: &TrendReport) -> ChartData {
    let points = report.forecast.points();
    ChartData {
        x: points.iter().map(|p| label(&p.timestamp, "%Y-%m-%d")).collect(),
        series: vec![
            series("Predicted", points, |p| p.predicted),
            series("Lower Bound", points, |p| p.lower),
            series("Upper Bound", points, |p| p.upper),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{mock_history, mock_trends};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_history_passthrough_labels() {
        let chart = resource_chart(&mock_history(10.0, 20.0, 30.0), false);
        assert_eq!(chart.x.len(), 24);
        assert_eq!(chart.x[3], "3:00");
        assert_eq!(chart.series.len(), 2);
        assert!(chart.series("Disk").is_none());
    }

    #[test]
    fn test_history_with_disk_and_rfc3339() {
        let history = vec![HistorySample {
            timestamp: "2024-05-01T08:15:00Z".to_string(),
            cpu_usage: 1.0,
            memory_usage: 2.0,
            disk_usage: 3.0,
        }];
        let chart = resource_chart(&history, true);
        assert_eq!(chart.x, vec!["08:15"]);
        assert_eq!(chart.series("Disk").unwrap().values, vec![3.0]);
    }

    #[test]
    fn test_forecast_series() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let trends = mock_trends(now);
        let chart = forecast_chart(&trends[0]);
        assert_eq!(chart.x.len(), 7);
        assert_eq!(chart.x[0], "2024-05-02");
        let predicted = &chart.series("Predicted").unwrap().values;
        let lower = &chart.series("Lower Bound").unwrap().values;
        assert!(predicted.iter().zip(lower).all(|(p, l)| l < p));
    }

    #[test]
    fn test_empty_history() {
        assert!(resource_chart(&[], true).is_empty());
    }
}
