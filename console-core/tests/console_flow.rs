//! Both consoles end-to-end over HTTP: mount, polling, mutations, navigation.

use std::time::Duration;

use backlog_console_core::pages::{PageAction, Section};
use backlog_console_core::{AppKind, ConsoleConfig, HeaderStatus, Shell};
use backlog_devkit::{ApiStub, PayloadBuilder, TestHarness};
use serde_json::json;

fn config_for(harness: &TestHarness, interval_secs: u64) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.api.base_url = harness.base_url().to_string();
    config.polling.interval_secs = interval_secs;
    config
}

fn has_line(section: Option<&Section>, needle: &str) -> bool {
    match section {
        Some(Section::Lines { lines, .. }) => lines.iter().any(|l| l == needle),
        _ => false,
    }
}

fn frontend_stub() -> ApiStub {
    let stub = ApiStub::new();
    stub.reply_json("GET", "/api/status", PayloadBuilder::status(12.5, 40.0, 70.0, 88))
        .reply_json("GET", "/api/logs", PayloadBuilder::logs(5))
        .reply_json("GET", "/api/alerts", PayloadBuilder::alerts(&["alert-1", "alert-2"]))
        .reply_json("GET", "/api/trends", json!([PayloadBuilder::trend("cpu", 42.0, "high", 7)]))
        .reply_json("POST", "/api/config", PayloadBuilder::config_reply("Configuration updated successfully"));
    stub
}

#[tokio::test]
async fn test_frontend_dashboard_over_http() {
    let harness = TestHarness::with_stub(frontend_stub()).await.unwrap();
    let mut shell = Shell::connect(AppKind::Frontend, &config_for(&harness, 30), false).unwrap();

    shell.open("/").await.unwrap();
    let view = shell.view().unwrap();
    assert_eq!(view.title, "Dashboard");
    assert!(has_line(view.section("System Status"), "Processes: 88"));
    assert_eq!(view.table("Active Alerts").unwrap().rows.len(), 2);

    let logs = harness.stub().requests_to("/api/logs");
    assert_eq!(logs[0].query_param("limit").as_deref(), Some("5"));
}

#[tokio::test]
async fn test_dashboard_section_error_is_local() {
    let stub = frontend_stub();
    stub.reply_status("GET", "/api/alerts", 500);
    let harness = TestHarness::with_stub(stub).await.unwrap();
    let mut shell = Shell::connect(AppKind::Frontend, &config_for(&harness, 30), false).unwrap();

    shell.open("/dashboard").await.unwrap();
    let view = shell.view().unwrap();
    assert!(matches!(view.section("Active Alerts"), Some(Section::Error { .. })));
    assert!(matches!(view.section("System Status"), Some(Section::Lines { .. })));
}

#[tokio::test]
async fn test_trends_over_http() {
    let harness = TestHarness::with_stub(frontend_stub()).await.unwrap();
    let mut shell = Shell::connect(AppKind::Frontend, &config_for(&harness, 30), false).unwrap();

    shell.open("/trends").await.unwrap();
    let view = shell.view().unwrap();
    assert_eq!(view.title, "Trend Analysis");
    assert!(has_line(view.section("cpu Trend Analysis"), "Mean: 42.0"));
    match view.section("cpu Forecast") {
        Some(Section::Chart { chart, .. }) => {
            assert_eq!(chart.x.len(), 7);
            assert!(chart.series("Predicted").is_some());
        }
        other => panic!("expected forecast chart, got {:?}", other),
    }
}

#[tokio::test]
async fn test_settings_rollback_on_server_error() {
    let stub = frontend_stub();
    stub.reply_status("POST", "/api/config", 500);
    let harness = TestHarness::with_stub(stub).await.unwrap();
    let mut shell = Shell::connect(AppKind::Frontend, &config_for(&harness, 30), false).unwrap();
    shell.open("/settings").await.unwrap();

    let notice = shell
        .dispatch(PageAction::UpdateConfig {
            parameter: "logLevel".into(),
            value: "DEBUG".into(),
        })
        .await
        .unwrap()
        .unwrap();
    assert!(!notice.is_success());
    assert!(notice.message.starts_with("Failed to update configuration: "));

    let view = shell.view().unwrap();
    let row = view.table("System Configuration").unwrap().row("logLevel").unwrap();
    assert_eq!(row.cells[1], "INFO");
    assert_eq!(
        harness.stub().last_body("/api/config"),
        Some(json!({ "parameter": "logLevel", "value": "DEBUG" }))
    );
}

#[tokio::test]
async fn test_settings_confirmed_update() {
    let harness = TestHarness::with_stub(frontend_stub()).await.unwrap();
    let mut shell = Shell::connect(AppKind::Frontend, &config_for(&harness, 30), false).unwrap();
    shell.open("/settings").await.unwrap();

    let notice = shell
        .dispatch(PageAction::UpdateConfig {
            parameter: "alertThreshold".into(),
            value: "90".into(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notice.message, "Configuration updated: Configuration updated successfully");
    let view = shell.view().unwrap();
    assert_eq!(view.table("System Configuration").unwrap().row("alertThreshold").unwrap().cells[1], "90");
    assert_eq!(
        harness.stub().last_body("/api/config"),
        Some(json!({ "parameter": "alertThreshold", "value": "90" }))
    );
}

#[tokio::test]
async fn test_monitoring_polls_until_navigation() {
    let stub = ApiStub::new();
    stub.reply_json("GET", "/api/admin/monitoring", PayloadBuilder::monitoring(55.0, json!([])))
        .reply_json("GET", "/api/admin/users", json!([PayloadBuilder::user(1, "admin", "admin")]));
    let harness = TestHarness::with_stub(stub).await.unwrap();
    let mut shell = Shell::connect(AppKind::Admin, &config_for(&harness, 1), false).unwrap();

    shell.open("/system-monitoring").await.unwrap();
    assert!(shell.wait_loaded(Duration::from_secs(2)).await);
    assert!(harness.wait_for_requests("/api/admin/monitoring", 2, 3000).await);
    let view = shell.view().unwrap();
    assert!(has_line(view.section("Current System Status"), "CPU Usage: 55.0%"));

    shell.open("/user-management").await.unwrap();
    assert_eq!(shell.view().unwrap().table("Users").unwrap().rows.len(), 1);

    let polls = harness.stub().request_count("/api/admin/monitoring");
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(harness.stub().request_count("/api/admin/monitoring"), polls);
}

#[tokio::test]
async fn test_header_polls_admin_status() {
    let stub = ApiStub::new();
    stub.reply_json("GET", "/api/admin/status", PayloadBuilder::status(23.4, 61.2, 48.7, 10));
    let mut harness = TestHarness::with_stub(stub).await.unwrap();
    let mut shell = Shell::connect(AppKind::Admin, &config_for(&harness, 1), false).unwrap();

    shell.start();
    assert!(harness.wait_for_requests("/api/admin/status", 2, 3000).await);
    assert_eq!(
        shell.header().line().unwrap(),
        "CPU: 23.4% | Memory: 61.2% | Disk: 48.7%"
    );

    shell.close();
    harness.reset();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    harness.expect_requests("/api/admin/status", 0);
    harness.verify_expectations().unwrap();
}

#[tokio::test]
async fn test_header_shows_failed_status_poll() {
    let stub = ApiStub::new();
    stub.reply_status("GET", "/api/status", 503);
    let harness = TestHarness::with_stub(stub).await.unwrap();
    let mut shell = Shell::connect(AppKind::Frontend, &config_for(&harness, 30), false).unwrap();

    shell.start();
    assert!(shell.changed(Duration::from_secs(3)).await);
    assert!(shell.header().line().is_none());
    assert_eq!(
        shell.header().status(),
        HeaderStatus::Failed("Request to /api/status failed with status 503 Service Unavailable".into())
    );
    shell.close();
}

#[tokio::test]
async fn test_admin_mock_pages_never_hit_network() {
    let mut harness = TestHarness::new().await.unwrap();
    let mut shell = Shell::connect(AppKind::Admin, &config_for(&harness, 30), false).unwrap();

    shell.open("/logs").await.unwrap();
    assert_eq!(shell.view().unwrap().table("Logs").unwrap().rows.len(), 50);
    shell.dispatch(PageAction::Filter("error".into())).await.unwrap();
    assert_eq!(shell.view().unwrap().table("Logs").unwrap().rows.len(), 10);

    shell.open("/alerts").await.unwrap();
    let notice = shell.dispatch(PageAction::Acknowledge("2".into())).await.unwrap().unwrap();
    assert_eq!(notice.message, "Alert 2 acknowledged successfully");

    shell.open("/configuration").await.unwrap();
    harness.expect_requests("/api/admin/logs", 0);
    harness.expect_requests("/api/admin/alerts", 0);
    harness.expect_requests("/api/admin/config", 0);
    harness.verify_expectations().unwrap();
}
