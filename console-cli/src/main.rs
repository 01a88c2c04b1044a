//! BackLog Console - terminal front for the admin panel and the monitoring frontend
//!
//! Same routes, pages and refresh contract as the web dashboards:
//! - `routes`: list the navigation of one console
//! - `show <path>`: mount a page once and print it
//! - `watch <path>`: keep the page mounted and reprint on every change (polling)
//! - `repl [path]`: interactive navigation and page actions

mod render;
mod repl;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use backlog_console_core::config::{load_config, load_config_from};
use backlog_console_core::{AppKind, ConsoleConfig, HeaderStatus, PageAction, Shell};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// backlog-console - Admin panel and monitoring console in the terminal
#[derive(Parser, Debug)]
#[command(name = "backlog-console")]
#[command(version, about = "Admin panel and monitoring console for AI_BackLog_Assistant")]
struct Args {
    /// Which console to run
    #[arg(long, value_enum, default_value = "frontend")]
    app: AppArg,

    /// Backend base URL (overrides config and environment)
    #[arg(long)]
    api_url: Option<String>,

    /// YAML configuration file (default: $BACKLOG_CONSOLE_CONFIG or console.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve every page from built-in demo data, no network
    #[arg(long)]
    offline: bool,

    /// Polling interval in seconds for the header and System Monitoring
    #[arg(long)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AppArg {
    Admin,
    Frontend,
}

impl From<AppArg> for AppKind {
    fn from(arg: AppArg) -> Self {
        match arg {
            AppArg::Admin => AppKind::Admin,
            AppArg::Frontend => AppKind::Frontend,
        }
    }
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List routes and navigation entries
    Routes,
    /// Mount a page, print it once and exit
    Show {
        #[arg(default_value = "/")]
        path: String,
        /// Log filter (Logs pages)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Keep a page mounted and reprint it whenever its data changes
    Watch {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Interactive session
    Repl {
        #[arg(default_value = "/")]
        path: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("backlog_console=info,backlog_console_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn resolve_config(args: &Args) -> Result<ConsoleConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path).await.apply_env(),
        None => load_config().await,
    };
    if let Some(url) = &args.api_url {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = args.interval {
        anyhow::ensure!(secs > 0, "--interval must be greater than 0");
        config.polling.interval_secs = secs;
    }
    Ok(config)
}

/// Attend le premier chargement de la page puis, brièvement, le premier statut
async fn settle(shell: &Shell) {
    if !shell.wait_loaded(Duration::from_secs(10)).await {
        warn!("page still loading after 10s");
    }
    if shell.header().status() == HeaderStatus::Connecting {
        shell.changed(Duration::from_secs(2)).await;
    }
}

async fn watch(shell: &mut Shell, path: &str) -> Result<()> {
    shell.open(path).await?;
    shell.start();
    settle(shell).await;

    let mut shown = shell.revision();
    println!("{}", repl::screen(shell));
    loop {
        tokio::select! {
            changed = shell.changed(Duration::from_secs(3600)) => {
                if changed && shell.revision() != shown {
                    shown = shell.revision();
                    println!("{}", repl::screen(shell));
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Ok si .env n'existe pas
    init_logging();

    let args = Args::parse();
    let app = AppKind::from(args.app);
    let config = resolve_config(&args).await?;
    info!("{} console, backend {}", app, config.api.base_url);

    let mut shell = Shell::connect(app, &config, args.offline).context("Failed to create console")?;

    match args.command.unwrap_or(CliCommand::Repl { path: "/".into() }) {
        CliCommand::Routes => println!("{}", repl::routes(&shell)),
        CliCommand::Show { path, filter } => {
            shell.open(&path).await.with_context(|| format!("Cannot open {}", path))?;
            shell.start();
            if let Some(term) = filter {
                shell.dispatch(PageAction::Filter(term)).await?;
            }
            settle(&shell).await;
            println!("{}", repl::screen(&shell));
        }
        CliCommand::Watch { path } => watch(&mut shell, &path).await?,
        CliCommand::Repl { path } => {
            if let Err(e) = shell.open(&path).await {
                warn!("cannot open {}: {}", path, e);
            }
            shell.start();
            repl::run(&mut shell).await?;
        }
    }

    shell.close();
    Ok(())
}
