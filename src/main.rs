// Main entry point - CLI, dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::coordinator::DataUpdateCoordinator;
use crate::application::sensor_service::SensorService;
use crate::application::setup_flow::{Credentials, SetupFlow, SetupStep};
use crate::infrastructure::canvas_client::CanvasClient;
use crate::infrastructure::config::{load_settings, save_settings, Settings, DEFAULT_CONFIG_PATH};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_sensor, get_status, health_check, list_sensors, refresh, set_sensor_enabled,
};

#[derive(Parser)]
#[command(name = "canvas-lms-sensor")]
#[command(about = "Canvas LMS missing assignment and course sensors", long_about = None)]
struct Cli {
    /// Configuration file written by `setup` and read by `run`
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate credentials, pick the observee and write the configuration
    Setup,
    /// Poll Canvas every hour and serve sensor state over HTTP
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Setup => setup(&cli.config).await,
        Commands::Run => run(&cli.config).await,
    }
}

async fn run(config_path: &Path) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;

    // Infrastructure
    let client = Arc::new(CanvasClient::new(
        &settings.canvas.base_url,
        &settings.canvas.token,
    )?);

    // Application
    let coordinator = Arc::new(DataUpdateCoordinator::new(
        client,
        settings.canvas.observee_id.clone(),
        settings.sensors.enabled.clone(),
    ));
    coordinator
        .first_refresh()
        .await
        .context("Initial poll failed, not starting")?;
    tokio::spawn(coordinator.clone().run());

    let title = if settings.canvas.observee_name.is_empty() {
        settings.canvas.observee_id.clone()
    } else {
        settings.canvas.observee_name.clone()
    };
    let state = Arc::new(AppState {
        sensor_service: SensorService::new(coordinator, title),
    });

    // Presentation
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/status", get(get_status))
        .route("/refresh", post(refresh))
        .route("/sensors", get(list_sensors))
        .route("/sensors/:key", get(get_sensor))
        .route("/sensors/:key/enabled", put(set_sensor_enabled))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = settings
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", settings.server.bind))?;
    tracing::info!("Starting canvas-lms-sensor on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

async fn setup(config_path: &Path) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut flow = SetupFlow::new(CanvasClient::connector());
    let mut step = flow.start();

    loop {
        step = match step {
            SetupStep::Credentials { error } => {
                if let Some(error) = error {
                    eprintln!("Error: {}", error.message());
                }
                let base_url = prompt(
                    &mut lines,
                    "Canvas API URL (e.g. https://school.instructure.com/api)",
                )
                .await?;
                let api_token = prompt(&mut lines, "Access token").await?;
                flow.submit_credentials(Credentials { base_url, api_token })
                    .await
            }
            SetupStep::SelectObservee { observees, error } => {
                if let Some(error) = error {
                    eprintln!("Error: {}", error.message());
                }
                println!("Observees:");
                for observee in &observees {
                    println!("  {:>10}  {}", observee.id, observee.display_name);
                }
                let observee_id = prompt(&mut lines, "Observee id").await?;
                flow.select_observee(&observee_id)
            }
            SetupStep::Complete(result) => {
                let mut settings = Settings::from(result);
                // Rerunning setup keeps sensor and server sections
                if let Ok(existing) = load_settings(config_path) {
                    settings.sensors = existing.sensors;
                    settings.server = existing.server;
                }
                save_settings(config_path, &settings)?;
                println!(
                    "Saved configuration for {} to {}",
                    settings.canvas.observee_name,
                    config_path.display()
                );
                return Ok(());
            }
        };
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    std::io::stdout().flush()?;
    let line = lines
        .next_line()
        .await?
        .context("Setup aborted: end of input")?;
    Ok(line.trim().to_string())
}
