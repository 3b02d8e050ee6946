// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_source::HttpReachSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{chart_data, chart_page, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_dashboard_config().context("failed to load dashboard config")?;

    // Infrastructure
    let source = HttpReachSource::new(
        config.source.url.clone(),
        config.source.timeout_secs.map(Duration::from_secs),
    )?;
    tracing::info!("Reachability feed: {}", source.url());

    // Application
    let layouts = config.layouts();
    let canvases: Vec<&str> = layouts.iter().map(|l| l.canvas.as_str()).collect();
    tracing::info!("Charts: {}", canvases.join(", "));
    let chart_service = ChartService::new(Arc::new(source), layouts, config.display);

    let state = Arc::new(AppState { chart_service });

    // Presentation
    let router = Router::new()
        .route("/", get(chart_page))
        .route("/api/charts", get(chart_data))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting quicreach-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
