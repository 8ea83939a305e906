//! HTTP-triggered checks.
//!
//! `GET` (or `HEAD`) on `/` or `/api/ping` runs one pass over the configured
//! targets and answers with a JSON report. Settings and the target list are
//! resolved afresh on every request.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::check::Pinger;
use crate::config::{Settings, load_settings};
use crate::models::{PingResult, Summary, timestamp_now};
use crate::report::exit_ok;
use crate::targets::load_config;

/// Where request handlers get their settings from.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// Settings file and process environment, read per request.
    Process,
    Fixed(Arc<Settings>),
}

impl SettingsSource {
    pub fn resolve(&self) -> Result<Settings> {
        match self {
            SettingsSource::Process => load_settings(),
            SettingsSource::Fixed(settings) => Ok(settings.as_ref().clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub pinger: Pinger,
    pub settings: SettingsSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PingReport {
    ok: bool,
    started_at: String,
    timeout_ms: u64,
    config_path: String,
    summary: Summary,
    results: Vec<PingResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PingFailure {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<String>,
    error: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", ping_route())
        .route("/api/ping", ping_route())
        .with_state(state)
}

fn ping_route() -> MethodRouter<AppState> {
    get(ping_handler).fallback(method_not_allowed)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn ping_handler(State(state): State<AppState>) -> Response {
    let started_at = timestamp_now();
    match run_check(&state, &started_at).await {
        Ok((status, report)) => json_response(status, report),
        Err(e) => {
            error!("check failed: {:#}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                PingFailure {
                    ok: false,
                    started_at: Some(started_at),
                    error: format!("{:#}", e),
                },
            )
        }
    }
}

async fn run_check(state: &AppState, started_at: &str) -> Result<(StatusCode, PingReport)> {
    let settings = state.settings.resolve()?;
    let config = load_config(&settings.loader_options()).await?;
    let pinger = state
        .pinger
        .clone()
        .with_concurrency_limit(settings.concurrency_limit());
    let run = pinger.ping_all(&config.targets, config.timeout_ms).await;

    info!(
        total = run.summary.total,
        up = run.summary.up,
        down = run.summary.down,
        config = %config.config_path,
        "check complete"
    );

    let status = if exit_ok(&settings, &run.summary) {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((
        status,
        PingReport {
            ok: run.summary.down == 0,
            started_at: started_at.to_string(),
            timeout_ms: config.timeout_ms,
            config_path: config.config_path,
            summary: run.summary,
            results: run.results,
        },
    ))
}

async fn method_not_allowed() -> Response {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        PingFailure {
            ok: false,
            started_at: None,
            error: "Method Not Allowed".to_string(),
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(body),
    )
        .into_response()
}
