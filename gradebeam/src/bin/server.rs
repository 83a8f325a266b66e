//! Grade Beam HTTP Server

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::{info, warn};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use gradebeam::prelude::*;

#[derive(Debug, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
    solve_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("GRADEBEAM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("GRADEBEAM_PORT") {
            Ok(raw) => raw.parse().context("GRADEBEAM_PORT must be a port number")?,
            Err(_) => 8086,
        };
        let timeout_ms: u64 = match std::env::var("GRADEBEAM_SOLVE_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse()
                .context("GRADEBEAM_SOLVE_TIMEOUT_MS must be a whole number of milliseconds")?,
            Err(_) => 10_000,
        };
        Ok(Self {
            host,
            port,
            solve_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct SweepResponse {
    success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<GradeBeamError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<ReactionTable>,
}

impl SweepResponse {
    fn rejected(status: StatusCode, errors: Vec<GradeBeamError>) -> Response {
        let body = Self {
            success: false,
            errors,
            results: None,
        };
        (status, Json(body)).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn sweep(State(config): State<ServerConfig>, Json(request): Json<SweepRequest>) -> Response {
    let input = match request.validate() {
        Ok(input) => input,
        Err(errors) => return SweepResponse::rejected(StatusCode::BAD_REQUEST, errors),
    };

    let options = SweepOptions::parallel().with_timeout(config.solve_timeout);
    let job = tokio::task::spawn_blocking(move || {
        run_sweep_with(&input.beam, &input.moduli, input.n_springs, &input.loads, &options)
    });

    // The sweep honors its own deadline; this bounds the blocking task as well
    let grace = config.solve_timeout + Duration::from_secs(1);
    match tokio::time::timeout(grace, job).await {
        Ok(Ok(table)) => {
            let body = SweepResponse {
                success: table.all_succeeded(),
                errors: Vec::new(),
                results: Some(table),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(join_err)) => {
            warn!("Sweep task failed: {}", join_err);
            SweepResponse::rejected(
                StatusCode::INTERNAL_SERVER_ERROR,
                vec![GradeBeamError::SolverFailure(join_err.to_string())],
            )
        }
        Err(_) => SweepResponse::rejected(
            StatusCode::GATEWAY_TIMEOUT,
            vec![GradeBeamError::SolverFailure(format!(
                "timed out after {:?}",
                config.solve_timeout
            ))],
        ),
    }
}

/// Assembled model for the first modulus, without solving it
async fn model(Json(request): Json<SweepRequest>) -> Response {
    let input = match request.validate() {
        Ok(input) => input,
        Err(errors) => return SweepResponse::rejected(StatusCode::BAD_REQUEST, errors),
    };

    let modulus = input.moduli.first().copied().unwrap_or_default();
    let foundation = FoundationSpec::new(modulus, input.n_springs);
    let result = DiscretizedModel::uniform(&input.beam, &foundation)
        .and_then(|springs| build_model(&input.beam, &springs, &input.loads));

    match result {
        Ok(model) => (StatusCode::OK, Json(model)).into_response(),
        Err(err) => SweepResponse::rejected(StatusCode::UNPROCESSABLE_ENTITY, vec![err]),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env()?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/sweep", post(sweep))
        .route("/api/v1/model", post(model))
        .layer(cors)
        .with_state(config.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("GRADEBEAM_HOST must be an IP address")?;
    info!("Solve timeout {:?}", config.solve_timeout);
    println!("Grade Beam Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Sweep:        POST /api/v1/sweep");
    println!("  Model:        POST /api/v1/model");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
