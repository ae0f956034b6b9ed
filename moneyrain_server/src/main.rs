use anyhow::Context;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use moneyrain_core::{derive_hash_hex, Balance, MachineConfig, Outcome, SlotMachine, Wager};
use moneyrain_shared::{ApiError, ConfigResponse, PlayRequest, PlayResponse, VerifyResponse};

struct AppState {
    machine: SlotMachine,
    server_seed: String,
    server_seed_hash: String,
    // next nonce to hand out; each round gets its own RNG built from it
    nonce: AtomicU64,
}

impl AppState {
    fn new(machine: SlotMachine, server_seed: String, first_nonce: u64) -> Self {
        let server_seed_hash = derive_hash_hex(server_seed.as_bytes());
        Self {
            machine,
            server_seed,
            server_seed_hash,
            nonce: AtomicU64::new(first_nonce),
        }
    }
}

/// First nonce of this process: `NONCE_START` when set, otherwise the clock in
/// microseconds so a restart under the same seed does not replay old rounds.
fn initial_nonce(start: Option<String>) -> anyhow::Result<u64> {
    match start {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("NONCE_START {raw:?} is not a u64")),
        None => Ok(chrono::Utc::now().timestamp_micros().max(0) as u64),
    }
}

struct AppError(ApiError);

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(self.0.body())).into_response()
    }
}

async fn route_verify(State(state): State<Arc<AppState>>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        server_seed_hash: state.server_seed_hash.clone(),
    })
}

async fn route_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(state.machine.config()))
}

async fn route_play(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<PlayResponse>, AppError> {
    let balance: Balance = req
        .balance
        .parse()
        .map_err(|e: moneyrain_core::ParseBalanceError| ApiError::Invalid(e.to_string()))?;

    let nonce = state.nonce.fetch_add(1, Ordering::Relaxed);
    let outcome = state.machine.play_with_seeds(
        &state.server_seed,
        &req.client_seed,
        nonce,
        balance,
        Wager::new(req.bet_per_line, req.lines),
    );

    let message = match &outcome {
        Outcome::Settled(s) => {
            info!(nonce, winnings = s.winnings, net = s.net, "round settled");
            Some(s.message())
        }
        Outcome::Rejected { reason } => {
            warn!(nonce, reason = reason.reason(), "round rejected");
            None
        }
    };

    Ok(Json(PlayResponse {
        server_seed_hash: state.server_seed_hash.clone(),
        nonce,
        played_at: chrono::Utc::now(),
        message,
        outcome,
    }))
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/verify", get(route_verify))
        .route("/config", get(route_config))
        .route("/play", post(route_play))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

fn load_machine() -> anyhow::Result<SlotMachine> {
    let config = match std::env::var("MONEYRAIN_CONFIG") {
        Ok(path) => {
            info!("loading machine config from {path}");
            MachineConfig::load(&path)?
        }
        Err(_) => MachineConfig::classic(),
    };
    Ok(SlotMachine::new(config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let machine = load_machine()?;
    let server_seed =
        std::env::var("SERVER_SEED").unwrap_or_else(|_| "dev-server-seed".to_string());
    let first_nonce = initial_nonce(std::env::var("NONCE_START").ok())?;
    let state = Arc::new(AppState::new(machine, server_seed, first_nonce));
    info!(
        server_seed_hash = %state.server_seed_hash,
        first_nonce,
        "server seed committed"
    );

    let addr = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
