use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use splitledger::config::CONFIG;
use splitledger::core::fx::FxRateResolver;
use splitledger::core::models::{
    Balance, EntityRef, Event, EventStatus, Expense, Group, RateMode, Settlement, SettlementPlan,
    Split, SplitType,
};
use splitledger::core::models::audit::AppLog;
use splitledger::infrastructure::rates::http::HttpRateFetcher;
use splitledger::{
    InMemoryLogging, InMemoryRateCache, InMemoryStore, SettlementOrchestrator, SplitLedgerError,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::{Any, CorsLayer}, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

type Orchestrator =
    SettlementOrchestrator<InMemoryStore, InMemoryLogging, InMemoryRateCache, HttpRateFetcher>;

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
    store: InMemoryStore,
    logging: InMemoryLogging,
}

// Request structs for JSON payloads
#[derive(Deserialize)]
struct CreateEventRequest {
    name: String,
    currency: String,
    settlement_currency: Option<String>,
    rate_mode: Option<RateMode>,
    predefined_rates: Option<HashMap<String, f64>>,
    created_by_id: String,
    admin_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct CreateGroupRequest {
    member_ids: Vec<String>,
    representative_id: String,
    payer_id: String,
}

#[derive(Deserialize)]
struct CreateExpenseRequest {
    title: String,
    amount: f64,
    currency: String,
    payer_user_id: String,
    is_private: Option<bool>,
    split_type: SplitType,
    splits: Vec<SplitRequest>,
    paid_on_behalf_of: Option<Vec<EntityRef>>,
}

#[derive(Deserialize)]
struct SplitRequest {
    entity: EntityRef,
    amount: f64,
    ratio: Option<f64>,
}

#[derive(Deserialize)]
struct GenerateSettlementRequest {
    requested_by_id: String,
}

#[derive(Deserialize)]
struct TransitionRequest {
    actor_id: String,
}

#[derive(Deserialize)]
struct RejectRequest {
    actor_id: String,
    reason: String,
    as_failed: Option<bool>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// Newtype wrapper for SplitLedgerError to implement IntoResponse
struct ApiError(SplitLedgerError);

impl From<SplitLedgerError> for ApiError {
    fn from(err: SplitLedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            SplitLedgerError::EventNotFound(_) | SplitLedgerError::SettlementNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SplitLedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
            SplitLedgerError::InvalidStatus { .. } => StatusCode::CONFLICT,
            SplitLedgerError::InvalidSplit(_)
            | SplitLedgerError::InvalidAmount { .. }
            | SplitLedgerError::InvalidEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SplitLedgerError::RateUnavailable { .. } | SplitLedgerError::RateFetchFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            SplitLedgerError::StorageError(_)
            | SplitLedgerError::CacheError(_)
            | SplitLedgerError::LoggingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        settlement_currency: req.settlement_currency.unwrap_or_else(|| req.currency.clone()),
        currency: req.currency,
        rate_mode: req.rate_mode.unwrap_or(RateMode::Eod),
        predefined_rates: req.predefined_rates.unwrap_or_default(),
        created_by: req.created_by_id,
        admin_ids: req.admin_ids.unwrap_or_default(),
        status: EventStatus::Active,
        created_at: now,
        updated_at: now,
    };
    state.store.save_event(event.clone()).await;
    Ok(Json(event))
}

async fn create_group(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let now = Utc::now();
    let group = Group {
        id: Uuid::new_v4().to_string(),
        event_id,
        member_ids: req.member_ids,
        representative_id: req.representative_id,
        payer_id: req.payer_id,
        created_at: now,
        updated_at: now,
    };
    state.store.save_group(group.clone()).await;
    Ok(Json(group))
}

async fn create_expense(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    let now = Utc::now();
    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        event_id,
        title: req.title,
        amount: req.amount,
        currency: req.currency,
        payer_user_id: req.payer_user_id,
        is_private: req.is_private.unwrap_or(false),
        split_type: req.split_type,
        splits: req
            .splits
            .into_iter()
            .map(|s| Split {
                entity: s.entity,
                amount: s.amount,
                ratio: s.ratio,
            })
            .collect(),
        paid_on_behalf_of: req.paid_on_behalf_of.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    state.store.save_expense(expense.clone()).await;
    Ok(Json(expense))
}

async fn get_balances(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Balance>>, ApiError> {
    let balances = state.orchestrator.compute_balances(&event_id).await?;
    Ok(Json(balances))
}

async fn generate_settlement(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<GenerateSettlementRequest>,
) -> Result<Json<SettlementPlan>, ApiError> {
    let plan = state
        .orchestrator
        .generate_settlement(&event_id, &req.requested_by_id)
        .await?;
    Ok(Json(plan))
}

async fn list_settlements(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    let settlements = state.orchestrator.list_settlements(&event_id).await?;
    Ok(Json(settlements))
}

async fn initiate_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<Settlement>, ApiError> {
    let settlement = state
        .orchestrator
        .initiate_settlement(&settlement_id, &req.actor_id)
        .await?;
    Ok(Json(settlement))
}

async fn approve_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<Settlement>, ApiError> {
    let settlement = state
        .orchestrator
        .approve_settlement(&settlement_id, &req.actor_id)
        .await?;
    Ok(Json(settlement))
}

async fn reject_settlement(
    State(state): State<AppState>,
    Path(settlement_id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<Settlement>, ApiError> {
    let settlement = state
        .orchestrator
        .reject_settlement(
            &settlement_id,
            &req.actor_id,
            req.reason,
            req.as_failed.unwrap_or(false),
        )
        .await?;
    Ok(Json(settlement))
}

async fn get_app_logs(State(state): State<AppState>) -> Result<Json<Vec<AppLog>>, ApiError> {
    use splitledger::infrastructure::logging::LoggingService;
    let logs = state.logging.get_logs().await?;
    Ok(Json(logs))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.clone())
        .init();

    let store = InMemoryStore::new();
    let logging = InMemoryLogging::new();
    let fx = FxRateResolver::new(InMemoryRateCache::new(), HttpRateFetcher::from_config());
    let orchestrator = Arc::new(SettlementOrchestrator::new(
        store.clone(),
        logging.clone(),
        fx,
    ));
    let state = AppState {
        orchestrator,
        store,
        logging,
    };

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/events", post(create_event))
        .route("/events/{event_id}/groups", post(create_group))
        .route("/events/{event_id}/expenses", post(create_expense))
        .route("/events/{event_id}/balances", get(get_balances))
        .route(
            "/events/{event_id}/settlements",
            post(generate_settlement).get(list_settlements),
        )
        .route("/settlements/{settlement_id}/initiate", post(initiate_settlement))
        .route("/settlements/{settlement_id}/approve", post(approve_settlement))
        .route("/settlements/{settlement_id}/reject", post(reject_settlement))
        .route("/logs", get(get_app_logs))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
