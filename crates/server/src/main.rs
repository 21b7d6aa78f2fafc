// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Query, State as AxumState, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use billwatch::{DEFAULT_PAGE_SIZE, FileLock, PageSize, UpdateCoordinator};
use billwatch_api::{
    ApiError, DEFAULT_UPDATE_INTERVAL_HOURS, FeedRefresh, ListBillsQuery, ListBillsResponse,
    ListPendingQuery, ListPendingResponse, StalenessPolicy, SubmitBillRequest,
    SubmitBillResponse, TriggerUpdateResponse, UpdateStatusResponse, list_bills, list_pending,
    submit_bill, trigger_update, update_status,
};
use billwatch_persistence::{Persistence, PersistenceError};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};

/// billwatch server - paginated bill listings and the pending review queue
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, conflicts_with = "mysql_url")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL, used instead of `SQLite` when given
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Lock file guarding the update task
    #[arg(long, default_value = "billwatch-update.lock")]
    lock_file: PathBuf,

    /// Bills per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Hours after a successful update before another one is offered
    #[arg(long, default_value_t = DEFAULT_UPDATE_INTERVAL_HOURS)]
    update_interval_hours: u32,

    /// JSON feed of pending bills read by the update task
    #[arg(long)]
    feed: Option<PathBuf>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The single database connection.
    persistence: Arc<Mutex<Persistence>>,
    /// Single-flight guard for the update task.
    coordinator: Arc<UpdateCoordinator<FileLock>>,
    page_size: PageSize,
    staleness: StalenessPolicy,
    feed: Option<PathBuf>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Rejected request body");
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

/// Handler for GET `/bills`.
async fn handle_list_bills(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<ListBillsResponse>, HttpError> {
    info!(order = ?query.order, start = ?query.start, "Handling list_bills request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListBillsResponse = list_bills(
        &mut persistence,
        &query,
        app_state.page_size,
        &app_state.staleness,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/bills/pending`.
async fn handle_list_pending(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListPendingQuery>,
) -> Result<Json<ListPendingResponse>, HttpError> {
    info!(start = ?query.start, "Handling list_pending request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListPendingResponse = list_pending(&mut persistence, &query, app_state.page_size)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bills`.
async fn handle_submit_bill(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<SubmitBillRequest>, JsonRejection>,
) -> Result<Json<SubmitBillResponse>, HttpError> {
    let Json(request) = payload?;
    info!(cbo_url = %request.cbo_url, "Handling submit_bill request");

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitBillResponse = submit_bill(&mut persistence, request)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/update`.
async fn handle_update_status(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<UpdateStatusResponse>, HttpError> {
    info!("Handling update_status request");

    let mut persistence = app_state.persistence.lock().await;
    let response: UpdateStatusResponse = update_status(
        &mut persistence,
        &app_state.staleness,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/update`.
///
/// The refresh runs on a blocking worker; the response is sent once it
/// has finished or been skipped.
async fn handle_trigger_update(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<TriggerUpdateResponse>, HttpError> {
    info!("Handling trigger_update request");

    let coordinator: Arc<UpdateCoordinator<FileLock>> = Arc::clone(&app_state.coordinator);
    let mut task: FeedRefresh = FeedRefresh::new(
        Arc::clone(&app_state.persistence),
        app_state.feed.clone(),
        app_state.staleness,
    );

    let response: TriggerUpdateResponse =
        tokio::task::spawn_blocking(move || trigger_update(&*coordinator, &mut task))
            .await
            .map_err(|e| HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Update worker failed: {e}"),
            })??;

    info!(outcome = %response.outcome, "Update request finished");
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
///
/// Every response carries `Cache-Control: no-cache`.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/bills", get(handle_list_bills))
        .route("/bills", post(handle_submit_bill))
        .route("/bills/pending", get(handle_list_pending))
        .route("/update", get(handle_update_status))
        .route("/update", post(handle_trigger_update))
        .with_state(app_state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}

/// Opens the configured database backend.
fn open_persistence(args: &Args) -> Result<Persistence, PersistenceError> {
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        return Persistence::new_with_mysql(url);
    }
    if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        return Persistence::new_with_file(db_path);
    }
    info!("Using in-memory database");
    Persistence::new_in_memory()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing billwatch server");

    let page_size: PageSize = PageSize::new(args.page_size)?;
    let persistence: Persistence = open_persistence(&args)?;

    info!(
        lock_file = %args.lock_file.display(),
        page_size = page_size.get(),
        update_interval_hours = args.update_interval_hours,
        feed = ?args.feed,
        "Configuration loaded"
    );

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        coordinator: Arc::new(UpdateCoordinator::new(FileLock::new(args.lock_file.clone()))),
        page_size,
        staleness: StalenessPolicy::from_hours(args.update_interval_hours),
        feed: args.feed.clone(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
