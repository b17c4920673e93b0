//! Serve command - runs the Signet user API server.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use signet::{
    KeyStore, NewUser, UserDirectory, UserRecord, UserUpdate,
    constants::{EXPORT_CONTENT_TYPE, EXPORT_FILENAME, KEYS_DIR, USERS_FILE},
    directory::{DirectoryError, UserFilter},
};

use crate::cli::ServeArgs;

/// Shared application state
#[derive(Clone)]
struct AppState {
    directory: Arc<UserDirectory>,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyBody {
    public_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthBody {
    status: String,
    users: usize,
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

/// Library errors mapped onto HTTP responses
#[derive(Debug)]
enum ApiError {
    Signet(signet::Error),
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Signet(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Signet(e) if e.is_conflict() => StatusCode::CONFLICT,
            ApiError::Signet(e) if e.is_validation_error() => StatusCode::BAD_REQUEST,
            ApiError::Signet(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<signet::Error> for ApiError {
    fn from(e: signet::Error) -> Self {
        ApiError::Signet(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Signet(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        };
        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        } else {
            tracing::debug!(%status, error = %message, "Request rejected");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Run the Signet server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Keys are required before anything is served; failure here is fatal
    let key_dir = args.data_dir.join(KEYS_DIR);
    let keystore = tokio::task::spawn_blocking(move || KeyStore::open(key_dir)).await??;
    let keystore = Arc::new(keystore);
    tracing::info!(?keystore, "Signing keys ready");

    let users_path = args.data_dir.join(USERS_FILE);
    let directory = if tokio::fs::try_exists(&users_path).await? {
        UserDirectory::load_from_file(&users_path, keystore).await?
    } else {
        tracing::info!("No snapshot at {}, starting empty", users_path.display());
        UserDirectory::new(keystore)
    };

    let state = AppState {
        directory: Arc::new(directory),
    };
    let app = router(state.clone());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("Signet server listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  GET    /health                        - Liveness and user count");
    println!("  GET    /api/v1/users                  - List users (?role=&status=)");
    println!("  POST   /api/v1/users                  - Create and sign a user");
    println!("  GET    /api/v1/users/by-email         - Look up a user (?email=)");
    println!("  GET    /api/v1/users/export/protobuf  - Binary export ({EXPORT_FILENAME})");
    println!("  GET    /api/v1/users/public-key       - Verification key (SPKI PEM)");
    println!("  GET    /api/v1/users/{{id}}             - Fetch a user");
    println!("  PUT    /api/v1/users/{{id}}             - Update role or status");
    println!("  DELETE /api/v1/users/{{id}}             - Delete a user");
    println!();
    println!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown(state, users_path))
        .await?;

    println!("Server shut down");
    Ok(())
}

/// Waits for a shutdown signal, then saves the user snapshot.
async fn shutdown(state: AppState, users_path: PathBuf) {
    wait_for_signal().await;
    save_snapshot(&state, &users_path).await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
                _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Failed to install signal handlers: {e}; falling back to Ctrl+C");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, initiating graceful shutdown..."),
        Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {e}; shutting down"),
    }
}

async fn save_snapshot(state: &AppState, users_path: &std::path::Path) {
    match state.directory.save_to_file(users_path).await {
        Ok(()) => tracing::info!("Users saved to {}", users_path.display()),
        Err(e) => tracing::error!("Failed to save users: {e}"),
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/v1/users", get(handle_list_users).post(handle_create_user))
        .route("/api/v1/users/by-email", get(handle_find_by_email))
        .route("/api/v1/users/export/protobuf", get(handle_export))
        .route("/api/v1/users/public-key", get(handle_public_key))
        .route(
            "/api/v1/users/{id}",
            get(handle_get_user)
                .put(handle_update_user)
                .delete(handle_delete_user),
        )
        .with_state(state)
}

/// Handler for GET /health
async fn handle_health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy".to_string(),
        users: state.directory.len().await,
    })
}

/// Handler for GET /api/v1/users
async fn handle_list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Json<Vec<UserRecord>> {
    Json(state.directory.list(&filter).await)
}

/// Handler for POST /api/v1/users
async fn handle_create_user(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    let Json(new_user) = body?;
    let record = state.directory.create(new_user).await?;
    tracing::info!(id = record.id, "Created user");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/v1/users/by-email
async fn handle_find_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserRecord>, ApiError> {
    state
        .directory
        .find_by_email(&query.email)
        .await
        .map(Json)
        .ok_or_else(|| {
            ApiError::Signet(
                DirectoryError::EmailNotFound {
                    email: query.email.clone(),
                }
                .into(),
            )
        })
}

/// Handler for GET /api/v1/users/{id}
async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserRecord>, ApiError> {
    Ok(Json(state.directory.get(id).await?))
}

/// Handler for PUT /api/v1/users/{id}
async fn handle_update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<UserRecord>, ApiError> {
    let Json(update) = body?;
    Ok(Json(state.directory.update(id, update).await?))
}

/// Handler for DELETE /api/v1/users/{id}
async fn handle_delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.directory.delete(id).await?;
    tracing::info!(id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/v1/users/export/protobuf
async fn handle_export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let buffer = state.directory.export().await?;
    let headers = [
        (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={EXPORT_FILENAME}"),
        ),
    ];
    Ok((headers, buffer).into_response())
}

/// Handler for GET /api/v1/users/public-key
async fn handle_public_key(State(state): State<AppState>) -> Json<PublicKeyBody> {
    Json(PublicKeyBody {
        public_key: state.directory.keystore().public_key_pem().to_string(),
    })
}
