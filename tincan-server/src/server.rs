use crate::auth::AuthService;
use crate::room::{RoomManager, RoomRegistry};
use crate::signaling::{SignalingService, ws_handler};
use crate::user::{MemoryUserStore, UserStore, UserStoreError};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state passed to all handlers via the axum `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pub signaling: SignalingService,
    pub rooms: Arc<RoomManager>,
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new() -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let rooms = Arc::new(RoomManager::new(registry));
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let auth = Arc::new(AuthService::new(Arc::clone(&users)));
        let signaling = SignalingService::new(Arc::clone(&rooms));

        Self {
            signaling,
            rooms,
            auth,
            users,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
        .layer(cors)
        .with_state(state)
}

async fn index() -> &'static str {
    "tincan signaling server"
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "data": {
            "status": "healthy",
            "room_count": state.rooms.room_count(),
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let username = payload.username.trim();
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::bad_request("Username must be 3 to 50 characters"));
    }
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    let (user, token) = state.auth.register(username, email).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful",
            "data": { "token": token, "user": user }
        })),
    ))
}

async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token =
        bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
    let user = state
        .auth
        .authenticate(token)
        .await
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Json(json!({ "success": true, "data": user })))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token =
        bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
    state.auth.revoke(token);

    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// HTTP error body, `{"success": false, "message": ...}` like every other
/// envelope the server emits.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<UserStoreError> for ApiError {
    fn from(err: UserStoreError) -> Self {
        let status = match err {
            UserStoreError::NotFound => StatusCode::NOT_FOUND,
            UserStoreError::DuplicateEmail | UserStoreError::DuplicateUsername => {
                StatusCode::BAD_REQUEST
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "message": self.message })),
        )
            .into_response()
    }
}
