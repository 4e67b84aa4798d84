//! Registration, login, session introspection, and chat-token minting.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::user::UserPublic;
use crate::routes::ApiJson;
use crate::services::auth::AuthService;
use crate::services::chat::ChatService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/chat-token", get(chat_token))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: UserPublic,
}

#[derive(Debug, Serialize)]
struct MeResponse {
    user: UserPublic,
}

#[derive(Debug, Serialize)]
struct ChatTokenResponse {
    token: String,
}

async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    let auth = AuthService::new(state.pool(), state.tokens());
    let authed = auth.register(&body.name, &body.email, &body.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: authed.token,
            user: authed.user.into(),
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let authed = auth.login(&body.email, &body.password).await?;

    Ok(Json(AuthResponse {
        token: authed.token,
        user: authed.user.into(),
    }))
}

async fn me(RequireUser(user): RequireUser) -> Json<MeResponse> {
    Json(MeResponse { user: user.into() })
}

async fn chat_token(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ChatTokenResponse>> {
    let chat = ChatService::new(state.pool(), state.stream());
    let token = chat.user_token(user.id).await?;

    Ok(Json(ChatTokenResponse { token }))
}
