//! Back-office user listings.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::users::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::user::UserPublic;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/clients", get(clients))
}

#[derive(Debug, Serialize)]
struct ClientsResponse {
    clients: Vec<UserPublic>,
}

/// List every non-admin account, newest first.
async fn clients(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ClientsResponse>> {
    let users = UserRepository::new(state.pool()).list_clients().await?;

    Ok(Json(ClientsResponse {
        clients: users.into_iter().map(UserPublic::from).collect(),
    }))
}
