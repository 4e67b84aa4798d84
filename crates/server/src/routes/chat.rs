//! Support channel access.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::services::chat::ChatService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/support-channel", get(support_channel))
}

#[derive(Debug, Serialize)]
struct SupportChannelResponse {
    /// Composite channel id (`messaging:support-<uuid>`).
    channel: String,
}

async fn support_channel(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<SupportChannelResponse>> {
    let chat = ChatService::new(state.pool(), state.stream());
    let cid = chat.support_channel(user.id).await?;

    Ok(Json(SupportChannelResponse { channel: cid }))
}
