//! Request/response types for the Stream Chat REST API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A user record as Stream stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Stream-side role: `"user"` or `"admin"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Body for the user-upsert endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct UpsertUsersRequest {
    pub users: HashMap<String, StreamUser>,
}

/// Body for the channel-query endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct QueryChannelsRequest {
    pub filter_conditions: serde_json::Value,
    pub limit: u32,
    /// Include the member list in the response.
    pub state: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryChannelsResponse {
    #[serde(default)]
    pub channels: Vec<ChannelEnvelope>,
}

/// One channel as returned by query/create, with its member state.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelEnvelope {
    pub channel: ChannelInfo,
    #[serde(default)]
    pub members: Vec<ChannelMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelInfo {
    /// Composite id, e.g. `messaging:support-<uuid>`.
    pub cid: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelMember {
    pub user_id: String,
}

/// A channel reference plus its current member ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState {
    /// Composite channel id (`type:id`).
    pub cid: String,
    /// Ids of current members.
    pub member_ids: Vec<String>,
}

impl From<ChannelEnvelope> for ChannelState {
    fn from(envelope: ChannelEnvelope) -> Self {
        Self {
            cid: envelope.channel.cid,
            member_ids: envelope.members.into_iter().map(|m| m.user_id).collect(),
        }
    }
}

/// Body for channel creation (`POST /channels/{type}/{id}/query`).
#[derive(Debug, Serialize)]
pub(crate) struct CreateChannelRequest {
    pub data: ChannelData,
    /// Return member state with the response.
    pub state: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChannelData {
    pub name: String,
    pub members: Vec<String>,
    pub created_by_id: String,
    /// Feature flags: typing indicators, read receipts, threaded replies.
    pub typing_events: bool,
    pub read_events: bool,
    pub replies: bool,
    pub reactions: bool,
}

/// Body for adding members to an existing channel.
#[derive(Debug, Serialize)]
pub(crate) struct AddMembersRequest {
    pub add_members: Vec<String>,
}

/// Error body shape Stream returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct StreamApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
