//! Request bodies sent to the game server.
//!
//! Field names follow the server's camelCase JSON conventions.

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;

/// Body of `POST /Session/CreateSession`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub name: String,
}

impl CreateSessionRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Body of `POST /Session/StartGame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub session_id: SessionId,
}

impl StartGameRequest {
    pub fn new(session_id: SessionId) -> Self {
        Self { session_id }
    }
}
