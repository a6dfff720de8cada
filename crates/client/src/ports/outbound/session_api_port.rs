//! Session API port - the HTTP boundary to the game server.
//!
//! The application layer depends on this trait object (`Arc<dyn
//! SessionApiPort>`) rather than on a concrete HTTP client, which keeps the
//! poller and lobby workflows testable without a server.

use async_trait::async_trait;
use thiserror::Error;

use lobbyhero_shared::{ScoreEntry, SessionId, SessionStateResponse};

/// Errors produced by the session API boundary.
///
/// Transport and decode failures are expected conditions (the poller treats
/// them as no-op ticks); they never panic and never cross the boundary as
/// anything other than this type.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The response decoded but violated the contract (e.g. a create-session
    /// response without a session id).
    #[error("invalid response structure: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

/// Operations the game server exposes to the client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionApiPort: Send + Sync {
    /// Create a new session for the given player name.
    ///
    /// Implementations must validate that the server actually issued a
    /// session id and return [`ApiError::InvalidResponse`] otherwise.
    async fn create_session(&self, name: &str) -> Result<SessionId, ApiError>;

    /// Read the current state of a session.
    async fn session_state(&self, id: &SessionId) -> Result<SessionStateResponse, ApiError>;

    /// Start the game for a session.
    async fn start_game(&self, id: &SessionId) -> Result<(), ApiError>;

    /// Fetch the score list.
    async fn scores(&self) -> Result<Vec<ScoreEntry>, ApiError>;
}
