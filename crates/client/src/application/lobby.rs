//! Lobby workflows: session creation, game start, score board.
//!
//! Thin application service over [`SessionApiPort`] that adds the local
//! rules the server cannot enforce: name validation before any network
//! call, join-link construction, and score ordering.

use std::sync::Arc;

use thiserror::Error;

use lobbyhero_shared::{ScoreEntry, SessionId};

use crate::ports::outbound::{ApiError, SessionApiPort};

/// How many entries the score board shows.
pub const TOP_SCORES_LIMIT: usize = 10;

/// Errors surfaced to the owner of the lobby screen.
#[derive(Debug, Clone, Error)]
pub enum LobbyError {
    /// Rejected locally, before any network call.
    #[error("player name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Owner-facing lobby operations.
pub struct LobbyService {
    api: Arc<dyn SessionApiPort>,
    /// Base URL of the web client, used for shareable join links.
    web_base_url: String,
}

impl LobbyService {
    pub fn new(api: Arc<dyn SessionApiPort>, web_base_url: &str) -> Self {
        Self {
            api,
            web_base_url: web_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a session for `name`.
    ///
    /// An empty or whitespace-only name is rejected without touching the
    /// network; the caller surfaces that locally and lets the user resubmit.
    pub async fn create_session(&self, name: &str) -> Result<SessionId, LobbyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LobbyError::EmptyName);
        }

        let session_id = self.api.create_session(name).await?;
        tracing::info!(session_id = %session_id, "session created");
        Ok(session_id)
    }

    /// Shareable link a second player uses to join the session.
    pub fn join_link(&self, session_id: &SessionId) -> String {
        format!("{}/#/join/{}", self.web_base_url, session_id)
    }

    /// Start the game. Failures are returned to the caller and not retried.
    pub async fn start_game(&self, session_id: &SessionId) -> Result<(), LobbyError> {
        self.api.start_game(session_id).await?;
        tracing::info!(session_id = %session_id, "game started");
        Ok(())
    }

    /// Fetch the score board: descending by score, at most
    /// [`TOP_SCORES_LIMIT`] entries.
    pub async fn top_scores(&self) -> Result<Vec<ScoreEntry>, LobbyError> {
        let mut scores = self.api.scores().await?;
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(TOP_SCORES_LIMIT);
        Ok(scores)
    }
}
