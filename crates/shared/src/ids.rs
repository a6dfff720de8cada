//! Identifier types shared across the wire contract.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a session identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session id must be a non-empty string")]
pub struct InvalidSessionId;

/// Opaque session identifier issued by the game server.
///
/// The server owns the format; the client only requires it to be non-empty
/// and treats it as immutable once obtained. Construction goes through
/// [`SessionId::parse`] so an empty identifier can never reach the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validate and wrap a server-issued identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidSessionId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidSessionId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
