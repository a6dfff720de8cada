//! Response bodies consumed from the game server.
//!
//! Only the fields the client actually reads are modeled; everything else
//! the server sends is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Response of `POST /Session/CreateSession`.
///
/// The session id is kept as a raw string here; the client validates it
/// through `SessionId::parse` before letting it into the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    #[serde(default)]
    pub session_id: String,
}

/// One joined player inside a session state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    #[serde(default)]
    pub name: String,
}

/// Response of `GET /Session/GetSessionById`.
///
/// A missing `players` field decodes as an empty list, matching how the
/// server omits it before anyone has joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateResponse {
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
}

impl SessionStateResponse {
    /// Number of players currently joined. This is the only field the
    /// polling predicate consumes.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// One entry of `GET /Score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_players_decodes_as_empty() {
        let state: SessionStateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(state.player_count(), 0);
    }

    #[test]
    fn players_are_counted() {
        let state: SessionStateResponse =
            serde_json::from_str(r#"{"players":[{"name":"a"},{"name":"b"}]}"#).unwrap();
        assert_eq!(state.player_count(), 2);
    }

    #[test]
    fn create_session_response_uses_camel_case() {
        let resp: CreateSessionResponse =
            serde_json::from_str(r#"{"sessionId":"abc"}"#).unwrap();
        assert_eq!(resp.session_id, "abc");
    }
}
