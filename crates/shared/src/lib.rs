//! LobbyHero Shared - wire contract between the client core and the game server.
//!
//! This crate contains the types that cross the HTTP boundary: request and
//! response DTOs (serialized with the server's camelCase JSON conventions)
//! and the `SessionId` vocabulary type. No behavior lives here beyond
//! validation and a few accessors consumed by the client's predicates.

pub mod ids;
pub mod requests;
pub mod responses;

pub use ids::{InvalidSessionId, SessionId};
pub use requests::{CreateSessionRequest, StartGameRequest};
pub use responses::{CreateSessionResponse, PlayerInfo, ScoreEntry, SessionStateResponse};
