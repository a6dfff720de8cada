//! Application layer - the core state machines and workflows.

pub mod cooldown;
pub mod dispatcher;
pub mod lobby;
pub mod poller;

pub use cooldown::{CooldownGuard, DEFAULT_UNLOCK_DELAY};
pub use dispatcher::{InputDispatcher, InputRegistration};
pub use lobby::{LobbyError, LobbyService};
pub use poller::{PollHandle, PollState, SessionPoller, DEFAULT_POLL_INTERVAL};
