//! LobbyHero Client - the session-lobby core.
//!
//! This crate contains the pieces of the client with real state-machine and
//! cleanup hazards:
//!
//! - [`SessionPoller`] polls remote session state on a fixed interval until
//!   a completion predicate holds, then notifies its owner exactly once.
//! - [`InputDispatcher`] merges keyboard and gamepad sources into a single
//!   debounced confirm action, gated by a [`CooldownGuard`].
//! - [`LobbyService`] wraps the server's session endpoints with local
//!   validation.
//!
//! Screen rendering, routing, audio and clipboard handling live in the
//! owning application; they drive this crate through its public surface and
//! receive callbacks from it.

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::{
    CooldownGuard, InputDispatcher, InputRegistration, LobbyError, LobbyService, PollHandle,
    PollState, SessionPoller, DEFAULT_POLL_INTERVAL, DEFAULT_UNLOCK_DELAY,
};
pub use infrastructure::{HostInputSurface, HttpSessionApi};
pub use ports::outbound::{
    ApiError, InputEvent, InputHandler, InputSurfacePort, ListenerToken, NormalizedAction,
    PadIndex, SessionApiPort,
};
