//! Outbound ports - interfaces for external collaborators.
//!
//! These ports define the contracts that infrastructure adapters must
//! implement, allowing the application layer to talk to the game server and
//! the host input surface without depending on concrete implementations.

pub mod input_surface_port;
pub mod session_api_port;

pub use input_surface_port::{
    InputEvent, InputHandler, InputSurfacePort, ListenerToken, NormalizedAction, PadIndex,
};
pub use session_api_port::{ApiError, SessionApiPort};
