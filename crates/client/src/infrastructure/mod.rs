//! Infrastructure adapters for the outbound ports.

pub mod http;
pub mod input;

pub use http::{HttpSessionApi, DEFAULT_SERVER_URL};
pub use input::HostInputSurface;
