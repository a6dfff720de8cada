//! Input surface port - the host's physical input boundary.
//!
//! The host (windowing layer, browser shell, embedded HID driver) owns the
//! actual event detection. This port only requires that it can install and
//! remove listeners addressed by opaque tokens, and that gamepad listeners
//! are index-addressed so several pads can be multiplexed.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Index of one gamepad on the host input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadIndex(pub u32);

impl fmt::Display for PadIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pad{}", self.0)
    }
}

/// Opaque token identifying one installed listener.
///
/// Removal requires the exact token returned at installation, so one
/// registration can never disturb another registration's listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(Uuid);

impl ListenerToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A raw event from one physical input source, as reported by the host.
///
/// Keyboard and gamepad are unified into this single tagged variant so the
/// guard and debounce logic downstream lives in exactly one dispatch
/// function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A keydown on the host keyboard. `code` carries the key value as the
    /// host reports it (`" "` for the space key). Key repeat delivers this
    /// repeatedly while held.
    Key { code: String },
    /// A sampled gamepad button report. `pressed` is level-based; edge
    /// derivation happens in the dispatcher.
    PadButton { pad: PadIndex, pressed: bool },
}

/// The single business-level action both sources normalize into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedAction {
    Confirm,
}

/// Callback installed on the host input surface.
pub type InputHandler = Arc<dyn Fn(&InputEvent) + Send + Sync>;

/// Host input surface: listener installation and removal.
pub trait InputSurfacePort: Send + Sync {
    /// Install a keyboard listener. It receives every [`InputEvent::Key`].
    fn add_key_listener(&self, handler: InputHandler) -> ListenerToken;

    /// Remove a previously installed keyboard listener. Unknown tokens are
    /// ignored.
    fn remove_key_listener(&self, token: ListenerToken);

    /// Indices of the gamepads currently connected to the host.
    fn connected_pads(&self) -> Vec<PadIndex>;

    /// Install a listener for button reports of one gamepad.
    fn add_pad_listener(&self, pad: PadIndex, handler: InputHandler) -> ListenerToken;

    /// Remove the listener identified by `(pad, token)`. Unknown pairs are
    /// ignored.
    fn remove_pad_listener(&self, pad: PadIndex, token: ListenerToken);
}
