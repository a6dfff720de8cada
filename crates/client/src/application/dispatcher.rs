//! Input dispatcher - merges keyboard and gamepad into one confirm stream.
//!
//! Both sources are normalized through a single dispatch function, so the
//! guard and debounce logic exists in exactly one place. Gamepad listeners
//! are installed per pad index, and the registration records the exact
//! `(pad, token)` pairs it created; deregistration removes precisely those
//! and nothing else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::cooldown::CooldownGuard;
use crate::ports::outbound::{
    InputEvent, InputHandler, InputSurfacePort, ListenerToken, NormalizedAction, PadIndex,
};

/// The key value the host reports for the space key.
const CONFIRM_KEY: &str = " ";

/// Shared per-registration state consulted by every installed handler.
struct RegistrationState {
    live: AtomicBool,
    guard: CooldownGuard,
    on_confirm: Box<dyn Fn() + Send + Sync>,
}

impl RegistrationState {
    /// The single dispatch point for both sources. Delivers `on_confirm`
    /// exactly once per qualifying edge, and only while the registration is
    /// live and the guard is unlocked.
    fn dispatch(&self, action: NormalizedAction) {
        if !self.live.load(Ordering::SeqCst) {
            // Event raced teardown: expected, silently dropped.
            return;
        }
        if !self.guard.is_unlocked() {
            tracing::debug!(?action, "input swallowed by cooldown guard");
            return;
        }
        match action {
            NormalizedAction::Confirm => (self.on_confirm)(),
        }
    }
}

/// Per-pad edge derivation: the host reports button levels, the dispatcher
/// fires only on the released-to-pressed transition so a held button cannot
/// repeat.
struct PadEdge {
    held: AtomicBool,
}

impl PadEdge {
    fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    fn press_edge(&self, pressed: bool) -> bool {
        if pressed {
            !self.held.swap(true, Ordering::SeqCst)
        } else {
            self.held.store(false, Ordering::SeqCst);
            false
        }
    }
}

/// One screen's input registration: the listeners it installed, addressed
/// by their exact tokens.
///
/// Deregistration is idempotent and also runs on drop, so a screen that
/// forgets its teardown path still leaves no dangling listener.
pub struct InputRegistration {
    surface: Arc<dyn InputSurfacePort>,
    state: Arc<RegistrationState>,
    key_listener: Option<ListenerToken>,
    pad_listeners: Vec<(PadIndex, ListenerToken)>,
}

impl InputRegistration {
    /// Remove every listener this registration installed. The second and
    /// later calls are no-ops.
    pub fn deregister(&mut self) {
        if self.state.live.swap(false, Ordering::SeqCst) {
            if let Some(token) = self.key_listener.take() {
                self.surface.remove_key_listener(token);
            }
            for (pad, token) in self.pad_listeners.drain(..) {
                self.surface.remove_pad_listener(pad, token);
            }
        }
    }
}

impl Drop for InputRegistration {
    fn drop(&mut self) {
        self.deregister();
    }
}

/// Installs guarded confirm handling on a host input surface.
pub struct InputDispatcher {
    surface: Arc<dyn InputSurfacePort>,
}

impl InputDispatcher {
    pub fn new(surface: Arc<dyn InputSurfacePort>) -> Self {
        Self { surface }
    }

    /// Subscribe to the keyboard and to every connected gamepad for the
    /// lifetime of one screen.
    ///
    /// `on_confirm` is invoked once per qualifying press edge while `guard`
    /// is unlocked; everything else is swallowed. The returned registration
    /// must be deregistered (or dropped) at screen teardown.
    pub fn register(
        &self,
        guard: CooldownGuard,
        on_confirm: impl Fn() + Send + Sync + 'static,
    ) -> InputRegistration {
        let state = Arc::new(RegistrationState {
            live: AtomicBool::new(true),
            guard,
            on_confirm: Box::new(on_confirm),
        });

        let key_state = Arc::clone(&state);
        let key_handler: InputHandler = Arc::new(move |event| {
            if let InputEvent::Key { code } = event {
                if code.as_str() == CONFIRM_KEY {
                    key_state.dispatch(NormalizedAction::Confirm);
                }
            }
        });
        let key_listener = Some(self.surface.add_key_listener(key_handler));

        let mut pad_listeners = Vec::new();
        for pad in self.surface.connected_pads() {
            let pad_state = Arc::clone(&state);
            let edge = PadEdge::new();
            let pad_handler: InputHandler = Arc::new(move |event| {
                if let InputEvent::PadButton { pressed, .. } = event {
                    if edge.press_edge(*pressed) {
                        pad_state.dispatch(NormalizedAction::Confirm);
                    }
                }
            });
            let token = self.surface.add_pad_listener(pad, pad_handler);
            pad_listeners.push((pad, token));
        }

        InputRegistration {
            surface: Arc::clone(&self.surface),
            state,
            key_listener,
            pad_listeners,
        }
    }
}
