//! In-memory host input surface.
//!
//! The host shell (windowing layer, browser glue, HID driver) pushes raw
//! key and pad reports into this surface; installed listeners fan them out.
//! Listeners live in explicit registration tables keyed by `(source, pad
//! index)` and addressed by opaque tokens, so removal can only ever hit the
//! exact handler that was installed.
//!
//! Tests drive the same surface directly through the `emit_*` methods.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::outbound::{
    InputEvent, InputHandler, InputSurfacePort, ListenerToken, PadIndex,
};

#[derive(Default)]
struct ListenerTables {
    keys: HashMap<ListenerToken, InputHandler>,
    pads: HashMap<PadIndex, HashMap<ListenerToken, InputHandler>>,
    connected: Vec<PadIndex>,
}

/// Registration-table implementation of [`InputSurfacePort`].
#[derive(Default)]
pub struct HostInputSurface {
    tables: Mutex<ListenerTables>,
}

impl HostInputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a gamepad as connected. Registrations created afterwards will
    /// subscribe to it.
    pub fn connect_pad(&self, pad: PadIndex) {
        let Ok(mut tables) = self.tables.lock() else {
            return;
        };
        if !tables.connected.contains(&pad) {
            tables.connected.push(pad);
            tables.connected.sort();
        }
    }

    /// Deliver a keydown report to every key listener.
    pub fn emit_key(&self, code: &str) {
        let event = InputEvent::Key {
            code: code.to_string(),
        };
        for handler in self.key_handlers() {
            handler(&event);
        }
    }

    /// Deliver a button level report for one pad to its listeners.
    pub fn emit_pad_button(&self, pad: PadIndex, pressed: bool) {
        let event = InputEvent::PadButton { pad, pressed };
        for handler in self.pad_handlers(pad) {
            handler(&event);
        }
    }

    /// Total number of installed listeners, across all sources.
    pub fn listener_count(&self) -> usize {
        let Ok(tables) = self.tables.lock() else {
            return 0;
        };
        tables.keys.len() + tables.pads.values().map(HashMap::len).sum::<usize>()
    }

    // Handlers are cloned out of the table before invocation so a handler
    // that removes listeners (teardown from within a callback) cannot
    // deadlock on the table lock.
    fn key_handlers(&self) -> Vec<InputHandler> {
        match self.tables.lock() {
            Ok(tables) => tables.keys.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn pad_handlers(&self, pad: PadIndex) -> Vec<InputHandler> {
        match self.tables.lock() {
            Ok(tables) => tables
                .pads
                .get(&pad)
                .map(|handlers| handlers.values().cloned().collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

impl InputSurfacePort for HostInputSurface {
    fn add_key_listener(&self, handler: InputHandler) -> ListenerToken {
        let token = ListenerToken::new();
        if let Ok(mut tables) = self.tables.lock() {
            tables.keys.insert(token, handler);
        }
        token
    }

    fn remove_key_listener(&self, token: ListenerToken) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.keys.remove(&token);
        }
    }

    fn connected_pads(&self) -> Vec<PadIndex> {
        match self.tables.lock() {
            Ok(tables) => tables.connected.clone(),
            Err(_) => Vec::new(),
        }
    }

    fn add_pad_listener(&self, pad: PadIndex, handler: InputHandler) -> ListenerToken {
        let token = ListenerToken::new();
        if let Ok(mut tables) = self.tables.lock() {
            tables.pads.entry(pad).or_default().insert(token, handler);
        }
        token
    }

    fn remove_pad_listener(&self, pad: PadIndex, token: ListenerToken) {
        if let Ok(mut tables) = self.tables.lock() {
            if let Some(handlers) = tables.pads.get_mut(&pad) {
                handlers.remove(&token);
                if handlers.is_empty() {
                    tables.pads.remove(&pad);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn recording_handler() -> (InputHandler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_in_handler = Arc::clone(&count);
        let handler: InputHandler = Arc::new(move |_event| {
            count_in_handler.fetch_add(1, Ordering::SeqCst);
        });
        (handler, count)
    }

    #[test]
    fn removal_requires_the_exact_pair() {
        let surface = HostInputSurface::new();
        surface.connect_pad(PadIndex(0));
        surface.connect_pad(PadIndex(1));

        let (handler_a, count_a) = recording_handler();
        let (handler_b, count_b) = recording_handler();
        let token_a = surface.add_pad_listener(PadIndex(0), handler_a);
        let _token_b = surface.add_pad_listener(PadIndex(1), handler_b);

        // Removing (pad 1, token of pad 0) must hit nothing.
        surface.remove_pad_listener(PadIndex(1), token_a);
        surface.emit_pad_button(PadIndex(1), true);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);

        surface.remove_pad_listener(PadIndex(0), token_a);
        surface.emit_pad_button(PadIndex(0), true);
        assert_eq!(count_a.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn key_listeners_receive_key_events_only_while_installed() {
        let surface = HostInputSurface::new();
        let (handler, count) = recording_handler();
        let token = surface.add_key_listener(handler);

        surface.emit_key(" ");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        surface.remove_key_listener(token);
        surface.emit_key(" ");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Unknown token: ignored.
        surface.remove_key_listener(token);
    }

    #[test]
    fn connect_pad_is_idempotent_and_sorted() {
        let surface = HostInputSurface::new();
        surface.connect_pad(PadIndex(1));
        surface.connect_pad(PadIndex(0));
        surface.connect_pad(PadIndex(1));
        assert_eq!(surface.connected_pads(), vec![PadIndex(0), PadIndex(1)]);
    }
}
