//! Input events, the listener bus they travel on, and the router that turns
//! them into logical actions.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use rc_shared::domain::Action;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::profile::{Key, KeyBindings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Pointer,
    Keyboard,
}

/// One of the on-screen controls laid out in a 3x3 grid:
///
/// ```text
///  HeadUp   Forward   .
///  Left     Fire      Right
///  HeadDown Backward  .
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlButton {
    HeadUp,
    Forward,
    Left,
    Fire,
    Right,
    HeadDown,
    Backward,
}

impl ControlButton {
    pub const ALL: [ControlButton; 7] = [
        ControlButton::HeadUp,
        ControlButton::Forward,
        ControlButton::Left,
        ControlButton::Fire,
        ControlButton::Right,
        ControlButton::HeadDown,
        ControlButton::Backward,
    ];

    pub fn action(self) -> Action {
        match self {
            ControlButton::HeadUp => Action::HeadUp,
            ControlButton::Forward => Action::DriveForward,
            ControlButton::Left => Action::DriveLeft,
            ControlButton::Fire => Action::Fire,
            ControlButton::Right => Action::DriveRight,
            ControlButton::HeadDown => Action::HeadDown,
            ControlButton::Backward => Action::DriveBackward,
        }
    }

    /// `(row, column)`, zero-based.
    pub fn cell(self) -> (u8, u8) {
        match self {
            ControlButton::HeadUp => (0, 0),
            ControlButton::Forward => (0, 1),
            ControlButton::Left => (1, 0),
            ControlButton::Fire => (1, 1),
            ControlButton::Right => (1, 2),
            ControlButton::HeadDown => (2, 0),
            ControlButton::Backward => (2, 1),
        }
    }

    pub fn at(row: u8, column: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|button| button.cell() == (row, column))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    ButtonActivated(ControlButton),
    KeyDown(Key),
    KeyUp(Key),
}

impl InputEvent {
    pub fn source(&self) -> InputSource {
        match self {
            InputEvent::ButtonActivated(_) => InputSource::Pointer,
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => InputSource::Keyboard,
        }
    }
}

/// Resolves input events to actions.
///
/// Keyboard input goes through a single "key held" latch shared by all keys:
/// after any key-down, further key-downs are ignored until a key-up arrives.
/// The latch is set even when the pressed key has no binding.
#[derive(Debug, Clone)]
pub struct InputRouter {
    bindings: KeyBindings,
    key_held: bool,
}

impl InputRouter {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            key_held: false,
        }
    }

    pub fn key_held(&self) -> bool {
        self.key_held
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn route(&mut self, event: &InputEvent) -> Option<Action> {
        match event {
            InputEvent::ButtonActivated(button) => Some(button.action()),
            InputEvent::KeyDown(key) => {
                if self.key_held {
                    trace!(%key, "key down suppressed while latch is held");
                    return None;
                }
                self.key_held = true;
                debug!(%key, "key down");
                self.bindings.resolve(key)
            }
            InputEvent::KeyUp(key) => {
                debug!(%key, "key up");
                self.key_held = false;
                None
            }
        }
    }
}

struct Listener {
    source: InputSource,
    tx: mpsc::UnboundedSender<InputEvent>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: HashMap<u64, Listener>,
}

fn lock(inner: &Mutex<BusInner>) -> MutexGuard<'_, BusInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out point between input devices and whoever is listening.
#[derive(Clone, Default)]
pub struct InputBus {
    inner: Arc<Mutex<BusInner>>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `source`. The registration lives exactly as
    /// long as the returned subscription.
    pub fn subscribe(&self, source: InputSource) -> InputSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Listener { source, tx });
        debug!(id, ?source, "input listener registered");
        InputSubscription {
            id,
            source,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `event` to every listener of its source and returns how many
    /// were reached.
    pub fn publish(&self, event: InputEvent) -> usize {
        let source = event.source();
        let inner = lock(&self.inner);
        let mut delivered = 0;
        for listener in inner.listeners.values() {
            if listener.source == source && listener.tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

pub struct InputSubscription {
    id: u64,
    source: InputSource,
    rx: mpsc::UnboundedReceiver<InputEvent>,
    bus: Weak<Mutex<BusInner>>,
}

impl InputSubscription {
    pub fn source(&self) -> InputSource {
        self.source
    }

    pub async fn recv(&mut self) -> Option<InputEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            lock(&inner).listeners.remove(&self.id);
            debug!(id = self.id, source = ?self.source, "input listener removed");
        }
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
