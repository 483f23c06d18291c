//! Link session: lifecycle of the single actuator link and the guarded send.

use std::fmt;

use rc_shared::protocol::Command;
use tracing::{debug, error, info, warn};

use crate::{
    config::SharedSecret,
    error::{SendError, TransportError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkState::Connecting => "connecting",
            LinkState::Open => "open",
            LinkState::Closed => "closed",
        })
    }
}

/// Lifecycle notifications reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

/// Write half of a message-framed link.
pub trait Transport {
    /// Live readiness flag, independent of the session's own state.
    fn is_writable(&self) -> bool;

    fn transmit(&mut self, frame: String) -> Result<(), TransportError>;
}

/// Owns the transport exclusively. Every outbound frame goes through here.
///
/// `Closed` is terminal: reconnecting means building a new session.
pub struct LinkSession<T: Transport> {
    transport: T,
    secret: SharedSecret,
    state: LinkState,
    authenticated: bool,
    frames_sent: u64,
}

impl<T: Transport> LinkSession<T> {
    pub fn new(transport: T, secret: SharedSecret) -> Self {
        Self {
            transport,
            secret,
            state: LinkState::Connecting,
            authenticated: false,
            frames_sent: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open && self.transport.is_writable()
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Command frames transmitted so far, the authentication frame excluded.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.on_open(),
            TransportEvent::Message(text) => {
                debug!(state = %self.state, message = %text, "message from actuator");
            }
            TransportEvent::Error(reason) => {
                error!(state = %self.state, %reason, "link transport error");
                self.state = LinkState::Closed;
            }
            TransportEvent::Closed => {
                if self.state != LinkState::Closed {
                    info!(previous = %self.state, "link closed");
                }
                self.state = LinkState::Closed;
            }
        }
    }

    fn on_open(&mut self) {
        if self.state != LinkState::Connecting {
            warn!(state = %self.state, "ignoring open notification");
            return;
        }
        let frame = self.secret.expose().to_owned();
        let len = frame.len();
        match self.transport.transmit(frame) {
            Ok(()) => {
                self.authenticated = true;
                self.state = LinkState::Open;
                info!(bytes = len, "link open; authentication frame sent");
            }
            Err(err) => {
                error!(%err, "failed to send authentication frame");
                self.state = LinkState::Closed;
            }
        }
    }

    /// Transmits `command` if the link is open and the transport is writable.
    ///
    /// A closed or still-connecting link yields `LinkUnavailable` without
    /// touching the transport. Nothing is queued or retried.
    pub fn send(&mut self, command: &Command) -> Result<(), SendError> {
        if self.state != LinkState::Open || !self.transport.is_writable() {
            warn!(state = %self.state, kind = command.kind(), "link unavailable; command dropped");
            return Err(SendError::LinkUnavailable { state: self.state });
        }

        let frame = command.to_frame()?;
        if let Err(err) = self.transport.transmit(frame.clone()) {
            warn!(%err, kind = command.kind(), "transmit failed; command dropped");
            return Err(SendError::LinkUnavailable { state: self.state });
        }
        self.frames_sent += 1;
        debug!(%frame, "sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/link_tests.rs"]
mod tests;
