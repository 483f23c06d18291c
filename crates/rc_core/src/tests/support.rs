use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    config::SharedSecret,
    error::TransportError,
    link::{LinkSession, Transport, TransportEvent},
};

pub const TEST_SECRET: &str = "test-shared-secret";

/// Records transmitted frames; readiness and failure can be flipped from the
/// test through the shared handles.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub frames: Rc<RefCell<Vec<String>>>,
    pub writable: Rc<Cell<bool>>,
    pub fail_transmit: Rc<Cell<bool>>,
    pub transmit_calls: Rc<Cell<usize>>,
}

impl RecordingTransport {
    pub fn writable() -> Self {
        let transport = Self::default();
        transport.writable.set(true);
        transport
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn is_writable(&self) -> bool {
        self.writable.get()
    }

    fn transmit(&mut self, frame: String) -> Result<(), TransportError> {
        self.transmit_calls.set(self.transmit_calls.get() + 1);
        if self.fail_transmit.get() {
            return Err(TransportError::Closed);
        }
        self.frames.borrow_mut().push(frame);
        Ok(())
    }
}

pub fn secret() -> SharedSecret {
    SharedSecret::new(TEST_SECRET).expect("secret")
}

pub fn open_session() -> (LinkSession<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::writable();
    let mut session = LinkSession::new(transport.clone(), secret());
    session.handle_event(TransportEvent::Opened);
    (session, transport)
}
