//! The controlling view: input subscriptions plus the per-view state
//! (key latch and head angle) that turns input into commands.

use rc_shared::{
    domain::{Action, HeadAngle},
    protocol::Command,
};
use tracing::{debug, warn};

use crate::{
    encoder::CommandEncoder,
    error::SendError,
    head::HeadTracker,
    input::{InputBus, InputEvent, InputRouter, InputSource, InputSubscription},
    link::{LinkSession, Transport},
    profile::ControlProfile,
};

#[derive(Debug)]
pub enum DispatchOutcome {
    /// The event did not resolve to an action.
    Ignored,
    Sent(Command),
    /// The link refused the command; it is not queued or retried.
    Dropped { command: Command, error: SendError },
}

/// Mounting acquires one pointer and one keyboard listener; dropping the view
/// releases both. The link session is borrowed per dispatch and is left
/// running when the view goes away.
pub struct ControllerView {
    router: InputRouter,
    encoder: CommandEncoder,
    head: HeadTracker,
    pointer: InputSubscription,
    keyboard: InputSubscription,
}

impl ControllerView {
    pub fn mount(bus: &InputBus, profile: ControlProfile) -> Self {
        let head = HeadTracker::new(profile.head.initial);
        let router = InputRouter::new(profile.keys.clone());
        debug!(bindings = router.bindings().len(), "controller view mounted");
        Self {
            router,
            encoder: CommandEncoder::new(profile),
            head,
            pointer: bus.subscribe(InputSource::Pointer),
            keyboard: bus.subscribe(InputSource::Keyboard),
        }
    }

    pub fn head_angle(&self) -> HeadAngle {
        self.head.angle()
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Next event from either listener, in delivery order per source.
    /// `None` once the bus is gone.
    pub async fn next_event(&mut self) -> Option<InputEvent> {
        tokio::select! {
            Some(event) = self.pointer.recv() => Some(event),
            Some(event) = self.keyboard.recv() => Some(event),
            else => None,
        }
    }

    /// Encodes `action` and, for head actions, stores the new angle in the
    /// same step.
    pub fn command_for(&mut self, action: Action) -> Command {
        let command = self.encoder.encode(action, self.head.angle());
        if let Command::Head(head) = &command {
            self.head.commit(head.angle);
        }
        command
    }

    pub fn dispatch<T: Transport>(
        &mut self,
        session: &mut LinkSession<T>,
        event: &InputEvent,
    ) -> DispatchOutcome {
        let Some(action) = self.router.route(event) else {
            return DispatchOutcome::Ignored;
        };
        let command = self.command_for(action);
        match session.send(&command) {
            Ok(()) => DispatchOutcome::Sent(command),
            Err(error) => {
                warn!(?action, %error, "command dropped");
                DispatchOutcome::Dropped { command, error }
            }
        }
    }
}

impl Drop for ControllerView {
    fn drop(&mut self) {
        debug!("controller view unmounted; link session left running");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
