//! Maps logical actions onto wire commands using the deployment's tables.

use rc_shared::{
    domain::{Action, Direction, HeadAngle},
    protocol::Command,
};

use crate::{head::apply_offset, profile::ControlProfile};

#[derive(Debug, Clone)]
pub struct CommandEncoder {
    profile: ControlProfile,
}

impl CommandEncoder {
    pub fn new(profile: ControlProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ControlProfile {
        &self.profile
    }

    /// Pure: the same action and angle always produce the same command. Head
    /// actions carry the angle that results from applying the step to `current`.
    pub fn encode(&self, action: Action, current: HeadAngle) -> Command {
        match action {
            Action::DriveForward => self.drive(Direction::Forward),
            Action::DriveBackward => self.drive(Direction::Backward),
            Action::DriveLeft => self.drive(Direction::Left),
            Action::DriveRight => self.drive(Direction::Right),
            Action::Fire => self.fire(),
            Action::HeadUp => self.head(apply_offset(current, self.profile.head.step)),
            Action::HeadDown => self.head(apply_offset(
                current,
                self.profile.head.step.saturating_neg(),
            )),
        }
    }

    pub fn drive(&self, direction: Direction) -> Command {
        let params = self.profile.drive.get(direction);
        Command::drive(
            self.profile.drive_envelope_ms,
            params.speed,
            params.steer,
            params.turn_ms,
        )
    }

    pub fn fire(&self) -> Command {
        Command::fire(self.profile.fire.envelope_ms, self.profile.fire.loops)
    }

    pub fn head(&self, angle: HeadAngle) -> Command {
        Command::head(angle)
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new(ControlProfile::default())
    }
}

#[cfg(test)]
#[path = "tests/encoder_tests.rs"]
mod tests;
