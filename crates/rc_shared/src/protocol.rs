//! JSON command frames understood by the actuator.
//!
//! Every command is a flat object with one-letter keys. The family is told
//! apart by a flag key that is always literally `true`: `w` for drive, `h` for
//! head and `f` for fire.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{domain::HeadAngle, error::FrameError};

/// Family flag. Serializes as `true` and only decodes from `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag;

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if bool::deserialize(deserializer)? {
            Ok(Flag)
        } else {
            Err(de::Error::custom("command flag must be true"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriveCommand {
    #[serde(rename = "w")]
    pub flag: Flag,
    /// Envelope after which the actuator stops on its own.
    #[serde(rename = "e")]
    pub envelope_ms: u32,
    /// Signed forward/backward speed.
    #[serde(rename = "s")]
    pub speed: i32,
    /// Signed steering offset, roughly `-1000..=1000`.
    #[serde(rename = "d")]
    pub steer: i32,
    /// How long the steering offset is held.
    #[serde(rename = "t")]
    pub turn_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadCommand {
    #[serde(rename = "h")]
    pub flag: Flag,
    #[serde(rename = "a")]
    pub angle: HeadAngle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FireCommand {
    #[serde(rename = "f")]
    pub flag: Flag,
    #[serde(rename = "e")]
    pub envelope_ms: u32,
    /// Loop count; negative values are a sentinel understood by the actuator.
    #[serde(rename = "l")]
    pub loops: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Drive(DriveCommand),
    Head(HeadCommand),
    Fire(FireCommand),
}

impl Command {
    pub fn drive(envelope_ms: u32, speed: i32, steer: i32, turn_ms: u32) -> Self {
        Command::Drive(DriveCommand {
            flag: Flag,
            envelope_ms,
            speed,
            steer,
            turn_ms,
        })
    }

    pub fn head(angle: HeadAngle) -> Self {
        Command::Head(HeadCommand { flag: Flag, angle })
    }

    pub fn fire(envelope_ms: u32, loops: i32) -> Self {
        Command::Fire(FireCommand {
            flag: Flag,
            envelope_ms,
            loops,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::Drive(_) => "drive",
            Command::Head(_) => "head",
            Command::Fire(_) => "fire",
        }
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_frame(frame: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(frame)?)
    }
}
