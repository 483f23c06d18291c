//! Per-deployment control tables.
//!
//! Drive constants, fire parameters, head stepping and keyboard bindings vary
//! between deployments, so they are data loaded from TOML rather than
//! constants baked into the encoder.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use rc_shared::domain::{Action, Direction, HeadAngle, HEAD_ANGLE_RANGE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const STEER_LIMIT: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriveParams {
    pub speed: i32,
    pub steer: i32,
    pub turn_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveTable {
    pub forward: DriveParams,
    pub backward: DriveParams,
    pub left: DriveParams,
    pub right: DriveParams,
}

impl DriveTable {
    pub fn get(&self, direction: Direction) -> DriveParams {
        match direction {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

impl Default for DriveTable {
    fn default() -> Self {
        Self {
            forward: DriveParams {
                speed: 500,
                steer: 0,
                turn_ms: 400,
            },
            backward: DriveParams {
                speed: -500,
                steer: 0,
                turn_ms: 400,
            },
            left: DriveParams {
                speed: 50,
                steer: -1000,
                turn_ms: 100,
            },
            right: DriveParams {
                speed: 50,
                steer: 1000,
                turn_ms: 100,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FireParams {
    pub envelope_ms: u32,
    /// `-1` keeps firing until the envelope expires.
    pub loops: i32,
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            envelope_ms: 1300,
            loops: -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadParams {
    pub initial: HeadAngle,
    pub step: i32,
}

impl Default for HeadParams {
    fn default() -> Self {
        Self {
            initial: HeadAngle::CENTER,
            step: 20,
        }
    }
}

/// Key identifier as reported by the input device, e.g. `"w"` or `"ArrowUp"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn char(c: char) -> Self {
        Self(c.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeymapPreset {
    Full,
    DriveOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<Key, Action>);

impl KeyBindings {
    pub fn preset(preset: KeymapPreset) -> Self {
        match preset {
            KeymapPreset::Full => Self::full(),
            KeymapPreset::DriveOnly => Self::drive_only(),
        }
    }

    /// `w`/`s`/`a`/`d` drive, `f` fires, `t`/`g` move the head.
    pub fn full() -> Self {
        let mut bindings = Self::drive_only();
        bindings.bind(Key::char('f'), Action::Fire);
        bindings.bind(Key::char('t'), Action::HeadUp);
        bindings.bind(Key::char('g'), Action::HeadDown);
        bindings
    }

    pub fn drive_only() -> Self {
        Self(BTreeMap::from([
            (Key::char('w'), Action::DriveForward),
            (Key::char('s'), Action::DriveBackward),
            (Key::char('a'), Action::DriveLeft),
            (Key::char('d'), Action::DriveRight),
        ]))
    }

    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.0.insert(key, action)
    }

    pub fn resolve(&self, key: &Key) -> Option<Action> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, Action)> {
        self.0.iter().map(|(key, action)| (key, *action))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlProfile {
    pub drive_envelope_ms: u32,
    pub drive: DriveTable,
    pub fire: FireParams,
    pub head: HeadParams,
    pub keys: KeyBindings,
}

impl Default for ControlProfile {
    fn default() -> Self {
        Self {
            drive_envelope_ms: 5000,
            drive: DriveTable::default(),
            fire: FireParams::default(),
            head: HeadParams::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl ControlProfile {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let profile: Self = toml::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ProfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn with_keymap(mut self, preset: KeymapPreset) -> Self {
        self.keys = KeyBindings::preset(preset);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.head.step == 0 || self.head.step.unsigned_abs() >= HEAD_ANGLE_RANGE.unsigned_abs()
        {
            return Err(ConfigError::InvalidProfile(format!(
                "head.step must be non-zero and smaller than {HEAD_ANGLE_RANGE} in magnitude, got {}",
                self.head.step
            )));
        }
        for direction in Direction::ALL {
            let steer = self.drive.get(direction).steer;
            if !(-STEER_LIMIT..=STEER_LIMIT).contains(&steer) {
                return Err(ConfigError::InvalidProfile(format!(
                    "drive.{} steer {steer} outside [-{STEER_LIMIT}, {STEER_LIMIT}]",
                    direction.as_str()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/profile_tests.rs"]
mod tests;
