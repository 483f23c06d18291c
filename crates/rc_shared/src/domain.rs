use serde::{Deserialize, Serialize};

/// Exclusive upper bound of the head axis.
pub const HEAD_ANGLE_RANGE: i32 = 2000;

/// Absolute aim position of the actuator's secondary axis, always in `[0, 2000)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct HeadAngle(u16);

impl HeadAngle {
    pub const MIN: HeadAngle = HeadAngle(0);
    pub const CENTER: HeadAngle = HeadAngle(1000);

    pub fn new(value: i32) -> Option<Self> {
        if (0..HEAD_ANGLE_RANGE).contains(&value) {
            Some(Self(value as u16))
        } else {
            None
        }
    }

    pub fn get(self) -> i32 {
        i32::from(self.0)
    }

    /// Moves the angle by `offset`. The upper bound wraps modulo the range while
    /// a negative result clamps to zero instead of wrapping.
    pub fn offset_by(self, offset: i32) -> Self {
        let next = (i64::from(self.get()) + i64::from(offset)) % i64::from(HEAD_ANGLE_RANGE);
        Self(next.max(0) as u16)
    }
}

impl Default for HeadAngle {
    fn default() -> Self {
        Self::CENTER
    }
}

impl TryFrom<i32> for HeadAngle {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| format!("head angle {value} outside [0, {HEAD_ANGLE_RANGE})"))
    }
}

impl From<HeadAngle> for i32 {
    fn from(value: HeadAngle) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// User intent before it is encoded into a wire command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    DriveForward,
    DriveBackward,
    DriveLeft,
    DriveRight,
    Fire,
    HeadUp,
    HeadDown,
}

impl Action {
    pub fn drive(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Action::DriveForward,
            Direction::Backward => Action::DriveBackward,
            Direction::Left => Action::DriveLeft,
            Direction::Right => Action::DriveRight,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::DriveForward => Some(Direction::Forward),
            Action::DriveBackward => Some(Direction::Backward),
            Action::DriveLeft => Some(Direction::Left),
            Action::DriveRight => Some(Direction::Right),
            Action::Fire | Action::HeadUp | Action::HeadDown => None,
        }
    }
}
