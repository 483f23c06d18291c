use rc_shared::domain::HeadAngle;

/// `(current + offset) mod 2000`, with negative results clamped to zero.
pub fn apply_offset(current: HeadAngle, offset: i32) -> HeadAngle {
    current.offset_by(offset)
}

/// Owned head-angle state. Every change goes through `&mut self`, so offsets
/// are applied strictly in the order they are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadTracker {
    angle: HeadAngle,
}

impl HeadTracker {
    pub fn new(initial: HeadAngle) -> Self {
        Self { angle: initial }
    }

    pub fn angle(&self) -> HeadAngle {
        self.angle
    }

    pub fn apply_offset(&mut self, offset: i32) -> HeadAngle {
        self.angle = apply_offset(self.angle, offset);
        self.angle
    }

    pub(crate) fn commit(&mut self, angle: HeadAngle) {
        self.angle = angle;
    }
}

impl Default for HeadTracker {
    fn default() -> Self {
        Self::new(HeadAngle::CENTER)
    }
}

#[cfg(test)]
#[path = "tests/head_tests.rs"]
mod tests;
