//! Hit points with the `0 <= current <= max` invariant.
//!
//! Damage and healing rules live outside this crate; callers only ever
//! write through [`Health::set`], which clamps.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Full health.
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    /// Health as a fraction of max in [0.0, 1.0].
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// At zero the owner is due for destruction.
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}
