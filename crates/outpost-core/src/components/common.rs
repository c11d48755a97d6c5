//! Components every unit carries.

use std::sync::Arc;

use outpost_logic::config::UnitProfile;
use serde::{Deserialize, Serialize};

pub use outpost_logic::health::Health;
pub use outpost_logic::vector::Vec3;

/// World position, owned by the entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec3);

/// Yaw in radians; the model's forward axis points this way on the ground
/// plane.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Heading(pub f32);

/// Presentation hints. Neither field changes simulation behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Presence {
    pub visible: bool,
    pub selected: bool,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            visible: true,
            selected: false,
        }
    }
}

/// The roster profile a unit was spawned from.
#[derive(Debug, Clone)]
pub struct UnitType(pub Arc<UnitProfile>);

impl UnitType {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_default_visible() {
        let p = Presence::default();
        assert!(p.visible);
        assert!(!p.selected);
    }
}
