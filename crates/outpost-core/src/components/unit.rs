//! Capability components. A unit has a capability exactly when it carries
//! the matching component.

use hecs::Entity;
use serde::{Deserialize, Serialize};

pub use outpost_logic::energy::EnergyPool;
pub use outpost_logic::movement::{Hover, MoveState, PathFollower};

/// Container capability: passenger handles in load order.
pub type Garrison = outpost_logic::garrison::Garrison<Entity>;

/// Independent flight capability; cruises at `altitude`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Airborne {
    pub altitude: f32,
}

/// Present while a unit is loaded. Lookup only; the container owns the
/// relation through its [`Garrison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Garrisoned {
    pub container: Entity,
}

/// Standing order to board `container` once the current path completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarrisonOrder {
    pub container: Entity,
}
