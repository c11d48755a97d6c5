//! Capability traits that unit variants opt into.
//!
//! A unit never asks "what kind of unit is this?". It asks whether a
//! capability is present and talks to it through one of these traits:
//!
//! | Trait | Implemented by | Meaning |
//! |-------|----------------|---------|
//! | [`Movable`] | [`PathFollower`](crate::movement::PathFollower) | Follows a precomputed waypoint path |
//! | [`GarrisonContainer`] | [`Garrison`](crate::garrison::Garrison) | Holds other units up to a fixed capacity |
//! | [`ResourceUser`] | [`EnergyPool`](crate::energy::EnergyPool) | Spends a regenerating pool on abilities |

use crate::abilities::AbilityRefusal;
use crate::collaborators::TerrainHeight;
use crate::garrison::{ring_layout, BoardingPolicy, GarrisonRefusal};
use crate::movement::{Advance, MoveState};
use crate::vector::Vec3;

/// Something that walks or flies along a waypoint path.
pub trait Movable {
    /// Replace the current path. An empty path stops the unit immediately.
    fn set_path(&mut self, waypoints: Vec<Vec3>);

    /// Step along the path by `dt` seconds.
    ///
    /// `altitude` pins the vertical coordinate of every waypoint for
    /// airborne units.
    fn advance(
        &mut self,
        position: &mut Vec3,
        heading: &mut f32,
        dt: f32,
        altitude: Option<f32>,
    ) -> Advance;

    fn state(&self) -> MoveState;

    fn is_moving(&self) -> bool {
        self.state() == MoveState::Moving
    }

    fn stop(&mut self) {
        self.set_path(Vec::new());
    }
}

/// A transport or fortified structure that units can be loaded into.
pub trait GarrisonContainer {
    fn capacity(&self) -> usize;
    fn occupied(&self) -> usize;
    fn boarding(&self) -> BoardingPolicy;
    fn unload_radius(&self) -> f32;

    fn is_full(&self) -> bool {
        self.occupied() >= self.capacity()
    }

    fn free_slots(&self) -> usize {
        self.capacity().saturating_sub(self.occupied())
    }

    /// Capacity and boarding-policy check for a prospective passenger.
    fn admits(&self, airborne: bool) -> Result<(), GarrisonRefusal> {
        if self.is_full() {
            return Err(GarrisonRefusal::Full {
                capacity: self.capacity(),
            });
        }
        if airborne && self.boarding() == BoardingPolicy::GroundOnly {
            return Err(GarrisonRefusal::AirborneCandidate);
        }
        Ok(())
    }

    /// Unload positions, one per occupant, on a ring around `center`.
    ///
    /// With `terrain` present every point is dropped onto the ground
    /// (airborne containers); otherwise points share `center.y`.
    fn spawn_points(&self, center: Vec3, terrain: Option<&dyn TerrainHeight>) -> Vec<Vec3> {
        let mut points = ring_layout(center, self.unload_radius(), self.occupied());
        if let Some(terrain) = terrain {
            for p in &mut points {
                p.y = terrain.height(p.x, p.z);
            }
        }
        points
    }
}

/// Owner of a bounded, regenerating resource pool.
pub trait ResourceUser {
    fn energy(&self) -> f32;
    fn max_energy(&self) -> f32;

    /// Add `dt` seconds of regeneration, never past the maximum.
    fn regenerate(&mut self, dt: f32);

    /// Deduct exactly `cost`, or refuse without touching the pool.
    fn try_spend(&mut self, cost: f32) -> Result<(), AbilityRefusal>;

    fn can_afford(&self, cost: f32) -> bool {
        self.energy() >= cost
    }
}
