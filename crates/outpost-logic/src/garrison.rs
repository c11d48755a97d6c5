//! Capacity-bounded garrisons and radial unload layout.
//!
//! A [`Garrison`] stores passenger handles in load order. It never owns the
//! passengers themselves; the engine keeps them in its world and only the
//! handles live here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::GarrisonContainer;
use crate::vector::Vec3;

/// Who may board a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardingPolicy {
    /// Transports: units with their own flight capability are refused.
    GroundOnly,
    /// Fortified structures: no capability restriction.
    Any,
}

/// Why a unit could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GarrisonRefusal {
    #[error("garrison is full ({capacity} units)")]
    Full { capacity: usize },
    #[error("only ground units can board this transport")]
    AirborneCandidate,
    #[error("unit is already garrisoned")]
    AlreadyGarrisoned,
    #[error("unit cannot be garrisoned")]
    NotGarrisonable,
    #[error("no such unit")]
    Missing,
}

/// Occupant list of a container, generic over the passenger handle type.
#[derive(Debug, Clone)]
pub struct Garrison<H> {
    capacity: usize,
    boarding: BoardingPolicy,
    unload_radius: f32,
    occupants: Vec<H>,
}

impl<H: Copy + PartialEq> Garrison<H> {
    pub fn new(capacity: usize, boarding: BoardingPolicy, unload_radius: f32) -> Self {
        Self {
            capacity,
            boarding,
            unload_radius,
            occupants: Vec::new(),
        }
    }

    /// Occupants in load order.
    pub fn occupants(&self) -> &[H] {
        &self.occupants
    }

    pub fn contains(&self, handle: H) -> bool {
        self.occupants.contains(&handle)
    }

    /// Append `handle` if the container admits it. Nothing changes on refusal.
    pub fn board(&mut self, handle: H, airborne: bool) -> Result<(), GarrisonRefusal> {
        if self.contains(handle) {
            return Err(GarrisonRefusal::AlreadyGarrisoned);
        }
        self.admits(airborne)?;
        self.occupants.push(handle);
        Ok(())
    }

    /// Remove and return every occupant, preserving load order.
    pub fn drain(&mut self) -> Vec<H> {
        std::mem::take(&mut self.occupants)
    }

    /// Drop a single handle (used when a passenger is despawned).
    pub fn forget(&mut self, handle: H) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|h| *h != handle);
        self.occupants.len() != before
    }
}

impl<H> GarrisonContainer for Garrison<H> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn occupied(&self) -> usize {
        self.occupants.len()
    }

    fn boarding(&self) -> BoardingPolicy {
        self.boarding
    }

    fn unload_radius(&self) -> f32 {
        self.unload_radius
    }
}

/// `count` points on a circle of `radius` around `center`, at angles
/// `i / max(count, 1) * 2π`. Heights equal `center.y`.
pub fn ring_layout(center: Vec3, radius: f32, count: usize) -> Vec<Vec3> {
    let n = count.max(1) as f32;
    (0..count)
        .map(|i| {
            let angle = (i as f32 / n) * std::f32::consts::TAU;
            Vec3::new(
                center.x + radius * angle.cos(),
                center.y,
                center.z + radius * angle.sin(),
            )
        })
        .collect()
}
