//! Plain-data views of units for the presentation layer

use hecs::Entity;
use outpost_logic::capability::{GarrisonContainer, ResourceUser};
use outpost_logic::commands::CommandCard;
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::engine::Battlefield;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GarrisonSnapshot {
    pub occupied: usize,
    pub capacity: usize,
}

/// Everything a panel or renderer needs to draw one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: u64,
    pub unit_type: String,
    pub name: String,
    pub state: MoveState,
    pub position: Vec3,
    pub heading: f32,
    pub health: f32,
    pub max_health: f32,
    pub energy: Option<f32>,
    pub max_energy: Option<f32>,
    pub garrison: Option<GarrisonSnapshot>,
    /// Id of the container this unit is loaded into.
    pub garrisoned_in: Option<u64>,
    pub visible: bool,
    pub selected: bool,
    pub command_card: CommandCard,
}

impl Battlefield {
    pub fn snapshot(&self, entity: Entity) -> Option<UnitSnapshot> {
        let unit_type = self.world.get::<&UnitType>(entity).ok()?;
        let position = self.world.get::<&Position>(entity).ok()?.0;
        let heading = self.world.get::<&Heading>(entity).map(|h| h.0).unwrap_or(0.0);
        let health = self
            .world
            .get::<&Health>(entity)
            .map(|h| *h)
            .unwrap_or_else(|_| Health::new(unit_type.0.max_health));
        let presence = self
            .world
            .get::<&Presence>(entity)
            .map(|p| *p)
            .unwrap_or_default();
        let pool = self.world.get::<&EnergyPool>(entity).ok().map(|p| *p);
        let garrison = self
            .world
            .get::<&Garrison>(entity)
            .ok()
            .map(|g| GarrisonSnapshot {
                occupied: g.occupied(),
                capacity: g.capacity(),
            });

        Some(UnitSnapshot {
            id: entity.to_bits().get(),
            unit_type: unit_type.id().to_string(),
            name: unit_type.name().to_string(),
            state: self.state(entity).unwrap_or_default(),
            position,
            heading,
            health: health.current(),
            max_health: health.max(),
            energy: pool.map(|p| p.energy()),
            max_energy: pool.map(|p| p.max_energy()),
            garrison,
            garrisoned_in: self.garrisoned_in(entity).map(|c| c.to_bits().get()),
            visible: presence.visible,
            selected: presence.selected,
            command_card: self.command_card(entity).unwrap_or_default(),
        })
    }

    /// Snapshots of every unit, ordered by id.
    pub fn snapshot_all(&self) -> Vec<UnitSnapshot> {
        let entities: Vec<Entity> = self
            .world
            .query::<&UnitType>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        let mut snapshots: Vec<_> = entities
            .into_iter()
            .filter_map(|e| self.snapshot(e))
            .collect();
        snapshots.sort_by_key(|s| s.id);
        snapshots
    }
}
