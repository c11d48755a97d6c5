//! Battlefield - main entry point for running the simulation

use std::sync::Arc;

use hecs::{Entity, EntityBuilder, World};
use outpost_logic::capability::{GarrisonContainer, Movable, ResourceUser};
use outpost_logic::collaborators::{StatusSink, TerrainHeight};
use outpost_logic::commands::CommandCard;
use outpost_logic::config::{ConfigError, UnitProfile, UnitRoster};
use outpost_logic::garrison::GarrisonRefusal;

use crate::components::*;
use crate::systems::*;

/// Entity world plus the roster its units are spawned from.
pub struct Battlefield {
    /// ECS world containing all units
    pub world: World,
    pub(crate) roster: UnitRoster,
    profiles: Vec<Arc<UnitProfile>>,
    /// Simulation time in seconds since start
    sim_time: f64,
    time_scale: f32,
}

impl Battlefield {
    pub fn new(roster: UnitRoster) -> Self {
        let profiles = roster.units.iter().cloned().map(Arc::new).collect();
        Self {
            world: World::new(),
            roster,
            profiles,
            sim_time: 0.0,
            time_scale: 1.0,
        }
    }

    /// Battlefield using the roster shipped with the game.
    pub fn with_builtin_roster() -> Result<Self, ConfigError> {
        Ok(Self::new(UnitRoster::builtin()?))
    }

    pub fn roster(&self) -> &UnitRoster {
        &self.roster
    }

    /// Spawn a unit of `unit_type` at `position`.
    ///
    /// Capabilities come from the profile: a speed makes it movable, a
    /// flight profile makes it airborne at its cruise altitude, and so on.
    pub fn spawn(&mut self, unit_type: &str, position: Vec3) -> Result<Entity, ConfigError> {
        let profile = self
            .profiles
            .iter()
            .find(|p| p.id == unit_type)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownUnit(unit_type.to_string()))?;

        let mut builder = EntityBuilder::new();
        let mut position = position;

        if let Some(flight) = &profile.flight {
            position.y = flight.altitude;
            builder.add(Airborne {
                altitude: flight.altitude,
            });
            builder.add(Hover::new(
                flight.altitude,
                flight.bob_frequency,
                flight.bob_amplitude,
            ));
        }
        if let Some(speed) = profile.speed {
            builder.add(PathFollower::new(speed));
        }
        if let Some(g) = &profile.garrison {
            builder.add(Garrison::new(g.capacity, g.boarding, g.unload_radius));
        }
        if let Some(e) = &profile.energy {
            builder.add(EnergyPool::new(e.initial, e.max, e.regen_rate));
        }
        builder.add(Position(position));
        builder.add(Heading(0.0));
        builder.add(Health::new(profile.max_health));
        builder.add(Presence::default());
        builder.add(UnitType(profile.clone()));

        let entity = self.world.spawn(builder.build());
        log::debug!("spawned {} {:?} at {:?}", profile.name, entity, position);
        Ok(entity)
    }

    /// Remove a unit. A container releases its occupants first, and a
    /// garrisoned unit is dropped from its container.
    pub fn despawn(&mut self, entity: Entity, terrain: &dyn TerrainHeight) -> bool {
        if !self.world.contains(entity) {
            return false;
        }
        unload_all(&mut self.world, entity, terrain);
        if let Some(container) = self.garrisoned_in(entity) {
            if let Ok(mut garrison) = self.world.get::<&mut Garrison>(container) {
                garrison.forget(entity);
            }
        }
        self.world.despawn(entity).is_ok()
    }

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) {
        let scaled_delta = delta_seconds * self.time_scale;
        self.sim_time += scaled_delta as f64;

        energy_system(&mut self.world, scaled_delta);
        hover_system(&mut self.world, scaled_delta);
        let arrived = movement_system(&mut self.world, scaled_delta);
        garrison_arrivals(&mut self.world, &arrived);
    }

    /// Give a unit a new path. Ignored for garrisoned and immobile units.
    /// Cancels any pending boarding order.
    pub fn set_path(&mut self, entity: Entity, waypoints: Vec<Vec3>) -> bool {
        if self.garrisoned_in(entity).is_some() {
            log::debug!("{entity:?} is garrisoned; path ignored");
            return false;
        }
        let Ok(mut mover) = self.world.get::<&mut PathFollower>(entity) else {
            return false;
        };
        mover.set_path(waypoints);
        drop(mover);
        let _ = self.world.remove_one::<GarrisonOrder>(entity);
        true
    }

    pub fn stop(&mut self, entity: Entity) -> bool {
        self.set_path(entity, Vec::new())
    }

    /// Mark a unit selected. Garrisoned units cannot be selected.
    pub fn set_selected(&mut self, entity: Entity, selected: bool) {
        if let Ok(mut presence) = self.world.get::<&mut Presence>(entity) {
            presence.selected = selected && presence.visible;
        }
    }

    pub fn set_health(&mut self, entity: Entity, value: f32) {
        if let Ok(mut health) = self.world.get::<&mut Health>(entity) {
            health.set(value);
        }
    }

    // ---- garrison ----

    /// Load `candidate` into `container`; false if refused.
    pub fn add_unit(&mut self, container: Entity, candidate: Entity) -> bool {
        self.try_add_unit(container, candidate).is_ok()
    }

    pub fn try_add_unit(
        &mut self,
        container: Entity,
        candidate: Entity,
    ) -> Result<(), GarrisonRefusal> {
        try_add_unit(&mut self.world, container, candidate)
    }

    pub fn unload_all(&mut self, container: Entity, terrain: &dyn TerrainHeight) -> usize {
        unload_all(&mut self.world, container, terrain)
    }

    pub fn spawn_points(&self, container: Entity, terrain: &dyn TerrainHeight) -> Vec<Vec3> {
        spawn_points(&self.world, container, terrain)
    }

    pub fn order_garrison(
        &mut self,
        units: &[Entity],
        container: Entity,
        status: &mut dyn StatusSink,
    ) -> usize {
        order_garrison(&mut self.world, units, container, status)
    }

    // ---- queries ----

    /// The unit's command card in its current garrison state.
    pub fn command_card(&self, entity: Entity) -> Option<CommandCard> {
        let unit_type = self.world.get::<&UnitType>(entity).ok()?;
        let garrison = self.world.get::<&Garrison>(entity).ok();
        let container = garrison.as_deref().map(|g| g as &dyn GarrisonContainer);
        Some(self.roster.card_for(&unit_type.0, container))
    }

    pub fn state(&self, entity: Entity) -> Option<MoveState> {
        self.world.get::<&PathFollower>(entity).ok().map(|m| m.state())
    }

    pub fn position(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn energy(&self, entity: Entity) -> Option<f32> {
        self.world.get::<&EnergyPool>(entity).ok().map(|e| e.energy())
    }

    /// Passengers of `container` in load order; empty for non-containers.
    pub fn occupants(&self, container: Entity) -> Vec<Entity> {
        self.world
            .get::<&Garrison>(container)
            .map(|g| g.occupants().to_vec())
            .unwrap_or_default()
    }

    pub fn garrisoned_in(&self, entity: Entity) -> Option<Entity> {
        self.world
            .get::<&Garrisoned>(entity)
            .ok()
            .map(|g| g.container)
    }

    pub fn is_visible(&self, entity: Entity) -> bool {
        self.world
            .get::<&Presence>(entity)
            .map(|p| p.visible)
            .unwrap_or(false)
    }

    /// Number of live units
    pub fn unit_count(&self) -> usize {
        self.world.query::<&UnitType>().iter().count()
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}
