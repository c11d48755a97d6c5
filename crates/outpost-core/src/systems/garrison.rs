//! Garrison system - loading, unloading, and boarding orders
//!
//! These run on discrete commands, not every tick, except
//! [`garrison_arrivals`] which hands arriving units to their container.

use std::collections::HashSet;

use hecs::{Entity, World};
use outpost_logic::capability::{GarrisonContainer, Movable};
use outpost_logic::collaborators::{StatusSink, TerrainHeight};
use outpost_logic::garrison::{BoardingPolicy, GarrisonRefusal};

use crate::components::{
    Airborne, Garrison, GarrisonOrder, Garrisoned, PathFollower, Position, Presence, UnitType,
    Vec3,
};

/// Display name for status lines and logs.
pub(crate) fn unit_name(world: &World, entity: Entity) -> String {
    world
        .get::<&UnitType>(entity)
        .map(|t| t.name().to_string())
        .unwrap_or_else(|_| format!("{entity:?}"))
}

/// Load `candidate` into `container`.
///
/// On success the candidate is hidden, deselected, stopped, loses any
/// pending boarding order and gains a [`Garrisoned`] back-reference.
/// On refusal nothing changes.
pub fn try_add_unit(
    world: &mut World,
    container: Entity,
    candidate: Entity,
) -> Result<(), GarrisonRefusal> {
    if !world.contains(candidate) || !world.contains(container) {
        return Err(GarrisonRefusal::Missing);
    }
    if candidate == container || world.get::<&Garrison>(candidate).is_ok() {
        return Err(GarrisonRefusal::NotGarrisonable);
    }
    if world.get::<&Garrisoned>(candidate).is_ok() {
        return Err(GarrisonRefusal::AlreadyGarrisoned);
    }
    let airborne = world.get::<&Airborne>(candidate).is_ok();

    let (occupied, capacity) = {
        let mut garrison = world
            .get::<&mut Garrison>(container)
            .map_err(|_| GarrisonRefusal::NotGarrisonable)?;
        garrison.board(candidate, airborne)?;
        (garrison.occupied(), garrison.capacity())
    };

    if let Ok(mut presence) = world.get::<&mut Presence>(candidate) {
        presence.visible = false;
        presence.selected = false;
    }
    if let Ok(mut mover) = world.get::<&mut PathFollower>(candidate) {
        mover.stop();
    }
    let _ = world.remove_one::<GarrisonOrder>(candidate);
    let _ = world.insert_one(candidate, Garrisoned { container });

    log::info!(
        "{} loaded into {} ({}/{})",
        unit_name(world, candidate),
        unit_name(world, container),
        occupied,
        capacity
    );
    Ok(())
}

/// Unload positions for the current occupants of `container`.
///
/// Airborne containers drop every point onto the terrain; ground containers
/// keep their own height.
pub fn spawn_points(world: &World, container: Entity, terrain: &dyn TerrainHeight) -> Vec<Vec3> {
    let Ok(garrison) = world.get::<&Garrison>(container) else {
        return Vec::new();
    };
    let center = world
        .get::<&Position>(container)
        .map(|p| p.0)
        .unwrap_or_default();
    let airborne = world.get::<&Airborne>(container).is_ok();
    garrison.spawn_points(center, airborne.then_some(terrain))
}

/// Release every occupant of `container` onto its unload ring.
///
/// Returns how many units left. Safe on an empty garrison or a unit
/// without one.
pub fn unload_all(world: &mut World, container: Entity, terrain: &dyn TerrainHeight) -> usize {
    let points = spawn_points(world, container, terrain);
    if points.is_empty() {
        return 0;
    }
    let occupants = match world.get::<&mut Garrison>(container) {
        Ok(mut garrison) => garrison.drain(),
        Err(_) => return 0,
    };

    for (i, &unit) in occupants.iter().enumerate() {
        let spot = points[i % points.len()];
        if let Ok(mut pos) = world.get::<&mut Position>(unit) {
            pos.0 = spot;
        }
        if let Ok(mut presence) = world.get::<&mut Presence>(unit) {
            presence.visible = true;
        }
        if let Ok(mut mover) = world.get::<&mut PathFollower>(unit) {
            mover.stop();
        }
        let _ = world.remove_one::<Garrisoned>(unit);
    }

    log::info!(
        "{} unloaded {} units",
        unit_name(world, container),
        occupants.len()
    );
    occupants.len()
}

/// Order `units` to walk to `container` and board on arrival.
///
/// Only units that can be garrisoned, can move, are not already inside a
/// container and satisfy the container's boarding policy are eligible.
/// At most the container's free slots are ordered, in selection order.
/// Returns how many units were ordered.
pub fn order_garrison(
    world: &mut World,
    units: &[Entity],
    container: Entity,
    status: &mut dyn StatusSink,
) -> usize {
    let Ok((free, boarding)) = world
        .get::<&Garrison>(container)
        .map(|g| (g.free_slots(), g.boarding()))
    else {
        return 0;
    };
    let name = unit_name(world, container);
    if free == 0 {
        status.report(&format!("{name} is full."));
        return 0;
    }
    let target = world
        .get::<&Position>(container)
        .map(|p| p.0)
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let eligible: Vec<Entity> = units
        .iter()
        .copied()
        .filter(|&u| seen.insert(u))
        .filter(|&u| u != container && is_eligible(world, u, boarding))
        .collect();

    let ordered = &eligible[..eligible.len().min(free)];
    for &unit in ordered {
        let Ok(mut mover) = world.get::<&mut PathFollower>(unit) else {
            continue;
        };
        let ground_y = world.get::<&Position>(unit).map(|p| p.0.y).unwrap_or(target.y);
        mover.set_path(vec![target.with_y(ground_y)]);
        drop(mover);
        let _ = world.insert_one(unit, GarrisonOrder { container });
    }

    if ordered.len() < eligible.len() {
        status.report(&format!("Not enough space in {name} for all units."));
    }
    log::debug!("{} units ordered into {}", ordered.len(), name);
    ordered.len()
}

fn is_eligible(world: &World, unit: Entity, boarding: BoardingPolicy) -> bool {
    let garrisonable = world
        .get::<&UnitType>(unit)
        .map(|t| t.0.can_garrison)
        .unwrap_or(false);
    garrisonable
        && world.get::<&PathFollower>(unit).is_ok()
        && world.get::<&Garrisoned>(unit).is_err()
        && !(boarding == BoardingPolicy::GroundOnly && world.get::<&Airborne>(unit).is_ok())
}

/// Hand units that finished their path to the container they were ordered
/// into. A refusal leaves the unit idle where it stopped.
pub fn garrison_arrivals(world: &mut World, arrived: &[Entity]) {
    for &unit in arrived {
        let Ok(order) = world.remove_one::<GarrisonOrder>(unit) else {
            continue;
        };
        if let Err(refusal) = try_add_unit(world, order.container, unit) {
            log::warn!(
                "{} could not board {}: {}",
                unit_name(world, unit),
                unit_name(world, order.container),
                refusal
            );
        }
    }
}
