//! Movement system - advances path followers and animates idle hovering

use hecs::{Entity, World};
use outpost_logic::capability::Movable;
use outpost_logic::movement::Advance;

use crate::components::{Airborne, Garrisoned, Heading, Hover, PathFollower, Position};

/// Advance every moving, non-garrisoned unit by `delta_seconds`.
///
/// Returns the units whose path completed this tick, in iteration order.
pub fn movement_system(world: &mut World, delta_seconds: f32) -> Vec<Entity> {
    let mut completed = Vec::new();

    for (entity, (mover, pos, heading, airborne, garrisoned)) in world.query_mut::<(
        &mut PathFollower,
        &mut Position,
        &mut Heading,
        Option<&Airborne>,
        Option<&Garrisoned>,
    )>() {
        if garrisoned.is_some() || !mover.is_moving() {
            continue;
        }
        let altitude = airborne.map(|a| a.altitude);
        if mover.advance(&mut pos.0, &mut heading.0, delta_seconds, altitude) == Advance::Completed
        {
            log::debug!("{entity:?} completed its path");
            completed.push(entity);
        }
    }

    completed
}

/// Bob idle airborne units around their cruise height.
///
/// Runs before [`movement_system`] so a unit either moves or bobs in a tick,
/// never both.
pub fn hover_system(world: &mut World, delta_seconds: f32) {
    for (_, (hover, pos, mover, garrisoned)) in world.query_mut::<(
        &mut Hover,
        &mut Position,
        Option<&PathFollower>,
        Option<&Garrisoned>,
    )>() {
        if garrisoned.is_some() || mover.is_some_and(|m| m.is_moving()) {
            continue;
        }
        pos.0.y = hover.tick(delta_seconds);
    }
}
