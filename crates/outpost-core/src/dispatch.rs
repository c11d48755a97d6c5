//! Command dispatch - routes a command id to the capability that owns it

use hecs::Entity;
use outpost_logic::abilities::execute_ability;
use outpost_logic::capability::ResourceUser;
use outpost_logic::collaborators::CommandContext;
use outpost_logic::commands::CommandId;

use crate::components::{EnergyPool, Garrison, UnitType};
use crate::engine::Battlefield;
use crate::systems::{unit_name, unload_all};

impl Battlefield {
    /// Execute `command` for one unit. Returns true if it took effect.
    ///
    /// Commands a unit has no capability for are ignored, as is every
    /// command sent to a garrisoned unit. Move, Patrol and Attack need a
    /// target picked by the presentation layer and do nothing here.
    pub fn execute_command(
        &mut self,
        entity: Entity,
        command: CommandId,
        ctx: &mut CommandContext<'_>,
    ) -> bool {
        if !self.world.contains(entity) || self.garrisoned_in(entity).is_some() {
            log::debug!("{command:?} ignored for {entity:?}");
            return false;
        }

        match command {
            CommandId::Stop | CommandId::Hold => self.stop(entity),
            CommandId::UnloadAll => {
                if self.world.get::<&Garrison>(entity).is_err() {
                    return false;
                }
                if unload_all(&mut self.world, entity, ctx.terrain) > 0 {
                    ctx.status.report("Units unloaded.");
                    true
                } else {
                    let name = unit_name(&self.world, entity);
                    ctx.status.report(&format!("{name} is empty."));
                    false
                }
            }
            CommandId::Move | CommandId::Patrol | CommandId::Attack => false,
            CommandId::DefensiveMatrix | CommandId::EmpShockwave | CommandId::Irradiate => {
                self.cast(entity, command, ctx)
            }
        }
    }

    fn cast(&mut self, entity: Entity, command: CommandId, ctx: &mut CommandContext<'_>) -> bool {
        let Some(ability) = command.ability() else {
            return false;
        };
        let knows = self
            .world
            .get::<&UnitType>(entity)
            .map(|t| t.0.abilities.contains(&ability))
            .unwrap_or(false);
        let (Some(spec), Some(position)) = (self.roster.ability(ability), self.position(entity))
        else {
            return false;
        };
        if !knows {
            log::debug!("{entity:?} cannot cast {}", spec.name);
            return false;
        }
        let Ok(mut pool) = self.world.get::<&mut EnergyPool>(entity) else {
            return false;
        };

        match execute_ability(spec, &mut *pool, position, ctx) {
            Ok(()) => {
                log::info!(
                    "{:?} cast {} ({:.1} energy left)",
                    entity,
                    spec.name,
                    pool.energy()
                );
                true
            }
            Err(refusal) => {
                log::debug!("{:?} could not cast {}: {}", entity, spec.name, refusal);
                false
            }
        }
    }

    /// Execute `command` for every unit in `selection`.
    ///
    /// The first unit stands in for the group: when the command is not on
    /// its current card, nothing happens. Returns how many units acted.
    pub fn execute_for_selection(
        &mut self,
        selection: &[Entity],
        command: CommandId,
        ctx: &mut CommandContext<'_>,
    ) -> usize {
        let Some(&first) = selection.first() else {
            return 0;
        };
        let offered = self
            .command_card(first)
            .is_some_and(|card| card.contains(command));
        if !offered {
            log::debug!("{command:?} not on the card of {first:?}");
            return 0;
        }

        selection
            .iter()
            .filter(|&&unit| self.execute_command(unit, command, ctx))
            .count()
    }
}
