//! Unit roster: every per-type difference as data.
//!
//! Speed, flight altitude, garrison capacity and unload radius, energy
//! regeneration, abilities and command card layout all come from the roster.
//! Nothing in the simulation branches on a unit's name.
//!
//! The built-in roster is embedded from `data/unit_roster.json`.
//!
//! ```
//! use outpost_logic::config::UnitRoster;
//!
//! let roster = UnitRoster::builtin().unwrap();
//! assert!(roster.validate().is_empty());
//! let dropship = roster.profile("dropship").unwrap();
//! assert_eq!(dropship.garrison.as_ref().unwrap().capacity, 8);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abilities::{AbilityId, AbilitySpec};
use crate::capability::GarrisonContainer;
use crate::commands::{build_card, CardLayout, CommandCard, CommandId, CommandSpec};
use crate::garrison::BoardingPolicy;

const BUILTIN_ROSTER_JSON: &str = include_str!("../../../data/unit_roster.json");

/// Smallest and largest allowed command card.
pub const MIN_CARD_SIZE: usize = 8;
pub const MAX_CARD_SIZE: usize = 12;

/// Largest garrison a roster may declare.
pub const MAX_GARRISON_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unit roster JSON error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid unit roster: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("unknown unit type '{0}'")]
    UnknownUnit(String),
}

/// Airborne units cruise at a fixed altitude and bob while idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightProfile {
    pub altitude: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarrisonProfile {
    pub capacity: usize,
    pub unload_radius: f32,
    pub boarding: BoardingPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub initial: f32,
    pub max: f32,
    pub regen_rate: f32,
}

/// Configuration for one unit type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitProfile {
    pub id: String,
    pub name: String,
    pub max_health: f32,
    /// Movement speed in units/second. `None` for immobile structures.
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub flight: Option<FlightProfile>,
    #[serde(default)]
    pub garrison: Option<GarrisonProfile>,
    #[serde(default)]
    pub energy: Option<EnergyProfile>,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    /// Whether this unit can itself be loaded into a container.
    #[serde(default)]
    pub can_garrison: bool,
    pub card: CardLayout,
}

/// Command catalog, ability catalog and unit profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRoster {
    pub commands: Vec<CommandSpec>,
    #[serde(default)]
    pub abilities: Vec<AbilitySpec>,
    pub units: Vec<UnitProfile>,
}

impl UnitRoster {
    /// The roster shipped with the game.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_ROSTER_JSON)
    }

    /// Parse and validate a roster.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let roster: UnitRoster = serde_json::from_str(json)?;
        let problems = roster.validate();
        if problems.is_empty() {
            Ok(roster)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    pub fn profile(&self, id: &str) -> Option<&UnitProfile> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn command(&self, id: CommandId) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn ability(&self, id: AbilityId) -> Option<&AbilitySpec> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Build the command card for `profile` in its current garrison state.
    pub fn card_for(
        &self,
        profile: &UnitProfile,
        garrison: Option<&dyn GarrisonContainer>,
    ) -> CommandCard {
        build_card(&profile.card, &self.commands, &self.abilities, garrison)
    }

    /// Every problem found in the roster; empty when it is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (i, unit) in self.units.iter().enumerate() {
            if self.units[..i].iter().any(|u| u.id == unit.id) {
                errors.push(format!("duplicate unit id '{}'", unit.id));
            }
        }
        for (i, command) in self.commands.iter().enumerate() {
            if self.commands[..i].iter().any(|c| c.id == command.id) {
                errors.push(format!("duplicate command id {:?}", command.id));
            }
        }
        for (i, ability) in self.abilities.iter().enumerate() {
            if self.abilities[..i].iter().any(|a| a.id == ability.id) {
                errors.push(format!("duplicate ability id {:?}", ability.id));
            }
        }

        for ability in &self.abilities {
            if ability.cost < 0.0 {
                errors.push(format!("ability '{}' has negative cost", ability.name));
            }
        }

        for unit in &self.units {
            let id = &unit.id;
            if unit.max_health <= 0.0 {
                errors.push(format!("{id}: max_health must be positive"));
            }
            if let Some(speed) = unit.speed {
                if speed <= 0.0 {
                    errors.push(format!("{id}: speed must be positive"));
                }
            }
            if let Some(g) = &unit.garrison {
                if !(1..=MAX_GARRISON_CAPACITY).contains(&g.capacity) {
                    errors.push(format!(
                        "{id}: garrison capacity {} outside 1..={MAX_GARRISON_CAPACITY}",
                        g.capacity
                    ));
                }
                if g.unload_radius <= 0.0 {
                    errors.push(format!("{id}: unload radius must be positive"));
                }
                if unit.can_garrison {
                    errors.push(format!("{id}: containers cannot be garrisoned"));
                }
            }
            if let Some(e) = &unit.energy {
                if e.max <= 0.0 || e.initial < 0.0 || e.initial > e.max {
                    errors.push(format!("{id}: energy must satisfy 0 <= initial <= max, max > 0"));
                }
                if e.regen_rate < 0.0 {
                    errors.push(format!("{id}: negative energy regeneration"));
                }
            }
            if !unit.abilities.is_empty() && unit.energy.is_none() {
                errors.push(format!("{id}: abilities require an energy pool"));
            }
            for ability in &unit.abilities {
                if self.ability(*ability).is_none() {
                    errors.push(format!("{id}: unknown ability {ability:?}"));
                }
            }

            let size = unit.card.size;
            if !(MIN_CARD_SIZE..=MAX_CARD_SIZE).contains(&size) {
                errors.push(format!(
                    "{id}: card size {size} outside {MIN_CARD_SIZE}..={MAX_CARD_SIZE}"
                ));
            }
            if unit.card.slots.len() > size {
                errors.push(format!(
                    "{id}: {} slots do not fit a card of {size}",
                    unit.card.slots.len()
                ));
            }
            for rule in unit.card.slots.iter().flatten() {
                if self.command(rule.command).is_none() {
                    errors.push(format!("{id}: command {:?} missing from catalog", rule.command));
                }
                if let Some(ability) = rule.command.ability() {
                    if !unit.abilities.contains(&ability) {
                        errors.push(format!("{id}: card offers {ability:?} it cannot cast"));
                    }
                }
            }
        }

        errors
    }
}
