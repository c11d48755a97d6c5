//! Command cards: the slot-indexed palette of contextual actions.
//!
//! Slot positions are part of the contract: hotkey layouts and the button
//! grid key off the index, so a layout's order must never be shuffled.
//!
//! ```
//! use outpost_logic::config::UnitRoster;
//!
//! let roster = UnitRoster::builtin().unwrap();
//! let bunker = roster.profile("bunker").unwrap();
//! let card = roster.card_for(bunker, None);
//! assert_eq!(card.len(), 12);
//! assert!(card.slots().iter().all(Option::is_none));
//! ```

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityId, AbilitySpec};
use crate::capability::GarrisonContainer;

/// Stable command identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandId {
    Move,
    Stop,
    Hold,
    Patrol,
    Attack,
    UnloadAll,
    DefensiveMatrix,
    EmpShockwave,
    Irradiate,
}

impl CommandId {
    /// The ability this command casts, if it is an ability command.
    pub fn ability(self) -> Option<AbilityId> {
        match self {
            CommandId::DefensiveMatrix => Some(AbilityId::DefensiveMatrix),
            CommandId::EmpShockwave => Some(AbilityId::EmpShockwave),
            CommandId::Irradiate => Some(AbilityId::Irradiate),
            _ => None,
        }
    }

    /// Commands that need a target picked by the player before they run.
    pub fn needs_target(self) -> bool {
        matches!(self, CommandId::Move | CommandId::Patrol | CommandId::Attack)
    }
}

impl From<AbilityId> for CommandId {
    fn from(id: AbilityId) -> Self {
        match id {
            AbilityId::DefensiveMatrix => CommandId::DefensiveMatrix,
            AbilityId::EmpShockwave => CommandId::EmpShockwave,
            AbilityId::Irradiate => CommandId::Irradiate,
        }
    }
}

/// Catalog entry: how a command is presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    pub id: CommandId,
    pub hotkey: String,
    pub icon: String,
    pub name: String,
}

/// When a layout slot is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCondition {
    #[default]
    Always,
    /// Only while the unit's garrison holds at least one occupant.
    WhenOccupied,
}

/// One populated slot in a unit's card layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRule {
    pub command: CommandId,
    #[serde(default)]
    pub when: SlotCondition,
    /// Overrides the catalog hotkey for this unit.
    #[serde(default)]
    pub hotkey: Option<String>,
}

/// Fixed-size card layout for a unit type. Slots past `slots.len()` are
/// empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardLayout {
    pub size: usize,
    #[serde(default)]
    pub slots: Vec<Option<SlotRule>>,
}

/// A filled button on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub hotkey: String,
    pub icon: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_cost: Option<f32>,
}

/// Fixed-length, index-addressed palette. `None` is an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandCard {
    slots: Vec<Option<CommandDescriptor>>,
}

impl CommandCard {
    pub fn empty(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<CommandDescriptor>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&CommandDescriptor> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slot_of(&self, id: CommandId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|d| d.id == id))
    }

    pub fn contains(&self, id: CommandId) -> bool {
        self.slot_of(id).is_some()
    }

    /// Look up a filled slot by hotkey (case-insensitive).
    pub fn by_hotkey(&self, key: &str) -> Option<&CommandDescriptor> {
        self.slots
            .iter()
            .flatten()
            .find(|d| d.hotkey.eq_ignore_ascii_case(key))
    }
}

/// Build a unit's card from its layout.
///
/// `garrison` is the unit's container capability, if it has one; slots
/// marked [`SlotCondition::WhenOccupied`] stay empty without occupants.
/// Rules naming a command missing from `catalog` leave their slot empty.
pub fn build_card(
    layout: &CardLayout,
    catalog: &[CommandSpec],
    abilities: &[AbilitySpec],
    garrison: Option<&dyn GarrisonContainer>,
) -> CommandCard {
    let occupied = garrison.map_or(0, |g| g.occupied());
    let mut card = CommandCard::empty(layout.size);

    for (index, rule) in layout.slots.iter().take(layout.size).enumerate() {
        let Some(rule) = rule else { continue };
        if rule.when == SlotCondition::WhenOccupied && occupied == 0 {
            continue;
        }
        let Some(spec) = catalog.iter().find(|c| c.id == rule.command) else {
            continue;
        };
        let energy_cost = rule
            .command
            .ability()
            .and_then(|a| abilities.iter().find(|s| s.id == a))
            .map(|s| s.cost);

        card.slots[index] = Some(CommandDescriptor {
            id: spec.id,
            hotkey: rule.hotkey.clone().unwrap_or_else(|| spec.hotkey.clone()),
            icon: spec.icon.clone(),
            name: spec.name.clone(),
            energy_cost,
        });
    }

    card
}
