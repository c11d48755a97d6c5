//! Interfaces to the world outside the simulation core.
//!
//! Terrain sampling, visual effects, on-screen status text and research
//! progress all live elsewhere. The core only talks to them through these
//! traits; the small implementations here cover headless runs and tests.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::abilities::{EffectKind, ResearchFlag};
use crate::vector::Vec3;

/// Ground height lookup, `height(x, z) -> y`.
pub trait TerrainHeight {
    fn height(&self, x: f32, z: f32) -> f32;
}

/// Level ground at a fixed height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain(pub f32);

impl TerrainHeight for FlatTerrain {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// Adapts a closure into a [`TerrainHeight`].
pub struct HeightFn<F>(pub F);

impl<F: Fn(f32, f32) -> f32> TerrainHeight for HeightFn<F> {
    fn height(&self, x: f32, z: f32) -> f32 {
        (self.0)(x, z)
    }
}

/// Fire-and-forget visual/gameplay effect spawning.
pub trait EffectSink {
    fn spawn_effect(&mut self, kind: EffectKind, position: Vec3);
}

/// Discards every effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl EffectSink for NoEffects {
    fn spawn_effect(&mut self, _kind: EffectKind, _position: Vec3) {}
}

/// Records spawned effects in order.
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    pub spawned: Vec<(EffectKind, Vec3)>,
}

impl EffectSink for EffectLog {
    fn spawn_effect(&mut self, kind: EffectKind, position: Vec3) {
        self.spawned.push((kind, position));
    }
}

/// Human-readable command feedback for the presentation layer.
pub trait StatusSink {
    fn report(&mut self, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn report(&mut self, _message: &str) {}
}

/// Keeps every message in order.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    pub messages: Vec<String>,
}

impl StatusLog {
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl StatusSink for StatusLog {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Read-only research progress.
pub trait ResearchFlags {
    fn is_researched(&self, flag: ResearchFlag) -> bool;
}

/// Shared game-state flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub upgrades: BTreeSet<ResearchFlag>,
}

impl GameState {
    pub fn with_research(mut self, flag: ResearchFlag) -> Self {
        self.upgrades.insert(flag);
        self
    }

    pub fn complete_research(&mut self, flag: ResearchFlag) {
        self.upgrades.insert(flag);
    }
}

impl ResearchFlags for GameState {
    fn is_researched(&self, flag: ResearchFlag) -> bool {
        self.upgrades.contains(&flag)
    }
}

/// Everything a command needs from outside the core, bundled per call.
pub struct CommandContext<'a> {
    pub terrain: &'a dyn TerrainHeight,
    pub effects: &'a mut dyn EffectSink,
    pub status: &'a mut dyn StatusSink,
    pub research: &'a dyn ResearchFlags,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        terrain: &'a dyn TerrainHeight,
        effects: &'a mut dyn EffectSink,
        status: &'a mut dyn StatusSink,
        research: &'a dyn ResearchFlags,
    ) -> Self {
        Self {
            terrain,
            effects,
            status,
            research,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_state_flags() {
        let mut state = GameState::default();
        assert!(!state.is_researched(ResearchFlag::EmpShockwave));
        state.complete_research(ResearchFlag::EmpShockwave);
        assert!(state.is_researched(ResearchFlag::EmpShockwave));
    }

    #[test]
    fn test_game_state_json() {
        let state: GameState = serde_json::from_str(r#"{ "upgrades": ["emp_shockwave"] }"#).unwrap();
        assert!(state.is_researched(ResearchFlag::EmpShockwave));
        let empty: GameState = serde_json::from_str("{}").unwrap();
        assert!(empty.upgrades.is_empty());
    }

    #[test]
    fn test_status_log_keeps_order() {
        let mut log = StatusLog::default();
        log.report("first");
        log.report("second");
        assert_eq!(log.messages, vec!["first", "second"]);
        assert_eq!(log.last(), Some("second"));
    }
}
