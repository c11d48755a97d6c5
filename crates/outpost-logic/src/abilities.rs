//! Energy-gated special abilities.
//!
//! Gate order: research prerequisite, then energy, then deduct and fire the
//! effect. A refusal changes nothing and is always safe to retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::ResourceUser;
use crate::collaborators::{CommandContext, ResearchFlags};
use crate::vector::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityId {
    DefensiveMatrix,
    EmpShockwave,
    Irradiate,
}

/// Research upgrades tracked in shared game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchFlag {
    EmpShockwave,
    Stimpack,
    U238Shells,
    CloakingField,
}

/// Visual effect requested from the effect factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    DefensiveMatrix,
    EmpShockwave,
    Irradiate,
}

/// Static per-ability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub id: AbilityId,
    pub name: String,
    pub cost: f32,
    #[serde(default)]
    pub research: Option<ResearchFlag>,
    pub effect: EffectKind,
    pub success_message: String,
}

/// Why an ability did not fire. `Display` is the status line shown to the
/// player.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbilityRefusal {
    #[error("{ability} not researched.")]
    NotResearched { ability: String },
    #[error("Not enough energy.")]
    NotEnoughEnergy { needed: f32, available: f32 },
}

/// Research check only.
pub fn check_prerequisites(
    spec: &AbilitySpec,
    research: &dyn ResearchFlags,
) -> Result<(), AbilityRefusal> {
    match spec.research {
        Some(flag) if !research.is_researched(flag) => Err(AbilityRefusal::NotResearched {
            ability: spec.name.clone(),
        }),
        _ => Ok(()),
    }
}

/// Run the full gate for `spec` against `pool` and, on success, spawn the
/// effect at `position`. The outcome is reported through `ctx.status`
/// either way.
pub fn execute_ability<R: ResourceUser + ?Sized>(
    spec: &AbilitySpec,
    pool: &mut R,
    position: Vec3,
    ctx: &mut CommandContext<'_>,
) -> Result<(), AbilityRefusal> {
    let gate = check_prerequisites(spec, ctx.research).and_then(|()| pool.try_spend(spec.cost));
    match gate {
        Ok(()) => {
            ctx.effects.spawn_effect(spec.effect, position);
            ctx.status.report(&spec.success_message);
            Ok(())
        }
        Err(refusal) => {
            ctx.status.report(&refusal.to_string());
            Err(refusal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{EffectLog, FlatTerrain, GameState, StatusLog};
    use crate::energy::EnergyPool;

    fn emp() -> AbilitySpec {
        AbilitySpec {
            id: AbilityId::EmpShockwave,
            name: "EMP Shockwave".into(),
            cost: 100.0,
            research: Some(ResearchFlag::EmpShockwave),
            effect: EffectKind::EmpShockwave,
            success_message: "EMP Shockwave fired.".into(),
        }
    }

    fn irradiate() -> AbilitySpec {
        AbilitySpec {
            id: AbilityId::Irradiate,
            name: "Irradiate".into(),
            cost: 75.0,
            research: None,
            effect: EffectKind::Irradiate,
            success_message: "Irradiate activated.".into(),
        }
    }

    #[test]
    fn test_unresearched_checked_first() {
        let mut pool = EnergyPool::new(0.0, 200.0, 0.5625);
        let state = GameState::default();
        let mut effects = EffectLog::default();
        let mut status = StatusLog::default();
        let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &state);

        let err = execute_ability(&emp(), &mut pool, Vec3::ZERO, &mut ctx).unwrap_err();
        assert!(matches!(err, AbilityRefusal::NotResearched { .. }));
        assert_eq!(status.last(), Some("EMP Shockwave not researched."));
        assert!(effects.spawned.is_empty());
    }

    #[test]
    fn test_insufficient_energy_no_change() {
        let mut pool = EnergyPool::new(74.0, 200.0, 0.5625);
        let state = GameState::default();
        let mut effects = EffectLog::default();
        let mut status = StatusLog::default();
        let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &state);

        assert!(execute_ability(&irradiate(), &mut pool, Vec3::ZERO, &mut ctx).is_err());
        assert_eq!(pool.energy(), 74.0);
        assert_eq!(status.last(), Some("Not enough energy."));
        assert!(effects.spawned.is_empty());
    }

    #[test]
    fn test_success_deducts_and_spawns() {
        let mut pool = EnergyPool::new(150.0, 200.0, 0.5625);
        let state = GameState::default().with_research(ResearchFlag::EmpShockwave);
        let mut effects = EffectLog::default();
        let mut status = StatusLog::default();
        let at = Vec3::new(4.0, 9.0, -2.0);
        let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &state);

        execute_ability(&emp(), &mut pool, at, &mut ctx).unwrap();
        assert!((pool.energy() - 50.0).abs() < 1e-5);
        assert_eq!(effects.spawned, vec![(EffectKind::EmpShockwave, at)]);
        assert_eq!(status.last(), Some("EMP Shockwave fired."));
    }
}
