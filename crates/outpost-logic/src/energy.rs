//! Bounded, regenerating energy pools.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityRefusal;
use crate::capability::ResourceUser;

/// Energy pool with `0 <= energy <= max_energy`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyPool {
    energy: f32,
    max_energy: f32,
    /// Energy regained per second.
    pub regen_rate: f32,
}

impl EnergyPool {
    pub fn new(initial: f32, max_energy: f32, regen_rate: f32) -> Self {
        let max_energy = max_energy.max(0.0);
        Self {
            energy: initial.clamp(0.0, max_energy),
            max_energy,
            regen_rate,
        }
    }

    /// Fill level in [0.0, 1.0].
    pub fn fraction(&self) -> f32 {
        if self.max_energy <= 0.0 {
            0.0
        } else {
            self.energy / self.max_energy
        }
    }
}

impl ResourceUser for EnergyPool {
    fn energy(&self) -> f32 {
        self.energy
    }

    fn max_energy(&self) -> f32 {
        self.max_energy
    }

    fn regenerate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.energy = (self.energy + self.regen_rate * dt).min(self.max_energy);
    }

    fn try_spend(&mut self, cost: f32) -> Result<(), AbilityRefusal> {
        if !self.can_afford(cost) {
            return Err(AbilityRefusal::NotEnoughEnergy {
                needed: cost,
                available: self.energy,
            });
        }
        self.energy = (self.energy - cost).max(0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_clamped() {
        let pool = EnergyPool::new(500.0, 200.0, 0.5625);
        assert_eq!(pool.energy(), 200.0);
        let pool = EnergyPool::new(-5.0, 200.0, 0.5625);
        assert_eq!(pool.energy(), 0.0);
    }

    #[test]
    fn test_regen_rate() {
        let mut pool = EnergyPool::new(50.0, 200.0, 0.5625);
        pool.regenerate(16.0);
        assert!((pool.energy() - 59.0).abs() < 1e-4);
    }

    #[test]
    fn test_regen_caps_at_max() {
        let mut pool = EnergyPool::new(199.9, 200.0, 0.5625);
        for _ in 0..10_000 {
            pool.regenerate(0.5);
            assert!(pool.energy() <= pool.max_energy());
        }
        assert_eq!(pool.energy(), 200.0);
        assert!((pool.fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_spend_exact_cost() {
        let mut pool = EnergyPool::new(150.0, 200.0, 0.5625);
        assert!(pool.try_spend(75.0).is_ok());
        assert!((pool.energy() - 75.0).abs() < 1e-5);
        assert!(pool.try_spend(75.0).is_ok());
        assert_eq!(pool.energy(), 0.0);
    }

    #[test]
    fn test_insufficient_leaves_pool_unchanged() {
        let mut pool = EnergyPool::new(99.0, 200.0, 0.5625);
        let err = pool.try_spend(100.0).unwrap_err();
        assert_eq!(err.to_string(), "Not enough energy.");
        assert_eq!(pool.energy(), 99.0);
    }
}
