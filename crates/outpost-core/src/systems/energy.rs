//! Energy system - regenerates every energy pool each tick

use hecs::World;
use outpost_logic::capability::ResourceUser;

use crate::components::EnergyPool;

pub fn energy_system(world: &mut World, delta_seconds: f32) {
    for (_, pool) in world.query_mut::<&mut EnergyPool>() {
        pool.regenerate(delta_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_regenerates_and_caps() {
        let mut world = World::new();
        let e = world.spawn((EnergyPool::new(50.0, 200.0, 0.5625),));

        energy_system(&mut world, 16.0);
        assert!((world.get::<&EnergyPool>(e).unwrap().energy() - 59.0).abs() < 1e-4);

        energy_system(&mut world, 10_000.0);
        assert_eq!(world.get::<&EnergyPool>(e).unwrap().energy(), 200.0);
    }
}
