//! Integration tests for the unit logic pipeline.
//!
//! Exercises: UnitRoster → profiles → PathFollower / Garrison / EnergyPool
//! → command cards and the ability gate
//!
//! All tests are pure logic: no ECS, no rendering.

use std::f32::consts::TAU;

use outpost_logic::abilities::{execute_ability, AbilityId, EffectKind, ResearchFlag};
use outpost_logic::collaborators::{
    CommandContext, EffectLog, FlatTerrain, GameState, HeightFn, StatusLog, TerrainHeight,
};
use outpost_logic::commands::CommandId;
use outpost_logic::config::{ConfigError, UnitRoster};
use outpost_logic::energy::EnergyPool;
use outpost_logic::garrison::{BoardingPolicy, Garrison, GarrisonRefusal};
use outpost_logic::movement::{Advance, MoveState, PathFollower, ARRIVAL_EPSILON};
use outpost_logic::{GarrisonContainer, Movable, ResourceUser, Vec3};

// ── Helpers ────────────────────────────────────────────────────────────

fn roster() -> UnitRoster {
    UnitRoster::builtin().expect("builtin roster is valid")
}

fn garrison_for(roster: &UnitRoster, id: &str) -> Garrison<u32> {
    let g = roster.profile(id).unwrap().garrison.as_ref().unwrap();
    Garrison::new(g.capacity, g.boarding, g.unload_radius)
}

fn pool_for(roster: &UnitRoster, id: &str) -> EnergyPool {
    let e = roster.profile(id).unwrap().energy.as_ref().unwrap();
    EnergyPool::new(e.initial, e.max, e.regen_rate)
}

// ── Roster ─────────────────────────────────────────────────────────────

#[test]
fn builtin_roster_has_every_variant() {
    let roster = roster();
    for id in ["marine", "firebat", "wraith", "dropship", "science_vessel", "bunker"] {
        assert!(roster.profile(id).is_some(), "missing {id}");
    }
    assert!(roster.validate().is_empty());
}

#[test]
fn per_type_unload_radius() {
    let roster = roster();
    assert_eq!(garrison_for(&roster, "dropship").unload_radius(), 3.5);
    assert_eq!(garrison_for(&roster, "bunker").unload_radius(), 3.0);
}

#[test]
fn invalid_roster_lists_every_problem() {
    let json = r#"{
        "commands": [],
        "units": [
            { "id": "a", "name": "A", "max_health": 0.0, "speed": -1.0,
              "card": { "size": 20, "slots": [] } },
            { "id": "a", "name": "A", "max_health": 10.0,
              "card": { "size": 9, "slots": [{ "command": "move" }] } }
        ]
    }"#;
    match UnitRoster::from_json(json) {
        Err(ConfigError::Invalid(problems)) => assert!(problems.len() >= 4, "{problems:?}"),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn malformed_roster_is_a_parse_error() {
    assert!(matches!(
        UnitRoster::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

// ── Movement ───────────────────────────────────────────────────────────

#[test]
fn walk_two_waypoints_to_completion() {
    let mut mover = PathFollower::new(4.0);
    let mut pos = Vec3::ZERO;
    let mut heading = 0.0;
    mover.set_path(vec![Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 3.0)]);

    let mut last = f32::MAX;
    let mut reached = Vec::new();
    for _ in 0..100 {
        match mover.advance(&mut pos, &mut heading, 0.25, None) {
            Advance::Stepped { remaining } => {
                assert!(remaining < last);
                last = remaining;
            }
            Advance::Reached { index } => {
                reached.push(index);
                last = f32::MAX;
            }
            Advance::Completed => break,
            Advance::Idle => panic!("went idle before completing"),
        }
    }

    assert_eq!(reached, vec![0]);
    assert_eq!(mover.state(), MoveState::Idle);
    assert!(mover.path().is_empty());
    assert!(pos.distance(&Vec3::new(3.0, 0.0, 3.0)) < ARRIVAL_EPSILON);
}

#[test]
fn flyers_hold_their_altitude() {
    let mut mover = PathFollower::new(8.0);
    let mut pos = Vec3::new(0.0, 10.0, 0.0);
    let mut heading = 0.0;
    mover.set_path(vec![Vec3::new(0.0, 0.0, 20.0)]);

    for _ in 0..10 {
        mover.advance(&mut pos, &mut heading, 0.1, Some(10.0));
        assert_eq!(pos.y, 10.0);
    }
    assert!(heading.abs() < 1e-5, "facing +z, got {heading}");
}

// ── Garrison ───────────────────────────────────────────────────────────

#[test]
fn dropship_refuses_flyers_bunker_does_not() {
    let roster = roster();
    let mut dropship = garrison_for(&roster, "dropship");
    let mut bunker = garrison_for(&roster, "bunker");

    assert_eq!(dropship.board(1, true), Err(GarrisonRefusal::AirborneCandidate));
    assert_eq!(dropship.occupied(), 0);
    assert_eq!(bunker.boarding(), BoardingPolicy::Any);
    assert!(bunker.board(1, true).is_ok());
}

#[test]
fn capacity_is_never_exceeded() {
    let mut bunker = garrison_for(&roster(), "bunker");
    for handle in 0..10 {
        let _ = bunker.board(handle, false);
        assert!(bunker.occupied() <= bunker.capacity());
    }
    assert_eq!(bunker.occupants(), &[0, 1, 2, 3]);
    assert_eq!(bunker.board(99, false), Err(GarrisonRefusal::Full { capacity: 4 }));
}

#[test]
fn spawn_points_are_evenly_spaced_on_terrain() {
    let mut dropship = garrison_for(&roster(), "dropship");
    for handle in 0..5 {
        dropship.board(handle, false).unwrap();
    }
    let center = Vec3::new(10.0, 8.0, -4.0);
    let ground = HeightFn(|x: f32, _z: f32| x * 0.1);
    let points = dropship.spawn_points(center, Some(&ground as &dyn TerrainHeight));

    assert_eq!(points.len(), 5);
    for (i, p) in points.iter().enumerate() {
        assert!((p.horizontal_distance(&center) - 3.5).abs() < 1e-4);
        assert!((p.y - p.x * 0.1).abs() < 1e-5);
        let angle = (p.z - center.z).atan2(p.x - center.x).rem_euclid(TAU);
        let expected = i as f32 / 5.0 * TAU;
        assert!((angle - expected).abs() < 1e-3 || (angle - expected).abs() > TAU - 1e-3);
    }

    let flat = dropship.spawn_points(center, None);
    assert!(flat.iter().all(|p| p.y == center.y));
}

// ── Energy and abilities ───────────────────────────────────────────────

#[test]
fn science_vessel_regenerates_to_cast() {
    let roster = roster();
    let mut pool = pool_for(&roster, "science_vessel");
    let irradiate = roster.ability(AbilityId::Irradiate).unwrap();
    let research = GameState::default();
    let mut effects = EffectLog::default();
    let mut status = StatusLog::default();

    {
        let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &research);
        assert!(execute_ability(irradiate, &mut pool, Vec3::ZERO, &mut ctx).is_err());
    }
    assert_eq!(pool.energy(), 50.0);

    pool.regenerate(50.0);
    assert!(pool.can_afford(75.0));
    {
        let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &research);
        assert!(execute_ability(irradiate, &mut pool, Vec3::ZERO, &mut ctx).is_ok());
    }
    assert!((pool.energy() - 3.125).abs() < 1e-4);
    assert_eq!(effects.spawned, vec![(EffectKind::Irradiate, Vec3::ZERO)]);
    assert_eq!(status.messages, vec!["Not enough energy.", "Irradiate activated."]);
}

#[test]
fn emp_needs_research_even_with_energy() {
    let roster = roster();
    let emp = roster.ability(AbilityId::EmpShockwave).unwrap();
    let mut pool = EnergyPool::new(200.0, 200.0, 0.5625);
    let mut effects = EffectLog::default();
    let mut status = StatusLog::default();

    let locked = GameState::default();
    let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &locked);
    assert!(execute_ability(emp, &mut pool, Vec3::ZERO, &mut ctx).is_err());
    drop(ctx);
    assert_eq!(pool.energy(), 200.0);

    let unlocked = GameState::default().with_research(ResearchFlag::EmpShockwave);
    let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &unlocked);
    assert!(execute_ability(emp, &mut pool, Vec3::ZERO, &mut ctx).is_ok());
    drop(ctx);
    assert_eq!(pool.energy(), 100.0);
    assert_eq!(status.last(), Some("EMP Shockwave fired."));
}

// ── Command cards ──────────────────────────────────────────────────────

#[test]
fn dropship_card_gains_unload_when_loaded() {
    let roster = roster();
    let profile = roster.profile("dropship").unwrap();
    let mut garrison = garrison_for(&roster, "dropship");

    let empty = roster.card_for(profile, Some(&garrison));
    assert_eq!(empty.len(), 9);
    assert!(empty.get(8).is_none());

    garrison.board(7, false).unwrap();
    let loaded = roster.card_for(profile, Some(&garrison));
    assert_eq!(loaded.slot_of(CommandId::UnloadAll), Some(8));
    assert_eq!(loaded.slot_of(CommandId::Move), empty.slot_of(CommandId::Move));
}

#[test]
fn vessel_card_shows_costs() {
    let roster = roster();
    let card = roster.card_for(roster.profile("science_vessel").unwrap(), None);
    let costs: Vec<_> = (6..9)
        .map(|i| card.get(i).and_then(|d| d.energy_cost))
        .collect();
    assert_eq!(costs, vec![Some(100.0), Some(100.0), Some(75.0)]);
    assert_eq!(card.by_hotkey("R").map(|d| d.id), Some(CommandId::Irradiate));
}

#[test]
fn marine_stop_uses_overridden_hotkey() {
    let roster = roster();
    let card = roster.card_for(roster.profile("marine").unwrap(), None);
    assert_eq!(card.get(1).map(|d| d.hotkey.as_str()), Some("T"));
    assert!(card.by_hotkey("S").is_none());
}
