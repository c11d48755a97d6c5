//! Outpost Headless Simulation Harness
//!
//! Drives scripted scenarios against the unit simulation and checks its
//! invariants. Runs entirely in-process: no renderer, no input, no assets.
//!
//! Usage:
//!   cargo run -p outpost-simtest
//!   cargo run -p outpost-simtest -- --verbose
//!   cargo run -p outpost-simtest -- --json

mod logging;

use outpost_core::prelude::*;
use outpost_logic::abilities::ResearchFlag;
use outpost_logic::config::UnitRoster;
use outpost_logic::movement::ARRIVAL_EPSILON;

const TICK: f32 = 1.0 / 30.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    logging::init(verbose);
    println!("=== Outpost Simulation Harness ===\n");

    let roster = match UnitRoster::builtin() {
        Ok(r) => r,
        Err(e) => {
            println!("  ✗ roster_parse: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Roster sanity
    results.extend(validate_roster(&roster, verbose));

    // 2. Movement along multi-waypoint paths
    results.extend(validate_movement(&roster, verbose));

    // 3. Transport load / fly / unload cycle
    results.extend(validate_transport(&roster, verbose));

    // 4. Bunker garrison orders
    results.extend(validate_bunker_orders(&roster, verbose));

    // 5. Energy and abilities
    results.extend(validate_abilities(&roster, verbose));

    // 6. Command cards
    results.extend(validate_command_cards(&roster, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if json {
        print_showcase(&roster);
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run(field: &mut Battlefield, seconds: f32) {
    let ticks = (seconds / TICK).ceil() as usize;
    for _ in 0..ticks {
        field.update(TICK);
    }
}

// ── 1. Roster ───────────────────────────────────────────────────────────

fn validate_roster(roster: &UnitRoster, verbose: bool) -> Vec<TestResult> {
    println!("--- Roster ---");
    let mut results = Vec::new();

    let problems = roster.validate();
    results.push(TestResult::new(
        "roster_valid",
        problems.is_empty(),
        if problems.is_empty() {
            format!("{} unit types, {} commands", roster.units.len(), roster.commands.len())
        } else {
            problems.join("; ")
        },
    ));

    let containers: Vec<_> = roster.units.iter().filter(|u| u.garrison.is_some()).collect();
    results.push(TestResult::new(
        "roster_has_containers",
        containers.len() >= 2,
        format!("{} container types", containers.len()),
    ));

    let casters: Vec<_> = roster.units.iter().filter(|u| u.energy.is_some()).collect();
    let casters_have_abilities = casters.iter().all(|u| !u.abilities.is_empty());
    results.push(TestResult::new(
        "roster_casters_have_abilities",
        !casters.is_empty() && casters_have_abilities,
        format!("{} energy users", casters.len()),
    ));

    if verbose {
        for u in &roster.units {
            println!(
                "  {:<16} speed={:<5} flight={:<5} garrison={:<5} energy={}",
                u.id,
                u.speed.map_or("-".to_string(), |s| s.to_string()),
                u.flight.is_some(),
                u.garrison.as_ref().map_or(0, |g| g.capacity),
                u.energy.is_some()
            );
        }
    }

    results
}

// ── 2. Movement ─────────────────────────────────────────────────────────

fn validate_movement(roster: &UnitRoster, _verbose: bool) -> Vec<TestResult> {
    println!("--- Movement ---");
    let mut results = Vec::new();
    let mut field = Battlefield::new(roster.clone());

    let Ok(marine) = field.spawn("marine", Vec3::ZERO) else {
        results.push(TestResult::new("movement_spawn", false, "marine missing"));
        return results;
    };
    let path = vec![
        Vec3::new(6.0, 0.0, 0.0),
        Vec3::new(6.0, 0.0, 6.0),
        Vec3::new(0.0, 0.0, 6.0),
    ];
    field.set_path(marine, path.clone());

    // No tick may overshoot the waypoint being approached
    let mut overshoot = 0;
    let mut ticks = 0;
    while field.state(marine) == Some(MoveState::Moving) && ticks < 10_000 {
        let pos = field.position(marine).unwrap_or_default();
        let target = field
            .world
            .get::<&PathFollower>(marine)
            .ok()
            .and_then(|m| m.current_target());
        field.update(TICK);
        if let (Some(target), Some(next)) = (target, field.position(marine)) {
            if next.distance(&target) > pos.distance(&target) + 1e-4 {
                overshoot += 1;
            }
        }
        ticks += 1;
    }
    results.push(TestResult::new(
        "movement_no_overshoot",
        overshoot == 0,
        format!("{} ticks, {} overshoots", ticks, overshoot),
    ));

    let end = field.position(marine).unwrap_or_default();
    let finish = path[path.len() - 1];
    results.push(TestResult::new(
        "movement_reaches_end",
        field.state(marine) == Some(MoveState::Idle) && end.distance(&finish) < ARRIVAL_EPSILON,
        format!("ended at ({:.2}, {:.2}, {:.2})", end.x, end.y, end.z),
    ));

    // Flyers keep cruise altitude while moving and bob within amplitude after
    let Ok(wraith) = field.spawn("wraith", Vec3::ZERO) else {
        return results;
    };
    field.set_path(wraith, vec![Vec3::new(0.0, 0.0, 20.0)]);
    let mut left_altitude = false;
    while field.state(wraith) == Some(MoveState::Moving) {
        field.update(TICK);
        if field.state(wraith) == Some(MoveState::Moving)
            && field.position(wraith).map(|p| p.y) != Some(10.0)
        {
            left_altitude = true;
        }
    }
    run(&mut field, 3.0);
    let y = field.position(wraith).map(|p| p.y).unwrap_or(0.0);
    results.push(TestResult::new(
        "movement_flight_altitude",
        !left_altitude && (y - 10.0).abs() <= 0.2 + 1e-4,
        format!("hovering at y={:.3}", y),
    ));

    results
}

// ── 3. Transport ────────────────────────────────────────────────────────

fn validate_transport(roster: &UnitRoster, verbose: bool) -> Vec<TestResult> {
    println!("--- Transport ---");
    let mut results = Vec::new();
    let mut field = Battlefield::new(roster.clone());

    let (Ok(dropship), Ok(wraith)) = (
        field.spawn("dropship", Vec3::ZERO),
        field.spawn("wraith", Vec3::new(2.0, 0.0, 0.0)),
    ) else {
        results.push(TestResult::new("transport_spawn", false, "units missing"));
        return results;
    };
    let squad: Vec<_> = (0..10)
        .filter_map(|i| field.spawn("marine", Vec3::new(i as f32, 0.0, 3.0)).ok())
        .collect();

    let loaded = squad.iter().filter(|&&m| field.add_unit(dropship, m)).count();
    let capacity = field
        .world
        .get::<&Garrison>(dropship)
        .map(|g| g.capacity())
        .unwrap_or(0);
    results.push(TestResult::new(
        "transport_capacity",
        loaded == capacity && field.occupants(dropship).len() == capacity,
        format!("{} of {} marines loaded, capacity {}", loaded, squad.len(), capacity),
    ));

    results.push(TestResult::new(
        "transport_refuses_flyers",
        !field.add_unit(dropship, wraith),
        "wraith cannot board a dropship",
    ));

    let hidden = squad[..loaded].iter().all(|&m| !field.is_visible(m));
    results.push(TestResult::new(
        "transport_passengers_hidden",
        hidden,
        "loaded marines are invisible",
    ));

    // Fly somewhere and drop the squad onto sloped ground
    let boarded_at: Vec<_> = squad[..loaded].iter().map(|&m| field.position(m)).collect();
    field.set_path(dropship, vec![Vec3::new(40.0, 0.0, 10.0)]);
    run(&mut field, 10.0);
    let carried = squad[..loaded]
        .iter()
        .zip(&boarded_at)
        .all(|(&m, &before)| field.position(m) == before);
    results.push(TestResult::new(
        "transport_passengers_frozen",
        carried,
        "garrisoned marines did not move",
    ));

    let slope = HeightFn(|x: f32, z: f32| 0.05 * x + 0.02 * z);
    let center = field.position(dropship).unwrap_or_default();
    let unloaded = field.unload_all(dropship, &slope);
    let radius_ok = squad[..loaded].iter().all(|&m| {
        field.position(m).is_some_and(|p| {
            (p.horizontal_distance(&center) - 3.5).abs() < 1e-3
                && (p.y - (0.05 * p.x + 0.02 * p.z)).abs() < 1e-4
        })
    });
    results.push(TestResult::new(
        "transport_unload_ring",
        unloaded == loaded && radius_ok,
        format!("{} unloaded around ({:.1}, {:.1})", unloaded, center.x, center.z),
    ));

    let restored = squad[..loaded]
        .iter()
        .all(|&m| field.is_visible(m) && field.state(m) == Some(MoveState::Idle));
    results.push(TestResult::new(
        "transport_unload_restores",
        restored && field.occupants(dropship).is_empty(),
        "passengers visible and idle",
    ));

    results.push(TestResult::new(
        "transport_unload_twice",
        field.unload_all(dropship, &slope) == 0,
        "second unload is a no-op",
    ));

    if verbose {
        for &m in &squad[..loaded] {
            if let Some(p) = field.position(m) {
                println!("  {:?} -> ({:.2}, {:.2}, {:.2})", m, p.x, p.y, p.z);
            }
        }
    }

    results
}


// ── 4. Bunker orders ────────────────────────────────────────────────────

fn validate_bunker_orders(roster: &UnitRoster, verbose: bool) -> Vec<TestResult> {
    println!("--- Bunker Orders ---");
    let mut results = Vec::new();
    let mut field = Battlefield::new(roster.clone());

    let Ok(bunker) = field.spawn("bunker", Vec3::new(0.0, 0.0, 0.0)) else {
        results.push(TestResult::new("bunker_spawn", false, "bunker missing"));
        return results;
    };
    let squad: Vec<Entity> = (0..6)
        .filter_map(|i| {
            let angle = i as f32;
            field
                .spawn("firebat", Vec3::new(12.0 * angle.cos(), 0.0, 12.0 * angle.sin()))
                .ok()
        })
        .collect();
    let mut status = StatusLog::default();

    let ordered = field.order_garrison(&squad, bunker, &mut status);
    results.push(TestResult::new(
        "bunker_orders_capped",
        ordered == 4 && status.last() == Some("Not enough space in Bunker for all units."),
        format!("{} ordered, status {:?}", ordered, status.last()),
    ));

    let mut ticks = 0;
    while field.occupants(bunker).len() < ordered && ticks < 1_000 {
        field.update(TICK);
        ticks += 1;
    }
    let boarded = field.occupants(bunker);
    results.push(TestResult::new(
        "bunker_boards_on_arrival",
        boarded.len() == 4 && boarded.iter().all(|&u| squad[..4].contains(&u)),
        format!("{} boarded after {} ticks", boarded.len(), ticks),
    ));

    let left_out = squad[4..]
        .iter()
        .all(|&u| field.garrisoned_in(u).is_none() && field.is_visible(u));
    results.push(TestResult::new(
        "bunker_overflow_stays_outside",
        left_out,
        "units past capacity were never ordered",
    ));

    let again = field.order_garrison(&squad[4..], bunker, &mut status);
    results.push(TestResult::new(
        "bunker_full_refuses_orders",
        again == 0 && status.last() == Some("Bunker is full."),
        format!("status {:?}", status.last()),
    ));

    let research = GameState::default();
    let mut effects = NoEffects;
    let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &research);
    let unloaded = field.execute_command(bunker, CommandId::UnloadAll, &mut ctx);
    drop(ctx);
    results.push(TestResult::new(
        "bunker_unload_command",
        unloaded && field.occupants(bunker).is_empty() && status.last() == Some("Units unloaded."),
        format!("status {:?}", status.last()),
    ));

    if verbose {
        for message in &status.messages {
            println!("  status: {}", message);
        }
    }

    results
}

// ── 5. Abilities ────────────────────────────────────────────────────────

fn validate_abilities(roster: &UnitRoster, verbose: bool) -> Vec<TestResult> {
    println!("--- Abilities ---");
    let mut results = Vec::new();
    let mut field = Battlefield::new(roster.clone());

    let Ok(vessel) = field.spawn("science_vessel", Vec3::ZERO) else {
        results.push(TestResult::new("abilities_spawn", false, "science vessel missing"));
        return results;
    };
    let mut research = GameState::default();
    let mut effects = EffectLog::default();
    let mut status = StatusLog::default();

    let start = field.energy(vessel).unwrap_or(0.0);
    let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &research);
    let cast = field.execute_command(vessel, CommandId::DefensiveMatrix, &mut ctx);
    drop(ctx);
    results.push(TestResult::new(
        "abilities_gate_energy",
        !cast && field.energy(vessel) == Some(start) && status.last() == Some("Not enough energy."),
        format!("{:.1} energy, status {:?}", start, status.last()),
    ));

    // Regenerate for five simulated minutes; the pool must cap at max
    field.set_time_scale(10.0);
    run(&mut field, 30.0);
    field.set_time_scale(1.0);
    let topped = field.energy(vessel).unwrap_or(0.0);
    results.push(TestResult::new(
        "abilities_regen_caps",
        topped == 200.0,
        format!("energy {:.2} after {:.0}s", topped, field.sim_time()),
    ));

    let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &research);
    let emp_locked = field.execute_command(vessel, CommandId::EmpShockwave, &mut ctx);
    drop(ctx);
    results.push(TestResult::new(
        "abilities_gate_research",
        !emp_locked
            && field.energy(vessel) == Some(200.0)
            && status.last() == Some("EMP Shockwave not researched."),
        format!("status {:?}", status.last()),
    ));

    research.complete_research(ResearchFlag::EmpShockwave);
    let mut ctx = CommandContext::new(&FlatTerrain(0.0), &mut effects, &mut status, &research);
    let emp = field.execute_command(vessel, CommandId::EmpShockwave, &mut ctx);
    let matrix = field.execute_command(vessel, CommandId::DefensiveMatrix, &mut ctx);
    let irradiate = field.execute_command(vessel, CommandId::Irradiate, &mut ctx);
    drop(ctx);
    let left = field.energy(vessel).unwrap_or(-1.0);
    results.push(TestResult::new(
        "abilities_exact_cost",
        emp && matrix && !irradiate && left == 0.0,
        format!("{:.1} energy left, {} effects", left, effects.spawned.len()),
    ));

    if verbose {
        for (kind, at) in &effects.spawned {
            println!("  effect {:?} at ({:.1}, {:.1}, {:.1})", kind, at.x, at.y, at.z);
        }
    }

    results
}

// ── 6. Command cards ────────────────────────────────────────────────────

fn validate_command_cards(roster: &UnitRoster, verbose: bool) -> Vec<TestResult> {
    println!("--- Command Cards ---");
    let mut results = Vec::new();
    let mut field = Battlefield::new(roster.clone());

    let units: Vec<(String, Entity)> = roster
        .units
        .iter()
        .filter_map(|u| field.spawn(&u.id, Vec3::ZERO).ok().map(|e| (u.id.clone(), e)))
        .collect();

    let bad_sizes: Vec<_> = units
        .iter()
        .filter(|(_, e)| {
            field
                .command_card(*e)
                .map_or(true, |c| !(8..=12).contains(&c.len()))
        })
        .map(|(id, _)| id.as_str())
        .collect();
    results.push(TestResult::new(
        "cards_sized",
        bad_sizes.is_empty(),
        if bad_sizes.is_empty() {
            format!("{} cards within 8..=12 slots", units.len())
        } else {
            format!("bad card sizes: {}", bad_sizes.join(", "))
        },
    ));

    let unload_while_empty: Vec<_> = units
        .iter()
        .filter(|(_, e)| {
            field
                .command_card(*e)
                .is_some_and(|c| c.contains(CommandId::UnloadAll))
        })
        .map(|(id, _)| id.as_str())
        .collect();
    results.push(TestResult::new(
        "cards_unload_hidden_when_empty",
        unload_while_empty.is_empty(),
        format!("{:?}", unload_while_empty),
    ));

    let find = |id: &str| units.iter().find(|(u, _)| u == id).map(|(_, e)| *e);
    if let (Some(dropship), Some(marine)) = (find("dropship"), find("marine")) {
        let before = field.command_card(dropship).unwrap_or_default();
        field.add_unit(dropship, marine);
        let after = field.command_card(dropship).unwrap_or_default();
        let stable = (0..before.len())
            .filter(|&i| before.get(i).is_some())
            .all(|i| before.get(i) == after.get(i));
        results.push(TestResult::new(
            "cards_slots_stable",
            stable && after.contains(CommandId::UnloadAll),
            format!("unload in slot {:?}", after.slot_of(CommandId::UnloadAll)),
        ));
    }

    if verbose {
        for (id, e) in &units {
            if let Some(card) = field.command_card(*e) {
                let keys: Vec<_> = card
                    .slots()
                    .iter()
                    .map(|s| s.as_ref().map_or("-", |d| d.hotkey.as_str()))
                    .collect();
                println!("  {:<16} [{}]", id, keys.join(" "));
            }
        }
    }

    results
}

// ── Snapshot showcase ───────────────────────────────────────────────────

/// Print a small loaded scene as JSON for presentation-layer tooling.
fn print_showcase(roster: &UnitRoster) {
    let mut field = Battlefield::new(roster.clone());
    let spawned = (
        field.spawn("bunker", Vec3::ZERO),
        field.spawn("marine", Vec3::new(2.0, 0.0, 0.0)),
        field.spawn("science_vessel", Vec3::new(-6.0, 0.0, 4.0)),
    );
    if let (Ok(bunker), Ok(marine), Ok(_)) = spawned {
        field.add_unit(bunker, marine);
    }
    run(&mut field, 1.0);

    match serde_json::to_string_pretty(&field.snapshot_all()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("snapshot serialization failed: {}", e),
    }
}
