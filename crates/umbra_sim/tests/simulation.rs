//! Full tick pipeline tests

use approx::assert_abs_diff_eq;
use umbra_ai::{GuardArchetype, GuardSignal, GuardState, PerceptionConfig};
use umbra_gamestate::{Difficulty, DifficultyManager, Outcome};
use umbra_math::{Occluder, Vec3, AABB};
use umbra_sim::prelude::*;
use umbra_zones::{LinkEvent, ShadowLinkConfig};

const DT: f32 = 0.1;

fn world(tier: Difficulty) -> Simulation {
    Simulation::new(
        DifficultyManager::new(Default::default(), tier),
        ShadowLinkConfig::default(),
        PerceptionConfig::default(),
    )
}

fn sentry_at_origin() -> GuardConfig {
    GuardConfig {
        archetype: GuardArchetype::StandingDuty,
        spawn: [0.0, 0.0, 0.0],
        facing: [0.0, 0.0, 1.0],
        waypoints: Vec::new(),
        wait_time: 2.0,
        perception: None,
    }
}

/// Tick until a guard attacks, returning every event seen
fn run_until_attack(sim: &mut Simulation, max_ticks: usize) -> Vec<SimEvent> {
    let mut seen = Vec::new();
    for _ in 0..max_ticks {
        sim.tick(DT);
        let events = sim.drain_events();
        let attacked = events.iter().any(|e| {
            matches!(
                e,
                SimEvent::Guard {
                    signal: GuardSignal::Attack,
                    ..
                }
            )
        });
        seen.extend(events);
        if attacked {
            return seen;
        }
    }
    panic!("no attack within {} ticks", max_ticks);
}

fn outcome_events(events: &[SimEvent]) -> Vec<Outcome> {
    events
        .iter()
        .filter_map(|e| match e {
            SimEvent::Outcome(outcome) => Some(*outcome),
            _ => None,
        })
        .collect()
}

fn ticks_until_chase(sim: &mut Simulation, max_ticks: usize) -> Option<usize> {
    for tick in 1..=max_ticks {
        sim.tick(DT);
        let chased = sim.drain_events().iter().any(|e| {
            matches!(
                e,
                SimEvent::Guard {
                    signal: GuardSignal::StateChanged {
                        to: GuardState::Chasing,
                        ..
                    },
                    ..
                }
            )
        });
        if chased {
            return Some(tick);
        }
    }
    None
}

#[test]
fn test_guard_catches_standing_target_once() {
    let mut sim = world(Difficulty::Normal);
    sim.add_guard(&sentry_at_origin()).unwrap();
    sim.spawn_target(Vec3::new(0.0, 0.0, 5.0));

    let mut events = run_until_attack(&mut sim, 40);
    for _ in 0..400 {
        sim.tick(DT);
        events.extend(sim.drain_events());
    }

    assert_eq!(sim.outcome(), Some(Outcome::Lost));
    assert_eq!(outcome_events(&events), vec![Outcome::Lost]);

    let loses = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SimEvent::Guard {
                    signal: GuardSignal::Lose,
                    ..
                }
            )
        })
        .count();
    assert_eq!(loses, 1);
    assert!(sim.game().input_frozen());
}

#[test]
fn test_crouching_in_shadow_stays_hidden() {
    let mut sim = world(Difficulty::Hard);
    let id = sim.add_guard(&sentry_at_origin()).unwrap();
    sim.add_zone(
        AABB::new(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 2.0, 6.0)),
        None,
    );
    sim.spawn_target(Vec3::new(0.0, 0.5, 5.0));
    sim.set_crouching(true);

    for _ in 0..100 {
        sim.tick(DT);
    }

    let guard = sim.guard(id).unwrap();
    assert!(sim.shadow().is_concealed());
    assert_eq!(guard.brain().state(), GuardState::Idle);
    assert_eq!(guard.brain().timers().detect, 0.0);
    assert!(sim.outcome().is_none());
}

#[test]
fn test_standing_in_shadow_is_seen() {
    let mut sim = world(Difficulty::Normal);
    sim.add_guard(&sentry_at_origin()).unwrap();
    sim.add_zone(
        AABB::new(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 2.0, 6.0)),
        None,
    );
    sim.spawn_target(Vec3::new(0.0, 0.5, 5.0));

    run_until_attack(&mut sim, 40);
}

#[test]
fn test_wall_hides_target() {
    let mut sim = world(Difficulty::Hard);
    let id = sim.add_guard(&sentry_at_origin()).unwrap();
    sim.add_occluder(Occluder::wall(
        Vec3::new(-2.0, 0.0, 2.0),
        Vec3::new(2.0, 3.0, 2.5),
    ));
    sim.spawn_target(Vec3::new(0.0, 0.0, 5.0));

    for _ in 0..50 {
        sim.tick(DT);
    }
    assert_eq!(sim.guard(id).unwrap().brain().state(), GuardState::Idle);
}

#[test]
fn test_win_is_not_overridden_by_later_lose() {
    let mut sim = world(Difficulty::Normal);
    sim.add_guard(&sentry_at_origin()).unwrap();
    sim.add_win_zone(AABB::new(
        Vec3::new(-1.0, 0.0, 19.0),
        Vec3::new(1.0, 2.0, 21.0),
    ));
    sim.spawn_target(Vec3::new(0.0, 0.0, 5.0));

    let mut events = run_until_attack(&mut sim, 40);

    // Escape before the delayed lose fires
    sim.set_target_position(Vec3::new(0.0, 0.5, 20.0));
    for _ in 0..300 {
        sim.tick(DT);
        events.extend(sim.drain_events());
    }

    assert_eq!(sim.outcome(), Some(Outcome::Won));
    assert_eq!(outcome_events(&events), vec![Outcome::Won]);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::Guard {
            signal: GuardSignal::Lose,
            ..
        }
    )));
}

#[test]
fn test_removing_guard_mid_attack_cancels_lose() {
    let mut sim = world(Difficulty::Normal);
    let id = sim.add_guard(&sentry_at_origin()).unwrap();
    sim.spawn_target(Vec3::new(0.0, 0.0, 5.0));

    run_until_attack(&mut sim, 40);
    sim.remove_guard(id).unwrap();
    assert!(sim.guard(id).is_none());

    for _ in 0..50 {
        sim.tick(DT);
    }
    assert!(sim.outcome().is_none());
    assert!(outcome_events(&sim.drain_events()).is_empty());
}

#[test]
fn test_pause_menu_freezes_world() {
    let mut sim = world(Difficulty::Normal);
    let id = sim.add_guard(&sentry_at_origin()).unwrap();
    sim.spawn_target(Vec3::new(0.0, 0.0, 5.0));

    assert!(sim.toggle_menu());
    for _ in 0..100 {
        sim.tick(DT);
    }
    assert_eq!(sim.elapsed(), 0.0);
    assert_eq!(sim.guard(id).unwrap().brain().timers().detect, 0.0);

    assert!(!sim.toggle_menu());
    sim.tick(DT);
    assert!(sim.guard(id).unwrap().brain().timers().detect > 0.0);
}

#[test]
fn test_shadow_link_teleports_between_zones() {
    let mut sim = world(Difficulty::Normal);
    let start = sim.add_zone(
        AABB::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 4.0, 1.0)),
        None,
    );
    let far = sim.add_zone(
        AABB::new(Vec3::new(-1.0, 0.0, 9.0), Vec3::new(1.0, 4.0, 11.0)),
        None,
    );
    sim.spawn_target(Vec3::new(0.0, 0.5, 0.0));
    sim.set_camera_forward(Vec3::Z);

    sim.tick(DT);
    assert_eq!(sim.shadow().current_zone(), Some(start));

    sim.press_link();
    sim.tick(DT);
    assert_eq!(sim.link().target_zone(), Some(far));

    sim.release_link();
    sim.tick(DT);
    assert!(sim.link().in_sequence());

    let mut events = Vec::new();
    for _ in 0..8 {
        sim.tick(DT);
        events.extend(sim.drain_events());
    }

    let position = sim.target().unwrap().position;
    assert_abs_diff_eq!(position.x, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(position.y, 3.5, epsilon = 1e-4);
    assert_abs_diff_eq!(position.z, 10.0, epsilon = 1e-4);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::Link(LinkEvent::Teleported { .. }))));

    // The tracker hands the shadow state over to the destination zone
    assert!(sim.shadow().is_concealed());
    assert_eq!(sim.shadow().current_zone(), Some(far));
}

#[test]
fn test_leaving_shadow_cancels_link_hold() {
    let mut sim = world(Difficulty::Normal);
    sim.add_zone(
        AABB::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 4.0, 1.0)),
        None,
    );
    sim.add_zone(
        AABB::new(Vec3::new(-1.0, 0.0, 9.0), Vec3::new(1.0, 4.0, 11.0)),
        None,
    );
    sim.spawn_target(Vec3::new(0.0, 0.5, 0.0));
    sim.tick(DT);

    sim.press_link();
    sim.tick(DT);
    assert!(sim.link().is_holding());

    sim.set_target_position(Vec3::new(5.0, 0.5, 0.0));
    sim.tick(DT);
    assert!(!sim.link().is_holding());
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimEvent::Link(LinkEvent::Cancelled))));
}

#[test]
fn test_removing_zone_uncovers_target() {
    let mut sim = world(Difficulty::Normal);
    let zone = sim.add_zone(AABB::new(Vec3::splat(-1.0), Vec3::ONE), None);
    sim.spawn_target(Vec3::ZERO);

    sim.tick(DT);
    assert!(sim.shadow().is_concealed());

    assert!(sim.remove_zone(zone));
    assert!(!sim.remove_zone(zone));
    sim.tick(DT);
    assert!(!sim.shadow().is_concealed());
    assert_eq!(sim.shadow().current_zone(), None);
}

#[test]
fn test_hard_detects_faster_than_easy() {
    let mut easy = world(Difficulty::Easy);
    let mut hard = world(Difficulty::Hard);
    for sim in [&mut easy, &mut hard] {
        sim.add_guard(&sentry_at_origin()).unwrap();
        sim.spawn_target(Vec3::new(0.0, 0.0, 5.0));
    }

    let easy_ticks = ticks_until_chase(&mut easy, 100).unwrap();
    let hard_ticks = ticks_until_chase(&mut hard, 100).unwrap();
    assert!(hard_ticks < easy_ticks);
    assert!((10..=11).contains(&hard_ticks));
}

#[test]
fn test_hard_scenario_from_toml() {
    let config = SimConfig::from_toml_str(
        r#"
        difficulty = "hard"

        [target]
        spawn = [0.0, 0.0, 12.0]

        [[guards]]
        archetype = "StandingDuty"
        spawn = [0.0, 0.0, 0.0]
        "#,
    )
    .unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();

    let guard = sim.guards().next().unwrap();
    assert_eq!(guard.brain().config().view_radius, 14.0);
    let id = guard.brain().id();

    // Within 14 but beyond the normal radius of 10
    assert!(ticks_until_chase(&mut sim, 20).is_some());
    assert_eq!(sim.guard(id).unwrap().brain().state(), GuardState::Chasing);
}

#[test]
fn test_builtin_scenario_runs() {
    let config = SimConfig::builtin().unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();
    let mut script = TargetScript::from_config(&config.target);
    let dt = config.tick_seconds();

    for _ in 0..(config.duration * config.tick_rate as f32) as usize {
        script.step(dt, &mut sim);
        sim.tick(dt);
        sim.drain_events();
        if sim.outcome().is_some() {
            break;
        }
    }

    assert!(sim.elapsed() > 0.0);
    assert_eq!(sim.guards().count(), config.guards.len());
}
