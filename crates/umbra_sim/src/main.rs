//! Umbra headless demo
//!
//! Runs a scenario with a scripted target and logs what the guards do.
//!
//! Run with: cargo run -p umbra_sim -- [scenario.toml]
//! Set UMBRA_DIFFICULTY=easy|normal|hard to override the scenario tier.

use std::process::ExitCode;
use umbra_ai::GuardSignal;
use umbra_gamestate::Outcome;
use umbra_sim::prelude::*;
use umbra_zones::LinkEvent;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    config.apply_env_overrides();
    config.print_summary();

    let mut sim = match Simulation::from_config(&config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to build simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut script = TargetScript::from_config(&config.target);

    let dt = config.tick_seconds();
    let ticks = (config.duration * config.tick_rate as f32).ceil() as u64;

    for _ in 0..ticks {
        script.step(dt, &mut sim);
        sim.tick(dt);

        for event in sim.drain_events() {
            report(sim.elapsed(), &event);
        }

        if sim.outcome().is_some() {
            break;
        }
    }

    match sim.outcome() {
        Some(Outcome::Won) => log::info!("Target escaped after {:.2}s", sim.elapsed()),
        Some(Outcome::Lost) => log::info!("Target caught after {:.2}s", sim.elapsed()),
        None => log::info!("Undecided after {:.2}s", sim.elapsed()),
    }
    ExitCode::SUCCESS
}

fn load_config() -> umbra_sim::error::Result<SimConfig> {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No scenario given, using built-in courtyard");
        return SimConfig::builtin();
    };

    SimConfig::load_from_file(&path).or_else(|e| {
        log::warn!("Could not load {}: {}. Using built-in courtyard", path, e);
        SimConfig::builtin()
    })
}

fn report(time: f32, event: &SimEvent) {
    match event {
        SimEvent::Guard {
            guard,
            signal: GuardSignal::StateChanged { from, to },
        } => log::info!("[{:6.2}] {} {} -> {}", time, guard, from, to),
        SimEvent::Guard {
            guard,
            signal: GuardSignal::Attack,
        } => log::info!("[{:6.2}] {} attacks", time, guard),
        SimEvent::Guard { guard, signal } => log::debug!("[{:6.2}] {} {:?}", time, guard, signal),
        SimEvent::Zone(zone) => log::debug!(
            "[{:6.2}] {} {:?} {}",
            time,
            zone.entity,
            zone.event_type,
            zone.zone
        ),
        SimEvent::Link(LinkEvent::Teleported { destination }) => {
            log::info!("[{:6.2}] Shadow linked to {:?}", time, destination)
        }
        SimEvent::Link(link) => log::debug!("[{:6.2}] {:?}", time, link),
        SimEvent::Outcome(outcome) => log::info!("[{:6.2}] Outcome: {:?}", time, outcome),
    }
}
