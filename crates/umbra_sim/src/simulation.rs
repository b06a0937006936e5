//! Simulation root
//!
//! Owns every shared service (outcome, difficulty, shadow registry, target
//! shadow state), the target and the guards, and advances them in a fixed
//! order each tick:
//!
//! 1. scale the delta by the outcome time scale (paused or decided games slow down)
//! 2. zone enter/exit tracking, applied to the target shadow state
//! 3. shadow link
//! 4. win zones
//! 5. guards, whose lose signals go to the outcome notifier

use crate::config::{GuardConfig, SimConfig};
use crate::error::{Result, SimError};
use std::rc::Rc;
use umbra_ai::{
    GuardBrain, GuardController, GuardContext, GuardSignal, NavAgent, PerceptionConfig,
    TargetSnapshot, WaypointPatroller,
};
use umbra_core::{EntityId, GuardId, IdGenerator, ZoneId};
use umbra_gamestate::{
    Difficulty, DifficultyManager, DifficultyProvider, GameOutcome, Outcome, OutcomeNotifier,
};
use umbra_math::{Occluder, OccluderSet, Vec3, AABB};
use umbra_zones::{
    LinkEvent, ShadowLink, ShadowLinkConfig, ShadowRegistry, ShadowZone, TargetShadowState,
    ZoneEvent, ZoneTracker,
};

/// Camera height above the target position, used for shadow link aiming
pub const CAMERA_HEIGHT: f32 = 1.6;

/// Everything observable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A guard signal (cue, transition, attack, lose)
    Guard { guard: GuardId, signal: GuardSignal },
    /// The target crossed a zone boundary
    Zone(ZoneEvent),
    /// Shadow link progress
    Link(LinkEvent),
    /// The game was decided
    Outcome(Outcome),
}

/// The controlled target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTarget {
    pub entity: EntityId,
    pub position: Vec3,
    pub crouching: bool,
    pub camera_forward: Vec3,
}

struct GuardSlot {
    controller: GuardController,
    /// Config before difficulty is applied
    base: PerceptionConfig,
}

/// The world a set of guards and one target live in
pub struct Simulation {
    ids: IdGenerator,
    outcome: GameOutcome,
    difficulty: DifficultyManager,
    default_perception: PerceptionConfig,
    /// Owning handles; the registry only keeps weak references
    zones: Vec<Rc<ShadowZone>>,
    registry: ShadowRegistry,
    shadow: TargetShadowState,
    link: ShadowLink,
    occluders: OccluderSet,
    win_zones: Vec<AABB>,
    target: Option<SimTarget>,
    tracker: Option<ZoneTracker>,
    guards: Vec<GuardSlot>,
    elapsed: f32,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Create an empty world
    pub fn new(
        difficulty: DifficultyManager,
        link: ShadowLinkConfig,
        default_perception: PerceptionConfig,
    ) -> Self {
        Self {
            ids: IdGenerator::new(),
            outcome: GameOutcome::new(),
            difficulty,
            default_perception,
            zones: Vec::new(),
            registry: ShadowRegistry::new(),
            shadow: TargetShadowState::new(),
            link: ShadowLink::new(link),
            occluders: OccluderSet::new(),
            win_zones: Vec::new(),
            target: None,
            tracker: None,
            guards: Vec::new(),
            elapsed: 0.0,
            events: Vec::new(),
        }
    }

    /// Build the world a scenario describes
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let table = config.tiers.clone().unwrap_or_default();
        let difficulty = DifficultyManager::new(table, config.difficulty);
        let mut sim = Self::new(difficulty, config.link, config.perception);

        for zone in &config.zones {
            sim.add_zone(zone.bounds(), zone.surface.map(Vec3::from));
        }
        for win in &config.win_zones {
            sim.add_win_zone(win.bounds());
        }
        for occluder in &config.occluders {
            sim.add_occluder(occluder.to_occluder());
        }

        sim.spawn_target(config.target.spawn.into());
        sim.set_camera_forward(config.target.camera_forward.into());

        for guard in &config.guards {
            sim.add_guard(guard)?;
        }

        log::info!(
            "Simulation ready: {} guards, {} zones, difficulty {}",
            sim.guards.len(),
            sim.zones.len(),
            sim.difficulty.current_difficulty()
        );
        Ok(sim)
    }

    // World setup

    /// Add and register a shadow zone
    pub fn add_zone(&mut self, bounds: AABB, surface: Option<Vec3>) -> ZoneId {
        let id: ZoneId = self.ids.next();
        let mut zone = ShadowZone::new(id, bounds);
        if let Some(point) = surface {
            zone = zone.with_surface_point(point);
        }

        let zone = Rc::new(zone);
        self.registry.register(&zone);
        self.zones.push(zone);
        id
    }

    /// Drop a shadow zone. A target inside it is uncovered on the next tick.
    pub fn remove_zone(&mut self, id: ZoneId) -> bool {
        let before = self.zones.len();
        self.zones.retain(|zone| zone.id() != id);
        let removed = self.zones.len() != before;
        self.registry.unregister(id);
        removed
    }

    pub fn add_win_zone(&mut self, bounds: AABB) {
        self.win_zones.push(bounds);
    }

    pub fn add_occluder(&mut self, occluder: Occluder) {
        self.occluders.push(occluder);
    }

    // Target

    /// Place the target, replacing any previous one
    pub fn spawn_target(&mut self, position: Vec3) -> EntityId {
        self.despawn_target();

        let entity: EntityId = self.ids.next();
        self.target = Some(SimTarget {
            entity,
            position,
            crouching: false,
            camera_forward: Vec3::Z,
        });
        self.tracker = Some(ZoneTracker::new(entity));
        log::debug!("Spawned {} at {:?}", entity, position);
        entity
    }

    /// Remove the target. Guards skip their ticks until a new one spawns.
    pub fn despawn_target(&mut self) {
        if let Some(tracker) = &mut self.tracker {
            for event in tracker.clear() {
                self.shadow.apply(event);
            }
        }
        self.link.cancel();
        self.link.drain_events();
        self.target = None;
        self.tracker = None;
    }

    pub fn set_target_position(&mut self, position: Vec3) {
        if let Some(target) = self.controllable_target() {
            target.position = position;
        }
    }

    pub fn set_crouching(&mut self, crouching: bool) {
        if let Some(target) = self.controllable_target() {
            target.crouching = crouching;
        }
    }

    pub fn set_camera_forward(&mut self, forward: Vec3) {
        if let Some(target) = self.controllable_target() {
            target.camera_forward = forward.normalize_or_zero();
        }
    }

    /// Press the shadow link key
    pub fn press_link(&mut self) {
        if self.controllable_target().is_some() {
            self.link.press();
        }
    }

    /// Release the shadow link key
    pub fn release_link(&mut self) {
        if self.controllable_target().is_some() {
            self.link.release();
        }
    }

    fn controllable_target(&mut self) -> Option<&mut SimTarget> {
        if self.outcome.input_frozen() {
            log::debug!("Target input ignored: game over");
            return None;
        }
        self.target.as_mut()
    }

    // Guards

    /// Spawn a guard with the active difficulty applied
    pub fn add_guard(&mut self, spawn: &GuardConfig) -> Result<GuardId> {
        let id: GuardId = self.ids.next();
        let base = spawn.perception.unwrap_or(self.default_perception);
        let config = base.apply_difficulty(&self.difficulty.current_settings());

        let position = Vec3::from(spawn.spawn);
        let brain = GuardBrain::new(id, spawn.archetype, config, position)?;
        let waypoints = spawn.waypoints.iter().copied().map(Vec3::from).collect();
        let patroller = WaypointPatroller::new(waypoints, spawn.wait_time);
        let agent = NavAgent::new(position, Vec3::from(spawn.facing).normalize_or_zero());

        self.guards.push(GuardSlot {
            controller: GuardController::new(brain, patroller, agent),
            base,
        });
        log::info!("Spawned {} ({:?}) at {:?}", id, spawn.archetype, position);
        Ok(id)
    }

    /// Destroy a guard. Its pending lose notification never fires.
    pub fn remove_guard(&mut self, id: GuardId) -> Result<()> {
        let index = self
            .guards
            .iter()
            .position(|slot| slot.controller.brain().id() == id)
            .ok_or(SimError::UnknownGuard(id))?;

        let mut slot = self.guards.remove(index);
        slot.controller.shutdown();
        log::info!("Removed {}", id);
        Ok(())
    }

    pub fn guard(&self, id: GuardId) -> Option<&GuardController> {
        self.guards
            .iter()
            .map(|slot| &slot.controller)
            .find(|controller| controller.brain().id() == id)
    }

    pub fn guards(&self) -> impl Iterator<Item = &GuardController> {
        self.guards.iter().map(|slot| &slot.controller)
    }

    // Game services

    /// Switch tier and push the whole new snapshot to every guard
    pub fn set_difficulty(&mut self, tier: Difficulty) -> Result<()> {
        self.difficulty.set_difficulty(tier);
        let settings = self.difficulty.current_settings();

        for slot in &mut self.guards {
            let config = slot.base.apply_difficulty(&settings);
            slot.controller.brain_mut().set_config(config)?;
        }
        Ok(())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.current_difficulty()
    }

    /// Open or close the pause menu
    pub fn toggle_menu(&mut self) -> bool {
        self.outcome.toggle_menu()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.outcome()
    }

    pub fn game(&self) -> &GameOutcome {
        &self.outcome
    }

    pub fn shadow(&self) -> &TargetShadowState {
        &self.shadow
    }

    pub fn registry(&self) -> &ShadowRegistry {
        &self.registry
    }

    pub fn link(&self) -> &ShadowLink {
        &self.link
    }

    pub fn target(&self) -> Option<&SimTarget> {
        self.target.as_ref()
    }

    /// Scaled time simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the world by `delta_time` unscaled seconds
    pub fn tick(&mut self, delta_time: f32) {
        let dt = delta_time * self.outcome.time_scale();
        if dt <= 0.0 {
            return;
        }
        self.elapsed += dt;

        if let (Some(target), Some(tracker)) = (&mut self.target, &mut self.tracker) {
            for event in tracker.update(dt, target.position, &self.registry) {
                self.shadow.apply(event);
                self.events.push(SimEvent::Zone(*event));
            }

            let camera = target.position + Vec3::UP * CAMERA_HEIGHT;
            let teleport = self.link.update(
                dt,
                camera,
                target.camera_forward,
                &self.shadow,
                &self.registry,
                &self.occluders,
            );
            if let Some(destination) = teleport {
                target.position = destination;
            }
            self.events
                .extend(self.link.drain_events().into_iter().map(SimEvent::Link));

            let escaped = self
                .win_zones
                .iter()
                .any(|zone| zone.contains_point(target.position));
            if escaped && self.outcome.trigger_win() {
                self.events.push(SimEvent::Outcome(Outcome::Won));
            }
        }

        let snapshot = self.target.map(|target| TargetSnapshot {
            entity: target.entity,
            position: target.position,
            crouching: target.crouching,
        });
        let context = GuardContext {
            target: snapshot,
            shadow: &self.shadow,
            occluders: &self.occluders,
        };

        for slot in &mut self.guards {
            slot.controller.tick(dt, &context);

            let guard = slot.controller.brain().id();
            for signal in slot.controller.drain_signals() {
                self.events.push(SimEvent::Guard { guard, signal });
                if signal == GuardSignal::Lose && self.outcome.trigger_lose() {
                    self.events.push(SimEvent::Outcome(Outcome::Lost));
                }
            }
        }
    }
}
