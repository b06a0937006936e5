//! Guard brain: perception-driven patrol/chase state machine
//!
//! Each tick runs in a fixed order: due deferred tasks, visibility probe,
//! timer update and state transition, then navigation commands. Shared
//! services are passed in per tick through [`GuardContext`]; the brain owns
//! only its own state, timers and pending tasks.
//!
//! # Lifecycle
//!
//! ```text
//! Idle / Patrol --(detect timer reaches detection_time)--> Chasing
//! Chasing --(lose timer < 0, then inspect timer <= 0)--> Idle / Patrol
//! Chasing --(visible within kill distance)--> attack --(0.8)--> lose, disabled
//! ```

use crate::config::PerceptionConfig;
use crate::error::{AiError, Result};
use crate::navigation::NavigationService;
use crate::perception::{eye_point, is_visible, Concealment, SightQuery};
use crate::state_machine::{guard_machine, GuardArchetype, GuardEvent, GuardState, StateMachine};
use umbra_core::{EntityId, GuardId, TaskQueue};
use umbra_math::{OcclusionQuery, Vec3};
use umbra_zones::TargetShadowState;

/// Delay between the attack and the lose notification
pub const ATTACK_LOSE_DELAY: f32 = 0.8;

/// Minimum speed change reported as a new locomotion cue
const SPEED_CUE_EPSILON: f32 = 1e-3;

/// Where the guard is and where it faces this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardPose {
    pub position: Vec3,
    pub forward: Vec3,
    /// Explicit eye point; defaults to a fixed height above `position`
    pub eye: Option<Vec3>,
}

impl GuardPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            eye: None,
        }
    }
}

/// What the guard knows about the target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub entity: EntityId,
    pub position: Vec3,
    pub crouching: bool,
}

/// Shared services a guard reads during a tick
pub struct GuardContext<'a> {
    /// The tracked target, if one is registered
    pub target: Option<TargetSnapshot>,
    /// Concealment state of the target
    pub shadow: &'a TargetShadowState,
    /// Geometry that blocks sight
    pub occluders: &'a dyn OcclusionQuery,
}

impl GuardContext<'_> {
    fn require_target(&self) -> Result<TargetSnapshot> {
        self.target.ok_or(AiError::MissingReference("target"))
    }
}

/// Footstep loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Footsteps {
    Silent,
    Walk,
    Run,
}

/// Side effects for audio, animation and the game outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardSignal {
    /// Top-level state changed
    StateChanged { from: GuardState, to: GuardState },
    /// Attack animation trigger
    Attack,
    /// Attack sound
    AttackSound,
    /// The target was caught; the game is lost
    Lose,
    /// Inspecting animation flag
    Inspecting(bool),
    /// Running animation flag
    Running(bool),
    /// Footstep loop changed
    Footsteps(Footsteps),
    /// Chase alarm loop on/off
    ChaseAlarm(bool),
    /// Background music resumed (`true`) or stopped (`false`)
    Music(bool),
    /// Locomotion speed for animation blending
    Speed(f32),
}

/// Detection, lose and inspection timers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionTimers {
    /// Sustained-sight accumulator, kept in `[0, detection_time]`
    pub detect: f32,
    /// Time left before a chasing guard stops to inspect
    pub lose: f32,
    /// Time left inspecting before giving up
    pub inspect: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardTask {
    TriggerLose,
}

/// Last emitted cue values, so signals are sent on change only
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cues {
    footsteps: Footsteps,
    running: bool,
    inspecting: bool,
    chase_alarm: bool,
    music: bool,
    speed: f32,
}

impl Default for Cues {
    fn default() -> Self {
        Self {
            footsteps: Footsteps::Silent,
            running: false,
            inspecting: false,
            chase_alarm: false,
            music: true,
            speed: 0.0,
        }
    }
}

/// One guard's decision making
#[derive(Debug, Clone)]
pub struct GuardBrain {
    id: GuardId,
    archetype: GuardArchetype,
    machine: StateMachine<GuardState, GuardEvent>,
    config: PerceptionConfig,
    timers: DetectionTimers,
    /// Post for standing-duty guards
    origin: Vec3,
    inspecting: bool,
    attacking: bool,
    active: bool,
    tasks: TaskQueue<GuardTask>,
    cues: Cues,
    signals: Vec<GuardSignal>,
}

impl GuardBrain {
    /// Create a guard at its post. The config is validated, never clamped.
    pub fn new(
        id: GuardId,
        archetype: GuardArchetype,
        config: PerceptionConfig,
        origin: Vec3,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            id,
            archetype,
            machine: guard_machine(archetype),
            config,
            timers: DetectionTimers::default(),
            origin,
            inspecting: false,
            attacking: false,
            active: true,
            tasks: TaskQueue::new(),
            cues: Cues::default(),
            signals: Vec::new(),
        })
    }

    pub fn id(&self) -> GuardId {
        self.id
    }

    pub fn archetype(&self) -> GuardArchetype {
        self.archetype
    }

    pub fn state(&self) -> GuardState {
        self.machine.current()
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    pub fn timers(&self) -> &DetectionTimers {
        &self.timers
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Whether the guard stopped chasing to look around
    pub fn is_inspecting(&self) -> bool {
        self.inspecting
    }

    /// Whether the guard caught the target and is waiting to report it
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Whether the guard still processes ticks
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Replace the whole config (e.g. after a difficulty change)
    pub fn set_config(&mut self, config: PerceptionConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.timers.detect = self.timers.detect.min(config.detection_time);
        Ok(())
    }

    /// Take the signals produced since the last drain
    pub fn drain_signals(&mut self) -> Vec<GuardSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Stop processing and drop pending tasks; a scheduled lose never fires
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("{} shut down with pending tasks", self.id);
        }
        self.tasks.clear();
        self.active = false;
    }

    /// Run one tick
    pub fn tick(
        &mut self,
        delta_time: f32,
        pose: &GuardPose,
        context: &GuardContext<'_>,
        nav: &mut dyn NavigationService,
    ) {
        for task in self.tasks.advance(delta_time) {
            match task {
                GuardTask::TriggerLose => self.trigger_lose(),
            }
        }

        if !self.active || self.attacking {
            return;
        }

        let target = match context.require_target() {
            Ok(target) => target,
            Err(err) => {
                log::debug!("{} skipped tick: {}", self.id, err);
                return;
            }
        };

        let visible = self.can_see(pose, &target, context);

        match self.state() {
            GuardState::Idle => self.idle(delta_time, pose, &target, visible, nav),
            GuardState::Patrol => {
                self.scan(delta_time, &target, visible, Footsteps::Walk, nav)
            }
            GuardState::Chasing => self.chase(delta_time, pose, &target, visible, nav),
        }

        self.cue_speed(nav.velocity().length());
    }

    fn can_see(&self, pose: &GuardPose, target: &TargetSnapshot, context: &GuardContext<'_>) -> bool {
        let query = SightQuery {
            eye: eye_point(pose.position, pose.eye),
            forward: pose.forward,
            target: target.position,
            view_radius: self.config.view_radius,
            view_angle: self.config.view_angle,
        };
        let concealment = Concealment {
            concealed: context.shadow.is_concealed(),
            crouching: target.crouching,
        };

        is_visible(&query, context.occluders, Some(target.entity.raw()), concealment)
    }

    fn idle(
        &mut self,
        delta_time: f32,
        pose: &GuardPose,
        target: &TargetSnapshot,
        visible: bool,
        nav: &mut dyn NavigationService,
    ) {
        let away = pose.position.distance(self.origin) > nav.stopping_distance();
        if away {
            nav.set_destination(self.origin);
        }

        let footsteps = if away { Footsteps::Walk } else { Footsteps::Silent };
        self.scan(delta_time, target, visible, footsteps, nav);
    }

    /// Patrol sub-behaviour: walk and accumulate sight
    fn scan(
        &mut self,
        delta_time: f32,
        target: &TargetSnapshot,
        visible: bool,
        footsteps: Footsteps,
        nav: &mut dyn NavigationService,
    ) {
        nav.set_speed(self.config.walk_speed);
        self.cue_footsteps(footsteps);

        let threshold = self.config.detection_time;
        if visible {
            self.timers.detect = (self.timers.detect + delta_time).min(threshold);
            log::trace!("{} detect {:.2}/{:.2}", self.id, self.timers.detect, threshold);

            if self.timers.detect >= threshold {
                self.enter_chase();
                nav.set_destination(target.position);
            }
        } else {
            self.timers.detect = (self.timers.detect - delta_time).clamp(0.0, threshold);
        }
    }

    fn chase(
        &mut self,
        delta_time: f32,
        pose: &GuardPose,
        target: &TargetSnapshot,
        visible: bool,
        nav: &mut dyn NavigationService,
    ) {
        // Live position, re-issued every tick even while out of sight
        nav.set_speed(self.config.chase_speed);
        nav.set_destination(target.position);

        if visible {
            if self.inspecting {
                self.inspecting = false;
                self.cue_inspecting(false);
                log::info!("{} spotted the target again", self.id);
            }
            self.cue_pursuit();

            if pose.position.distance(target.position) <= self.config.kill_distance {
                self.attack(nav);
            } else {
                nav.halt(false);
            }

            self.timers.lose = self.config.lose_player_time;
            self.timers.inspect = self.config.inspection_time;
            return;
        }

        self.timers.lose -= delta_time;
        if self.timers.lose >= 0.0 {
            return;
        }

        nav.halt(true);
        if !self.inspecting {
            self.inspecting = true;
            log::info!("{} lost sight, inspecting", self.id);
        }
        self.cue_footsteps(Footsteps::Silent);
        self.cue_running(false);
        self.cue_inspecting(true);

        self.timers.inspect -= delta_time;
        if self.timers.inspect <= 0.0 {
            self.give_up(nav);
        }
    }

    fn enter_chase(&mut self) {
        self.timers.lose = self.config.lose_player_time;
        self.timers.inspect = self.config.inspection_time;
        self.transition(GuardEvent::TargetDetected);
        self.cue_pursuit();
    }

    fn give_up(&mut self, nav: &mut dyn NavigationService) {
        nav.halt(false);
        self.inspecting = false;
        self.timers.detect = 0.0;
        self.cue_inspecting(false);
        self.cue_chase_alarm(false);
        self.cue_music(true);
        self.transition(GuardEvent::TargetLost);
    }

    fn attack(&mut self, nav: &mut dyn NavigationService) {
        nav.halt(true);
        self.attacking = true;

        self.cue_footsteps(Footsteps::Silent);
        self.cue_chase_alarm(false);
        self.signals.push(GuardSignal::AttackSound);
        self.signals.push(GuardSignal::Attack);
        self.tasks.schedule(ATTACK_LOSE_DELAY, GuardTask::TriggerLose);

        log::info!("{} attacking the target", self.id);
    }

    fn trigger_lose(&mut self) {
        if !self.active {
            return;
        }

        self.cue_footsteps(Footsteps::Silent);
        self.cue_chase_alarm(false);
        self.signals.push(GuardSignal::Lose);
        self.active = false;

        log::info!("{} caught the target", self.id);
    }

    fn transition(&mut self, event: GuardEvent) {
        let from = self.state();
        match self.machine.handle(event) {
            Some(to) => {
                log::info!("{} {} -> {}", self.id, from, to);
                self.signals.push(GuardSignal::StateChanged { from, to });
            }
            None => log::warn!("{} ignored {:?} in {}", self.id, event, from),
        }
    }

    fn cue_pursuit(&mut self) {
        self.cue_running(true);
        self.cue_footsteps(Footsteps::Run);
        self.cue_chase_alarm(true);
        self.cue_music(false);
    }

    fn cue_footsteps(&mut self, footsteps: Footsteps) {
        if self.cues.footsteps != footsteps {
            self.cues.footsteps = footsteps;
            self.signals.push(GuardSignal::Footsteps(footsteps));
        }
    }

    fn cue_running(&mut self, running: bool) {
        if self.cues.running != running {
            self.cues.running = running;
            self.signals.push(GuardSignal::Running(running));
        }
    }

    fn cue_inspecting(&mut self, inspecting: bool) {
        if self.cues.inspecting != inspecting {
            self.cues.inspecting = inspecting;
            self.signals.push(GuardSignal::Inspecting(inspecting));
        }
    }

    fn cue_chase_alarm(&mut self, on: bool) {
        if self.cues.chase_alarm != on {
            self.cues.chase_alarm = on;
            self.signals.push(GuardSignal::ChaseAlarm(on));
        }
    }

    fn cue_music(&mut self, playing: bool) {
        if self.cues.music != playing {
            self.cues.music = playing;
            self.signals.push(GuardSignal::Music(playing));
        }
    }

    fn cue_speed(&mut self, speed: f32) {
        if (self.cues.speed - speed).abs() > SPEED_CUE_EPSILON {
            self.cues.speed = speed;
            self.signals.push(GuardSignal::Speed(speed));
        }
    }
}
