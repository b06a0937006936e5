//! Shadow linking: teleporting from one hide zone to another
//!
//! While concealed, holding the link input aims at the closest visible zone
//! in front of the camera and places a marker on its surface. Releasing the
//! input with a target starts the link sequence:
//!
//! 1. fade out for `suck_duration`
//! 2. move the target to the zone centre, lifted by `teleport_height`
//! 3. fade back in for `suck_duration`
//! 4. cooldown for `cooldown_duration`, during which linking is blocked
//!
//! The sequence runs on a [`TaskQueue`] owned by the link, so tearing the
//! link down (or calling [`ShadowLink::cancel`]) drops every pending step.

use crate::registry::ShadowRegistry;
use crate::shadow_state::TargetShadowState;
use serde::{Deserialize, Serialize};
use umbra_core::{TaskQueue, ZoneId};
use umbra_math::{OcclusionQuery, Vec3};

/// Shadow link tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowLinkConfig {
    /// Maximum distance from the camera to a link target
    pub max_link_distance: f32,
    /// Time linking stays blocked after a completed link
    pub cooldown_duration: f32,
    /// Duration of each fade half of the sequence
    pub suck_duration: f32,
    /// Lift above the zone centre where the target reappears
    pub teleport_height: f32,
}

impl Default for ShadowLinkConfig {
    fn default() -> Self {
        Self {
            max_link_distance: 20.0,
            cooldown_duration: 5.0,
            suck_duration: 0.5,
            teleport_height: 1.5,
        }
    }
}

/// Observable link events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkEvent {
    /// A new zone is being aimed at; `marker` is where the marker sits
    TargetChanged { zone: ZoneId, marker: Vec3 },
    /// Hold released without a target, concealment lost, or sequence torn down
    Cancelled,
    /// Release with a target: fade out started
    TeleportStarted { zone: ZoneId },
    /// The target was moved
    Teleported { destination: Vec3 },
    /// Fade in finished, linking blocked
    CooldownStarted,
    /// Linking available again
    CooldownFinished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LinkTask {
    Teleport { destination: Vec3 },
    FadeInComplete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LinkTarget {
    zone: ZoneId,
    marker: Vec3,
    destination: Vec3,
}

/// Per-target shadow link controller
#[derive(Debug, Clone)]
pub struct ShadowLink {
    config: ShadowLinkConfig,
    /// Link input edges since the last update
    pressed: bool,
    released: bool,
    holding: bool,
    target: Option<LinkTarget>,
    /// Queue time at which the running sequence started
    sequence_start: Option<f64>,
    tasks: TaskQueue<LinkTask>,
    cooldown_remaining: f32,
    events: Vec<LinkEvent>,
}

impl ShadowLink {
    /// Create an idle link
    pub fn new(config: ShadowLinkConfig) -> Self {
        Self {
            config,
            pressed: false,
            released: false,
            holding: false,
            target: None,
            sequence_start: None,
            tasks: TaskQueue::new(),
            cooldown_remaining: 0.0,
            events: Vec::new(),
        }
    }

    /// Link tunables
    pub fn config(&self) -> &ShadowLinkConfig {
        &self.config
    }

    /// Link input went down
    pub fn press(&mut self) {
        self.pressed = true;
    }

    /// Link input went up
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Whether the link input is being held while aiming
    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Zone currently aimed at
    pub fn target_zone(&self) -> Option<ZoneId> {
        self.target.map(|t| t.zone)
    }

    /// Marker position on the aimed zone
    pub fn marker(&self) -> Option<Vec3> {
        self.target.map(|t| t.marker)
    }

    /// Whether a link sequence is running
    pub fn in_sequence(&self) -> bool {
        self.sequence_start.is_some()
    }

    /// Whether linking is blocked by the cooldown
    pub fn on_cooldown(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    /// Cooldown fill in `[0, 1]`; 1 when linking is available
    pub fn cooldown_progress(&self) -> f32 {
        if !self.on_cooldown() || self.config.cooldown_duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.cooldown_remaining / self.config.cooldown_duration).clamp(0.0, 1.0)
    }

    /// Screen fade opacity: rises to 1 during fade out, falls back to 0
    pub fn fade_alpha(&self) -> f32 {
        let Some(start) = self.sequence_start else {
            return 0.0;
        };

        let duration = self.config.suck_duration;
        if duration <= 0.0 {
            return 0.0;
        }

        let elapsed = (self.tasks.now() - start) as f32;
        if elapsed < duration {
            (elapsed / duration).clamp(0.0, 1.0)
        } else {
            (1.0 - (elapsed - duration) / duration).clamp(0.0, 1.0)
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<LinkEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tear down the hold and any running sequence. Pending steps never fire.
    pub fn cancel(&mut self) {
        let had_work = self.holding || self.target.is_some() || self.in_sequence();

        self.tasks.clear();
        self.sequence_start = None;
        self.holding = false;
        self.pressed = false;
        self.released = false;
        self.target = None;

        if had_work {
            log::debug!("Shadow link cancelled");
            self.events.push(LinkEvent::Cancelled);
        }
    }

    /// Advance the link by one tick.
    ///
    /// Returns the new target position on the tick the teleport happens.
    pub fn update(
        &mut self,
        delta_time: f32,
        camera_position: Vec3,
        camera_forward: Vec3,
        shadow: &TargetShadowState,
        registry: &ShadowRegistry,
        occluders: &dyn OcclusionQuery,
    ) -> Option<Vec3> {
        let pressed = std::mem::take(&mut self.pressed);
        let released = std::mem::take(&mut self.released);

        if self.on_cooldown() {
            self.cooldown_remaining -= delta_time;
            if self.cooldown_remaining <= 0.0 {
                self.cooldown_remaining = 0.0;
                self.events.push(LinkEvent::CooldownFinished);
            }
            return None;
        }

        if self.in_sequence() {
            return self.advance_sequence(delta_time);
        }

        if !shadow.is_concealed() {
            if self.holding || self.target.is_some() {
                self.events.push(LinkEvent::Cancelled);
            }
            self.holding = false;
            self.target = None;
            return None;
        }

        if pressed {
            self.holding = true;
        }

        if released {
            let target = self.target.take().filter(|t| registry.contains(t.zone));
            match target {
                Some(target) if self.holding => self.start_sequence(target),
                _ => {
                    log::debug!("Shadow link released without a target");
                    self.events.push(LinkEvent::Cancelled);
                }
            }
            self.holding = false;
        }

        if self.holding {
            self.aim(camera_position, camera_forward, shadow, registry, occluders);
        }

        None
    }

    fn aim(
        &mut self,
        camera_position: Vec3,
        camera_forward: Vec3,
        shadow: &TargetShadowState,
        registry: &ShadowRegistry,
        occluders: &dyn OcclusionQuery,
    ) {
        let current = shadow.current_zone();
        let found = registry.closest_visible(
            camera_position,
            camera_forward,
            self.config.max_link_distance,
            occluders,
            current,
        );

        // Keep the previous target when nothing qualifies this tick
        let Some(zone) = found else {
            return;
        };

        let target = LinkTarget {
            zone: zone.id(),
            marker: zone.surface_point(),
            destination: zone.center() + Vec3::UP * self.config.teleport_height,
        };

        if self.target.map(|t| t.zone) != Some(target.zone) {
            self.events.push(LinkEvent::TargetChanged {
                zone: target.zone,
                marker: target.marker,
            });
        }
        self.target = Some(target);
    }

    fn start_sequence(&mut self, target: LinkTarget) {
        log::info!("Shadow linking to {}", target.zone);

        let duration = self.config.suck_duration;
        self.tasks.schedule(
            duration,
            LinkTask::Teleport {
                destination: target.destination,
            },
        );
        self.tasks.schedule(duration * 2.0, LinkTask::FadeInComplete);
        self.sequence_start = Some(self.tasks.now());
        self.events.push(LinkEvent::TeleportStarted { zone: target.zone });
    }

    fn advance_sequence(&mut self, delta_time: f32) -> Option<Vec3> {
        let mut teleported = None;

        for task in self.tasks.advance(delta_time) {
            match task {
                LinkTask::Teleport { destination } => {
                    log::debug!("Shadow link teleport to {:?}", destination);
                    self.events.push(LinkEvent::Teleported { destination });
                    teleported = Some(destination);
                }
                LinkTask::FadeInComplete => {
                    self.sequence_start = None;
                    self.cooldown_remaining = self.config.cooldown_duration;
                    self.events.push(LinkEvent::CooldownStarted);
                }
            }
        }

        teleported
    }
}

impl Default for ShadowLink {
    fn default() -> Self {
        Self::new(ShadowLinkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ShadowZone;
    use approx::assert_relative_eq;
    use std::rc::Rc;
    use umbra_math::{OccluderSet, AABB};

    struct Scene {
        registry: ShadowRegistry,
        shadow: TargetShadowState,
        occluders: OccluderSet,
        zones: Vec<Rc<ShadowZone>>,
    }

    fn scene() -> Scene {
        let zones: Vec<_> = [(1, 0.0), (2, 6.0), (3, 12.0)]
            .into_iter()
            .map(|(id, z)| {
                Rc::new(ShadowZone::new(
                    ZoneId::new(id),
                    AABB::from_center_half_extents(Vec3::new(0.0, 0.0, z), Vec3::ONE),
                ))
            })
            .collect();

        let mut registry = ShadowRegistry::new();
        for zone in &zones {
            registry.register(zone);
        }

        let mut shadow = TargetShadowState::new();
        shadow.set_concealed(true, Some(ZoneId::new(1)));

        Scene {
            registry,
            shadow,
            occluders: OccluderSet::new(),
            zones,
        }
    }

    fn tick(link: &mut ShadowLink, scene: &Scene, dt: f32) -> Option<Vec3> {
        link.update(dt, Vec3::ZERO, Vec3::Z, &scene.shadow, &scene.registry, &scene.occluders)
    }

    #[test]
    fn test_aims_at_closest_other_zone() {
        let scene = scene();
        let mut link = ShadowLink::default();

        link.press();
        tick(&mut link, &scene, 0.1);

        assert!(link.is_holding());
        assert_eq!(link.target_zone(), Some(ZoneId::new(2)));
        assert!(matches!(
            link.drain_events().as_slice(),
            [LinkEvent::TargetChanged { .. }]
        ));
    }

    #[test]
    fn test_full_sequence() {
        let scene = scene();
        let mut link = ShadowLink::default();

        link.press();
        tick(&mut link, &scene, 0.25);
        link.release();
        assert!(tick(&mut link, &scene, 0.25).is_none());
        assert!(link.in_sequence());

        assert!(tick(&mut link, &scene, 0.25).is_none());
        assert_relative_eq!(link.fade_alpha(), 0.5);

        let destination = tick(&mut link, &scene, 0.25).unwrap();
        assert_relative_eq!(destination.y, 1.5);
        assert_relative_eq!(destination.z, 6.0);

        tick(&mut link, &scene, 0.25);
        assert_relative_eq!(link.fade_alpha(), 0.5);
        tick(&mut link, &scene, 0.25);
        assert!(!link.in_sequence());
        assert!(link.on_cooldown());
        assert_relative_eq!(link.cooldown_progress(), 0.0);

        // Blocked during cooldown
        link.press();
        for _ in 0..19 {
            tick(&mut link, &scene, 0.25);
            assert!(!link.is_holding());
        }
        tick(&mut link, &scene, 0.25);
        assert!(!link.on_cooldown());

        let events = link.drain_events();
        assert!(events.contains(&LinkEvent::TeleportStarted { zone: ZoneId::new(2) }));
        assert!(events.contains(&LinkEvent::CooldownStarted));
        assert_eq!(events.last(), Some(&LinkEvent::CooldownFinished));
    }

    #[test]
    fn test_release_without_target_cancels() {
        let mut scene = scene();
        scene.zones.truncate(1);
        let mut link = ShadowLink::default();

        link.press();
        tick(&mut link, &scene, 0.1);
        assert_eq!(link.target_zone(), None);

        link.release();
        tick(&mut link, &scene, 0.1);
        assert!(!link.in_sequence());
        assert_eq!(link.drain_events(), vec![LinkEvent::Cancelled]);
    }

    #[test]
    fn test_losing_concealment_drops_hold() {
        let mut scene = scene();
        let mut link = ShadowLink::default();

        link.press();
        tick(&mut link, &scene, 0.1);
        assert!(link.target_zone().is_some());

        scene.shadow.set_concealed(false, None);
        tick(&mut link, &scene, 0.1);
        assert!(!link.is_holding());
        assert_eq!(link.target_zone(), None);
    }

    #[test]
    fn test_cancel_mid_sequence_never_teleports() {
        let scene = scene();
        let mut link = ShadowLink::default();

        link.press();
        tick(&mut link, &scene, 0.1);
        link.release();
        tick(&mut link, &scene, 0.1);
        assert!(link.in_sequence());

        link.cancel();
        for _ in 0..20 {
            assert!(tick(&mut link, &scene, 0.1).is_none());
        }
        assert!(!link.on_cooldown());
        assert_eq!(link.fade_alpha(), 0.0);
    }
}
