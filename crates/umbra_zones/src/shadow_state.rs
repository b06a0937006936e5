//! Whether the target is currently hidden in a shadow zone

use crate::events::{ZoneEvent, ZoneEventType};
use umbra_core::ZoneId;

/// Concealment state of the tracked target.
///
/// Invariant: when not concealed, there is no current zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetShadowState {
    concealed: bool,
    current_zone: Option<ZoneId>,
}

impl TargetShadowState {
    /// Create a state with the target out in the open
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the target is inside a shadow zone
    pub fn is_concealed(&self) -> bool {
        self.concealed
    }

    /// Zone the target is hiding in
    pub fn current_zone(&self) -> Option<ZoneId> {
        self.current_zone
    }

    /// Update concealment. Returns whether the state changed.
    ///
    /// Concealing records `zone` as current. Un-concealing with a zone only
    /// clears the state if that zone is the current one, so an exit from a
    /// zone the target already left cannot clobber a newer enter. Passing no
    /// zone clears unconditionally.
    pub fn set_concealed(&mut self, concealed: bool, zone: Option<ZoneId>) -> bool {
        let before = *self;

        if concealed {
            self.concealed = true;
            self.current_zone = zone;
        } else {
            match zone {
                Some(id) if self.current_zone != Some(id) => {
                    log::debug!("Ignoring stale exit from {}", id);
                }
                _ => {
                    self.concealed = false;
                    self.current_zone = None;
                }
            }
        }

        *self != before
    }

    /// Apply an enter/exit event from a zone tracker
    pub fn apply(&mut self, event: &ZoneEvent) -> bool {
        match event.event_type {
            ZoneEventType::Enter => self.set_concealed(true, Some(event.zone)),
            ZoneEventType::Exit => self.set_concealed(false, Some(event.zone)),
        }
    }
}
