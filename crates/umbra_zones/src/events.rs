//! Zone enter/exit events

use serde::{Deserialize, Serialize};
use umbra_core::{EntityId, ZoneId};

/// Type of zone event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneEventType {
    /// Entity entered the zone volume
    Enter,
    /// Entity left the zone volume (or the zone went away while occupied)
    Exit,
}

/// A zone event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneEvent {
    /// Type of event
    pub event_type: ZoneEventType,
    /// The zone
    pub zone: ZoneId,
    /// The entity that crossed the zone boundary
    pub entity: EntityId,
    /// Time spent in the zone (zero for enter events)
    pub time_in_zone: f32,
}

impl ZoneEvent {
    /// Create an enter event
    pub fn enter(zone: ZoneId, entity: EntityId) -> Self {
        Self {
            event_type: ZoneEventType::Enter,
            zone,
            entity,
            time_in_zone: 0.0,
        }
    }

    /// Create an exit event
    pub fn exit(zone: ZoneId, entity: EntityId, time_spent: f32) -> Self {
        Self {
            event_type: ZoneEventType::Exit,
            zone,
            entity,
            time_in_zone: time_spent,
        }
    }

    /// Check if this is an enter event
    pub fn is_enter(&self) -> bool {
        self.event_type == ZoneEventType::Enter
    }

    /// Check if this is an exit event
    pub fn is_exit(&self) -> bool {
        self.event_type == ZoneEventType::Exit
    }
}
