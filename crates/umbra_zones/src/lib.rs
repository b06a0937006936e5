//! Umbra Zones - Hide Zones and Concealment
//!
//! This crate tracks where the target can hide and whether it currently is.
//!
//! # Features
//!
//! - Shadow zones with box volumes and a surface point for link markers
//! - Registry holding weak references, in registration order
//! - Closest-visible zone query inside a forward cone
//! - Target shadow state with stale-exit protection
//! - Enter/Exit tracking of the target against registered zones
//! - Shadow linking: teleporting between zones with a fade sequence and cooldown
//!
//! # Example
//!
//! ```ignore
//! use umbra_zones::prelude::*;
//!
//! let zone = Rc::new(ShadowZone::new(ZoneId::new(1), AABB::new(min, max)));
//! let mut registry = ShadowRegistry::new();
//! registry.register(&zone);
//!
//! let mut shadow = TargetShadowState::new();
//! let mut tracker = ZoneTracker::new(target_id);
//! for event in tracker.update(dt, target_position, &registry) {
//!     shadow.apply(event);
//! }
//! ```

pub mod events;
pub mod link;
pub mod registry;
pub mod shadow_state;
pub mod tracker;
pub mod zone;

pub mod prelude {
    pub use crate::events::{ZoneEvent, ZoneEventType};
    pub use crate::link::{LinkEvent, ShadowLink, ShadowLinkConfig};
    pub use crate::registry::{ShadowRegistry, LINK_CONE_DEGREES};
    pub use crate::shadow_state::TargetShadowState;
    pub use crate::tracker::ZoneTracker;
    pub use crate::zone::ShadowZone;
}

pub use prelude::*;
