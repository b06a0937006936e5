//! # umbra_core - Umbra Core
//!
//! Zero-dependency primitives shared by every simulation crate:
//! - **Ids**: typed identifiers for guards, zones and tracked entities
//! - **Scheduling**: a per-owner timer queue for deferred, cancellable actions
//!
//! Deferred actions are data, not callbacks. An owner schedules a payload
//! with a delay, advances the queue once per tick and handles whatever
//! comes due. Dropping or clearing the queue cancels everything pending.

pub mod id;
pub mod schedule;

pub use id::*;
pub use schedule::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{EntityId, GuardId, IdGenerator, ZoneId};
    pub use crate::schedule::{TaskHandle, TaskQueue};
}
