//! # Events
//!
//! Multi-queue event emitter shared by containers, validators and
//! documents.
//!
//! ## Architecture
//!
//! - **Emitter**: persistent, one-shot and meta queues with synchronous dispatch
//! - **Meta events**: `all.on`, `all.once`, `all.off`, `all.trigger`
//! - **Bonding**: re-fire a child emitter's events on a parent

pub mod emitter;
pub mod errors;
pub mod meta;

pub use emitter::{EventEmitter, Eventful, Handler, QueueKind, QueueSnapshot};
pub use errors::{EventError, EventResult};
pub use meta::MetaEvent;
