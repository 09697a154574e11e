//! # Meta Events
//!
//! Lifecycle events an emitter raises about itself. Only these names may
//! be bound on the meta queue.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaEvent {
    /// A persistent handler was bound
    #[serde(rename = "all.on")]
    OnBound,
    /// A one-shot handler was bound
    #[serde(rename = "all.once")]
    OnceBound,
    /// An event was removed from every queue
    #[serde(rename = "all.off")]
    Off,
    /// Any event finished dispatching
    #[serde(rename = "all.trigger")]
    AnyTriggered,
}

impl MetaEvent {
    /// Every reserved meta event, in declaration order
    pub const ALL: [MetaEvent; 4] = [
        MetaEvent::OnBound,
        MetaEvent::OnceBound,
        MetaEvent::Off,
        MetaEvent::AnyTriggered,
    ];

    /// Returns the event name used on the queues
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaEvent::OnBound => "all.on",
            MetaEvent::OnceBound => "all.once",
            MetaEvent::Off => "all.off",
            MetaEvent::AnyTriggered => "all.trigger",
        }
    }

    /// Resolve a queue name back to its meta event
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for MetaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
