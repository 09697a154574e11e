//! # Event Emitter
//!
//! Synchronous, in-process event dispatch over three queues:
//!
//! - **persistent**: handlers fire on every trigger
//! - **once**: handlers fire on the next trigger, then are dropped
//! - **meta**: handlers bound to the reserved [`MetaEvent`] names
//!
//! Handlers run depth-first inside `trigger`, in registration order.
//! After every dispatch the emitter raises `all.trigger` describing what
//! just fired. `all.trigger` is never announced itself, and an event is
//! not announced again while its own `all.trigger` dispatch is running.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use serde_json::Value;

use super::errors::{EventError, EventResult};
use super::meta::MetaEvent;

/// Event handler. Receives the trigger arguments positionally.
pub type Handler = Rc<dyn Fn(&[Value])>;

/// The queue a handler was bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    Persistent,
    Once,
    Meta,
}

impl QueueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::Persistent => "persistent",
            QueueKind::Once => "once",
            QueueKind::Meta => "meta",
        }
    }
}

/// Read-only view of the queues: event name to bound handler count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub persistent: BTreeMap<String, usize>,
    pub once: BTreeMap<String, usize>,
    pub meta: BTreeMap<String, usize>,
}

impl QueueSnapshot {
    /// True when no handler is bound on any queue
    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty() && self.once.is_empty() && self.meta.is_empty()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Queues {
    persistent: BTreeMap<String, Vec<Handler>>,
    once: BTreeMap<String, Vec<Handler>>,
    meta: BTreeMap<String, Vec<Handler>>,
}

impl Queues {
    fn queue_mut(&mut self, kind: QueueKind) -> &mut BTreeMap<String, Vec<Handler>> {
        match kind {
            QueueKind::Persistent => &mut self.persistent,
            QueueKind::Once => &mut self.once,
            QueueKind::Meta => &mut self.meta,
        }
    }

    fn snapshot(&self) -> QueueSnapshot {
        fn counts(queue: &BTreeMap<String, Vec<Handler>>) -> BTreeMap<String, usize> {
            queue.iter().map(|(k, v)| (k.clone(), v.len())).collect()
        }

        QueueSnapshot {
            persistent: counts(&self.persistent),
            once: counts(&self.once),
            meta: counts(&self.meta),
        }
    }
}

struct EmitterState {
    queues: RefCell<Queues>,
    /// Events whose `all.trigger` dispatch is in progress.
    announcing: RefCell<HashSet<String>>,
}

/// Marks an event as being announced until dropped.
struct Announcing<'a> {
    names: &'a RefCell<HashSet<String>>,
    event: String,
}

impl<'a> Announcing<'a> {
    /// Returns `None` if `event` is already being announced.
    fn enter(names: &'a RefCell<HashSet<String>>, event: &str) -> Option<Self> {
        if !names.borrow_mut().insert(event.to_string()) {
            return None;
        }
        Some(Self {
            names,
            event: event.to_string(),
        })
    }
}

impl Drop for Announcing<'_> {
    fn drop(&mut self) {
        self.names.borrow_mut().remove(&self.event);
    }
}

/// Shared handle to an emitter's queues.
///
/// Cloning the handle shares the queues. Emitters are single-threaded.
#[derive(Clone)]
pub struct EventEmitter {
    state: Rc<EmitterState>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("queues", &self.describe())
            .finish()
    }
}

impl EventEmitter {
    /// Create an emitter with empty queues
    pub fn new() -> Self {
        Self {
            state: Rc::new(EmitterState {
                queues: RefCell::new(Queues::default()),
                announcing: RefCell::new(HashSet::new()),
            }),
        }
    }

    /// Bind a handler that fires every time `event` is triggered.
    pub fn on<F>(&self, event: &str, handler: F) -> EventResult<()>
    where
        F: Fn(&[Value]) + 'static,
    {
        self.bind(event, Rc::new(handler), QueueKind::Persistent)?;
        self.trigger(
            MetaEvent::OnBound.as_str(),
            &[Value::from(event), Value::from(QueueKind::Persistent.as_str())],
        )
    }

    /// Bind a handler that fires on the next trigger of `event` only.
    pub fn once<F>(&self, event: &str, handler: F) -> EventResult<()>
    where
        F: Fn(&[Value]) + 'static,
    {
        self.bind(event, Rc::new(handler), QueueKind::Once)?;
        self.trigger(
            MetaEvent::OnceBound.as_str(),
            &[Value::from(event), Value::from(QueueKind::Once.as_str())],
        )
    }

    /// Bind a handler to one of the reserved meta events.
    pub fn bind_meta<F>(&self, event: &str, handler: F) -> EventResult<()>
    where
        F: Fn(&[Value]) + 'static,
    {
        if event.is_empty() {
            return Err(EventError::event_required());
        }
        if MetaEvent::from_name(event).is_none() {
            return Err(EventError::InvalidArgument(format!(
                "{} isn't a valid meta event",
                event
            )));
        }
        self.bind(event, Rc::new(handler), QueueKind::Meta)
    }

    /// Remove `event` from every queue.
    ///
    /// Removing an event that was never bound is not an error. Raises
    /// `all.off` with the event name and a snapshot of what was removed.
    pub fn off(&self, event: &str) -> EventResult<()> {
        if event.is_empty() {
            return Err(EventError::event_required());
        }

        let removed = {
            let mut queues = self.state.queues.borrow_mut();
            let mut removed = QueueSnapshot::default();
            for kind in [QueueKind::Persistent, QueueKind::Once, QueueKind::Meta] {
                if let Some(handlers) = queues.queue_mut(kind).remove(event) {
                    let target = match kind {
                        QueueKind::Persistent => &mut removed.persistent,
                        QueueKind::Once => &mut removed.once,
                        QueueKind::Meta => &mut removed.meta,
                    };
                    target.insert(event.to_string(), handlers.len());
                }
            }
            removed
        };

        self.trigger(
            MetaEvent::Off.as_str(),
            &[Value::from(event), removed.to_value()],
        )
    }

    /// Dispatch `event` to its persistent, one-shot and meta handlers.
    ///
    /// Triggering an event nobody listens to is a no-op.
    pub fn trigger(&self, event: &str, args: &[Value]) -> EventResult<()> {
        if event.is_empty() {
            return Err(EventError::event_required());
        }

        // Handler lists are copied out so handlers may bind, unbind or
        // trigger on this emitter while the dispatch runs.
        let persistent = self.handlers(QueueKind::Persistent, event);
        let once = self
            .state
            .queues
            .borrow_mut()
            .once
            .remove(event)
            .unwrap_or_default();
        let meta = self.handlers(QueueKind::Meta, event);
        let cleared = !once.is_empty();

        for handler in persistent.iter().chain(once.iter()).chain(meta.iter()) {
            handler(args);
        }

        if event == MetaEvent::AnyTriggered.as_str() {
            return Ok(());
        }
        let Some(_announcing) = Announcing::enter(&self.state.announcing, event) else {
            return Ok(());
        };

        let snapshot = self.describe();
        self.trigger(
            MetaEvent::AnyTriggered.as_str(),
            &[
                Value::from(event),
                Value::Array(args.to_vec()),
                snapshot.to_value(),
                Value::Bool(cleared),
            ],
        )
    }

    /// Re-fire every event triggered on `child` on this emitter as well.
    ///
    /// The bond holds the parent weakly; dropping the parent silences it.
    pub fn bond(&self, child: &dyn Eventful) -> EventResult<()> {
        let child = child.emitter();
        if self.same_as(child) {
            return Err(EventError::InvalidOperation(
                "A bond can only be established between two different emitters".into(),
            ));
        }

        let parent: Weak<EmitterState> = Rc::downgrade(&self.state);
        child.bind_meta(MetaEvent::AnyTriggered.as_str(), move |args| {
            let Some(state) = parent.upgrade() else {
                return;
            };
            let Some(event) = args.first().and_then(Value::as_str) else {
                return;
            };
            let forwarded = match args.get(1) {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            };
            let _ = EventEmitter { state }.trigger(event, forwarded);
        })
    }

    /// Snapshot of the three queues
    pub fn describe(&self) -> QueueSnapshot {
        self.state.queues.borrow().snapshot()
    }

    /// Number of handlers bound to `event` across all queues
    pub fn listener_count(&self, event: &str) -> usize {
        let queues = self.state.queues.borrow();
        [&queues.persistent, &queues.once, &queues.meta]
            .iter()
            .filter_map(|q| q.get(event))
            .map(Vec::len)
            .sum()
    }

    /// True if both handles share the same queues
    pub fn same_as(&self, other: &EventEmitter) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn bind(&self, event: &str, handler: Handler, kind: QueueKind) -> EventResult<()> {
        if event.is_empty() {
            return Err(EventError::event_required());
        }
        self.state
            .queues
            .borrow_mut()
            .queue_mut(kind)
            .entry(event.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn handlers(&self, kind: QueueKind, event: &str) -> Vec<Handler> {
        self.state
            .queues
            .borrow_mut()
            .queue_mut(kind)
            .get(event)
            .cloned()
            .unwrap_or_default()
    }
}

/// Anything that owns an [`EventEmitter`] and can be observed through it.
pub trait Eventful {
    fn emitter(&self) -> &EventEmitter;

    fn on<F>(&self, event: &str, handler: F) -> EventResult<()>
    where
        F: Fn(&[Value]) + 'static,
        Self: Sized,
    {
        self.emitter().on(event, handler)
    }

    fn once<F>(&self, event: &str, handler: F) -> EventResult<()>
    where
        F: Fn(&[Value]) + 'static,
        Self: Sized,
    {
        self.emitter().once(event, handler)
    }

    fn off(&self, event: &str) -> EventResult<()> {
        self.emitter().off(event)
    }

    fn trigger(&self, event: &str, args: &[Value]) -> EventResult<()> {
        self.emitter().trigger(event, args)
    }

    fn bond(&self, child: &dyn Eventful) -> EventResult<()> {
        self.emitter().bond(child)
    }
}

impl Eventful for EventEmitter {
    fn emitter(&self) -> &EventEmitter {
        self
    }
}
