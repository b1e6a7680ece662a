use crate::models::{HandId, ObjectId};

/// Lifecycle notification kinds emitted per hand/object pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HoverBegin,
    HoverEnd,
    PrimaryHoverBegin,
    PrimaryHoverEnd,
    ContactBegin,
    ContactEnd,
    GraspBegin,
    GraspEnd,
    SuspensionBegin,
    SuspensionEnd,
    /// The suspension lasted too long; a `GraspEnd` follows.
    SuspensionTimeout,
}

/// One queued notification, drained by the caller after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub kind: EventKind,
    pub hand: HandId,
    pub object: ObjectId,
    /// Index of the scene step that produced the event.
    pub step: u64,
}

/// Upper bound on events one pair can emit in a single step.
pub const MAX_PAIR_EVENTS: usize = 8;

/// Inline list of the events of one planned transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairEvents {
    kinds: [EventKind; MAX_PAIR_EVENTS],
    len: usize,
}

impl PairEvents {
    pub const fn new() -> Self {
        Self { kinds: [EventKind::HoverBegin; MAX_PAIR_EVENTS], len: 0 }
    }

    pub(crate) fn push(&mut self, kind: EventKind) {
        if self.len < MAX_PAIR_EVENTS {
            self.kinds[self.len] = kind;
            self.len += 1;
        }
    }

    pub fn as_slice(&self) -> &[EventKind] {
        &self.kinds[..self.len]
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.as_slice().contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PairEvents {
    fn default() -> Self {
        PairEvents::new()
    }
}
