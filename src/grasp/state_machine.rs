use log::trace;

use crate::grasp::{EventKind, PairEvents};

/// Interaction state of one hand/object pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraspState {
    #[default]
    None,
    Hovered,
    PrimaryHovered,
    Contacted,
    Grasped,
    /// Grasped, but the hand has lost tracking.
    Suspended,
}

impl GraspState {
    pub fn is_grasping(self) -> bool {
        matches!(self, GraspState::Grasped | GraspState::Suspended)
    }

    /// States from which a grasp may begin.
    pub fn can_begin_grasp(self) -> bool {
        matches!(self, GraspState::Contacted | GraspState::PrimaryHovered)
    }
}

/// Geometric and intent checks for one pair, evaluated once per step from
/// the settled state of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairObservation {
    pub hovered: bool,
    pub primary_hover: bool,
    pub contacting: bool,
    pub grasp_intent: bool,
    pub tracked: bool,
    /// The hand is free to take this object this step.
    pub grasp_allowed: bool,
    /// End any grasp of this pair regardless of intent.
    pub force_release: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ProximityFlags {
    hovered: bool,
    primary: bool,
    contacting: bool,
}

impl ProximityFlags {
    fn highest(&self) -> GraspState {
        if self.contacting {
            GraspState::Contacted
        } else if self.primary {
            GraspState::PrimaryHovered
        } else if self.hovered {
            GraspState::Hovered
        } else {
            GraspState::None
        }
    }
}

/// A planned, not yet applied, change of one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairTransition {
    pub from: GraspState,
    pub to: GraspState,
    pub events: PairEvents,
    flags: ProximityFlags,
    suspended_for: f64,
}

impl PairTransition {
    pub fn begins_grasp(&self) -> bool {
        self.events.contains(EventKind::GraspBegin)
    }

    pub fn ends_grasp(&self) -> bool {
        self.events.contains(EventKind::GraspEnd)
    }
}

/// Per hand/object state machine.
///
/// Transitions are planned from the state at the start of the step and
/// applied with [`GraspStateMachine::commit`], so every pair sees the same
/// settled scene while planning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraspStateMachine {
    state: GraspState,
    flags: ProximityFlags,
    suspended_for: f64,
}

impl GraspStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GraspState {
        self.state
    }

    /// Seconds spent in `Suspended` so far.
    pub fn suspended_for(&self) -> f64 {
        self.suspended_for
    }

    /// Plans the transition for one step of length `dt`.
    pub fn plan(&self, observation: &PairObservation, dt: f64, max_suspension: f64) -> PairTransition {
        let tracked = observation.tracked;
        let flags = ProximityFlags {
            hovered: tracked && observation.hovered,
            primary: tracked && observation.hovered && observation.primary_hover,
            contacting: tracked && observation.contacting,
        };
        let mut events = PairEvents::new();
        let mut suspended_for = 0.0;

        let to = match self.state {
            GraspState::Grasped => {
                if observation.force_release || (tracked && !observation.grasp_intent) {
                    events.push(EventKind::GraspEnd);
                    flags.highest()
                } else if !tracked {
                    GraspState::Suspended
                } else {
                    GraspState::Grasped
                }
            }
            GraspState::Suspended => {
                if observation.force_release {
                    events.push(EventKind::SuspensionEnd);
                    events.push(EventKind::GraspEnd);
                    flags.highest()
                } else if tracked {
                    events.push(EventKind::SuspensionEnd);
                    if observation.grasp_intent {
                        GraspState::Grasped
                    } else {
                        events.push(EventKind::GraspEnd);
                        flags.highest()
                    }
                } else if self.suspended_for + dt > max_suspension {
                    events.push(EventKind::SuspensionTimeout);
                    events.push(EventKind::GraspEnd);
                    flags.highest()
                } else {
                    suspended_for = self.suspended_for + dt;
                    GraspState::Suspended
                }
            }
            ungrasped => {
                let begin = ungrasped.can_begin_grasp()
                    && tracked
                    && observation.grasp_intent
                    && observation.grasp_allowed
                    && !observation.force_release;
                if begin { GraspState::Grasped } else { flags.highest() }
            }
        };

        push_proximity_changes(&mut events, &self.flags, &flags);
        if to == GraspState::Grasped && !self.state.is_grasping() {
            events.push(EventKind::GraspBegin);
        }
        if to == GraspState::Suspended && self.state == GraspState::Grasped {
            events.push(EventKind::SuspensionBegin);
        }

        PairTransition { from: self.state, to, events, flags, suspended_for }
    }

    /// Applies a transition produced by [`GraspStateMachine::plan`].
    pub fn commit(&mut self, transition: &PairTransition) {
        if transition.from != transition.to {
            trace!("Pair state {:?} -> {:?}", transition.from, transition.to);
        }
        self.state = transition.to;
        self.flags = transition.flags;
        self.suspended_for = transition.suspended_for;
    }

    /// Ends everything the pair has going, as when its hand or object is removed,
    /// and returns the end notifications in order.
    pub fn force_end(&mut self) -> PairEvents {
        let mut events = PairEvents::new();
        if self.state == GraspState::Suspended {
            events.push(EventKind::SuspensionEnd);
        }
        if self.state.is_grasping() {
            events.push(EventKind::GraspEnd);
        }
        push_proximity_changes(&mut events, &self.flags, &ProximityFlags::default());
        *self = GraspStateMachine::default();
        events
    }
}

/// End notifications innermost first, then begin notifications outermost first.
fn push_proximity_changes(events: &mut PairEvents, old: &ProximityFlags, new: &ProximityFlags) {
    if old.contacting && !new.contacting {
        events.push(EventKind::ContactEnd);
    }
    if old.primary && !new.primary {
        events.push(EventKind::PrimaryHoverEnd);
    }
    if old.hovered && !new.hovered {
        events.push(EventKind::HoverEnd);
    }
    if !old.hovered && new.hovered {
        events.push(EventKind::HoverBegin);
    }
    if !old.primary && new.primary {
        events.push(EventKind::PrimaryHoverBegin);
    }
    if !old.contacting && new.contacting {
        events.push(EventKind::ContactBegin);
    }
}
