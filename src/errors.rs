use std::fmt;
use std::error::Error;

use crate::models::{HandId, ObjectId};

/// Represents caller mistakes reported by the interaction core.
///
/// Numerical trouble inside a step (degenerate points, tracking loss, large
/// corrections) is absorbed where it is detected and never shows up here.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionError {
    /// A distance or threshold that must be positive was zero, negative or not finite.
    InvalidDistance(&'static str),
    /// A duration that must be positive was zero, negative or not finite.
    InvalidDuration(&'static str),
    /// A velocity limit that must be positive was zero, negative or not finite.
    InvalidVelocity(&'static str),
    /// A strength or threshold expected in [0, 1] was outside that range.
    InvalidFactor(&'static str),
    /// A response curve was empty, unsorted, or had too many keys.
    InvalidCurve(String),
    /// Two point sets handed to the pose solver had different lengths.
    MismatchedPointSets { input: usize, reference: usize },
    /// The hand handle does not refer to a live hand.
    UnknownHand(HandId),
    /// The object handle does not refer to a live object.
    UnknownObject(ObjectId),
    /// A shape dimension was zero, negative or not finite.
    InvalidDimension,
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InteractionError::InvalidDistance(name) => write!(f, "Invalid distance for {}", name),
            InteractionError::InvalidDuration(name) => write!(f, "Invalid duration for {}", name),
            InteractionError::InvalidVelocity(name) => write!(f, "Invalid velocity for {}", name),
            InteractionError::InvalidFactor(name) => write!(f, "Factor out of range for {}", name),
            InteractionError::InvalidCurve(msg) => write!(f, "Invalid response curve: {}", msg),
            InteractionError::MismatchedPointSets { input, reference } => {
                write!(f, "Point sets must have equal length: {} vs {}", input, reference)
            }
            InteractionError::UnknownHand(id) => write!(f, "Unknown hand {}", id),
            InteractionError::UnknownObject(id) => write!(f, "Unknown object {}", id),
            InteractionError::InvalidDimension => write!(f, "Invalid shape dimension"),
        }
    }
}

impl Error for InteractionError {}
