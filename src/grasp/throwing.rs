use log::debug;
use std::collections::VecDeque;

use crate::drivers::ResponseCurve;
use crate::models::{ObjectId, Pose};
use crate::utils::{scale_vector, vector_magnitude, vector_sub, ThrowConfig, Vec3, ZERO_VECTOR};

/// Velocities handed to an object's body when its last hand lets go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseVelocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl ReleaseVelocity {
    pub const ZERO: ReleaseVelocity = ReleaseVelocity { linear: ZERO_VECTOR, angular: ZERO_VECTOR };
}

/// Caller hook that may replace the release velocity of a thrown object.
pub trait ThrowVelocityOverride {
    fn override_release(&mut self, object: ObjectId, release: ReleaseVelocity) -> ReleaseVelocity;
}

impl<F> ThrowVelocityOverride for F
where
    F: FnMut(ObjectId, ReleaseVelocity) -> ReleaseVelocity,
{
    fn override_release(&mut self, object: ObjectId, release: ReleaseVelocity) -> ReleaseVelocity {
        self(object, release)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeldSample {
    time: f64,
    pose: Pose,
}

/// Estimates the release velocity from the held poses of a short time window.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindowThrow {
    window_length: f64,
    max_samples: usize,
    speed_multiplier: ResponseCurve,
    samples: VecDeque<HeldSample>,
}

impl SlidingWindowThrow {
    pub fn new(config: &ThrowConfig) -> Self {
        Self {
            window_length: config.window_length,
            max_samples: config.max_samples.max(2),
            speed_multiplier: config.speed_multiplier,
            samples: VecDeque::with_capacity(config.max_samples.max(2)),
        }
    }

    /// Records the held pose at `time`, dropping samples older than the window.
    pub fn record(&mut self, time: f64, pose: Pose) {
        if self.samples.len() == self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(HeldSample { time, pose });
        while let Some(oldest) = self.samples.front() {
            if time - oldest.time > self.window_length && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Velocity between the oldest and newest sample, scaled by the speed
    /// multiplier curve. `None` with fewer than two samples.
    pub fn release_velocity(&self) -> Option<ReleaseVelocity> {
        let oldest = self.samples.front()?;
        let newest = self.samples.back()?;
        let elapsed = newest.time - oldest.time;
        if !(elapsed > 0.0) {
            return None;
        }
        let linear = scale_vector(vector_sub(newest.pose.position, oldest.pose.position), 1.0 / elapsed);
        let angular = match oldest.pose.rotation.delta_to(&newest.pose.rotation).to_axis_angle() {
            Some((axis, angle)) => scale_vector(axis, angle / elapsed),
            None => ZERO_VECTOR,
        };
        let multiplier = self.speed_multiplier.evaluate(vector_magnitude(linear));
        debug!("Release speed {:.3} m/s, multiplier {:.2}", vector_magnitude(linear), multiplier);
        Some(ReleaseVelocity { linear: scale_vector(linear, multiplier), angular })
    }
}

/// How a released object picks up its velocity.
#[derive(Debug, Clone, PartialEq)]
pub enum ThrowHandler {
    /// The body keeps whatever velocity the driver left it with.
    Disabled,
    SlidingWindow(SlidingWindowThrow),
}

impl ThrowHandler {
    pub fn from_config(config: &ThrowConfig) -> Self {
        if config.enabled {
            ThrowHandler::SlidingWindow(SlidingWindowThrow::new(config))
        } else {
            ThrowHandler::Disabled
        }
    }

    pub fn on_hold(&mut self, time: f64, pose: Pose) {
        if let ThrowHandler::SlidingWindow(window) = self {
            window.record(time, pose);
        }
    }

    pub fn on_grasp_begin(&mut self) {
        if let ThrowHandler::SlidingWindow(window) = self {
            window.clear();
        }
    }

    /// The velocity to give the body on release, if this handler decides it.
    pub fn on_release(&mut self) -> Option<ReleaseVelocity> {
        match self {
            ThrowHandler::Disabled => None,
            ThrowHandler::SlidingWindow(window) => {
                let release = window.release_velocity();
                window.clear();
                release
            }
        }
    }
}
