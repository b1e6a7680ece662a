use log::{debug, warn};

use crate::grasp::{GraspingHand, GraspingHandSet};
use crate::models::{GraspTrackable, HandId, Pose, FRAME_LANDMARK_COUNT, MAX_LANDMARKS};
use crate::solver::{KabschSolver, PoseSolvable};
use crate::utils::{max_spread, GraspConfig, Vec3, ZERO_VECTOR};

/// Landmarks of one hand spanning less than this are treated as a single point.
const COINCIDENT_SPREAD: f64 = 1e-9;

/// Scratch capacity that covers a two-handed grasp without reallocating.
const INITIAL_POINT_CAPACITY: usize = 2 * MAX_LANDMARKS;

/// Fuses the hands grasping one object into a single target pose.
#[derive(Debug, Clone)]
pub struct GraspPoseAggregator {
    solver: KabschSolver,
    landmark_spread: f64,
    include_fingertips: bool,
    input: Vec<Vec3>,
    reference: Vec<Vec3>,
}

impl GraspPoseAggregator {
    pub fn new(config: &GraspConfig) -> Self {
        Self {
            solver: KabschSolver::new(config.solver_iterations, false),
            landmark_spread: config.landmark_spread,
            include_fingertips: config.include_fingertips,
            input: Vec::with_capacity(INITIAL_POINT_CAPACITY),
            reference: Vec::with_capacity(INITIAL_POINT_CAPACITY),
        }
    }

    /// Clears the solver warm start, used once an object is released.
    pub fn reset(&mut self) {
        self.solver.reset();
    }

    /// Records how `hand` holds an object currently at `object_pose`.
    pub fn capture<T: GraspTrackable + ?Sized>(&self, id: HandId, hand: &T, object_pose: &Pose) -> GraspingHand {
        let mut grasping = GraspingHand::new(id, object_pose.relative_to(&hand.grasp_pose()));
        let mut world = [ZERO_VECTOR; MAX_LANDMARKS];
        let count = hand.landmark_points(self.landmark_spread, self.include_fingertips, &mut world);
        for (local, point) in grasping.local_landmarks.iter_mut().zip(world.iter()).take(count) {
            *local = object_pose.inverse_transform_point(*point);
        }
        grasping.landmark_count = count;
        grasping
    }

    /// Computes where the object should be, given its current pose and the
    /// current samples of the grasping hands.
    ///
    /// Suspended hands, hands without a sample and hands whose landmarks
    /// collapse onto one point are left out. Returns `None` when no hand
    /// contributes.
    pub fn solve<'a, T, F>(&mut self, set: &GraspingHandSet, object_pose: &Pose, lookup: F) -> Option<Pose>
    where
        T: GraspTrackable + 'a,
        F: Fn(HandId) -> Option<&'a T>,
    {
        self.input.clear();
        self.reference.clear();
        let mut contributing = 0;
        let mut single: Option<(&GraspingHand, &T)> = None;

        for grasping in set.iter().filter(|g| !g.suspended) {
            let Some(hand) = lookup(grasping.hand) else {
                continue;
            };
            let mut current = [ZERO_VECTOR; MAX_LANDMARKS];
            let count = hand.landmark_points(self.landmark_spread, self.include_fingertips, &mut current);
            let count = count.min(grasping.landmark_count);
            if count == 0 || max_spread(&current[..count]) < COINCIDENT_SPREAD {
                debug!("Hand {} has coincident landmarks, left out of the grasp solve", grasping.hand);
                continue;
            }
            for (local, point) in grasping.local_landmarks[..count].iter().zip(current[..count].iter()) {
                self.input.push(object_pose.transform_point(*local));
                self.reference.push(*point);
            }
            contributing += 1;
            single = Some((grasping, hand));
        }

        match (contributing, single) {
            (0, _) | (_, None) => None,
            (1, Some((grasping, hand))) if grasping.landmark_count == FRAME_LANDMARK_COUNT => {
                Some(hand.grasp_pose().then(&grasping.held_offset))
            }
            _ => match self.solver.solve_transform(&self.input, &self.reference) {
                Ok(transform) => Some(transform.apply_to_pose(object_pose)),
                Err(e) => {
                    warn!("Grasp solve failed: {}", e);
                    None
                }
            },
        }
    }
}
