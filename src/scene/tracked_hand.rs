use crate::contact::ContactHand;
use crate::models::{GraspTrackable, ObjectId, TrackedInput};
use crate::utils::GraspConfig;

/// Scene-side record of one registered hand or controller.
#[derive(Debug, Clone)]
pub(crate) struct TrackedHand {
    pub(crate) latest: TrackedInput,
    /// A sample arrived since the previous step.
    pub(crate) fresh: bool,
    /// Tracking decision for the current step.
    pub(crate) tracked: bool,
    pub(crate) untracked_for: f64,
    pub(crate) grasp_intent: bool,
    /// Set when a grasp was taken away or refused; cleared once the hand opens.
    pub(crate) grasp_blocked: bool,
    pub(crate) grasped_object: Option<ObjectId>,
    pub(crate) contact: Option<ContactHand>,
}

impl TrackedHand {
    pub(crate) fn new(input: TrackedInput) -> Self {
        Self {
            latest: input,
            fresh: true,
            tracked: false,
            untracked_for: 0.0,
            grasp_intent: false,
            grasp_blocked: false,
            grasped_object: None,
            contact: None,
        }
    }

    pub(crate) fn receive(&mut self, input: TrackedInput) {
        self.latest = input;
        self.fresh = true;
    }

    /// Decides tracking and grasp intent for the coming step.
    ///
    /// Intent switches on at the begin threshold and off below the release
    /// threshold; while untracked it keeps its last value.
    pub(crate) fn begin_step(&mut self, dt: f64, config: &GraspConfig) {
        self.tracked = self.fresh && self.latest.confidence() >= config.min_confidence;
        self.fresh = false;
        if self.tracked {
            self.untracked_for = 0.0;
            let strength = self.latest.grasp_strength();
            self.grasp_intent = if self.grasp_intent {
                strength >= config.grasp_release_threshold
            } else {
                strength >= config.grasp_begin_threshold
            };
            if !self.grasp_intent {
                self.grasp_blocked = false;
            }
        } else {
            self.untracked_for += dt;
        }
    }

    /// Free to begin a new grasp this step.
    pub(crate) fn can_grasp(&self) -> bool {
        self.grasped_object.is_none() && !self.grasp_blocked
    }

    /// The sample of this step, if the hand is tracked.
    pub(crate) fn input(&self) -> Option<&TrackedInput> {
        if self.tracked { Some(&self.latest) } else { None }
    }

    /// Untracked long enough to drop its physical presence.
    pub(crate) fn is_lost(&self, config: &GraspConfig) -> bool {
        !self.tracked && self.untracked_for > config.tracking_loss_timeout
    }
}
