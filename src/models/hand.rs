use crate::models::{Pose, Quaternion};
use crate::utils::{distance, lerp_vector, scale_vector, vector_add, Vec3};

pub const FINGER_COUNT: usize = 5;
pub const BONES_PER_FINGER: usize = 4;

/// Upper bound on landmark points one hand contributes to a grasp solve.
pub const MAX_LANDMARKS: usize = 12;
/// Landmarks derived from the grasp frame alone: origin plus +/- each axis.
pub const FRAME_LANDMARK_COUNT: usize = 7;
/// Upper bound on points a hand reports for contact checks.
pub const MAX_CONTACT_POINTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chirality {
    Left,
    Right,
}

impl Chirality {
    /// Sign of the thumb side along the palm's local x axis.
    fn thumb_side(self) -> f64 {
        match self {
            Chirality::Left => 1.0,
            Chirality::Right => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; FINGER_COUNT] = [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneKind {
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
}

impl BoneKind {
    pub const ALL: [BoneKind; BONES_PER_FINGER] = [BoneKind::Metacarpal, BoneKind::Proximal, BoneKind::Intermediate, BoneKind::Distal];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One tracked finger bone between two joints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSample {
    pub prev_joint: Vec3,
    pub next_joint: Vec3,
    pub rotation: Quaternion,
    pub width: f64,
}

impl BoneSample {
    pub fn center(&self) -> Vec3 {
        lerp_vector(self.prev_joint, self.next_joint, 0.5)
    }

    pub fn length(&self) -> f64 {
        distance(self.prev_joint, self.next_joint)
    }

    /// Pose of the bone's center.
    pub fn pose(&self) -> Pose {
        Pose::new(self.center(), self.rotation)
    }
}

/// Per-frame snapshot of one tracked hand.
///
/// The palm frame has +z pointing along the fingers and +y out of the back of
/// the hand. Bones are indexed `[finger][bone]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub chirality: Chirality,
    pub palm: Pose,
    pub palm_width: f64,
    pub bones: [[BoneSample; BONES_PER_FINGER]; FINGER_COUNT],
    /// 0 = open hand, 1 = closed fist
    pub grasp_strength: f64,
    pub pinch_strength: f64,
    pub confidence: f64,
}

const FINGER_BASES: [(f64, f64); FINGER_COUNT] = [
    (0.025, -0.035),
    (0.0225, 0.0),
    (0.0075, 0.005),
    (-0.0075, 0.0),
    (-0.0225, -0.01),
];

const BONE_LENGTHS: [[f64; BONES_PER_FINGER]; FINGER_COUNT] = [
    [0.0, 0.045, 0.03, 0.025],
    [0.065, 0.04, 0.025, 0.02],
    [0.062, 0.045, 0.028, 0.022],
    [0.058, 0.042, 0.026, 0.021],
    [0.053, 0.032, 0.02, 0.019],
];

const BONE_WIDTHS: [f64; FINGER_COUNT] = [0.02, 0.018, 0.018, 0.017, 0.015];

impl HandSample {
    /// Builds an open, flat hand around `palm`.
    ///
    /// # Example
    /// ```
    /// use rs_interaction::models::{Chirality, Finger, HandSample, Pose};
    ///
    /// let hand = HandSample::from_palm(Chirality::Right, Pose::from_position((0.0, 1.0, 0.0)));
    /// assert!(hand.fingertip(Finger::Middle).2 > 0.1);
    /// ```
    pub fn from_palm(chirality: Chirality, palm: Pose) -> Self {
        let side = chirality.thumb_side();
        let metacarpal_start = -0.04;
        let blank = BoneSample {
            prev_joint: palm.position,
            next_joint: palm.position,
            rotation: palm.rotation,
            width: 0.0,
        };
        let mut bones = [[blank; BONES_PER_FINGER]; FINGER_COUNT];

        for finger in Finger::ALL {
            let f = finger.index();
            let (base_x, base_z) = FINGER_BASES[f];
            let (direction, local_rotation) = if finger == Finger::Thumb {
                let yaw = side * std::f64::consts::FRAC_PI_4;
                (
                    (side * std::f64::consts::FRAC_1_SQRT_2, 0.0, std::f64::consts::FRAC_1_SQRT_2),
                    Quaternion::from_axis_angle((0.0, 1.0, 0.0), yaw),
                )
            } else {
                ((0.0, 0.0, 1.0), Quaternion::identity())
            };
            let rotation = palm.rotation.multiply(&local_rotation).normalized();

            let start_z = if finger == Finger::Thumb { base_z } else { metacarpal_start + base_z };
            let mut joint = (side * base_x, 0.0, start_z);
            for bone in BoneKind::ALL {
                let b = bone.index();
                let length = BONE_LENGTHS[f][b];
                let next = vector_add(joint, scale_vector(direction, length));
                bones[f][b] = BoneSample {
                    prev_joint: palm.transform_point(joint),
                    next_joint: palm.transform_point(next),
                    rotation,
                    width: BONE_WIDTHS[f] * (1.0 - 0.08 * b as f64),
                };
                joint = next;
            }
        }

        Self {
            chirality,
            palm,
            palm_width: 0.085,
            bones,
            grasp_strength: 0.0,
            pinch_strength: 0.0,
            confidence: 1.0,
        }
    }

    pub fn with_grasp_strength(mut self, grasp_strength: f64) -> Self {
        self.grasp_strength = grasp_strength;
        self
    }

    pub fn bone(&self, finger: Finger, bone: BoneKind) -> &BoneSample {
        &self.bones[finger.index()][bone.index()]
    }

    pub fn fingertip(&self, finger: Finger) -> Vec3 {
        self.bone(finger, BoneKind::Distal).next_joint
    }
}

/// Per-frame snapshot of one tracked controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSample {
    pub chirality: Chirality,
    pub grip: Pose,
    /// 0 = released, 1 = fully pressed
    pub trigger: f64,
    pub confidence: f64,
}

impl ControllerSample {
    pub fn new(chirality: Chirality, grip: Pose, trigger: f64) -> Self {
        Self { chirality, grip, trigger, confidence: 1.0 }
    }
}

/// Anything that can hover, touch and grasp interaction objects.
pub trait GraspTrackable {
    /// Frame that grasped objects follow.
    fn grasp_pose(&self) -> Pose;
    /// Continuous grasp intent, 0 to 1.
    fn grasp_strength(&self) -> f64;
    fn confidence(&self) -> f64;
    /// Point whose distance to an object decides hovering.
    fn hover_point(&self) -> Vec3;
    /// Writes the points used for contact checks and returns how many were written.
    fn contact_points(&self, out: &mut [Vec3; MAX_CONTACT_POINTS]) -> usize;

    /// Writes the landmark points of a grasp solve and returns how many were written.
    fn landmark_points(&self, spread: f64, _include_fingertips: bool, out: &mut [Vec3; MAX_LANDMARKS]) -> usize {
        frame_landmarks(&self.grasp_pose(), spread, out)
    }
}

/// Grasp frame origin followed by the origin offset by +/- `spread` along each local axis.
pub fn frame_landmarks(frame: &Pose, spread: f64, out: &mut [Vec3; MAX_LANDMARKS]) -> usize {
    const OFFSETS: [Vec3; FRAME_LANDMARK_COUNT] = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (-1.0, 0.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, -1.0, 0.0),
        (0.0, 0.0, 1.0),
        (0.0, 0.0, -1.0),
    ];
    for (slot, offset) in out.iter_mut().zip(OFFSETS.iter()) {
        *slot = frame.transform_point(scale_vector(*offset, spread));
    }
    FRAME_LANDMARK_COUNT
}

impl GraspTrackable for HandSample {
    fn grasp_pose(&self) -> Pose {
        self.palm
    }

    fn grasp_strength(&self) -> f64 {
        self.grasp_strength
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn hover_point(&self) -> Vec3 {
        lerp_vector(self.fingertip(Finger::Thumb), self.fingertip(Finger::Index), 0.5)
    }

    fn contact_points(&self, out: &mut [Vec3; MAX_CONTACT_POINTS]) -> usize {
        out[0] = self.palm.position;
        for finger in Finger::ALL {
            out[1 + finger.index()] = self.fingertip(finger);
        }
        MAX_CONTACT_POINTS
    }

    fn landmark_points(&self, spread: f64, include_fingertips: bool, out: &mut [Vec3; MAX_LANDMARKS]) -> usize {
        let mut count = frame_landmarks(&self.palm, spread, out);
        if include_fingertips {
            for finger in Finger::ALL {
                out[count] = self.fingertip(finger);
                count += 1;
            }
        }
        count
    }
}

impl GraspTrackable for ControllerSample {
    fn grasp_pose(&self) -> Pose {
        self.grip
    }

    fn grasp_strength(&self) -> f64 {
        self.trigger
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn hover_point(&self) -> Vec3 {
        self.grip.position
    }

    fn contact_points(&self, out: &mut [Vec3; MAX_CONTACT_POINTS]) -> usize {
        out[0] = self.grip.position;
        1
    }
}

/// Latest input of one registered hand or controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackedInput {
    Hand(HandSample),
    Controller(ControllerSample),
}

impl TrackedInput {
    pub fn chirality(&self) -> Chirality {
        match self {
            TrackedInput::Hand(hand) => hand.chirality,
            TrackedInput::Controller(controller) => controller.chirality,
        }
    }

    pub fn as_hand(&self) -> Option<&HandSample> {
        match self {
            TrackedInput::Hand(hand) => Some(hand),
            TrackedInput::Controller(_) => None,
        }
    }
}

impl From<HandSample> for TrackedInput {
    fn from(hand: HandSample) -> Self {
        TrackedInput::Hand(hand)
    }
}

impl From<ControllerSample> for TrackedInput {
    fn from(controller: ControllerSample) -> Self {
        TrackedInput::Controller(controller)
    }
}

impl GraspTrackable for TrackedInput {
    fn grasp_pose(&self) -> Pose {
        match self {
            TrackedInput::Hand(hand) => hand.grasp_pose(),
            TrackedInput::Controller(controller) => controller.grasp_pose(),
        }
    }

    fn grasp_strength(&self) -> f64 {
        match self {
            TrackedInput::Hand(hand) => hand.grasp_strength(),
            TrackedInput::Controller(controller) => controller.grasp_strength(),
        }
    }

    fn confidence(&self) -> f64 {
        match self {
            TrackedInput::Hand(hand) => hand.confidence(),
            TrackedInput::Controller(controller) => controller.confidence(),
        }
    }

    fn hover_point(&self) -> Vec3 {
        match self {
            TrackedInput::Hand(hand) => hand.hover_point(),
            TrackedInput::Controller(controller) => controller.hover_point(),
        }
    }

    fn contact_points(&self, out: &mut [Vec3; MAX_CONTACT_POINTS]) -> usize {
        match self {
            TrackedInput::Hand(hand) => hand.contact_points(out),
            TrackedInput::Controller(controller) => controller.contact_points(out),
        }
    }

    fn landmark_points(&self, spread: f64, include_fingertips: bool, out: &mut [Vec3; MAX_LANDMARKS]) -> usize {
        match self {
            TrackedInput::Hand(hand) => hand.landmark_points(spread, include_fingertips, out),
            TrackedInput::Controller(controller) => controller.landmark_points(spread, include_fingertips, out),
        }
    }
}
