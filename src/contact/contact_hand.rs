use crate::contact::{ContactBone, ContactMode, SegmentInput, SegmentKind};
use crate::models::{BoneKind, Chirality, Finger, HandSample, InteractionShape, Pose, FINGER_COUNT};
use crate::utils::ContactConfig;

/// Simulated bones per finger; metacarpals stay inside the palm body.
pub const SIMULATED_BONES: [BoneKind; 3] = [BoneKind::Proximal, BoneKind::Intermediate, BoneKind::Distal];

/// Palm plus every simulated finger bone.
pub const CONTACT_SEGMENT_COUNT: usize = 1 + FINGER_COUNT * SIMULATED_BONES.len();

/// Approximate palm length along the fingers.
const PALM_LENGTH: f64 = 0.08;

fn segment_index(kind: SegmentKind) -> Option<usize> {
    match kind {
        SegmentKind::Palm => Some(0),
        SegmentKind::Bone { finger, bone } => {
            let slot = SIMULATED_BONES.iter().position(|b| *b == bone)?;
            Some(1 + finger.index() * SIMULATED_BONES.len() + slot)
        }
    }
}

fn segment_kind(index: usize) -> SegmentKind {
    if index == 0 {
        return SegmentKind::Palm;
    }
    let finger = Finger::ALL[(index - 1) / SIMULATED_BONES.len()];
    let bone = SIMULATED_BONES[(index - 1) % SIMULATED_BONES.len()];
    SegmentKind::Bone { finger, bone }
}

/// Tracked pose, width and length of one segment in `hand`.
fn segment_target(hand: &HandSample, kind: SegmentKind) -> (Pose, f64, f64) {
    match kind {
        SegmentKind::Palm => (hand.palm, hand.palm_width, PALM_LENGTH),
        SegmentKind::Bone { finger, bone } => {
            let sample = hand.bone(finger, bone);
            (sample.pose(), sample.width, sample.length())
        }
    }
}

/// The physical stand-in of one tracked hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactHand {
    chirality: Chirality,
    segments: [ContactBone; CONTACT_SEGMENT_COUNT],
}

impl ContactHand {
    /// Creates every segment on its tracked pose.
    pub fn new(hand: &HandSample) -> Self {
        let segments = std::array::from_fn(|i| {
            let kind = segment_kind(i);
            let (target, width, length) = segment_target(hand, kind);
            ContactBone::new(kind, target, width, length)
        });
        Self { chirality: hand.chirality, segments }
    }

    pub fn chirality(&self) -> Chirality {
        self.chirality
    }

    pub fn segment(&self, kind: SegmentKind) -> Option<&ContactBone> {
        segment_index(kind).map(|i| &self.segments[i])
    }

    pub fn mode(&self, kind: SegmentKind) -> Option<ContactMode> {
        self.segment(kind).map(|s| s.mode())
    }

    pub fn segments(&self) -> &[ContactBone] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [ContactBone] {
        &mut self.segments
    }

    /// Steps every segment against the latest sample.
    ///
    /// `sample` is `None` when the hand was not tracked this step. A segment
    /// counts as in contact when its body is within half its width plus the
    /// contact margin of any object in `objects`.
    pub fn step(
        &mut self,
        sample: Option<&HandSample>,
        grasping: bool,
        objects: &[(InteractionShape, Pose)],
        dt: f64,
        config: &ContactConfig,
    ) {
        for segment in self.segments.iter_mut() {
            let reach = segment.width() / 2.0 + config.contact_margin;
            let position = segment.body().position;
            let in_contact = objects
                .iter()
                .any(|(shape, pose)| shape.signed_distance(pose, position) <= reach);
            let input = SegmentInput {
                tracked: sample.map(|hand| segment_target(hand, segment.kind()).0),
                grasping,
                in_contact,
            };
            segment.step(&input, dt, config);
        }
    }

    /// Advances every segment body, for standalone use without an engine.
    pub fn integrate(&mut self, dt: f64) {
        for segment in self.segments.iter_mut() {
            segment.body_mut().integrate(dt);
        }
    }
}
