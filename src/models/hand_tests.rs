use crate::{assert_float_eq, assert_vector_eq};
use crate::models::{
    BoneKind,
    Chirality,
    ControllerSample,
    Finger,
    GraspTrackable,
    HandSample,
    Pose,
    Quaternion,
    TrackedInput,
    FRAME_LANDMARK_COUNT,
    MAX_CONTACT_POINTS,
    MAX_LANDMARKS,
};
use crate::utils::distance;

#[test]
fn test_from_palm_builds_connected_fingers() {
    let hand = HandSample::from_palm(Chirality::Left, Pose::from_position((0.0, 1.0, 0.0)));
    for finger in Finger::ALL {
        let bones = &hand.bones[finger.index()];
        for pair in bones.windows(2) {
            assert_vector_eq(pair[0].next_joint, pair[1].prev_joint, 1e-12, Some("joints are shared"));
        }
    }
    assert!(hand.bone(Finger::Index, BoneKind::Proximal).length() > 0.0);
    assert!(hand.bone(Finger::Index, BoneKind::Distal).width > 0.0);
}

#[test]
fn test_chirality_mirrors_thumb() {
    let palm = Pose::identity();
    let left = HandSample::from_palm(Chirality::Left, palm);
    let right = HandSample::from_palm(Chirality::Right, palm);
    assert!(left.fingertip(Finger::Thumb).0 > 0.0);
    assert!(right.fingertip(Finger::Thumb).0 < 0.0);
}

#[test]
fn test_hand_follows_palm_pose() {
    let palm = Pose::new((0.5, 1.0, -0.2), Quaternion::from_axis_angle((0.0, 1.0, 0.0), 0.7));
    let moved = HandSample::from_palm(Chirality::Right, palm);
    let origin = HandSample::from_palm(Chirality::Right, Pose::identity());
    let expected = palm.transform_point(origin.fingertip(Finger::Middle));
    assert_vector_eq(moved.fingertip(Finger::Middle), expected, 1e-12, None);
}

#[test]
fn test_landmarks_surround_grasp_frame() {
    let hand = HandSample::from_palm(Chirality::Right, Pose::from_position((0.0, 1.0, 0.0)));
    let mut landmarks = [(0.0, 0.0, 0.0); MAX_LANDMARKS];
    let count = hand.landmark_points(0.05, false, &mut landmarks);
    assert_eq!(count, FRAME_LANDMARK_COUNT);
    assert_vector_eq(landmarks[0], (0.0, 1.0, 0.0), 1e-12, Some("first landmark is the palm"));
    for point in &landmarks[1..count] {
        assert_float_eq(distance(*point, landmarks[0]), 0.05, 1e-12, None);
    }
    let with_tips = hand.landmark_points(0.05, true, &mut landmarks);
    assert_eq!(with_tips, FRAME_LANDMARK_COUNT + 5);
}

#[test]
fn test_controller_is_grasp_trackable() {
    let controller = ControllerSample::new(Chirality::Left, Pose::from_position((1.0, 1.0, 1.0)), 0.9);
    let input = TrackedInput::from(controller);
    assert_eq!(input.grasp_strength(), 0.9);
    assert!(input.as_hand().is_none());
    let mut points = [(0.0, 0.0, 0.0); MAX_CONTACT_POINTS];
    assert_eq!(input.contact_points(&mut points), 1);
    assert_vector_eq(points[0], (1.0, 1.0, 1.0), 1e-12, None);
}
