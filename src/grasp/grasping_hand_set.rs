use crate::models::{HandId, Pose, MAX_LANDMARKS};
use crate::utils::{Vec3, ZERO_VECTOR};

/// What a hand captured about an object when its grasp began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspingHand {
    pub hand: HandId,
    /// Object pose in the hand's grasp frame.
    pub held_offset: Pose,
    /// The hand's landmark points in the object's local space.
    pub local_landmarks: [Vec3; MAX_LANDMARKS],
    pub landmark_count: usize,
    pub suspended: bool,
}

impl GraspingHand {
    pub fn new(hand: HandId, held_offset: Pose) -> Self {
        Self {
            hand,
            held_offset,
            local_landmarks: [ZERO_VECTOR; MAX_LANDMARKS],
            landmark_count: 0,
            suspended: false,
        }
    }

    pub fn landmarks(&self) -> &[Vec3] {
        &self.local_landmarks[..self.landmark_count]
    }
}

/// Hands currently grasping one object, kept sorted by handle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraspingHandSet {
    hands: Vec<GraspingHand>,
}

impl GraspingHandSet {
    pub fn new() -> Self {
        Self { hands: Vec::with_capacity(2) }
    }

    /// Adds a hand. Returns `false` and changes nothing if the hand is already present.
    pub fn add(&mut self, grasping: GraspingHand) -> bool {
        match self.hands.binary_search_by_key(&grasping.hand, |h| h.hand) {
            Ok(_) => false,
            Err(slot) => {
                self.hands.insert(slot, grasping);
                true
            }
        }
    }

    pub fn remove(&mut self, hand: HandId) -> Option<GraspingHand> {
        let slot = self.hands.binary_search_by_key(&hand, |h| h.hand).ok()?;
        Some(self.hands.remove(slot))
    }

    pub fn get(&self, hand: HandId) -> Option<&GraspingHand> {
        let slot = self.hands.binary_search_by_key(&hand, |h| h.hand).ok()?;
        self.hands.get(slot)
    }

    pub fn contains(&self, hand: HandId) -> bool {
        self.get(hand).is_some()
    }

    /// Marks a hand as suspended or resumed. Returns `false` if the hand is not in the set.
    pub fn set_suspended(&mut self, hand: HandId, suspended: bool) -> bool {
        match self.hands.binary_search_by_key(&hand, |h| h.hand) {
            Ok(slot) => {
                self.hands[slot].suspended = suspended;
                true
            }
            Err(_) => false,
        }
    }

    /// True when the set is non-empty and every hand in it is suspended.
    pub fn all_suspended(&self) -> bool {
        !self.hands.is_empty() && self.hands.iter().all(|h| h.suspended)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraspingHand> {
        self.hands.iter()
    }

    pub fn hand_ids(&self) -> impl Iterator<Item = HandId> + '_ {
        self.hands.iter().map(|h| h.hand)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn clear(&mut self) {
        self.hands.clear();
    }
}
