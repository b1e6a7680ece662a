use log::{debug, info, trace};

use crate::contact::{ContactHand, ContactMode, SegmentKind};
use crate::drivers::{DriveRequest, DriverKind};
use crate::errors::InteractionError;
use crate::grasp::{
    EventKind,
    GraspState,
    GraspStateMachine,
    InteractionEvent,
    PairObservation,
    PairTransition,
    ReleaseVelocity,
    ThrowVelocityOverride,
};
use crate::models::{
    GraspTrackable,
    HandId,
    InteractionShape,
    ObjectId,
    PhysicsDrivable,
    Pose,
    RigidBodyState,
    TrackedInput,
    MAX_CONTACT_POINTS,
};
use crate::scene::{Arena, InteractionObject, ObjectSettings, TrackedHand};
use crate::utils::{distance, InteractionConfig, ZERO_VECTOR};

/// One hand/object pair the scene is watching.
#[derive(Debug, Clone, Copy, PartialEq)]
struct InteractionPair {
    hand: HandId,
    object: ObjectId,
    machine: GraspStateMachine,
}

/// Owns every registered hand and object and advances their interaction one
/// fixed step at a time.
///
/// Per step: hand tracking is decided, pairs are observed against the settled
/// scene, every transition is planned and then committed, grasped objects are
/// solved and driven, contact bones are stepped, and idle pairs are pruned.
/// Notifications queue up until [`InteractionScene::drain_events`].
pub struct InteractionScene<B: PhysicsDrivable = RigidBodyState> {
    config: InteractionConfig,
    hands: Arena<HandId, TrackedHand>,
    objects: Arena<ObjectId, InteractionObject<B>>,
    pairs: Vec<InteractionPair>,
    observations: Vec<PairObservation>,
    hover_distances: Vec<f64>,
    transitions: Vec<PairTransition>,
    contact_objects: Vec<(InteractionShape, Pose)>,
    events: Vec<InteractionEvent>,
    throw_override: Option<Box<dyn ThrowVelocityOverride>>,
    step_index: u64,
    time: f64,
}

impl<B: PhysicsDrivable> InteractionScene<B> {
    /// Creates an empty scene.
    ///
    /// # Errors
    /// Returns the first invalid parameter of `config`.
    pub fn new(config: InteractionConfig) -> Result<Self, InteractionError> {
        config.validate()?;
        Ok(Self {
            config,
            hands: Arena::new(),
            objects: Arena::new(),
            pairs: Vec::new(),
            observations: Vec::new(),
            hover_distances: Vec::new(),
            transitions: Vec::new(),
            contact_objects: Vec::new(),
            events: Vec::new(),
            throw_override: None,
            step_index: 0,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Registers a hand or controller with its first sample.
    pub fn add_hand(&mut self, sample: impl Into<TrackedInput>) -> HandId {
        let id = self.hands.insert(TrackedHand::new(sample.into()));
        debug!("Registered {}", id);
        id
    }

    /// Hands the scene the newest sample of `hand`. A hand without a sample
    /// for a step counts as untracked for that step.
    pub fn update_hand(&mut self, hand: HandId, sample: impl Into<TrackedInput>) -> Result<(), InteractionError> {
        let entry = self.hands.get_mut(hand).ok_or(InteractionError::UnknownHand(hand))?;
        entry.receive(sample.into());
        Ok(())
    }

    /// Unregisters a hand, releasing its grasp and ending its proximity states.
    pub fn remove_hand(&mut self, hand: HandId) -> Result<(), InteractionError> {
        if !self.hands.contains(hand) {
            return Err(InteractionError::UnknownHand(hand));
        }
        let mut i = 0;
        while i < self.pairs.len() {
            if self.pairs[i].hand != hand {
                i += 1;
                continue;
            }
            let pair = self.pairs.remove(i);
            let mut machine = pair.machine;
            for kind in machine.force_end().as_slice() {
                self.push_event(*kind, pair.hand, pair.object);
                if *kind == EventKind::GraspEnd {
                    self.end_grasp(pair.hand, pair.object);
                }
            }
        }
        self.hands.remove(hand);
        debug!("Removed {}", hand);
        Ok(())
    }

    pub fn add_object(&mut self, body: B, shape: InteractionShape, settings: ObjectSettings) -> ObjectId {
        let object = InteractionObject::new(body, shape, settings, &self.config);
        let id = self.objects.insert(object);
        debug!("Registered {}", id);
        id
    }

    /// Unregisters an object and hands its body back. Hands holding it let go
    /// with the matching notifications.
    pub fn remove_object(&mut self, object: ObjectId) -> Result<B, InteractionError> {
        if !self.objects.contains(object) {
            return Err(InteractionError::UnknownObject(object));
        }
        let mut i = 0;
        while i < self.pairs.len() {
            if self.pairs[i].object != object {
                i += 1;
                continue;
            }
            let pair = self.pairs.remove(i);
            let mut machine = pair.machine;
            for kind in machine.force_end().as_slice() {
                self.push_event(*kind, pair.hand, pair.object);
            }
            if let Some(hand) = self.hands.get_mut(pair.hand) {
                if hand.grasped_object == Some(object) {
                    hand.grasped_object = None;
                }
            }
        }
        let mut removed = self.objects.remove(object).ok_or(InteractionError::UnknownObject(object))?;
        if !removed.grasping.is_empty() {
            removed.body.set_kinematic(false);
        }
        debug!("Removed {}", object);
        Ok(removed.body)
    }

    pub fn set_object_settings(&mut self, object: ObjectId, settings: ObjectSettings) -> Result<(), InteractionError> {
        let entry = self.objects.get_mut(object).ok_or(InteractionError::UnknownObject(object))?;
        entry.apply_settings(settings, &self.config);
        Ok(())
    }

    /// Installs a hook that may replace the velocity of released objects.
    pub fn set_throw_override(&mut self, hook: impl ThrowVelocityOverride + 'static) {
        self.throw_override = Some(Box::new(hook));
    }

    pub fn clear_throw_override(&mut self) {
        self.throw_override = None;
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, InteractionEvent> {
        self.events.drain(..)
    }

    /// Advances the scene by one fixed step of `dt` seconds.
    ///
    /// # Errors
    /// Returns [`InteractionError::InvalidDuration`] when `dt` is not a positive number.
    pub fn step(&mut self, dt: f64) -> Result<(), InteractionError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(InteractionError::InvalidDuration("fixed_delta_time"));
        }
        self.step_index += 1;
        self.time += dt;

        let grasp_config = self.config.grasp;
        for (_, hand) in self.hands.iter_mut() {
            hand.begin_step(dt, &grasp_config);
        }

        self.create_pairs();
        self.observe_pairs();
        self.plan_pairs(dt);
        self.commit_pairs();
        self.drive_objects(dt);
        self.step_contact_hands(dt);
        self.prune_pairs();
        Ok(())
    }

    /// Starts watching tracked hands that came within pair creation distance of an object.
    fn create_pairs(&mut self) {
        let Self { hands, objects, pairs, config, .. } = self;
        for (hand_id, hand) in hands.iter() {
            let Some(input) = hand.input() else {
                continue;
            };
            let hover_point = input.hover_point();
            for (object_id, object) in objects.iter() {
                let reach = config.grasp.pair_creation_distance + object.shape.bounding_radius();
                if distance(hover_point, object.body.position()) > reach
                    || object.surface_distance(hover_point) > config.grasp.pair_creation_distance
                {
                    continue;
                }
                if let Err(slot) = pairs.binary_search_by_key(&(hand_id, object_id), |p| (p.hand, p.object)) {
                    trace!("Watching pair {} / {}", hand_id, object_id);
                    pairs.insert(slot, InteractionPair { hand: hand_id, object: object_id, machine: GraspStateMachine::new() });
                }
            }
        }
    }

    /// Evaluates proximity and intent of every pair against the settled scene.
    fn observe_pairs(&mut self) {
        let Self { hands, objects, pairs, observations, hover_distances, config, .. } = self;
        observations.clear();
        hover_distances.clear();

        let mut contact_points = [ZERO_VECTOR; MAX_CONTACT_POINTS];
        for pair in pairs.iter() {
            let (Some(hand), Some(object)) = (hands.get(pair.hand), objects.get(pair.object)) else {
                observations.push(PairObservation::default());
                hover_distances.push(f64::INFINITY);
                continue;
            };
            let mut observation = PairObservation {
                grasp_intent: hand.grasp_intent,
                force_release: object.settings.ignore_grasping,
                ..PairObservation::default()
            };
            let mut hover_distance = f64::INFINITY;
            if let Some(input) = hand.input() {
                observation.tracked = true;
                hover_distance = object.surface_distance(input.hover_point());
                observation.hovered = !object.settings.ignore_hover && hover_distance <= config.grasp.hover_distance;
                let count = input.contact_points(&mut contact_points);
                observation.contacting = !object.settings.ignore_contact
                    && contact_points[..count]
                        .iter()
                        .any(|p| object.surface_distance(*p) <= config.grasp.contact_distance);
            }
            observations.push(observation);
            hover_distances.push(hover_distance);
        }

        // Pairs are sorted by hand, so each hand's pairs form one run.
        let mut start = 0;
        while start < pairs.len() {
            let hand_id = pairs[start].hand;
            let mut end = start;
            while end < pairs.len() && pairs[end].hand == hand_id {
                end += 1;
            }
            let hand_free = hands.get(hand_id).map_or(false, TrackedHand::can_grasp);

            let mut primary: Option<usize> = None;
            let mut candidate: Option<usize> = None;
            for i in start..end {
                let closer = |best: Option<usize>| best.map_or(true, |b| hover_distances[i] < hover_distances[b]);
                if observations[i].hovered && closer(primary) {
                    primary = Some(i);
                }
                let grabbable = objects.get(pairs[i].object).map_or(false, |o| !o.settings.ignore_grasping);
                if grabbable && pairs[i].machine.state().can_begin_grasp() && closer(candidate) {
                    candidate = Some(i);
                }
            }
            if let Some(i) = primary {
                observations[i].primary_hover = true;
            }
            if let (Some(i), true) = (candidate, hand_free) {
                observations[i].grasp_allowed = true;
            }
            start = end;
        }
    }

    /// Plans every pair's transition, then settles objects that allow only one hand.
    fn plan_pairs(&mut self, dt: f64) {
        let max_suspension = self.config.grasp.max_suspension_duration;
        self.transitions.clear();
        for (pair, observation) in self.pairs.iter().zip(self.observations.iter()) {
            self.transitions.push(pair.machine.plan(observation, dt, max_suspension));
        }

        for i in 0..self.pairs.len() {
            if !self.transitions[i].begins_grasp() {
                continue;
            }
            let object_id = self.pairs[i].object;
            let exclusive = self.objects.get(object_id).map_or(false, |o| !o.settings.allow_multi_grasp);
            if !exclusive {
                continue;
            }
            let already_taken = (0..i).any(|j| self.pairs[j].object == object_id && self.transitions[j].begins_grasp());
            if already_taken {
                if let Some(hand) = self.hands.get_mut(self.pairs[i].hand) {
                    hand.grasp_blocked = true;
                }
                self.observations[i].grasp_allowed = false;
                self.transitions[i] = self.pairs[i].machine.plan(&self.observations[i], dt, max_suspension);
                continue;
            }
            for j in 0..self.pairs.len() {
                if j != i && self.pairs[j].object == object_id && self.pairs[j].machine.state().is_grasping() {
                    self.observations[j].force_release = true;
                    self.transitions[j] = self.pairs[j].machine.plan(&self.observations[j], dt, max_suspension);
                }
            }
        }
    }

    /// Applies the planned transitions. Releases run before new grasps so a
    /// hand-off frees the object first.
    fn commit_pairs(&mut self) {
        for begins in [false, true] {
            for i in 0..self.pairs.len() {
                let transition = self.transitions[i];
                if transition.begins_grasp() != begins {
                    continue;
                }
                let (hand, object) = (self.pairs[i].hand, self.pairs[i].object);
                self.pairs[i].machine.commit(&transition);
                for kind in transition.events.as_slice() {
                    self.push_event(*kind, hand, object);
                    match kind {
                        EventKind::GraspBegin => self.begin_grasp(hand, object),
                        EventKind::GraspEnd => {
                            if self.observations[i].force_release {
                                self.block_until_open(hand);
                            }
                            self.end_grasp(hand, object);
                        }
                        EventKind::SuspensionBegin => self.suspend_grasp(hand, object),
                        EventKind::SuspensionEnd => self.resume_grasp(hand, object),
                        EventKind::SuspensionTimeout => info!("Grasp of {} by {} timed out while suspended", object, hand),
                        _ => {}
                    }
                }
            }
        }
    }

    fn push_event(&mut self, kind: EventKind, hand: HandId, object: ObjectId) {
        self.events.push(InteractionEvent { kind, hand, object, step: self.step_index });
    }

    fn block_until_open(&mut self, hand_id: HandId) {
        if let Some(hand) = self.hands.get_mut(hand_id) {
            hand.grasp_blocked = hand.grasp_intent;
        }
    }

    fn begin_grasp(&mut self, hand_id: HandId, object_id: ObjectId) {
        let (Some(hand), Some(object)) = (self.hands.get_mut(hand_id), self.objects.get_mut(object_id)) else {
            return;
        };
        hand.grasped_object = Some(object_id);
        let grasping = object.aggregator.capture(hand_id, &hand.latest, &object.pose());
        let first = object.grasping.is_empty();
        object.grasping.add(grasping);
        if first {
            object.just_grasped = true;
            object.last_target = None;
            object.throw.on_grasp_begin();
            if object.settings.movement == DriverKind::Kinematic {
                object.body.set_kinematic(true);
            }
        }
        debug!("{} grasped {} ({} hands)", hand_id, object_id, object.grasping.len());
    }

    fn end_grasp(&mut self, hand_id: HandId, object_id: ObjectId) {
        if let Some(hand) = self.hands.get_mut(hand_id) {
            if hand.grasped_object == Some(object_id) {
                hand.grasped_object = None;
            }
        }
        let Self { objects, throw_override, .. } = self;
        let Some(object) = objects.get_mut(object_id) else {
            return;
        };
        object.grasping.remove(hand_id);
        if !object.grasping.is_empty() {
            return;
        }

        let release = if object.suspended {
            ReleaseVelocity::ZERO
        } else {
            object.throw.on_release().unwrap_or(ReleaseVelocity {
                linear: object.body.velocity(),
                angular: object.body.angular_velocity(),
            })
        };
        let release = match throw_override {
            Some(hook) => hook.override_release(object_id, release),
            None => release,
        };
        object.body.set_kinematic(false);
        object.body.set_velocity(release.linear);
        object.body.set_angular_velocity(release.angular);
        object.suspended = false;
        object.visible = true;
        object.just_grasped = false;
        object.solved_pose = None;
        object.last_target = None;
        object.aggregator.reset();
        debug!("{} released by its last hand {}", object_id, hand_id);
    }

    fn suspend_grasp(&mut self, hand_id: HandId, object_id: ObjectId) {
        let policy = self.config.grasp.suspension_policy;
        let Some(object) = self.objects.get_mut(object_id) else {
            return;
        };
        object.grasping.set_suspended(hand_id, true);
        if object.grasping.all_suspended() && !object.suspended {
            object.suspended = true;
            object.body.set_velocity(ZERO_VECTOR);
            object.body.set_angular_velocity(ZERO_VECTOR);
            object.body.set_kinematic(true);
            object.visible = !policy.hides_object();
            debug!("Grasp of {} suspended", object_id);
        }
    }

    fn resume_grasp(&mut self, hand_id: HandId, object_id: ObjectId) {
        let Some(object) = self.objects.get_mut(object_id) else {
            return;
        };
        object.grasping.set_suspended(hand_id, false);
        if object.suspended && !object.grasping.all_suspended() {
            object.suspended = false;
            object.visible = true;
            object.body.set_kinematic(object.settings.movement == DriverKind::Kinematic);
            object.last_target = None;
            // The throw window must not span the suspension.
            object.throw.on_grasp_begin();
            debug!("Grasp of {} resumed by {}", object_id, hand_id);
        }
    }

    /// Solves and drives every grasped object that is not suspended.
    fn drive_objects(&mut self, dt: f64) {
        let Self { hands, objects, time, .. } = self;
        let hands = &*hands;
        for (object_id, object) in objects.iter_mut() {
            if object.grasping.is_empty() || object.suspended {
                continue;
            }
            let pose = object.pose();
            let target = object
                .aggregator
                .solve(&object.grasping, &pose, |h| hands.get(h).and_then(TrackedHand::input));
            let Some(target) = target else {
                continue;
            };
            object.solved_pose = Some(target);
            let request = DriveRequest {
                target,
                fixed_delta_time: dt,
                remaining_distance: object.remaining_distance(),
                just_grasped: object.just_grasped,
            };
            let outcome = object.driver.drive(&mut object.body, &request);
            trace!("{} drive outcome {:?}", object_id, outcome);
            object.last_target = Some(target);
            object.just_grasped = false;
            object.throw.on_hold(*time, target);
        }
    }

    /// Creates, steps and destroys the contact bones of tracked hands.
    fn step_contact_hands(&mut self, dt: f64) {
        let Self { hands, objects, contact_objects, config, .. } = self;
        contact_objects.clear();
        for (_, object) in objects.iter() {
            if !object.settings.ignore_contact {
                contact_objects.push((object.shape, object.pose()));
            }
        }

        for (hand_id, hand) in hands.iter_mut() {
            let grasping = hand.grasped_object.is_some();
            let sample = hand.input().and_then(TrackedInput::as_hand).copied();
            if hand.is_lost(&config.grasp) {
                if hand.contact.take().is_some() {
                    debug!("{} lost, contact bones destroyed", hand_id);
                }
                continue;
            }
            if let Some(contact) = hand.contact.as_mut() {
                contact.step(sample.as_ref(), grasping, &contact_objects[..], dt, &config.contact);
            } else if let Some(sample) = sample {
                hand.contact = Some(ContactHand::new(&sample));
            }
        }
    }

    /// Forgets idle pairs whose hand is untracked or has moved out of range.
    fn prune_pairs(&mut self) {
        let creation_distance = self.config.grasp.pair_creation_distance;
        let hover_distances = &self.hover_distances;
        let mut i = 0;
        self.pairs.retain(|pair| {
            let idle = pair.machine.state() == GraspState::None;
            let far = hover_distances.get(i).map_or(true, |d| !(*d <= creation_distance));
            i += 1;
            !(idle && far)
        });
    }

    pub fn is_grasped(&self, object: ObjectId) -> Result<bool, InteractionError> {
        Ok(!self.object(object)?.grasping.is_empty())
    }

    pub fn is_suspended(&self, object: ObjectId) -> Result<bool, InteractionError> {
        Ok(self.object(object)?.suspended)
    }

    /// Visibility flag of the object; cleared while a hidden suspension lasts.
    pub fn is_visible(&self, object: ObjectId) -> Result<bool, InteractionError> {
        Ok(self.object(object)?.visible)
    }

    /// Hands grasping `object`, in handle order.
    pub fn grasping_hands(&self, object: ObjectId) -> Result<impl Iterator<Item = HandId> + '_, InteractionError> {
        Ok(self.object(object)?.grasping.hand_ids())
    }

    /// Target pose of the latest grasp solve, while the object is grasped.
    pub fn solved_pose(&self, object: ObjectId) -> Result<Option<Pose>, InteractionError> {
        Ok(self.object(object)?.solved_pose)
    }

    pub fn grasp_state(&self, hand: HandId, object: ObjectId) -> Result<GraspState, InteractionError> {
        self.hand(hand)?;
        self.object(object)?;
        let state = self
            .pairs
            .binary_search_by_key(&(hand, object), |p| (p.hand, p.object))
            .map_or(GraspState::None, |i| self.pairs[i].machine.state());
        Ok(state)
    }

    pub fn grasped_object(&self, hand: HandId) -> Result<Option<ObjectId>, InteractionError> {
        Ok(self.hand(hand)?.grasped_object)
    }

    /// Whether the hand's latest sample was accepted in the last step.
    pub fn is_tracked(&self, hand: HandId) -> Result<bool, InteractionError> {
        Ok(self.hand(hand)?.tracked)
    }

    /// Contact bones of a hand, once it has been tracked and until it is lost.
    pub fn contact_hand(&self, hand: HandId) -> Result<Option<&ContactHand>, InteractionError> {
        Ok(self.hand(hand)?.contact.as_ref())
    }

    pub fn contact_mode(&self, hand: HandId, segment: SegmentKind) -> Result<Option<ContactMode>, InteractionError> {
        Ok(self.hand(hand)?.contact.as_ref().and_then(|c| c.mode(segment)))
    }

    pub fn object_body(&self, object: ObjectId) -> Result<&B, InteractionError> {
        Ok(&self.object(object)?.body)
    }

    pub fn object_body_mut(&mut self, object: ObjectId) -> Result<&mut B, InteractionError> {
        self.objects
            .get_mut(object)
            .map(|o| &mut o.body)
            .ok_or(InteractionError::UnknownObject(object))
    }

    /// Advances the contact bone bodies, for use without an external engine.
    pub fn integrate_contact_bones(&mut self, dt: f64) {
        for (_, hand) in self.hands.iter_mut() {
            if let Some(contact) = hand.contact.as_mut() {
                contact.integrate(dt);
            }
        }
    }

    fn hand(&self, hand: HandId) -> Result<&TrackedHand, InteractionError> {
        self.hands.get(hand).ok_or(InteractionError::UnknownHand(hand))
    }

    fn object(&self, object: ObjectId) -> Result<&InteractionObject<B>, InteractionError> {
        self.objects.get(object).ok_or(InteractionError::UnknownObject(object))
    }
}

impl InteractionScene<RigidBodyState> {
    /// Integrates every object body and contact bone with the built-in
    /// integrator, standing in for an external engine.
    pub fn integrate(&mut self, dt: f64) {
        for (_, object) in self.objects.iter_mut() {
            object.body.integrate(dt);
        }
        self.integrate_contact_bones(dt);
    }
}
