// rs_interaction_wasm/src/lib.rs
// This is the public API for the wasm wrapper of the interaction library.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use rs_interaction::grasp::GraspState;
use rs_interaction::models::{
    ArenaHandle,
    Chirality,
    CollisionLayer,
    ControllerSample,
    HandId,
    HandSample,
    InteractionShape,
    ObjectId,
    Pose,
    Quaternion,
    RigidBodyState,
};
use rs_interaction::scene::{InteractionScene, ObjectSettings};
use rs_interaction::utils::InteractionConfig;

/// Packs a generational handle into one number, generation in the high half.
fn pack<H: ArenaHandle>(handle: H) -> u64 {
    (u64::from(handle.generation()) << 32) | handle.index() as u64
}

fn unpack<H: ArenaHandle>(packed: u64) -> H {
    H::from_parts((packed & 0xFFFF_FFFF) as u32, (packed >> 32) as u32)
}

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn chirality(left: bool) -> Chirality {
    if left { Chirality::Left } else { Chirality::Right }
}

fn pose(position: &[f64], rotation: &[f64]) -> Result<Pose, JsValue> {
    match (position, rotation) {
        ([x, y, z], [w, qx, qy, qz]) => Ok(Pose::new((*x, *y, *z), Quaternion::new(*w, *qx, *qy, *qz).normalized())),
        _ => Err(JsValue::from_str("expected position [x, y, z] and rotation [w, x, y, z]")),
    }
}

#[wasm_bindgen]
pub struct WasmInteractionScene {
    scene: InteractionScene,
}

impl WasmInteractionScene {
    fn add_object(&mut self, position: &[f64], rotation: &[f64], shape: InteractionShape, mass: f64) -> Result<u64, JsValue> {
        let body = RigidBodyState::new(pose(position, rotation)?, mass, CollisionLayer::Interaction);
        Ok(pack(self.scene.add_object(body, shape, ObjectSettings::default())))
    }
}

#[wasm_bindgen]
impl WasmInteractionScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmInteractionScene, JsValue> {
        InteractionScene::new(InteractionConfig::default())
            .map(|scene| Self { scene })
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn add_cuboid(&mut self, position: &[f64], rotation: &[f64], size: &[f64], mass: f64) -> Result<u64, JsValue> {
        let shape = match size {
            [w, h, d] => InteractionShape::new_cuboid(*w, *h, *d).map_err(to_js)?,
            _ => return Err(JsValue::from_str("expected size [width, height, depth]")),
        };
        self.add_object(position, rotation, shape, mass)
    }

    #[wasm_bindgen]
    pub fn add_sphere(&mut self, position: &[f64], radius: f64, mass: f64) -> Result<u64, JsValue> {
        let shape = InteractionShape::new_sphere(radius).map_err(to_js)?;
        self.add_object(position, &[1.0, 0.0, 0.0, 0.0], shape, mass)
    }

    #[wasm_bindgen]
    pub fn remove_object(&mut self, object: u64) -> Result<(), JsValue> {
        self.scene.remove_object(unpack::<ObjectId>(object)).map(|_| ()).map_err(to_js)
    }

    /// Registers a hand built as an open, flat hand around its palm pose.
    #[wasm_bindgen]
    pub fn add_hand(&mut self, left: bool, palm_position: &[f64], palm_rotation: &[f64], grasp_strength: f64) -> Result<u64, JsValue> {
        let sample = HandSample::from_palm(chirality(left), pose(palm_position, palm_rotation)?)
            .with_grasp_strength(grasp_strength);
        Ok(pack(self.scene.add_hand(sample)))
    }

    #[wasm_bindgen]
    pub fn update_hand(&mut self, hand: u64, left: bool, palm_position: &[f64], palm_rotation: &[f64], grasp_strength: f64) -> Result<(), JsValue> {
        let sample = HandSample::from_palm(chirality(left), pose(palm_position, palm_rotation)?)
            .with_grasp_strength(grasp_strength);
        self.scene.update_hand(unpack::<HandId>(hand), sample).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn add_controller(&mut self, left: bool, grip_position: &[f64], grip_rotation: &[f64], trigger: f64) -> Result<u64, JsValue> {
        let sample = ControllerSample::new(chirality(left), pose(grip_position, grip_rotation)?, trigger);
        Ok(pack(self.scene.add_hand(sample)))
    }

    #[wasm_bindgen]
    pub fn update_controller(&mut self, hand: u64, left: bool, grip_position: &[f64], grip_rotation: &[f64], trigger: f64) -> Result<(), JsValue> {
        let sample = ControllerSample::new(chirality(left), pose(grip_position, grip_rotation)?, trigger);
        self.scene.update_hand(unpack::<HandId>(hand), sample).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn remove_hand(&mut self, hand: u64) -> Result<(), JsValue> {
        self.scene.remove_hand(unpack::<HandId>(hand)).map_err(to_js)
    }

    /// Runs one interaction step followed by the built-in integrator.
    #[wasm_bindgen]
    pub fn step(&mut self, dt: f64) -> Result<(), JsValue> {
        self.scene.step(dt).map_err(to_js)?;
        self.scene.integrate(dt);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn is_grasped(&self, object: u64) -> Result<bool, JsValue> {
        self.scene.is_grasped(unpack::<ObjectId>(object)).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn is_visible(&self, object: u64) -> Result<bool, JsValue> {
        self.scene.is_visible(unpack::<ObjectId>(object)).map_err(to_js)
    }

    /// Name of the grasp state of a hand/object pair.
    #[wasm_bindgen]
    pub fn grasp_state(&self, hand: u64, object: u64) -> Result<String, JsValue> {
        let state = self
            .scene
            .grasp_state(unpack::<HandId>(hand), unpack::<ObjectId>(object))
            .map_err(to_js)?;
        Ok(match state {
            GraspState::None => "none",
            GraspState::Hovered => "hovered",
            GraspState::PrimaryHovered => "primary_hovered",
            GraspState::Contacted => "contacted",
            GraspState::Grasped => "grasped",
            GraspState::Suspended => "suspended",
        }
        .to_string())
    }

    /// `[x, y, z, qw, qx, qy, qz]` of the object's body.
    #[wasm_bindgen]
    pub fn object_pose(&self, object: u64) -> Result<Vec<f64>, JsValue> {
        let body = self.scene.object_body(unpack::<ObjectId>(object)).map_err(to_js)?;
        let (x, y, z) = body.position;
        let q = body.rotation;
        Ok(vec![x, y, z, q.w, q.x, q.y, q.z])
    }

    /// Drains queued notifications as `"<kind> <hand> <object>"` strings,
    /// echoing each to the browser console.
    #[wasm_bindgen]
    pub fn drain_events(&mut self) -> Array {
        let events = Array::new();
        for event in self.scene.drain_events() {
            let line = format!("{:?} {} {}", event.kind, event.hand, event.object);
            web_sys::console::log_1(&JsValue::from_str(&line));
            events.push(&JsValue::from_str(&line));
        }
        events
    }
}
