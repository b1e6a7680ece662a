// demos/grasp_simulation.rs
// Scripted reach, grasp, carry and throw of a box with one tracked hand.
// Run with RUST_LOG=debug to follow the interaction log.

use log::info;
use rs_interaction::errors::InteractionError;
use rs_interaction::models::{Chirality, CollisionLayer, HandSample, InteractionShape, Pose, RigidBodyState};
use rs_interaction::scene::{InteractionScene, ObjectSettings};
use rs_interaction::utils::{InteractionConfig, DEFAULT_FIXED_DELTA_TIME};

const STEPS: usize = 120;

/// Palm position and grasp strength of the scripted hand at step `i`.
fn script(i: usize) -> ((f64, f64, f64), f64) {
    let t = i as f64 / STEPS as f64;
    if t < 0.25 {
        // reach in from the right
        let s = t / 0.25;
        ((0.3 - 0.245 * s, 1.0, 0.0), 0.0)
    } else if t < 0.35 {
        ((0.055, 1.0, 0.0), 1.0)
    } else if t < 0.75 {
        // carry up and to the left, speeding up
        let s = (t - 0.35) / 0.4;
        ((0.055 - 0.3 * s * s, 1.0 + 0.2 * s, 0.0), 1.0)
    } else {
        ((-0.245, 1.2, 0.0), 0.0)
    }
}

fn main() -> Result<(), InteractionError> {
    env_logger::init();

    let mut scene = InteractionScene::new(InteractionConfig::default())?;
    let body = RigidBodyState::new(Pose::from_position((0.0, 1.0, 0.0)), 0.5, CollisionLayer::Interaction);
    let cube = scene.add_object(body, InteractionShape::new_cuboid(0.1, 0.1, 0.1)?, ObjectSettings::default());

    let (start, _) = script(0);
    let hand = scene.add_hand(HandSample::from_palm(Chirality::Right, Pose::from_position(start)));

    for i in 0..STEPS {
        let (palm, strength) = script(i);
        let sample = HandSample::from_palm(Chirality::Right, Pose::from_position(palm)).with_grasp_strength(strength);
        scene.update_hand(hand, sample)?;
        scene.step(DEFAULT_FIXED_DELTA_TIME)?;
        scene.integrate(DEFAULT_FIXED_DELTA_TIME);

        for event in scene.drain_events() {
            info!("step {:>3}: {:?} {} {}", event.step, event.kind, event.hand, event.object);
        }
    }

    let body = scene.object_body(cube)?;
    println!("Final state of {}: {:?}", cube, scene.grasp_state(hand, cube)?);
    println!("  position: {:?}", body.position);
    println!("  velocity: {:?}", body.velocity);
    Ok(())
}
