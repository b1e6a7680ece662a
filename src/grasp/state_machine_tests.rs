use crate::grasp::{EventKind, GraspState, GraspStateMachine, PairObservation};

const DT: f64 = 0.1;
const MAX_SUSPENSION: f64 = 0.35;

fn observe(hovered: bool, primary: bool, contacting: bool, intent: bool) -> PairObservation {
    PairObservation {
        hovered,
        primary_hover: primary,
        contacting,
        grasp_intent: intent,
        tracked: true,
        grasp_allowed: true,
        force_release: false,
    }
}

fn untracked() -> PairObservation {
    PairObservation::default()
}

fn step(machine: &mut GraspStateMachine, observation: PairObservation) -> Vec<EventKind> {
    let transition = machine.plan(&observation, DT, MAX_SUSPENSION);
    machine.commit(&transition);
    transition.events.as_slice().to_vec()
}

fn grasped_machine() -> GraspStateMachine {
    let mut machine = GraspStateMachine::new();
    step(&mut machine, observe(true, true, true, false));
    step(&mut machine, observe(true, true, true, true));
    assert_eq!(machine.state(), GraspState::Grasped);
    machine
}

#[test]
fn test_proximity_flags_pick_highest_state() {
    let mut machine = GraspStateMachine::new();
    assert_eq!(step(&mut machine, observe(true, false, false, false)), vec![EventKind::HoverBegin]);
    assert_eq!(machine.state(), GraspState::Hovered);

    assert_eq!(step(&mut machine, observe(true, true, false, false)), vec![EventKind::PrimaryHoverBegin]);
    assert_eq!(machine.state(), GraspState::PrimaryHovered);

    assert_eq!(step(&mut machine, observe(true, true, true, false)), vec![EventKind::ContactBegin]);
    assert_eq!(machine.state(), GraspState::Contacted);

    let events = step(&mut machine, observe(false, false, false, false));
    assert_eq!(events, vec![EventKind::ContactEnd, EventKind::PrimaryHoverEnd, EventKind::HoverEnd]);
    assert_eq!(machine.state(), GraspState::None);
}

#[test]
fn test_grasp_needs_contact_or_primary_hover_at_step_start() {
    let mut machine = GraspStateMachine::new();
    step(&mut machine, observe(true, true, true, true));
    assert_eq!(machine.state(), GraspState::Contacted, "no grasp straight from None");

    let events = step(&mut machine, observe(true, true, true, true));
    assert_eq!(events, vec![EventKind::GraspBegin]);
    assert_eq!(machine.state(), GraspState::Grasped);

    let mut hovered_only = GraspStateMachine::new();
    step(&mut hovered_only, observe(true, false, false, false));
    step(&mut hovered_only, observe(true, false, false, true));
    assert_eq!(hovered_only.state(), GraspState::Hovered, "plain hover cannot grasp");

    let mut primary = GraspStateMachine::new();
    step(&mut primary, observe(true, true, false, false));
    step(&mut primary, observe(true, true, false, true));
    assert_eq!(primary.state(), GraspState::Grasped);
}

#[test]
fn test_grasp_blocked_when_not_allowed() {
    let mut machine = GraspStateMachine::new();
    step(&mut machine, observe(true, true, true, false));
    let mut blocked = observe(true, true, true, true);
    blocked.grasp_allowed = false;
    step(&mut machine, blocked);
    assert_eq!(machine.state(), GraspState::Contacted);
}

#[test]
fn test_release_ends_grasp_once() {
    let mut machine = grasped_machine();
    let events = step(&mut machine, observe(true, true, true, false));
    assert_eq!(events, vec![EventKind::GraspEnd]);
    assert_eq!(machine.state(), GraspState::Contacted);
    assert!(step(&mut machine, observe(true, true, true, false)).is_empty());
}

#[test]
fn test_suspension_and_resume() {
    let mut machine = grasped_machine();
    let events = step(&mut machine, untracked());
    assert!(events.contains(&EventKind::SuspensionBegin));
    assert!(!events.contains(&EventKind::GraspEnd));
    assert_eq!(machine.state(), GraspState::Suspended);

    let events = step(&mut machine, observe(true, true, true, true));
    assert!(events.contains(&EventKind::SuspensionEnd));
    assert!(!events.contains(&EventKind::GraspBegin));
    assert_eq!(machine.state(), GraspState::Grasped);
}

#[test]
fn test_resume_without_intent_releases() {
    let mut machine = grasped_machine();
    step(&mut machine, untracked());
    let events = step(&mut machine, observe(true, false, false, false));
    assert_eq!(&events[..2], &[EventKind::SuspensionEnd, EventKind::GraspEnd]);
    assert_eq!(machine.state(), GraspState::Hovered);
}

#[test]
fn test_suspension_timeout() {
    let mut machine = grasped_machine();
    step(&mut machine, untracked());
    let mut timed_out = Vec::new();
    for _ in 0..10 {
        let events = step(&mut machine, untracked());
        if !events.is_empty() {
            timed_out = events;
            break;
        }
    }
    assert_eq!(timed_out, vec![EventKind::SuspensionTimeout, EventKind::GraspEnd]);
    assert_eq!(machine.state(), GraspState::None);
}

#[test]
fn test_grasped_only_reachable_from_contact_or_primary_hover() {
    let observations = [
        untracked(),
        observe(true, false, false, true),
        observe(true, true, false, true),
        observe(true, true, true, true),
        observe(false, false, true, true),
        observe(true, true, true, false),
    ];
    // Walk every sequence of three observations and check each grasp begin.
    for a in observations {
        for b in observations {
            for c in observations {
                let mut machine = GraspStateMachine::new();
                for observation in [a, b, c] {
                    let before = machine.state();
                    let transition = machine.plan(&observation, DT, MAX_SUSPENSION);
                    if transition.begins_grasp() {
                        assert!(before.can_begin_grasp(), "grasp began from {:?}", before);
                    }
                    machine.commit(&transition);
                }
            }
        }
    }
}

#[test]
fn test_none_reachable_from_every_state() {
    let mut hovered = GraspStateMachine::new();
    step(&mut hovered, observe(true, false, false, false));
    let mut primary = GraspStateMachine::new();
    step(&mut primary, observe(true, true, false, false));
    let mut contacted = GraspStateMachine::new();
    step(&mut contacted, observe(true, true, true, false));
    let grasped = grasped_machine();
    let mut suspended = grasped_machine();
    step(&mut suspended, untracked());

    for mut machine in [GraspStateMachine::new(), hovered, primary, contacted, grasped, suspended] {
        let mut steps = 0;
        while machine.state() != GraspState::None {
            step(&mut machine, untracked());
            steps += 1;
            assert!(steps < 20, "stuck in {:?}", machine.state());
        }
    }
}

#[test]
fn test_force_release_and_force_end() {
    let mut machine = grasped_machine();
    let mut forced = observe(true, true, true, true);
    forced.force_release = true;
    assert_eq!(step(&mut machine, forced), vec![EventKind::GraspEnd]);
    assert_eq!(machine.state(), GraspState::Contacted);

    let mut suspended = grasped_machine();
    step(&mut suspended, untracked());
    let events = suspended.force_end();
    assert_eq!(events.as_slice(), &[EventKind::SuspensionEnd, EventKind::GraspEnd]);
    assert_eq!(suspended.state(), GraspState::None);

    let mut contacted = GraspStateMachine::new();
    step(&mut contacted, observe(true, true, true, false));
    let events = contacted.force_end();
    assert_eq!(events.as_slice(), &[EventKind::ContactEnd, EventKind::PrimaryHoverEnd, EventKind::HoverEnd]);
}
