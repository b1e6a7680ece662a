use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rs_interaction::grasp::{GraspPoseAggregator, GraspingHandSet};
use rs_interaction::models::{ArenaHandle, Chirality, HandId, HandSample, Pose, Quaternion};
use rs_interaction::solver::KabschSolver;
use rs_interaction::utils::{GraspConfig, Vec3};

fn random_points(rng: &mut StdRng, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|_| (rng.random_range(-0.1..0.1), rng.random_range(-0.1..0.1), rng.random_range(-0.1..0.1)))
        .collect()
}

pub fn bench_kabsch(c: &mut Criterion) {
    let mut group = c.benchmark_group("kabsch_solver");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(100);

    let mut rng = StdRng::seed_from_u64(7);
    let rotation = Quaternion::from_axis_angle((0.3, 1.0, -0.2), 0.4);
    for count in [7usize, 14, 24] {
        let input = random_points(&mut rng, count);
        let reference: Vec<Vec3> = input.iter().map(|p| rotation.rotate_point(*p)).collect();

        group.bench_function(format!("cold_{}_points", count), |b| b.iter(|| {
            let mut solver = KabschSolver::default();
            solver.solve(black_box(&input), black_box(&reference))
        }));

        let mut warm = KabschSolver::default();
        group.bench_function(format!("warm_{}_points", count), |b| b.iter(|| {
            warm.solve(black_box(&input), black_box(&reference))
        }));
    }
}

pub fn bench_two_hand_grasp(c: &mut Criterion) {
    let mut group = c.benchmark_group("grasp_aggregator");
    group.sample_size(100);

    let object = Pose::from_position((0.0, 1.0, 0.0));
    let left = HandSample::from_palm(Chirality::Left, Pose::from_position((-0.055, 1.0, 0.0)));
    let right = HandSample::from_palm(Chirality::Right, Pose::from_position((0.055, 1.0, 0.0)));
    let mut aggregator = GraspPoseAggregator::new(&GraspConfig::default());
    let mut set = GraspingHandSet::new();
    let hands = [(HandId::from_parts(0, 0), left), (HandId::from_parts(1, 0), right)];
    for (id, hand) in &hands {
        set.add(aggregator.capture(*id, hand, &object));
    }

    let lift = Pose::from_position((0.0, 0.05, 0.0));
    let moved: Vec<(HandId, HandSample)> = hands
        .iter()
        .map(|(id, hand)| (*id, HandSample::from_palm(hand.chirality, lift.then(&hand.palm))))
        .collect();

    group.bench_function("two_hand_solve", |b| b.iter(|| {
        aggregator.solve(&set, black_box(&object), |h| moved.iter().find(|(id, _)| *id == h).map(|(_, s)| s))
    }));
}

criterion_group!(benches, bench_kabsch, bench_two_hand_grasp);
criterion_main!(benches);
