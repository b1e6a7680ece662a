use log::{trace, warn};
use std::f64::consts::PI;

use crate::errors::InteractionError;
use crate::models::{Pose, Quaternion};
use crate::utils::{
    are_colinear,
    centroid,
    cross_product,
    distance,
    dot_product,
    is_finite_vector,
    scale_vector,
    vector_add,
    vector_magnitude,
    vector_sub,
    Vec3,
    ZERO_VECTOR,
};

pub const DEFAULT_SOLVER_ITERATIONS: usize = 9;

/// Corrections smaller than this (radians) end the rotation refinement early.
const CONVERGENCE_THRESHOLD: f64 = 1e-9;
/// Keeps the correction finite when the covariance is close to zero.
const DENOMINATOR_EPSILON: f64 = 1e-9;
/// Points closer than this to their common line count as colinear.
const COLINEAR_EPSILON: f64 = 1e-7;

/// Result of a pose solve: maps input space onto reference space as
/// `translate(ref_centroid) * scale * rotate(rotation) * translate(-in_centroid)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub in_centroid: Vec3,
    pub ref_centroid: Vec3,
    pub rotation: Quaternion,
    pub scale: f64,
}

impl RigidTransform {
    pub const fn identity() -> Self {
        Self {
            in_centroid: ZERO_VECTOR,
            ref_centroid: ZERO_VECTOR,
            rotation: Quaternion::identity(),
            scale: 1.0,
        }
    }

    /// Offset between the two centroids.
    pub fn translation(&self) -> Vec3 {
        vector_sub(self.ref_centroid, self.in_centroid)
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let local = vector_sub(point, self.in_centroid);
        vector_add(self.ref_centroid, scale_vector(self.rotation.rotate_point(local), self.scale))
    }

    /// Moves a rigid pose by this transform. Scale only affects the position.
    pub fn apply_to_pose(&self, pose: &Pose) -> Pose {
        Pose::new(
            self.transform_point(pose.position),
            self.rotation.multiply(&pose.rotation).normalized(),
        )
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        RigidTransform::identity()
    }
}

/// Anything that fits a transform between two corresponding point sets.
pub trait PoseSolvable {
    /// Finds the transform that best maps `input[i]` onto `reference[i]`.
    fn solve_transform(&mut self, input: &[Vec3], reference: &[Vec3]) -> Result<RigidTransform, InteractionError>;
}

/// Least-squares rigid fit between corresponding point sets.
///
/// The rotation is refined iteratively from the previous solution, so a
/// solver kept per grasped object converges in very few iterations while the
/// object moves smoothly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KabschSolver {
    pub iterations: usize,
    pub solve_scale: bool,
    rotation: Quaternion,
}

impl KabschSolver {
    pub fn new(iterations: usize, solve_scale: bool) -> Self {
        Self {
            iterations,
            solve_scale,
            rotation: Quaternion::identity(),
        }
    }

    /// The rotation the next solve starts from.
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// Forgets the warm start.
    pub fn reset(&mut self) {
        self.rotation = Quaternion::identity();
    }

    /// Computes the transform taking `input` onto `reference`.
    ///
    /// # Errors
    /// Returns [`InteractionError::MismatchedPointSets`] if the slices differ in length.
    ///
    /// # Example
    /// ```
    /// use rs_interaction::solver::KabschSolver;
    ///
    /// let input = [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)];
    /// let reference = [(1.0, 2.0, 3.0), (2.0, 2.0, 3.0), (1.0, 3.0, 3.0)];
    /// let mut solver = KabschSolver::default();
    /// let transform = solver.solve(&input, &reference).unwrap();
    /// let moved = transform.transform_point(input[1]);
    /// assert!((moved.0 - 2.0).abs() < 1e-9);
    /// ```
    pub fn solve(&mut self, input: &[Vec3], reference: &[Vec3]) -> Result<RigidTransform, InteractionError> {
        if input.len() != reference.len() {
            return Err(InteractionError::MismatchedPointSets {
                input: input.len(),
                reference: reference.len(),
            });
        }
        if input.is_empty() {
            return Ok(RigidTransform::identity());
        }
        if !input.iter().chain(reference.iter()).all(|p| is_finite_vector(*p)) {
            warn!("Pose solve received non-finite points, returning identity transform");
            return Ok(RigidTransform::identity());
        }

        let in_centroid = centroid(input);
        let ref_centroid = centroid(reference);

        let scale = if self.solve_scale && input.len() > 1 {
            uniform_scale(input, reference, in_centroid, ref_centroid)
        } else {
            1.0
        };

        let rotation = if input.len() == 1 {
            Quaternion::identity()
        } else if are_colinear(input, COLINEAR_EPSILON) || are_colinear(reference, COLINEAR_EPSILON) {
            trace!("Pose solve on colinear points, rotation left at identity");
            Quaternion::identity()
        } else {
            let columns = cross_covariance(input, reference, in_centroid, ref_centroid);
            let rotation = extract_rotation(&columns, self.rotation, self.iterations);
            self.rotation = rotation;
            rotation
        };

        Ok(RigidTransform { in_centroid, ref_centroid, rotation, scale })
    }
}

impl Default for KabschSolver {
    fn default() -> Self {
        KabschSolver::new(DEFAULT_SOLVER_ITERATIONS, false)
    }
}

impl PoseSolvable for KabschSolver {
    fn solve_transform(&mut self, input: &[Vec3], reference: &[Vec3]) -> Result<RigidTransform, InteractionError> {
        self.solve(input, reference)
    }
}

/// Ratio of the summed centroid distances, or 1 when the input has no extent.
fn uniform_scale(input: &[Vec3], reference: &[Vec3], in_centroid: Vec3, ref_centroid: Vec3) -> f64 {
    let in_spread: f64 = input.iter().map(|p| distance(*p, in_centroid)).sum();
    let ref_spread: f64 = reference.iter().map(|p| distance(*p, ref_centroid)).sum();
    if in_spread > 1e-12 {
        ref_spread / in_spread
    } else {
        1.0
    }
}

/// Columns of `sum(ref_c * in_c^T)` over the centered point pairs.
pub fn cross_covariance(input: &[Vec3], reference: &[Vec3], in_centroid: Vec3, ref_centroid: Vec3) -> [Vec3; 3] {
    let mut columns = [ZERO_VECTOR; 3];
    for (p, r) in input.iter().zip(reference.iter()) {
        let p = vector_sub(*p, in_centroid);
        let r = vector_sub(*r, ref_centroid);
        columns[0] = vector_add(columns[0], scale_vector(r, p.0));
        columns[1] = vector_add(columns[1], scale_vector(r, p.1));
        columns[2] = vector_add(columns[2], scale_vector(r, p.2));
    }
    columns
}

/// Refines `initial` toward the rotational part of the matrix given by `columns`.
///
/// A rotation a half turn away from the target is a stationary point of the
/// refinement. It is recognized by a negative alignment, and the estimate is
/// flipped about its best aligned axis before refining again.
pub fn extract_rotation(columns: &[Vec3; 3], initial: Quaternion, iterations: usize) -> Quaternion {
    let q = refine_rotation(columns, initial.normalized(), iterations);
    let alignment = axis_alignment(columns, &q);
    if iterations == 0 || alignment.iter().sum::<f64>() >= 0.0 {
        return q;
    }

    let basis = q.basis();
    let best = (0..3)
        .max_by(|&a, &b| alignment[a].total_cmp(&alignment[b]))
        .unwrap_or(0);
    trace!("Rotation estimate is inverted (alignment {:?}), flipping about axis {}", alignment, best);
    let flipped = Quaternion::from_axis_angle(basis[best], PI).multiply(&q).normalized();
    refine_rotation(columns, flipped, iterations)
}

/// `dot(q * e_i, column_i)` for each axis.
fn axis_alignment(columns: &[Vec3; 3], q: &Quaternion) -> [f64; 3] {
    let basis = q.basis();
    [
        dot_product(basis[0], columns[0]),
        dot_product(basis[1], columns[1]),
        dot_product(basis[2], columns[2]),
    ]
}

fn refine_rotation(columns: &[Vec3; 3], initial: Quaternion, iterations: usize) -> Quaternion {
    let mut q = initial;
    for _ in 0..iterations {
        let basis = q.basis();
        let mut numerator = ZERO_VECTOR;
        let mut denominator = 0.0;
        for (axis, column) in basis.iter().zip(columns.iter()) {
            numerator = vector_add(numerator, cross_product(*axis, *column));
            denominator += dot_product(*axis, *column);
        }
        let omega = scale_vector(numerator, 1.0 / (denominator.abs() + DENOMINATOR_EPSILON));
        let angle = vector_magnitude(omega);
        if !angle.is_finite() || angle < CONVERGENCE_THRESHOLD {
            break;
        }
        q = Quaternion::from_axis_angle(omega, angle).multiply(&q).normalized();
    }
    q
}
