//! Gravitational force accumulation between bodies
//!
//! A softened inverse-square law: the pair separation is clamped below by
//! the larger body radius (no singularity when bodies overlap) and above
//! by `MAX_DISTANCE`.

use crate::simulation::params::{G, MAX_DISTANCE};
use crate::simulation::states::Body;

/// Accumulate into `b.force` the gravitational pull of `other` on `b`.
///
/// The direction vector is divided by the *clamped* distance, so a clamped
/// pair feels exactly the force two bodies at the clamp separation would.
pub fn add_force(b: &mut Body, other: &Body) {
    let offset = other.position - b.position;

    // Clamp the separation between the larger radius and MAX_DISTANCE
    let distance = offset.norm().clamp(b.radius.max(other.radius), MAX_DISTANCE);

    let strength = G * other.mass / (distance * distance);

    b.force += offset / distance * strength;
}
