//! Fixed-step Euler-Cromer integration
//!
//! Semi-implicit: the velocity absorbs the accumulated force before the
//! position moves, which keeps orbits from spiralling outward the way
//! plain Euler does at this step size.

use crate::simulation::params::DT;
use crate::simulation::states::{Body, NVec2};

/// Advance `b` by one timestep and return its new position.
///
/// The force accumulator is consumed (scaled into the velocity) but not
/// cleared; the caller zeroes it once the update is taken.
pub fn euler_cromer(b: &mut Body) -> NVec2 {
    // Fold the accumulated force into the velocity first
    b.force *= DT;
    b.velocity += b.force;

    // Then move the position with the updated velocity
    b.position += b.velocity * DT;

    b.position
}
