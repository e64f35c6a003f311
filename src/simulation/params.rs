//! Numerical and physical parameters for the simulation
//!
//! The force law and integrator run on fixed, non-SI constants; the
//! tree-level knobs (`THETA`, `MAX_DEPTH`) trade accuracy for speed.

/// Gravitational constant - not being realistic
pub const G: f32 = 1.0;

/// Upper clamp on pair separation so far-out bodies don't blow numbers up
pub const MAX_DISTANCE: f32 = 2500.0;

/// Fixed timestep applied to force and velocity each update
pub const DT: f32 = 0.4;

/// Body radius per unit mass; the radius also floors the force-law distance
pub const RADIUS_COEFF: f32 = 3.0;

/// Opening angle: a node with `width / distance < THETA` is approximated
/// by its center of mass instead of being descended into
pub const THETA: f32 = 0.8;

/// Insertion recursion bound. Past this depth coincident bodies aggregate
/// into a shared external node instead of subdividing further
pub const MAX_DEPTH: u32 = 800;
