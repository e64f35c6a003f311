//! Core state types for the N-body simulation.
//!
//! Defines the 2D vector alias `NVec2` and the `Body` record carrying
//! mass, kinematic state, and the per-step force accumulator, plus the
//! center-of-mass combination used by the Barnes-Hut tree.

use nalgebra::Vector2;

use crate::simulation::params::RADIUS_COEFF;

pub type NVec2 = Vector2<f32>;

/// Id carried by synthetic center-of-mass aggregates. Aggregates are never
/// integrated and never recorded.
pub const COM_ID: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: i32, // >= 0 for real bodies, COM_ID for aggregates
    pub mass: f32,
    pub position: NVec2,
    pub velocity: NVec2,
    pub radius: f32,
    pub force: NVec2, // force to be applied on the next update
}

impl Body {
    /// New body with radius derived from mass and a zeroed force accumulator
    pub fn new(mass: f32, id: i32, position: NVec2, velocity: NVec2) -> Self {
        Self {
            id,
            mass,
            position,
            velocity,
            radius: mass * RADIUS_COEFF,
            force: NVec2::zeros(),
        }
    }

    /// Clear the force accumulator after an update has consumed it
    pub fn zero_force(&mut self) {
        self.force = NVec2::zeros();
    }
}

/// Combine two bodies into a single body at their center of mass, with
/// combined mass and mass-weighted velocity. The result carries [`COM_ID`].
pub fn combine(b1: &Body, b2: &Body) -> Body {
    let m = b1.mass + b2.mass;

    let position = (b1.position * b1.mass + b2.position * b2.mass) / m;
    let velocity = (b1.velocity * b1.mass + b2.velocity * b2.mass) / m;

    Body::new(m, COM_ID, position, velocity)
}
