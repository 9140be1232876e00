use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;

use crate::physics::RigidBody;

// ---------------------------------------------------------------------------
// Ground-truth body state
// ---------------------------------------------------------------------------

/// Snapshot of a rigid body read through the physics collaborator.
/// Frame: x right, y up, angles counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub angle: f64,             // rad, unwrapped
    pub angular_velocity: f64,  // rad/s
    pub mass: f64,
}

impl BodyState {
    pub fn of<B: RigidBody + ?Sized>(body: &B) -> Self {
        Self {
            position: body.position(),
            velocity: body.velocity(),
            angle: body.angle(),
            angular_velocity: body.angular_velocity(),
            mass: body.mass(),
        }
    }

    pub fn height(&self) -> f64 {
        self.position.y
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

// ---------------------------------------------------------------------------
// Telemetry snapshot
// ---------------------------------------------------------------------------

/// What the pilot sees. Recomputed on every read, never stored by the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub angle: f64,             // rad, wrapped before noise
    pub angular_velocity: f64,
}

impl Telemetry {
    /// Reading reported when no body is attached.
    pub fn zeroed() -> Self {
        Self {
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_angle(angle: f64) -> f64 {
    let a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a + TAU
    } else {
        a
    }
}
