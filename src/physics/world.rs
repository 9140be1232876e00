use nalgebra::{Rotation2, Vector2};

use super::body::{BodyHandle, RigidBody};
use crate::config::WorldConfig;

// ---------------------------------------------------------------------------
// Body: planar rigid body with a convex hull for ground contact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub angle: f64,
    pub angular_velocity: f64,
    pub mass: f64,
    pub inertia: f64,
    hull: Vec<Vector2<f64>>, // local frame
    force: Vector2<f64>,
    torque: f64,
    in_contact: bool,
}

impl Body {
    pub fn new(position: Vector2<f64>, mass: f64, inertia: f64, hull: Vec<Vector2<f64>>) -> Self {
        Self {
            position,
            velocity: Vector2::zeros(),
            angle: 0.0,
            angular_velocity: 0.0,
            mass,
            inertia,
            hull,
            force: Vector2::zeros(),
            torque: 0.0,
            in_contact: false,
        }
    }

    /// Solid rectangle centred on its origin.
    pub fn rectangle(position: Vector2<f64>, width: f64, height: f64, mass: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let hull = vec![
            Vector2::new(-hw, -hh),
            Vector2::new(hw, -hh),
            Vector2::new(hw, hh),
            Vector2::new(-hw, hh),
        ];
        let inertia = mass * (width * width + height * height) / 12.0;
        Self::new(position, mass, inertia, hull)
    }

    /// Hull vertices in world coordinates.
    pub fn world_hull(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        let rot = Rotation2::new(self.angle);
        self.hull.iter().map(move |v| self.position + rot * *v)
    }

    pub fn in_contact(&self) -> bool {
        self.in_contact
    }

    /// Force accumulated since the last step.
    pub fn pending_force(&self) -> Vector2<f64> {
        self.force
    }

    /// Torque accumulated since the last step.
    pub fn pending_torque(&self) -> f64 {
        self.torque
    }
}

impl RigidBody for Body {
    fn position(&self) -> Vector2<f64> {
        self.position
    }

    fn velocity(&self) -> Vector2<f64> {
        self.velocity
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn apply_force(&mut self, point: Vector2<f64>, force: Vector2<f64>) {
        let r = point - self.position;
        self.force += force;
        self.torque += r.x * force.y - r.y * force.x;
    }

    fn set_position(&mut self, position: Vector2<f64>) {
        self.position = position;
    }

    fn set_velocity(&mut self, velocity: Vector2<f64>) {
        self.velocity = velocity;
    }

    fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }
}

// ---------------------------------------------------------------------------
// World: uniform gravity, flat inelastic ground
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct World {
    pub gravity: Vector2<f64>,
    pub ground_height: f64,
    pub ground_friction: f64,
    pub air_friction: f64,
    bodies: Vec<Option<Body>>,
}

impl World {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            gravity: Vector2::new(0.0, -config.gravity),
            ground_height: config.ground_height,
            ground_friction: config.ground_friction,
            air_friction: config.air_friction,
            bodies: Vec::new(),
        }
    }

    pub fn insert(&mut self, body: Body) -> BodyHandle {
        if let Some(idx) = self.bodies.iter().position(Option::is_none) {
            self.bodies[idx] = Some(body);
            BodyHandle(idx)
        } else {
            self.bodies.push(Some(body));
            BodyHandle(self.bodies.len() - 1)
        }
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies.get_mut(handle.0).and_then(Option::take)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0).and_then(Option::as_ref)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance every body by `dt` (semi-implicit Euler), then resolve ground
    /// contact. Accumulated forces are consumed.
    ///
    /// Air friction scales the carried-over velocity before this step's
    /// acceleration is added, so a free-falling body approaches a terminal
    /// speed of `g * dt / k`.
    pub fn step(&mut self, dt: f64) {
        let gravity = self.gravity;
        let ground = self.ground_height;
        let friction = self.ground_friction;
        let retain = 1.0 - self.air_friction;

        for body in self.bodies.iter_mut().flatten() {
            let accel = body.force / body.mass + gravity;
            body.velocity = body.velocity * retain + accel * dt;
            body.angular_velocity = body.angular_velocity * retain + body.torque / body.inertia * dt;
            body.position += body.velocity * dt;
            body.angle += body.angular_velocity * dt;
            body.force = Vector2::zeros();
            body.torque = 0.0;

            resolve_ground(body, ground, friction);
        }
    }
}

fn resolve_ground(body: &mut Body, ground: f64, friction: f64) {
    let lowest = body
        .world_hull()
        .map(|p| p.y)
        .fold(f64::INFINITY, f64::min);

    if lowest < ground {
        body.position.y += ground - lowest;
        if body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
        body.velocity.x *= friction;
        body.angular_velocity *= friction;
        body.in_contact = true;
    } else {
        body.in_contact = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
