use nalgebra::{Rotation2, Vector2};

use super::engine::{Engine, EngineLimits};
use crate::config::SimConfig;
use crate::dynamics::{BodyState, Sensor, Telemetry};
use crate::physics::aerodynamics::{drag_force, exposed_area};
use crate::physics::{Body, BodyHandle, RigidBody, World};

// ---------------------------------------------------------------------------
// Flight statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightStats {
    pub fuel_used: f64,
}

// ---------------------------------------------------------------------------
// Aerodynamic parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aero {
    pub enabled: bool,
    pub drag_coeff: f64,
    pub drag_constant: f64,
    pub drag_offset: f64,           // in vehicle lengths below the centre
    pub airbrake_offset_scale: f64,
    pub angular_damping: f64,
}

impl Default for Aero {
    fn default() -> Self {
        Self {
            enabled: false,
            drag_coeff: 1e-5,
            drag_constant: 30.0,
            drag_offset: 5.0,
            airbrake_offset_scale: -0.3,
            angular_damping: 0.999,
        }
    }
}

// ---------------------------------------------------------------------------
// Rocket: engine + body link + force model
// ---------------------------------------------------------------------------

/// Vehicle dynamics. Converts engine state into forces on the linked body,
/// tracks propellant use and produces telemetry. Every operation that needs
/// the body is a no-op (or zeroed) when the body is absent.
#[derive(Debug, Clone)]
pub struct Rocket {
    pub length: f64,
    pub width: f64,
    pub mass: f64,
    pub engine: Engine,
    pub stats: FlightStats,
    pub aero: Aero,
    pub airbrakes_enabled: bool,
    pub sensor: Sensor,
    handle: Option<BodyHandle>,
}

impl Rocket {
    pub fn from_config(config: &SimConfig) -> Self {
        let v = &config.vehicle;
        RocketBuilder::new()
            .length(v.length)
            .width(v.width)
            .mass(v.mass)
            .engine(EngineLimits::from(&config.engine))
            .aero(Aero {
                enabled: config.world.drag_enabled,
                drag_coeff: v.drag_coeff,
                drag_constant: v.drag_constant,
                drag_offset: v.drag_offset,
                airbrake_offset_scale: v.airbrake_offset_scale,
                angular_damping: v.angular_damping,
            })
            .sensor(Sensor::new(config.telemetry.noise_amplitude, config.telemetry.seed))
            .build()
    }

    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    /// Outline in the local frame: a box with a pointed nose, engine at -y.
    pub fn hull(&self) -> Vec<Vector2<f64>> {
        let (w, h) = (self.width, self.length);
        vec![
            Vector2::new(-w / 2.0, -h / 2.0),
            Vector2::new(w / 2.0, -h / 2.0),
            Vector2::new(w / 2.0, h / 2.0),
            Vector2::new(0.0, h / 1.5),
            Vector2::new(-w / 2.0, h / 2.0),
        ]
    }

    pub fn inertia(&self) -> f64 {
        self.mass * (self.width * self.width + self.length * self.length) / 12.0
    }

    /// Engine mount, local frame.
    pub fn engine_mount(&self) -> Vector2<f64> {
        Vector2::new(0.0, -self.length / 2.0)
    }

    /// Drag application point, local frame. Airbrakes move it, they do not
    /// change the force.
    pub fn drag_point(&self) -> Vector2<f64> {
        let p = Vector2::new(0.0, -self.aero.drag_offset * self.length);
        if self.airbrakes_enabled {
            p * self.aero.airbrake_offset_scale
        } else {
            p
        }
    }

    /// Create the body in `world` and link it, replacing any previous link.
    pub fn spawn(&mut self, world: &mut World, position: Vector2<f64>) -> BodyHandle {
        self.despawn(world);
        let body = Body::new(position, self.mass, self.inertia(), self.hull());
        let handle = world.insert(body);
        self.handle = Some(handle);
        handle
    }

    pub fn despawn(&mut self, world: &mut World) {
        if let Some(h) = self.handle.take() {
            world.remove(h);
        }
    }

    /// Per-tick force hook: thrust (when ignited) and drag (when enabled).
    pub fn update_forces<B: RigidBody + ?Sized>(&mut self, body: Option<&mut B>) {
        let Some(body) = body else { return };

        if self.engine.ignited() {
            let thrust = self.engine.thrust();
            let gimbal = self.engine.angle();
            let local = Vector2::new(thrust * gimbal.sin(), thrust * gimbal.cos());
            let rot = Rotation2::new(body.angle());
            let point = body.position() + rot * self.engine_mount();
            body.apply_force(point, rot * local);
            self.stats.fuel_used += thrust * self.engine.limits.fuel_consumption;
        }

        if self.aero.enabled {
            self.update_drag(Some(body));
        }
    }

    /// Quadratic drag at the drag point plus a per-tick angular relaxation.
    pub fn update_drag<B: RigidBody + ?Sized>(&mut self, body: Option<&mut B>) {
        let Some(body) = body else { return };
        let vel = body.velocity();
        if vel.norm() < 0.1 {
            return;
        }

        let area = exposed_area(&vel, body.angle(), self.length, self.width, self.aero.drag_coeff);
        let force = drag_force(&vel, area, self.aero.drag_constant);
        let rot = Rotation2::new(body.angle());
        let point = body.position() + rot * self.drag_point();
        body.apply_force(point, force);

        // numerical stabiliser, not a torque model
        let omega = body.angular_velocity();
        body.set_angular_velocity(omega * self.aero.angular_damping);
    }

    pub fn telemetry<B: RigidBody + ?Sized>(&mut self, body: Option<&B>) -> Telemetry {
        match body {
            Some(b) => self.sensor.read(&BodyState::of(b)),
            None => Telemetry::zeroed(),
        }
    }

    /// Thrust-to-weight ratio for a gravity magnitude; 0 without gravity.
    pub fn twr(&self, gravity: f64) -> f64 {
        if gravity != 0.0 {
            self.engine.thrust() / self.mass / gravity.abs()
        } else {
            0.0
        }
    }

    pub fn toggle_airbrakes(&mut self) {
        self.airbrakes_enabled = !self.airbrakes_enabled;
    }
}

// ---------------------------------------------------------------------------
// Rocket builder
// ---------------------------------------------------------------------------

pub struct RocketBuilder {
    length: f64,
    width: f64,
    mass: f64,
    engine: EngineLimits,
    aero: Aero,
    sensor: Option<Sensor>,
}

impl RocketBuilder {
    pub fn new() -> Self {
        Self {
            length: 150.0,
            width: 15.0,
            mass: 300e3,
            engine: EngineLimits::default(),
            aero: Aero::default(),
            sensor: None,
        }
    }

    pub fn length(mut self, v: f64) -> Self { self.length = v; self }
    pub fn width(mut self, v: f64) -> Self { self.width = v; self }
    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn engine(mut self, v: EngineLimits) -> Self { self.engine = v; self }
    pub fn aero(mut self, v: Aero) -> Self { self.aero = v; self }
    pub fn sensor(mut self, v: Sensor) -> Self { self.sensor = Some(v); self }

    pub fn build(self) -> Rocket {
        Rocket {
            length: self.length,
            width: self.width,
            mass: self.mass,
            engine: Engine::new(self.engine),
            stats: FlightStats::default(),
            aero: self.aero,
            airbrakes_enabled: false,
            sensor: self.sensor.unwrap_or_else(Sensor::ideal),
            handle: None,
        }
    }
}

impl Default for RocketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
