use nalgebra::Vector2;

/// Rigid body interface consumed by the vehicle core.
///
/// Implement this to drive the core from an external physics engine. Forces
/// applied through `apply_force` accumulate until the engine's next step.
pub trait RigidBody {
    fn position(&self) -> Vector2<f64>;
    fn velocity(&self) -> Vector2<f64>;
    fn angle(&self) -> f64;
    fn angular_velocity(&self) -> f64;
    fn mass(&self) -> f64;

    /// Apply `force` (world frame) at `point` (world coordinates).
    fn apply_force(&mut self, point: Vector2<f64>, force: Vector2<f64>);

    fn set_position(&mut self, position: Vector2<f64>);
    fn set_velocity(&mut self, velocity: Vector2<f64>);
    fn set_angle(&mut self, angle: f64);
    fn set_angular_velocity(&mut self, angular_velocity: f64);
}

/// Opaque index of a body inside a `World`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) usize);
