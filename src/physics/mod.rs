pub mod aerodynamics;
pub mod body;
pub mod world;

pub use body::{BodyHandle, RigidBody};
pub use world::{Body, World};
