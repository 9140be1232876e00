pub mod engine;
pub mod rocket;

pub use engine::{Engine, EngineLimits};
pub use rocket::{Aero, FlightStats, Rocket, RocketBuilder};
