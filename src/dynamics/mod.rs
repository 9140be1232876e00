pub mod state;
pub mod telemetry;

pub use state::{wrap_angle, BodyState, Telemetry};
pub use telemetry::Sensor;
