pub mod event;
pub mod harness;
pub mod runner;
pub mod scenario;

pub use event::{AltitudeDetector, EventDetector, EventKind, SimEvent};
pub use harness::{Harness, ScenarioReport};
pub use runner::{FlightRecord, SimError, Simulation};
pub use scenario::{presets, Scenario};
