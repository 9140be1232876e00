pub mod config;
pub mod dynamics;
pub mod physics;
pub mod vehicle;
mod gnc_mod;
pub mod sim;
pub mod io;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::{ConfigError, SimConfig};
pub use sim::Simulation;
