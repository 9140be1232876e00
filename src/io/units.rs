use std::fmt;

use crate::gnc::AutopilotMode;
use crate::sim::Simulation;

pub const LIGHT_YEAR: f64 = 9.461e15;

/// Metres below 1 km, kilometres below 0.1 ly, light-years beyond.
pub fn length_unit(h: f64) -> String {
    if h.abs() < 1e3 {
        format!("{:.1}m", h)
    } else if h.abs() < 0.1 * LIGHT_YEAR {
        format!("{:.1}km", h / 1e3)
    } else {
        format!("{:.1}ly", h / LIGHT_YEAR)
    }
}

pub fn velocity_unit(v: f64) -> String {
    if v.abs() < 1e3 {
        format!("{:.1}m/s", v)
    } else {
        format!("{:.1}km/s", v / 1e3)
    }
}

// ---------------------------------------------------------------------------
// Heads-up display
// ---------------------------------------------------------------------------

/// Read-only projection of the vehicle for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub throttle: f64,
    pub twr: f64,
    pub height: f64,
    pub vertical_speed: f64,
    pub mode: AutopilotMode,
}

impl Hud {
    /// `None` when there is no vehicle body.
    pub fn of(sim: &Simulation) -> Option<Self> {
        let state = sim.body_state()?;
        let rocket = sim.rocket();
        Some(Self {
            throttle: rocket.engine.throttle(),
            twr: rocket.twr(sim.world().gravity.norm()),
            height: state.height(),
            vertical_speed: state.velocity.y,
            mode: sim.mode(),
        })
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Thrust: {:.0}%", self.throttle * 100.0)?;
        writeln!(f, "TWR: {:.2}", self.twr)?;
        writeln!(f, "Height: {}", length_unit(self.height))?;
        writeln!(f, "Velocity: {}", velocity_unit(self.vertical_speed))?;
        write!(f, "SAS: {}", self.mode)
    }
}
