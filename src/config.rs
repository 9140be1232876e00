use std::f64::consts::FRAC_PI_4;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// World / integration parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: f64,          // downward acceleration magnitude
    pub dt: f64,               // physics tick, s
    pub ground_height: f64,    // y of the flat ground
    pub ground_friction: f64,  // per-tick velocity retention while in contact
    pub air_friction: f64,     // fraction of linear and angular velocity shed per tick
    pub drag_enabled: bool,
    pub spawn_x: f64,
    pub spawn_y: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: 600.0,
            dt: 1.0 / 50.0,       // 50 Hz
            ground_height: 0.0,
            ground_friction: 0.8,
            air_friction: 0.01,
            drag_enabled: false,
            spawn_x: 0.0,
            spawn_y: 200.0,
        }
    }
}

/// Vehicle geometry, mass and aerodynamic parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub length: f64,
    pub width: f64,
    pub mass: f64,
    pub drag_coeff: f64,
    pub drag_constant: f64,
    pub drag_offset: f64,            // drag point below centre, in vehicle lengths
    pub airbrake_offset_scale: f64,  // multiplies the drag point with airbrakes out
    pub angular_damping: f64,        // per-tick angular velocity retention under drag
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            length: 150.0,
            width: 15.0,
            mass: 300e3,
            drag_coeff: 1e-5,
            drag_constant: 30.0,
            drag_offset: 5.0,
            airbrake_offset_scale: -0.3,
            angular_damping: 0.999,
        }
    }
}

/// Engine actuator limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_thrust: f64,
    pub min_thrust: f64,
    pub max_thrust_change: f64,
    pub max_angle: f64,
    pub max_angle_change: f64,
    pub fuel_consumption: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_thrust: 3.6e8,
            min_thrust: 3.6e7,
            max_thrust_change: 3.6e7, // one min_thrust step per tick
            max_angle: FRAC_PI_4,
            max_angle_change: 1e9,
            fuel_consumption: 1.0,
        }
    }
}

/// Autopilot gains and manual-input step sizes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    pub assist_gain: f64,
    pub rate_damping: f64,
    pub hover_tilt_cap: f64,
    pub land_tilt_cap: f64,
    pub land_derating: f64,
    pub landing_reference_ratio: f64, // h = y - length / ratio
    pub near_ground_ratio: f64,       // land -> OFF below length / ratio
    pub min_brake_height: f64,
    pub servo_boost: f64,
    pub thrust_nudge: f64,
    pub body_nudge: f64,
    pub gimbal_nudge: f64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            assist_gain: 0.1,
            rate_damping: 0.4,
            hover_tilt_cap: 2.0,
            land_tilt_cap: 4.0,
            land_derating: 0.75,
            landing_reference_ratio: 1.9,
            near_ground_ratio: 1.8,
            min_brake_height: 1.0,
            servo_boost: 8.0,
            thrust_nudge: 1e7,
            body_nudge: 0.002,
            gimbal_nudge: 0.0001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub noise_amplitude: f64,
    pub seed: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { noise_amplitude: 0.0, seed: None }
    }
}

/// Scenario completion tolerances and the input queue bound.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub finish_height: f64,
    pub velocity_tolerance: f64,
    pub input_capacity: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            finish_height: 200.0,
            velocity_tolerance: 0.4,
            input_capacity: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub vehicle: VehicleConfig,
    pub engine: EngineConfig,
    pub autopilot: AutopilotConfig,
    pub telemetry: TelemetryConfig,
    pub harness: HarnessConfig,
}

impl SimConfig {
    /// Parse a (possibly partial) TOML document; missing keys keep defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, v: f64) -> Result<(), ConfigError> {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f64) -> Result<(), ConfigError> {
            if v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be >= 0, got {v}")))
            }
        }

        positive("world.dt", self.world.dt)?;
        non_negative("world.gravity", self.world.gravity)?;
        if !(0.0..=1.0).contains(&self.world.ground_friction) {
            return Err(ConfigError::Invalid(format!(
                "world.ground_friction must be in [0, 1], got {}",
                self.world.ground_friction
            )));
        }

        if !(0.0..1.0).contains(&self.world.air_friction) {
            return Err(ConfigError::Invalid(format!(
                "world.air_friction must be in [0, 1), got {}",
                self.world.air_friction
            )));
        }

        positive("vehicle.length", self.vehicle.length)?;
        positive("vehicle.width", self.vehicle.width)?;
        positive("vehicle.mass", self.vehicle.mass)?;
        non_negative("vehicle.drag_coeff", self.vehicle.drag_coeff)?;

        let e = &self.engine;
        non_negative("engine.min_thrust", e.min_thrust)?;
        if e.min_thrust > e.max_thrust {
            return Err(ConfigError::Invalid(format!(
                "engine.min_thrust ({}) exceeds engine.max_thrust ({})",
                e.min_thrust, e.max_thrust
            )));
        }
        non_negative("engine.max_thrust_change", e.max_thrust_change)?;
        non_negative("engine.max_angle", e.max_angle)?;
        non_negative("engine.max_angle_change", e.max_angle_change)?;
        non_negative("engine.fuel_consumption", e.fuel_consumption)?;

        positive("autopilot.landing_reference_ratio", self.autopilot.landing_reference_ratio)?;
        positive("autopilot.near_ground_ratio", self.autopilot.near_ground_ratio)?;
        positive("autopilot.min_brake_height", self.autopilot.min_brake_height)?;

        let amp = self.telemetry.noise_amplitude;
        if !(0.0..1.0).contains(&amp) {
            return Err(ConfigError::Invalid(format!(
                "telemetry.noise_amplitude must be in [0, 1), got {amp}"
            )));
        }

        if self.harness.input_capacity == 0 {
            return Err(ConfigError::Invalid("harness.input_capacity must be > 0".into()));
        }
        Ok(())
    }
}
