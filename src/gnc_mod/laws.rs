use nalgebra::Vector2;

use super::mode::{AutopilotMode, ModeTrigger};
use crate::config::AutopilotConfig;
use crate::dynamics::Telemetry;
use crate::vehicle::Engine;

/// Vehicle geometry the laws need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Airframe {
    pub mass: f64,
    pub length: f64,
}

/// Result of one law evaluation. The engine is a modified copy; the caller
/// decides whether to commit it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LawOutput {
    pub engine: Engine,
    pub airbrakes: Option<bool>,
    pub trigger: Option<ModeTrigger>,
}

impl LawOutput {
    fn engine(engine: Engine) -> Self {
        Self { engine, airbrakes: None, trigger: None }
    }
}

// ---------------------------------------------------------------------------
// Attitude
// ---------------------------------------------------------------------------

/// Rate damping only: nudge the gimbal against the spin.
pub fn assist(tel: &Telemetry, mut engine: Engine, gains: &AutopilotConfig) -> Engine {
    engine.increase_angle(-gains.assist_gain * tel.angular_velocity);
    engine
}

/// Body angle that points thrust against `target_velocity` plus gravity.
pub fn target_attitude(target_velocity: Vector2<f64>, gravity: Vector2<f64>) -> f64 {
    let d = target_velocity + gravity;
    d.x.atan2(-d.y)
}

/// Shared PD law for stabilize/hover/land. Stabilize only fights gravity;
/// the others also cancel the measured velocity.
pub fn attitude(
    mode: AutopilotMode,
    tel: &Telemetry,
    gravity: Vector2<f64>,
    mut engine: Engine,
    gains: &AutopilotConfig,
) -> Engine {
    let target_velocity = match mode {
        AutopilotMode::Stabilize => Vector2::zeros(),
        _ => tel.velocity,
    };
    let target = target_attitude(target_velocity, gravity);
    engine.set_angle(target - tel.angle - gains.rate_damping * tel.angular_velocity);
    engine
}

// ---------------------------------------------------------------------------
// Thrust
// ---------------------------------------------------------------------------

/// Thrust scale compensating for tilt between the nozzle and vertical.
fn tilt_compensation(engine: &Engine, tel: &Telemetry, cap: f64) -> f64 {
    let c = (engine.angle() - tel.angle).cos().abs();
    if c > 0.0 { (1.0 / c).min(cap) } else { cap }
}

pub fn hover(
    tel: &Telemetry,
    gravity: Vector2<f64>,
    airframe: Airframe,
    mut engine: Engine,
    gains: &AutopilotConfig,
) -> Engine {
    let m = airframe.mass;
    let thrust = (m * gravity.norm() - m * tel.velocity.y)
        * tilt_compensation(&engine, tel, gains.hover_tilt_cap);
    engine.set_thrust(thrust);
    engine
}

/// Suicide-burn style descent: the thrust that would null the vertical speed
/// over the remaining height, derated. Hands control back below the
/// near-ground band.
pub fn land(
    tel: &Telemetry,
    gravity: Vector2<f64>,
    airframe: Airframe,
    mut engine: Engine,
    gains: &AutopilotConfig,
) -> LawOutput {
    let m = airframe.mass;
    let vy = tel.velocity.y;
    let h = (tel.position.y - airframe.length / gains.landing_reference_ratio)
        .max(gains.min_brake_height);

    let thrust = (2.0 * vy * vy * m / h + m * gravity.norm())
        * tilt_compensation(&engine, tel, gains.land_tilt_cap)
        * gains.land_derating;

    if vy > 0.0 || thrust < engine.limits.min_thrust {
        engine.cut_off();
    } else {
        engine.ignite();
    }
    engine.set_thrust(thrust);

    if tel.position.y < airframe.length / gains.near_ground_ratio {
        engine.cut_off();
        return LawOutput {
            engine,
            airbrakes: Some(false),
            trigger: Some(ModeTrigger::NearGround),
        };
    }

    LawOutput { engine, airbrakes: Some(true), trigger: None }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn apply(
    mode: AutopilotMode,
    tel: &Telemetry,
    gravity: Vector2<f64>,
    airframe: Airframe,
    engine: Engine,
    gains: &AutopilotConfig,
) -> LawOutput {
    match mode {
        AutopilotMode::Off => LawOutput::engine(engine),
        AutopilotMode::Assist => LawOutput::engine(assist(tel, engine, gains)),
        AutopilotMode::Stabilize => {
            LawOutput::engine(attitude(mode, tel, gravity, engine, gains))
        }
        AutopilotMode::Hover => {
            let engine = attitude(mode, tel, gravity, engine, gains);
            LawOutput::engine(hover(tel, gravity, airframe, engine, gains))
        }
        AutopilotMode::Land => {
            let engine = attitude(mode, tel, gravity, engine, gains);
            land(tel, gravity, airframe, engine, gains)
        }
    }
}
