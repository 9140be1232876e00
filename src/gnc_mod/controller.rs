use nalgebra::Vector2;

use super::input::{InputEvent, InputFrame};
use super::mode::AutopilotMode;
use crate::config::AutopilotConfig;
use crate::physics::RigidBody;
use crate::vehicle::Rocket;

/// What a pilot gets to touch on one tick.
pub struct ControlContext<'a> {
    pub input: &'a InputFrame,
    pub gravity: Vector2<f64>,
    pub rocket: &'a mut Rocket,
    pub body: Option<&'a mut dyn RigidBody>,
}

/// Trait for pilots.
///
/// Implement this to plug a different control source (human relay,
/// autopilot, scripted test pilot) into the simulation loop.
pub trait Pilot {
    /// Consume this tick's input and command the vehicle.
    fn handle_controls(&mut self, ctx: &mut ControlContext<'_>);

    fn mode(&self) -> AutopilotMode {
        AutopilotMode::Off
    }

    /// Switch mode directly (harness scenarios). Pilots without modes ignore it.
    fn select_mode(&mut self, _mode: AutopilotMode) {}

    /// Return to the power-on state.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

// ---------------------------------------------------------------------------
// Shared input relay
// ---------------------------------------------------------------------------

/// Discrete events. Returns the last mode selected this tick, if any.
/// Selecting a mode also lights the engine.
pub(crate) fn relay_events(ctx: &mut ControlContext<'_>) -> Option<AutopilotMode> {
    let mut selected = None;
    for ev in ctx.input.queue.iter() {
        match *ev {
            InputEvent::ToggleIgnition => ctx.rocket.engine.toggle_ignition(),
            InputEvent::SelectMode(m) => {
                ctx.rocket.engine.ignite();
                selected = Some(m);
            }
            _ => {}
        }
    }
    selected
}

/// Held keys: thrust nudges and counter-rotating body/gimbal nudges.
pub(crate) fn relay_holds(ctx: &mut ControlContext<'_>, servo: f64, gains: &AutopilotConfig) {
    let held = ctx.input.held;
    let engine = &mut ctx.rocket.engine;

    if held.thrust_up {
        engine.increase_thrust(gains.thrust_nudge * servo);
    }
    if held.thrust_down {
        engine.increase_thrust(-gains.thrust_nudge * servo);
    }

    let mut turn = 0.0;
    if held.rotate_left {
        turn += 1.0;
    }
    if held.rotate_right {
        turn -= 1.0;
    }
    if turn == 0.0 {
        return;
    }

    engine.increase_angle(turn * gains.gimbal_nudge * servo);
    if let Some(body) = ctx.body.as_deref_mut() {
        let angle = body.angle();
        body.set_angle(angle - turn * gains.body_nudge * servo);
    }
}

// ---------------------------------------------------------------------------
// Manual pilot
// ---------------------------------------------------------------------------

/// Relays raw operator input with no automation.
#[derive(Debug, Clone, Default)]
pub struct ManualPilot {
    pub gains: AutopilotConfig,
}

impl ManualPilot {
    pub fn new(gains: AutopilotConfig) -> Self {
        Self { gains }
    }
}

impl Pilot for ManualPilot {
    fn handle_controls(&mut self, ctx: &mut ControlContext<'_>) {
        relay_events(ctx);
        relay_holds(ctx, 1.0, &self.gains);
    }

    fn name(&self) -> &str {
        "manual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::gnc_mod::input::HeldControls;
    use crate::physics::World;
    use crate::vehicle::RocketBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn space_toggles_and_digit_ignites() {
        let mut rocket = RocketBuilder::new().build();
        let mut frame = InputFrame::new(8);
        frame.key_down("Space");
        let mut pilot = ManualPilot::default();
        let mut ctx = ControlContext {
            input: &frame,
            gravity: Vector2::new(0.0, -600.0),
            rocket: &mut rocket,
            body: None,
        };
        pilot.handle_controls(&mut ctx);
        assert!(rocket.engine.ignited());

        frame.queue.clear();
        frame.key_down("Space");
        frame.key_down("Digit2");
        let mut ctx = ControlContext {
            input: &frame,
            gravity: Vector2::new(0.0, -600.0),
            rocket: &mut rocket,
            body: None,
        };
        assert_eq!(relay_events(&mut ctx), Some(AutopilotMode::Stabilize));
        assert!(rocket.engine.ignited());
    }

    #[test]
    fn left_hold_turns_body_and_gimbal_opposite_ways() {
        let mut world = World::new(&WorldConfig::default());
        let mut rocket = RocketBuilder::new().build();
        let h = rocket.spawn(&mut world, Vector2::new(0.0, 1000.0));
        let mut frame = InputFrame::new(8);
        frame.held = HeldControls { rotate_left: true, ..HeldControls::default() };

        let mut ctx = ControlContext {
            input: &frame,
            gravity: Vector2::new(0.0, -600.0),
            rocket: &mut rocket,
            body: world.body_mut(h).map(|b| b as &mut dyn RigidBody),
        };
        relay_holds(&mut ctx, 8.0, &AutopilotConfig::default());

        assert_relative_eq!(rocket.engine.angle(), 0.0008);
        assert_relative_eq!(world.body(h).unwrap().angle, -0.016);
    }

    #[test]
    fn thrust_holds_respect_engine_limits() {
        let mut rocket = RocketBuilder::new().build();
        let mut frame = InputFrame::new(8);
        frame.held.thrust_up = true;
        let max = rocket.engine.limits.max_thrust;
        let mut ctx = ControlContext {
            input: &frame,
            gravity: Vector2::new(0.0, -600.0),
            rocket: &mut rocket,
            body: None,
        };
        relay_holds(&mut ctx, 1.0, &AutopilotConfig::default());
        assert_eq!(rocket.engine.thrust(), max);
    }
}
