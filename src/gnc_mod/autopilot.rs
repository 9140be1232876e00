use super::controller::{relay_events, relay_holds, ControlContext, Pilot};
use super::laws::{self, Airframe};
use super::mode::{transition, AutopilotMode, ModeTrigger};
use crate::config::AutopilotConfig;

/// Stability augmentation on top of the manual relay.
///
/// Per tick: discrete events, then held controls (boosted in the assisted
/// modes), then the law for the current mode on fresh telemetry.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    pub gains: AutopilotConfig,
    mode: AutopilotMode,
}

impl Autopilot {
    pub fn new(gains: AutopilotConfig) -> Self {
        Self { gains, mode: AutopilotMode::Off }
    }

    fn apply_trigger(&mut self, trigger: ModeTrigger) {
        let next = transition(self.mode, trigger);
        if next != self.mode {
            log::debug!("autopilot {} -> {} ({:?})", self.mode, next, trigger);
            self.mode = next;
        }
    }

    fn servo(&self) -> f64 {
        if self.mode.is_assisted() {
            self.gains.servo_boost
        } else {
            1.0
        }
    }

    fn auto_controls(&mut self, ctx: &mut ControlContext<'_>) {
        let Some(body) = ctx.body.as_deref() else { return };
        let tel = ctx.rocket.telemetry(Some(body));
        let airframe = Airframe { mass: ctx.rocket.mass, length: ctx.rocket.length };

        let out = laws::apply(self.mode, &tel, ctx.gravity, airframe, ctx.rocket.engine, &self.gains);
        ctx.rocket.engine = out.engine;
        if let Some(on) = out.airbrakes {
            ctx.rocket.airbrakes_enabled = on;
        }
        if let Some(trigger) = out.trigger {
            self.apply_trigger(trigger);
        }
    }
}

impl Pilot for Autopilot {
    fn handle_controls(&mut self, ctx: &mut ControlContext<'_>) {
        if let Some(mode) = relay_events(ctx) {
            self.apply_trigger(ModeTrigger::Select(mode));
        }
        relay_holds(ctx, self.servo(), &self.gains);
        self.auto_controls(ctx);
    }

    fn mode(&self) -> AutopilotMode {
        self.mode
    }

    fn select_mode(&mut self, mode: AutopilotMode) {
        self.apply_trigger(ModeTrigger::Select(mode));
    }

    fn reset(&mut self) {
        self.mode = AutopilotMode::Off;
    }

    fn name(&self) -> &str {
        "autopilot"
    }
}
