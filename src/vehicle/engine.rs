use crate::config::EngineConfig;

// ---------------------------------------------------------------------------
// Engine limits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineLimits {
    pub min_thrust: f64,
    pub max_thrust: f64,
    pub max_thrust_change: f64,  // per call
    pub max_angle: f64,          // rad, symmetric
    pub max_angle_change: f64,   // rad per call
    pub fuel_consumption: f64,   // fuel per unit thrust per tick
}

impl From<&EngineConfig> for EngineLimits {
    fn from(c: &EngineConfig) -> Self {
        Self {
            min_thrust: c.min_thrust,
            max_thrust: c.max_thrust,
            max_thrust_change: c.max_thrust_change,
            max_angle: c.max_angle,
            max_angle_change: c.max_angle_change,
            fuel_consumption: c.fuel_consumption,
        }
    }
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Engine: throttleable, gimballed, rate-limited
// ---------------------------------------------------------------------------

/// Actuator model. Every command is clamped, never rejected: first against
/// the per-call rate limit, then against the absolute range. A large single
/// request therefore saturates at the rate limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engine {
    pub limits: EngineLimits,
    thrust: f64,
    angle: f64,
    ignited: bool,
}

impl Engine {
    /// Starts at full thrust, centred, not ignited.
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            limits,
            thrust: limits.max_thrust,
            angle: 0.0,
            ignited: false,
        }
    }

    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn ignited(&self) -> bool {
        self.ignited
    }

    /// Fraction of maximum thrust.
    pub fn throttle(&self) -> f64 {
        if self.limits.max_thrust > 0.0 {
            self.thrust / self.limits.max_thrust
        } else {
            0.0
        }
    }

    pub fn set_thrust(&mut self, thrust: f64) {
        let l = &self.limits;
        let t = thrust
            .min(self.thrust + l.max_thrust_change)
            .max(self.thrust - l.max_thrust_change)
            .min(l.max_thrust)
            .max(l.min_thrust);
        self.thrust = t;
    }

    pub fn increase_thrust(&mut self, delta: f64) {
        self.set_thrust(self.thrust + delta);
    }

    pub fn set_angle(&mut self, angle: f64) {
        let l = &self.limits;
        let a = angle
            .min(self.angle + l.max_angle_change)
            .max(self.angle - l.max_angle_change)
            .min(l.max_angle)
            .max(-l.max_angle);
        self.angle = a;
    }

    pub fn increase_angle(&mut self, delta: f64) {
        self.set_angle(self.angle + delta);
    }

    pub fn ignite(&mut self) {
        self.ignited = true;
    }

    pub fn cut_off(&mut self) {
        self.ignited = false;
    }

    pub fn toggle_ignition(&mut self) {
        self.ignited = !self.ignited;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tight() -> EngineLimits {
        EngineLimits {
            min_thrust: 10.0,
            max_thrust: 100.0,
            max_thrust_change: 10.0,
            max_angle: 0.5,
            max_angle_change: 0.1,
            fuel_consumption: 1.0,
        }
    }

    #[test]
    fn starts_at_full_thrust_centred_and_cold() {
        let e = Engine::new(tight());
        assert_eq!(e.thrust(), 100.0);
        assert_eq!(e.angle(), 0.0);
        assert!(!e.ignited());
        assert_relative_eq!(e.throttle(), 1.0);
    }

    #[test]
    fn ignite_and_cut_off_leave_thrust_alone() {
        let mut e = Engine::new(tight());
        e.set_angle(0.1);
        e.ignite();
        assert!(e.ignited());
        e.cut_off();
        assert!(!e.ignited());
        e.toggle_ignition();
        assert!(e.ignited());
        assert_eq!(e.thrust(), 100.0);
        assert_eq!(e.angle(), 0.1);
    }

    #[test]
    fn large_request_saturates_at_rate_limit() {
        let mut e = Engine::new(tight());
        e.set_thrust(0.0);
        assert_eq!(e.thrust(), 90.0);
        e.set_thrust(-1e9);
        assert_eq!(e.thrust(), 80.0);
    }

    #[test]
    fn absolute_bounds_hold() {
        let mut e = Engine::new(tight());
        for _ in 0..50 {
            e.increase_thrust(-1e6);
        }
        assert_eq!(e.thrust(), 10.0);
        e.set_thrust(1e6);
        assert_eq!(e.thrust(), 20.0);
    }

    #[test]
    fn increase_thrust_within_limits_is_exact() {
        let mut e = Engine::new(tight());
        e.set_thrust(95.0);
        e.set_thrust(60.0);
        e.set_thrust(60.0);
        e.set_thrust(60.0);
        assert_eq!(e.thrust(), 65.0);
        e.increase_thrust(5.0);
        assert_eq!(e.thrust(), 70.0);
    }

    #[test]
    fn set_thrust_to_current_is_noop() {
        let mut e = Engine::new(tight());
        e.set_thrust(83.0);
        let before = e;
        e.set_thrust(e.thrust());
        assert_eq!(e, before);
    }

    #[test]
    fn thrust_property_holds_for_arbitrary_requests() {
        let mut e = Engine::default();
        let l = e.limits;
        let mut x = 0.123_f64;
        for _ in 0..2000 {
            // cheap deterministic sweep over a wide range of requests
            x = (x * 9301.0 + 49297.0) % 233280.0;
            let request = (x / 233280.0 - 0.5) * 4.0 * l.max_thrust;
            let prev = e.thrust();
            e.set_thrust(request);
            assert!(e.thrust() >= l.min_thrust && e.thrust() <= l.max_thrust);
            assert!((e.thrust() - prev).abs() <= l.max_thrust_change + 1e-6);
        }
    }

    #[test]
    fn angle_is_rate_limited_then_clamped() {
        let mut e = Engine::new(tight());
        e.set_angle(10.0);
        assert_relative_eq!(e.angle(), 0.1);
        for _ in 0..10 {
            e.increase_angle(10.0);
        }
        assert_relative_eq!(e.angle(), 0.5);
        e.set_angle(-10.0);
        assert_relative_eq!(e.angle(), 0.4);
    }

    #[test]
    fn default_gimbal_rate_limit_is_not_binding() {
        let mut e = Engine::default();
        e.set_angle(-5.0);
        assert_relative_eq!(e.angle(), -e.limits.max_angle);
        e.set_angle(5.0);
        assert_relative_eq!(e.angle(), e.limits.max_angle);
    }
}
