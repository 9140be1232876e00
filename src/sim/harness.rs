use serde::Serialize;

use super::scenario::Scenario;
use crate::config::HarnessConfig;
use crate::gnc::Pilot;
use crate::physics::RigidBody;
use crate::vehicle::Rocket;

/// Cost of one completed scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub fuel_used: f64,
    #[serde(rename = "time_taken_s")]
    pub time_taken: f64,
    pub ticks: usize,
}

/// Runs scenarios front to back. `cursor` is `None` while idle.
#[derive(Debug, Clone)]
pub struct Harness {
    scenarios: Vec<Scenario>,
    cursor: Option<usize>,
    finish_height: f64,
    velocity_tolerance: f64,
    fuel_before: f64,
    time_before: f64,
    ticks: usize,
    reports: Vec<ScenarioReport>,
}

impl Harness {
    pub fn new(scenarios: Vec<Scenario>, config: &HarnessConfig) -> Self {
        Self {
            scenarios,
            cursor: None,
            finish_height: config.finish_height,
            velocity_tolerance: config.velocity_tolerance,
            fuel_before: 0.0,
            time_before: 0.0,
            ticks: 0,
            reports: Vec::new(),
        }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn current(&self) -> Option<&Scenario> {
        self.cursor.and_then(|i| self.scenarios.get(i))
    }

    pub fn is_running(&self) -> bool {
        self.current().is_some()
    }

    pub fn reports(&self) -> &[ScenarioReport] {
        &self.reports
    }

    /// Ticks spent in the current scenario so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Start the suite from the first scenario, discarding earlier reports.
    pub fn begin(&mut self, rocket: &mut Rocket, body: &mut dyn RigidBody, pilot: &mut dyn Pilot, time: f64) {
        self.reports.clear();
        self.cursor = Some(0);
        self.start(rocket, body, pilot, time);
    }

    /// Impose the current scenario's initial condition and snapshot costs.
    pub fn start(&mut self, rocket: &mut Rocket, body: &mut dyn RigidBody, pilot: &mut dyn Pilot, time: f64) {
        let Some(s) = self.current() else { return };
        log::info!("scenario '{}' started ({})", s.name, s.mode);

        body.set_position(s.position);
        body.set_velocity(s.velocity);
        body.set_angle(s.angle);
        body.set_angular_velocity(s.angular_velocity);
        rocket.engine.ignite();
        pilot.select_mode(s.mode);

        self.fuel_before = rocket.stats.fuel_used;
        self.time_before = time;
        self.ticks = 0;
    }

    /// Poll once per tick. On success the report is stored and logged.
    pub fn is_finished(&mut self, rocket: &Rocket, body: &dyn RigidBody, time: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.ticks += 1;
        let Some(s) = self.current() else { return false };

        let pos = body.position();
        let vel = body.velocity();
        let low_enough = s.ignore_height || pos.y <= self.finish_height;
        let settled = vel.x.abs() < self.velocity_tolerance && vel.y.abs() < self.velocity_tolerance;
        if !(low_enough && settled) {
            return false;
        }

        let report = ScenarioReport {
            name: s.name.clone(),
            fuel_used: rocket.stats.fuel_used - self.fuel_before,
            time_taken: time - self.time_before,
            ticks: self.ticks,
        };
        log::info!(
            "scenario '{}' finished: fuel used {:.0}, time taken {:.2} s ({} ticks)",
            report.name,
            report.fuel_used,
            report.time_taken,
            report.ticks
        );
        self.reports.push(report);
        true
    }

    /// Move to the next scenario and start it, or go idle after the last.
    pub fn advance(&mut self, rocket: &mut Rocket, body: &mut dyn RigidBody, pilot: &mut dyn Pilot, time: f64) {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.scenarios.len() {
            self.cursor = Some(next);
            self.start(rocket, body, pilot, time);
        } else {
            log::info!("scenario suite finished ({} run)", self.reports.len());
            self.cursor = None;
        }
    }

    pub fn stop(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::gnc::{Autopilot, AutopilotMode};
    use crate::physics::World;
    use crate::vehicle::RocketBuilder;
    use nalgebra::Vector2;
    use test_log::test;

    fn setup() -> (World, Rocket, Autopilot) {
        let mut world = World::new(&WorldConfig::default());
        let mut rocket = RocketBuilder::new().build();
        rocket.spawn(&mut world, Vector2::new(0.0, 200.0));
        (world, rocket, Autopilot::default())
    }

    fn two() -> Vec<Scenario> {
        vec![
            Scenario::new("a").position(0.0, 500.0).velocity(3.0, 0.0),
            Scenario::new("b").position(0.0, 100.0).mode(AutopilotMode::Hover),
        ]
    }

    #[test]
    fn start_imposes_initial_condition() {
        let (mut world, mut rocket, mut pilot) = setup();
        let h = rocket.handle().unwrap();
        let mut harness = Harness::new(two(), &HarnessConfig::default());
        harness.begin(&mut rocket, world.body_mut(h).unwrap(), &mut pilot, 7.0);

        let b = world.body(h).unwrap();
        assert_eq!(b.position, Vector2::new(0.0, 500.0));
        assert_eq!(b.velocity, Vector2::new(3.0, 0.0));
        assert!(rocket.engine.ignited());
        assert_eq!(pilot.mode(), AutopilotMode::Land);
        assert_eq!(harness.current().map(|s| s.name.as_str()), Some("a"));
    }

    #[test]
    fn finish_needs_height_and_settled_velocity() {
        let (mut world, mut rocket, mut pilot) = setup();
        let h = rocket.handle().unwrap();
        let mut harness = Harness::new(two(), &HarnessConfig::default());
        harness.begin(&mut rocket, world.body_mut(h).unwrap(), &mut pilot, 1.0);

        assert!(!harness.is_finished(&rocket, world.body(h).unwrap(), 1.5));

        let b = world.body_mut(h).unwrap();
        b.set_position(Vector2::new(0.0, 150.0));
        b.set_velocity(Vector2::new(0.1, -0.1));
        rocket.stats.fuel_used += 42.0;
        assert!(harness.is_finished(&rocket, world.body(h).unwrap(), 3.0));

        let r = &harness.reports()[0];
        assert_eq!(r.name, "a");
        assert_eq!(r.fuel_used, 42.0);
        assert_eq!(r.time_taken, 2.0);
        assert_eq!(r.ticks, 2);
    }

    #[test]
    fn ignore_height_finishes_in_the_air() {
        let (mut world, mut rocket, mut pilot) = setup();
        let h = rocket.handle().unwrap();
        let s = vec![Scenario::new("air").position(0.0, 5000.0).ignore_height(true)];
        let mut harness = Harness::new(s, &HarnessConfig::default());
        harness.begin(&mut rocket, world.body_mut(h).unwrap(), &mut pilot, 0.0);
        assert!(harness.is_finished(&rocket, world.body(h).unwrap(), 0.02));
    }

    #[test]
    fn advance_walks_the_list_then_idles() {
        let (mut world, mut rocket, mut pilot) = setup();
        let h = rocket.handle().unwrap();
        let mut harness = Harness::new(two(), &HarnessConfig::default());
        harness.begin(&mut rocket, world.body_mut(h).unwrap(), &mut pilot, 0.0);

        harness.advance(&mut rocket, world.body_mut(h).unwrap(), &mut pilot, 1.0);
        assert_eq!(harness.current().map(|s| s.name.as_str()), Some("b"));
        assert_eq!(pilot.mode(), AutopilotMode::Hover);

        harness.advance(&mut rocket, world.body_mut(h).unwrap(), &mut pilot, 2.0);
        assert!(!harness.is_running());
        assert!(!harness.is_finished(&rocket, world.body(h).unwrap(), 3.0));
    }
}
