use nalgebra::Vector2;
use thiserror::Error;

use super::event::{ApogeeDetector, EventDetector, EventKind, SimEvent, TouchdownDetector};
use super::harness::{Harness, ScenarioReport};
use super::scenario::{presets, Scenario};
use crate::config::SimConfig;
use crate::dynamics::BodyState;
use crate::gnc::{Autopilot, AutopilotMode, ControlContext, InputEvent, InputFrame, Pilot};
use crate::physics::{RigidBody, World};
use crate::vehicle::Rocket;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario '{scenario}' did not finish within {ticks} ticks")]
    Timeout { scenario: String, ticks: usize },
    #[error("no vehicle in the world")]
    NoVehicle,
}

/// One row of the flight log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightRecord {
    pub time: f64,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub angle: f64,
    pub angular_velocity: f64,
    pub thrust: f64,
    pub gimbal: f64,
    pub ignited: bool,
    pub airbrakes: bool,
    pub mode: AutopilotMode,
    pub fuel_used: f64,
}

// ---------------------------------------------------------------------------
// Simulation loop
// ---------------------------------------------------------------------------

/// Owns the world, one vehicle and its pilot. Single-threaded and
/// tick-driven; every phase of a tick runs to completion before the next.
pub struct Simulation {
    config: SimConfig,
    world: World,
    rocket: Rocket,
    pilot: Box<dyn Pilot>,
    time: f64,
    ticks: u64,
    paused: bool,
    harness: Harness,
    detectors: Vec<Box<dyn EventDetector>>,
    events: Vec<SimEvent>,
    prev_state: Option<BodyState>,
    records: Option<Vec<FlightRecord>>,
}

impl Simulation {
    /// Autopilot-equipped vehicle at the spawn point, preset scenarios loaded.
    pub fn new(config: SimConfig) -> Self {
        let pilot = Box::new(Autopilot::new(config.autopilot.clone()));
        Self::with_pilot(config, pilot)
    }

    pub fn with_pilot(config: SimConfig, pilot: Box<dyn Pilot>) -> Self {
        let mut world = World::new(&config.world);
        let mut rocket = Rocket::from_config(&config);
        rocket.spawn(&mut world, spawn_point(&config));

        let length = config.vehicle.length;
        let rest = config.world.ground_height + length / 2.0;
        let detectors: Vec<Box<dyn EventDetector>> = vec![
            Box::new(ApogeeDetector::new(config.world.ground_height + length)),
            Box::new(TouchdownDetector::new(rest + 1.0, rest + length)),
        ];

        Self {
            harness: Harness::new(presets(), &config.harness),
            config,
            world,
            rocket,
            pilot,
            time: 0.0,
            ticks: 0,
            paused: false,
            detectors,
            events: Vec::new(),
            prev_state: None,
            records: None,
        }
    }

    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.harness = Harness::new(scenarios, &self.config.harness);
        self
    }

    /// Keep a per-tick flight log.
    pub fn recording(mut self, on: bool) -> Self {
        self.records = on.then(Vec::new);
        self
    }

    pub fn add_detector(&mut self, detector: Box<dyn EventDetector>) {
        self.detectors.push(detector);
    }

    // -- accessors ----------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn rocket(&self) -> &Rocket {
        &self.rocket
    }

    pub fn rocket_mut(&mut self) -> &mut Rocket {
        &mut self.rocket
    }

    pub fn body_state(&self) -> Option<BodyState> {
        let h = self.rocket.handle()?;
        self.world.body(h).map(|b| BodyState::of(b))
    }

    pub fn pilot(&self) -> &dyn Pilot {
        &*self.pilot
    }

    pub fn mode(&self) -> AutopilotMode {
        self.pilot.mode()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn records(&self) -> &[FlightRecord] {
        self.records.as_deref().unwrap_or(&[])
    }

    // -- control ------------------------------------------------------------

    /// Advance one tick and clear the input queue. While paused only the
    /// game-level commands run.
    pub fn tick(&mut self, input: &mut InputFrame) {
        self.handle_game_events(input);
        if !self.paused {
            self.step(input);
        }
        input.queue.clear();
    }

    /// Replace the vehicle with a fresh one at the spawn point.
    pub fn restart(&mut self) {
        self.rocket.despawn(&mut self.world);
        let mut rocket = Rocket::from_config(&self.config);
        let spawn = spawn_point(&self.config);
        rocket.spawn(&mut self.world, spawn);
        self.rocket = rocket;
        self.pilot.reset();
        self.harness.stop();
        self.prev_state = None;
        log::info!("vehicle respawned at ({:.0}, {:.0})", spawn.x, spawn.y);
    }

    /// Begin the scenario suite on the current vehicle.
    pub fn start_tests(&mut self) {
        let handle = self.rocket.handle();
        let Some(body) = handle.and_then(|h| self.world.body_mut(h)) else {
            log::warn!("no vehicle, scenario suite not started");
            return;
        };
        self.harness.begin(&mut self.rocket, body, &mut *self.pilot, self.time);
        self.prev_state = None;
        if let Some(s) = self.harness.current() {
            let kind = EventKind::ScenarioStarted(s.name.clone());
            self.push_event(kind);
        }
    }

    /// Run the whole suite headless. `max_ticks` bounds each scenario.
    pub fn run_suite(&mut self, max_ticks: usize) -> Result<Vec<ScenarioReport>, SimError> {
        if self.body_state().is_none() {
            return Err(SimError::NoVehicle);
        }
        self.paused = false;
        self.start_tests();

        let mut input = InputFrame::new(self.config.harness.input_capacity);
        while let Some(s) = self.harness.current() {
            if self.harness.ticks() >= max_ticks {
                return Err(SimError::Timeout { scenario: s.name.clone(), ticks: max_ticks });
            }
            self.tick(&mut input);
        }
        Ok(self.harness.reports().to_vec())
    }

    // -- tick phases --------------------------------------------------------

    fn handle_game_events(&mut self, input: &InputFrame) {
        for ev in input.queue.iter() {
            match ev {
                InputEvent::Restart => self.restart(),
                InputEvent::TogglePause => {
                    self.paused = !self.paused;
                    log::info!("{}", if self.paused { "paused" } else { "resumed" });
                }
                InputEvent::ToggleAirbrakes => self.rocket.toggle_airbrakes(),
                InputEvent::RunTests => self.start_tests(),
                InputEvent::ToggleIgnition | InputEvent::SelectMode(_) => {}
            }
        }
    }

    fn step(&mut self, input: &InputFrame) {
        let handle = self.rocket.handle();

        self.rocket.update_forces(handle.and_then(|h| self.world.body_mut(h)));
        self.world.step(self.config.world.dt);
        self.time += self.config.world.dt;
        self.ticks += 1;

        let mut ctx = ControlContext {
            input,
            gravity: self.world.gravity,
            rocket: &mut self.rocket,
            body: handle
                .and_then(|h| self.world.body_mut(h))
                .map(|b| b as &mut dyn RigidBody),
        };
        self.pilot.handle_controls(&mut ctx);

        if let Some(state) = self.body_state() {
            self.detect_events(state);
        }
        self.check_harness();
        self.record();
    }

    fn detect_events(&mut self, state: BodyState) {
        let Some(prev) = self.prev_state.replace(state) else { return };
        for det in self.detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &state) {
                log::info!("t={:.2}s {:?}", self.time, kind);
                self.events.push(SimEvent { time: self.time, kind, state });
            }
        }
    }

    fn check_harness(&mut self) {
        let Some(h) = self.rocket.handle() else { return };
        let Some(body) = self.world.body_mut(h) else { return };
        if !self.harness.is_finished(&self.rocket, &*body, self.time) {
            return;
        }
        let finished = self.harness.current().map(|s| s.name.clone());
        self.harness.advance(&mut self.rocket, body, &mut *self.pilot, self.time);
        let started = self.harness.current().map(|s| s.name.clone());
        self.prev_state = None;

        if let Some(name) = finished {
            self.push_event(EventKind::ScenarioFinished(name));
        }
        if let Some(name) = started {
            self.push_event(EventKind::ScenarioStarted(name));
        }
    }

    fn push_event(&mut self, kind: EventKind) {
        if let Some(state) = self.body_state() {
            self.events.push(SimEvent { time: self.time, kind, state });
        }
    }

    fn record(&mut self) {
        let Some(state) = self.body_state() else { return };
        let Some(records) = self.records.as_mut() else { return };
        let engine = &self.rocket.engine;
        records.push(FlightRecord {
            time: self.time,
            position: state.position,
            velocity: state.velocity,
            angle: state.angle,
            angular_velocity: state.angular_velocity,
            thrust: engine.thrust(),
            gimbal: engine.angle(),
            ignited: engine.ignited(),
            airbrakes: self.rocket.airbrakes_enabled,
            mode: self.pilot.mode(),
            fuel_used: self.rocket.stats.fuel_used,
        });
    }
}

fn spawn_point(config: &SimConfig) -> Vector2<f64> {
    Vector2::new(config.world.spawn_x, config.world.spawn_y)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
