use std::f64::consts::PI;

use rocket_lander::config::SimConfig;
use rocket_lander::gnc::AutopilotMode;
use rocket_lander::sim::{presets, AltitudeDetector, EventKind, Scenario, Simulation};
use test_log::test;

const MAX_TICKS: usize = 100_000;

fn run(scenarios: Vec<Scenario>) -> Simulation {
    let mut sim = Simulation::new(SimConfig::default()).with_scenarios(scenarios);
    let reports = sim.run_suite(MAX_TICKS);
    assert!(reports.is_ok(), "suite did not finish: {:?}", reports.err());
    sim
}

#[test]
fn vertical_drop_lands() {
    let sim = run(vec![presets().remove(0)]);
    let r = &sim.harness().reports()[0];
    assert!(r.fuel_used > 0.0, "landing should burn fuel");
    assert!(r.time_taken > 0.0);

    let st = sim.body_state().unwrap();
    assert!(st.height() <= 200.0);
    assert!(st.velocity.x.abs() < 0.4 && st.velocity.y.abs() < 0.4);
    assert_eq!(sim.mode(), AutopilotMode::Off, "land hands back control on the ground");
}

#[test]
fn sideways_entry_lands() {
    let s = presets().remove(1);
    assert_eq!(s.angle, PI / 2.0);
    let sim = run(vec![s]);
    let r = &sim.harness().reports()[0];
    assert!(r.fuel_used > 0.0);
    assert!(r.time_taken > 0.0);
    assert!(r.ticks > 0 && r.ticks < MAX_TICKS);
}

#[test]
fn chained_scenarios_report_their_own_deltas() {
    let p = presets();
    let sim = run(vec![p[0].clone(), p[1].clone()]);
    let reports = sim.harness().reports();
    assert_eq!(reports.len(), 2);

    let total: f64 = reports.iter().map(|r| r.fuel_used).sum();
    assert!((total - sim.rocket().stats.fuel_used).abs() <= 1e-6 * total);

    let time: f64 = reports.iter().map(|r| r.time_taken).sum();
    assert!(time <= sim.time() + 1e-9);
    for r in reports {
        assert!(r.fuel_used >= 0.0 && r.time_taken >= 0.0);
    }
}

#[test]
fn full_suite_terminates() {
    let mut sim = Simulation::new(SimConfig::default());
    let reports = sim.run_suite(MAX_TICKS).unwrap();
    assert_eq!(reports.len(), presets().len());
    assert!(!sim.harness().is_running());
}

#[test]
fn every_landing_preset_touches_down_softly() {
    for scenario in presets() {
        let name = scenario.name.clone();
        let landing = scenario.mode == AutopilotMode::Land;
        let sim = run(vec![scenario]);
        let touchdowns: Vec<f64> = sim
            .events()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::Touchdown { vertical_speed } => Some(vertical_speed),
                _ => None,
            })
            .collect();
        if landing {
            assert!(!touchdowns.is_empty(), "{name}: never touched down");
        }
        for v in touchdowns {
            assert!(v.abs() < 150.0, "{name}: touched down at {v:.1} m/s");
        }
    }
}

#[test]
fn altitude_callouts_fire_on_each_descent() {
    let p = presets();
    let mut sim = Simulation::new(SimConfig::default()).with_scenarios(vec![p[1].clone(), p[3].clone()]);
    sim.add_detector(Box::new(AltitudeDetector::new(3000.0, false)));
    sim.run_suite(MAX_TICKS).unwrap();

    let callouts: Vec<_> = sim
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Altitude { ascending: false, .. }))
        .collect();
    assert_eq!(callouts.len(), 2);
    assert!(callouts.iter().all(|e| e.state.height() <= 3000.0));
}

#[test]
fn noisy_telemetry_still_lands() {
    let mut config = SimConfig::default();
    config.telemetry.noise_amplitude = 0.01;
    config.telemetry.seed = Some(7);
    let mut sim = Simulation::new(config).with_scenarios(vec![presets().remove(0)]);
    let reports = sim.run_suite(MAX_TICKS).unwrap();
    assert_eq!(reports.len(), 1);
}

#[test]
fn seeded_runs_are_reproducible() {
    let make = || {
        let mut config = SimConfig::default();
        config.telemetry.noise_amplitude = 0.01;
        config.telemetry.seed = Some(42);
        Simulation::new(config).with_scenarios(vec![presets().remove(0)])
    };
    let a = make().run_suite(MAX_TICKS).unwrap();
    let b = make().run_suite(MAX_TICKS).unwrap();
    assert_eq!(a, b);
}
