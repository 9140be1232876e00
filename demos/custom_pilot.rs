use rocket_lander::config::SimConfig;
use rocket_lander::gnc::{ControlContext, Pilot};
use rocket_lander::io::velocity_unit;
use rocket_lander::physics::RigidBody;
use rocket_lander::sim::{EventKind, Scenario, Simulation};

/// Free-falls, then lights the engine at full thrust once the stopping
/// distance at full thrust catches up with the height left.
struct SuicideBurn {
    margin: f64,
    burning: bool,
}

impl Pilot for SuicideBurn {
    fn handle_controls(&mut self, ctx: &mut ControlContext<'_>) {
        let Some(body) = ctx.body.as_deref() else { return };
        let rocket = &mut *ctx.rocket;

        let height = body.position().y - rocket.length / 2.0;
        let vy = body.velocity().y;
        let decel = rocket.engine.limits.max_thrust / rocket.mass - ctx.gravity.norm();
        let stopping = vy * vy / (2.0 * decel);

        if vy < 0.0 && height <= stopping * self.margin {
            self.burning = true;
        }
        if vy >= -2.0 {
            self.burning = false;
        }

        if self.burning {
            rocket.engine.ignite();
            rocket.engine.set_thrust(rocket.engine.limits.max_thrust);
        } else {
            rocket.engine.cut_off();
        }
    }

    fn reset(&mut self) {
        self.burning = false;
    }

    fn name(&self) -> &str {
        "suicide-burn"
    }
}

fn main() {
    env_logger::init();

    let pilot = SuicideBurn { margin: 1.2, burning: false };
    println!("Flying with {} pilot...", pilot.name());

    let scenarios = vec![
        Scenario::new("drop-1km"),
        Scenario::new("drop-3km").position(0.0, 3000.0),
    ];
    let mut sim =
        Simulation::with_pilot(SimConfig::default(), Box::new(pilot)).with_scenarios(scenarios);

    match sim.run_suite(100_000) {
        Ok(reports) => {
            for r in &reports {
                println!("{:<10} fuel {:.3e}  time {:.1} s", r.name, r.fuel_used, r.time_taken);
            }
        }
        Err(e) => println!("suite aborted: {}", e),
    }

    for e in sim.events() {
        if let EventKind::Touchdown { vertical_speed } = e.kind {
            println!("touchdown at t={:.1} s, {}", e.time, velocity_unit(vertical_speed));
        }
    }
}
