use std::process::ExitCode;

use rocket_lander::config::SimConfig;
use rocket_lander::io::{csv, json, length_unit, velocity_unit};
use rocket_lander::sim::{AltitudeDetector, EventKind, ScenarioReport, Simulation};

/// Per-scenario tick bound for the headless run.
const MAX_TICKS: usize = 100_000;

const USAGE: &str = "usage: rocket-lander [config.toml] [--csv PATH] [--json PATH] [--alt METRES]...";

struct Args {
    config: Option<String>,
    csv: Option<String>,
    json: Option<String>,
    altitudes: Vec<f64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { config: None, csv: None, json: None, altitudes: Vec::new() };
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--csv" => args.csv = Some(it.next().ok_or("--csv needs a path")?),
            "--json" => args.json = Some(it.next().ok_or("--json needs a path")?),
            "--alt" => {
                let v = it.next().ok_or("--alt needs a height")?;
                let h = v.parse().map_err(|_| format!("bad --alt height '{}'", v))?;
                args.altitudes.push(h);
            }
            "-h" | "--help" => return Err(USAGE.into()),
            _ if args.config.is_none() && !a.starts_with('-') => args.config = Some(a),
            _ => return Err(format!("unexpected argument '{}'", a)),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let config = match &args.config {
        Some(path) => match SimConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    // -----------------------------------------------------------------------
    // Run the scenario suite
    // -----------------------------------------------------------------------
    // Descending altitude callouts; the finish band when none are given.
    let altitudes = if args.altitudes.is_empty() {
        vec![config.harness.finish_height]
    } else {
        args.altitudes.clone()
    };
    let mut sim = Simulation::new(config).recording(args.csv.is_some());
    for h in altitudes {
        sim.add_detector(Box::new(AltitudeDetector::new(h, false)));
    }
    let reports = match sim.run_suite(MAX_TICKS) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{}", e);
            print_reports(sim.harness().reports());
            return ExitCode::FAILURE;
        }
    };

    print_reports(&reports);
    print_events(&sim);

    // -----------------------------------------------------------------------
    // Output files
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv {
        if let Err(e) = csv::write_flight_log_file(path, sim.records()) {
            log::error!("writing {}: {}", path, e);
            return ExitCode::FAILURE;
        }
        println!("  Flight log: {} ({} rows)", path, sim.records().len());
    }
    if let Some(path) = &args.json {
        if let Err(e) = json::write_reports_file(path, &reports) {
            log::error!("writing {}: {}", path, e);
            return ExitCode::FAILURE;
        }
        println!("  Reports: {}", path);
    }
    println!();

    ExitCode::SUCCESS
}

fn print_reports(reports: &[ScenarioReport]) {
    let summary = json::SuiteSummary::from_reports(reports);

    println!();
    println!("====================================================================");
    println!("  ROCKET LANDER SCENARIO SUITE");
    println!("====================================================================");
    println!();
    println!(
        "  {:<24}  {:>14}  {:>10}  {:>8}",
        "scenario", "fuel used", "time (s)", "ticks"
    );
    println!("  {}", "─".repeat(62));
    for r in reports {
        println!(
            "  {:<24}  {:>14.4e}  {:>10.2}  {:>8}",
            r.name, r.fuel_used, r.time_taken, r.ticks
        );
    }
    println!("  {}", "─".repeat(62));
    println!(
        "  {:<24}  {:>14.4e}  {:>10.2}",
        format!("{} scenarios", summary.scenarios),
        summary.total_fuel,
        summary.total_time
    );
    println!();
}

fn print_events(sim: &Simulation) {
    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in sim.events() {
        let label = match &e.kind {
            EventKind::Apogee => "APOGEE".to_string(),
            EventKind::Altitude { altitude, ascending } => format!(
                "ALT {} {}",
                length_unit(*altitude),
                if *ascending { "up" } else { "down" }
            ),
            EventKind::Touchdown { vertical_speed } => {
                format!("TOUCHDOWN {}", velocity_unit(*vertical_speed))
            }
            EventKind::ScenarioStarted(name) => format!("START {}", name),
            EventKind::ScenarioFinished(name) => format!("DONE  {}", name),
        };
        println!(
            "  t={:>8.2}s   h={:>10}   {}",
            e.time,
            length_unit(e.state.height()),
            label
        );
    }
    println!();
}
