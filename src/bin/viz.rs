use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use rocket_lander::config::SimConfig;
use rocket_lander::sim::{FlightRecord, ScenarioReport, Simulation};

fn main() -> eframe::Result {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(&path).unwrap_or_else(|e| {
            log::error!("{}: {}, using defaults", path, e);
            SimConfig::default()
        }),
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(config).recording(true);
    let reports = sim.run_suite(100_000).unwrap_or_else(|e| {
        log::error!("{}", e);
        sim.harness().reports().to_vec()
    });

    let app = LanderViz { records: sim.records().to_vec(), reports };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Rocket Lander", options, Box::new(|_| Ok(Box::new(app))))
}

struct LanderViz {
    records: Vec<FlightRecord>,
    reports: Vec<ScenarioReport>,
}

fn plot(ui: &mut egui::Ui, id: &str, label: &str, w: f32, h: f32, points: PlotPoints) {
    ui.vertical(|ui| {
        ui.label(label);
        Plot::new(id)
            .width(w)
            .height(h)
            .x_axis_label("Time (s)")
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(label, points));
            });
    });
}

impl eframe::App for LanderViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.records.len() / 4000).max(1);
        let sampled: Vec<&FlightRecord> = self.records.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Scenario suite");
            let fuel: f64 = self.reports.iter().map(|r| r.fuel_used).sum();
            ui.label(format!(
                "Scenarios: {}  |  Fuel: {:.3e}  |  Flight: {:.1} s",
                self.reports.len(),
                fuel,
                self.records.last().map_or(0.0, |r| r.time),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                let height: PlotPoints = sampled.iter().map(|r| [r.time, r.position.y]).collect();
                plot(ui, "height", "Height (m)", half_w, half_h, height);

                let vy: PlotPoints = sampled.iter().map(|r| [r.time, r.velocity.y]).collect();
                plot(ui, "vy", "Vertical speed (m/s)", half_w, half_h, vy);
            });

            ui.horizontal(|ui| {
                let throttle: PlotPoints = sampled
                    .iter()
                    .map(|r| {
                        let t = if r.ignited { r.thrust } else { 0.0 };
                        [r.time, t]
                    })
                    .collect();
                plot(ui, "thrust", "Thrust", half_w, half_h, throttle);

                let gimbal: PlotPoints = sampled
                    .iter()
                    .map(|r| [r.time, r.gimbal.to_degrees()])
                    .collect();
                plot(ui, "gimbal", "Gimbal (deg)", half_w, half_h, gimbal);
            });
        });
    }
}
