use std::io::{self, Write};

use serde::Serialize;

use crate::sim::ScenarioReport;

/// Totals over a suite run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteSummary {
    #[serde(rename = "count")]
    pub scenarios: usize,
    pub total_fuel: f64,
    #[serde(rename = "total_time_s")]
    pub total_time: f64,
    #[serde(rename = "max_time_s")]
    pub max_time: f64,
}

impl SuiteSummary {
    pub fn from_reports(reports: &[ScenarioReport]) -> Self {
        Self {
            scenarios: reports.len(),
            total_fuel: reports.iter().map(|r| r.fuel_used).sum(),
            total_time: reports.iter().map(|r| r.time_taken).sum(),
            max_time: reports.iter().map(|r| r.time_taken).fold(0.0_f64, f64::max),
        }
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    scenarios: &'a [ScenarioReport],
    summary: SuiteSummary,
}

/// Write scenario reports and their summary as JSON to a writer.
pub fn write_reports<W: Write>(writer: &mut W, reports: &[ScenarioReport]) -> io::Result<()> {
    let doc = ReportDocument { scenarios: reports, summary: SuiteSummary::from_reports(reports) };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)
}

/// Write scenario reports JSON to a file.
pub fn write_reports_file(path: &str, reports: &[ScenarioReport]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_reports(&mut file, reports)
}
