use std::io::{self, Write};

use crate::sim::FlightRecord;

/// Write a flight log to CSV format.
///
/// Columns: time, pos_x, pos_y, vel_x, vel_y, angle_deg, omega,
///          thrust, gimbal_deg, ignited, airbrakes, mode, fuel_used
pub fn write_flight_log<W: Write>(writer: &mut W, records: &[FlightRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,vel_x,vel_y,angle_deg,omega,\
         thrust,gimbal_deg,ignited,airbrakes,mode,fuel_used"
    )?;

    for r in records {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.3},{:.5},\
             {:.1},{:.4},{},{},{},{:.1}",
            r.time,
            r.position.x, r.position.y,
            r.velocity.x, r.velocity.y,
            r.angle.to_degrees(),
            r.angular_velocity,
            r.thrust,
            r.gimbal.to_degrees(),
            r.ignited as u8,
            r.airbrakes as u8,
            r.mode,
            r.fuel_used,
        )?;
    }

    Ok(())
}

/// Write a flight log to a CSV file at the given path.
pub fn write_flight_log_file(path: &str, records: &[FlightRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_flight_log(&mut file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnc::AutopilotMode;
    use nalgebra::Vector2;

    fn record(time: f64, y: f64) -> FlightRecord {
        FlightRecord {
            time,
            position: Vector2::new(0.0, y),
            velocity: Vector2::new(0.0, -10.0),
            angle: 0.0,
            angular_velocity: 0.0,
            thrust: 1.8e8,
            gimbal: 0.0,
            ignited: true,
            airbrakes: false,
            mode: AutopilotMode::Land,
            fuel_used: 3.6e9,
        }
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let log = vec![record(0.0, 1000.0), record(0.02, 999.8)];

        let mut buf = Vec::new();
        write_flight_log(&mut buf, &log).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert!(lines[2].contains(",1,0,land,"));
    }
}
