use std::f64::consts::PI;

use nalgebra::Vector2;

use crate::gnc::AutopilotMode;

/// Initial condition plus the mode expected to bring the vehicle to rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub angle: f64,
    pub angular_velocity: f64,
    pub mode: AutopilotMode,
    /// Finish on velocity alone, wherever the vehicle is.
    pub ignore_height: bool,
}

impl Scenario {
    /// At rest, 1 km up, upright, landing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vector2::new(0.0, 1000.0),
            velocity: Vector2::zeros(),
            angle: 0.0,
            angular_velocity: 0.0,
            mode: AutopilotMode::Land,
            ignore_height: false,
        }
    }

    pub fn position(mut self, x: f64, y: f64) -> Self { self.position = Vector2::new(x, y); self }
    pub fn velocity(mut self, x: f64, y: f64) -> Self { self.velocity = Vector2::new(x, y); self }
    pub fn angle(mut self, v: f64) -> Self { self.angle = v; self }
    pub fn angular_velocity(mut self, v: f64) -> Self { self.angular_velocity = v; self }
    pub fn mode(mut self, v: AutopilotMode) -> Self { self.mode = v; self }
    pub fn ignore_height(mut self, v: bool) -> Self { self.ignore_height = v; self }
}

// ---------------------------------------------------------------------------
// Built-in suite
// ---------------------------------------------------------------------------

/// Landing and hover cases from a gentle drop to a tumbling re-entry.
pub fn presets() -> Vec<Scenario> {
    use AutopilotMode::*;
    vec![
        Scenario::new("drop-1km"),
        Scenario::new("sideways-6km")
            .position(0.0, 6000.0)
            .velocity(1000.0, 0.0)
            .angle(PI / 2.0),
        Scenario::new("sideways-inverted-8km")
            .position(0.0, 8000.0)
            .velocity(1000.0, 0.0)
            .angle(-PI / 2.0),
        Scenario::new("sideways-5km")
            .position(0.0, 5000.0)
            .velocity(1000.0, 0.0)
            .angle(PI / 2.0),
        Scenario::new("fast-sideways-10km")
            .position(0.0, 10_000.0)
            .velocity(5000.0, 0.0)
            .angle(PI / 2.0),
        Scenario::new("spinning-10km")
            .position(0.0, 10_000.0)
            .velocity(500.0, 0.0)
            .angular_velocity(100.0),
        Scenario::new("spinning-dive-6km")
            .position(0.0, 6000.0)
            .velocity(0.0, -500.0)
            .angular_velocity(10.0),
        Scenario::new("upside-down-200km")
            .position(0.0, 200_000.0)
            .velocity(0.0, -500.0)
            .angle(-PI + 1e-3),
        Scenario::new("hover-low")
            .position(0.0, 120.0)
            .velocity(10.0, 10.0)
            .angular_velocity(4.0)
            .mode(Hover),
        Scenario::new("hover-dive")
            .position(0.0, 3000.0)
            .velocity(20.0, -1000.0)
            .angular_velocity(4.0)
            .mode(Hover)
            .ignore_height(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_two_presets_match_reference_cases() {
        let p = presets();
        assert_eq!(p.len(), 10);
        assert_eq!(p[0].position, Vector2::new(0.0, 1000.0));
        assert_eq!(p[0].velocity, Vector2::zeros());
        assert_eq!(p[0].mode, AutopilotMode::Land);
        assert_eq!(p[1].position, Vector2::new(0.0, 6000.0));
        assert_eq!(p[1].velocity, Vector2::new(1000.0, 0.0));
        assert_eq!(p[1].angle, PI / 2.0);
    }

    #[test]
    fn names_are_unique() {
        let p = presets();
        let mut names: Vec<_> = p.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), p.len());
    }
}
