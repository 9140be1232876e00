use crate::dynamics::BodyState;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Apogee,
    Altitude { altitude: f64, ascending: bool },
    Touchdown { vertical_speed: f64 },
    ScenarioStarted(String),
    ScenarioFinished(String),
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: BodyState,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &BodyState, current: &BodyState) -> Option<EventKind>;
}

/// Detects apogee (height going from increasing to decreasing).
pub struct ApogeeDetector {
    pub min_height: f64,
}

impl ApogeeDetector {
    pub fn new(min_height: f64) -> Self {
        Self { min_height }
    }
}

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &BodyState, current: &BodyState) -> Option<EventKind> {
        if prev.velocity.y > 0.0 && current.velocity.y <= 0.0 && current.height() > self.min_height {
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Detects when height crosses a threshold (ascending or descending). Fires
/// once per pass and re-arms when the vehicle is back on the starting side.
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool) -> Self {
        Self { altitude, ascending, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &BodyState, current: &BodyState) -> Option<EventKind> {
        if self.fired {
            let above = current.height() >= self.altitude;
            if above != self.ascending {
                self.fired = false;
            }
            return None;
        }
        let crossed = if self.ascending {
            prev.height() < self.altitude && current.height() >= self.altitude
        } else {
            prev.height() > self.altitude && current.height() <= self.altitude
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Altitude { altitude: self.altitude, ascending: self.ascending })
        } else {
            None
        }
    }
}

/// Detects the centre of mass dropping to resting height. Re-arms once the
/// vehicle climbs back above `rearm_height`.
pub struct TouchdownDetector {
    pub contact_height: f64,
    pub rearm_height: f64,
    armed: bool,
}

impl TouchdownDetector {
    pub fn new(contact_height: f64, rearm_height: f64) -> Self {
        Self { contact_height, rearm_height, armed: true }
    }
}

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &BodyState, current: &BodyState) -> Option<EventKind> {
        if !self.armed {
            if current.height() > self.rearm_height {
                self.armed = true;
            }
            return None;
        }
        if prev.height() > self.contact_height && current.height() <= self.contact_height {
            self.armed = false;
            Some(EventKind::Touchdown { vertical_speed: prev.velocity.y })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn make_state(h: f64, vy: f64) -> BodyState {
        BodyState {
            position: Vector2::new(0.0, h),
            velocity: Vector2::new(0.0, vy),
            angle: 0.0,
            angular_velocity: 0.0,
            mass: 100.0,
        }
    }

    #[test]
    fn apogee_detected() {
        let mut det = ApogeeDetector::new(100.0);
        let prev = make_state(5000.0, 10.0);
        let curr = make_state(5005.0, -1.0);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Apogee));
    }

    #[test]
    fn apogee_ignored_near_ground() {
        let mut det = ApogeeDetector::new(100.0);
        assert_eq!(det.check(&make_state(75.0, 0.1), &make_state(75.0, 0.0)), None);
    }

    #[test]
    fn altitude_detector_ascending() {
        let mut det = AltitudeDetector::new(1000.0, true);
        let prev = make_state(900.0, 100.0);
        let curr = make_state(1050.0, 100.0);
        assert!(det.check(&prev, &curr).is_some());
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn altitude_detector_rearms_for_the_next_descent() {
        let mut det = AltitudeDetector::new(200.0, false);
        let down = |det: &mut AltitudeDetector| {
            det.check(&make_state(210.0, -50.0), &make_state(190.0, -50.0))
        };
        assert_eq!(
            down(&mut det),
            Some(EventKind::Altitude { altitude: 200.0, ascending: false })
        );
        assert!(down(&mut det).is_none());

        assert!(det.check(&make_state(75.0, 0.0), &make_state(6000.0, 0.0)).is_none());
        assert!(down(&mut det).is_some());
    }

    #[test]
    fn touchdown_fires_once_until_rearmed() {
        let mut det = TouchdownDetector::new(76.0, 150.0);
        let ev = det.check(&make_state(80.0, -3.0), &make_state(75.0, 0.0));
        assert_eq!(ev, Some(EventKind::Touchdown { vertical_speed: -3.0 }));
        assert!(det.check(&make_state(80.0, -3.0), &make_state(75.0, 0.0)).is_none());

        assert!(det.check(&make_state(75.0, 5.0), &make_state(200.0, 5.0)).is_none());
        assert!(det.check(&make_state(80.0, -3.0), &make_state(75.0, 0.0)).is_some());
    }
}
