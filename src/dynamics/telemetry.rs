use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::state::{wrap_angle, BodyState, Telemetry};

// ---------------------------------------------------------------------------
// Sensor model: multiplicative uniform noise on every channel
// ---------------------------------------------------------------------------

/// The only sensor in the system. Each channel is scaled by its own
/// `1 + amp * (2u - 1)` factor, u ~ U[0, 1).
///
/// The angle is wrapped into (-pi, pi] before the noise is applied, so a
/// reading near the boundary can land on either side of it.
#[derive(Debug, Clone)]
pub struct Sensor {
    pub noise_amplitude: f64,
    rng: StdRng,
}

impl Sensor {
    pub fn new(noise_amplitude: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { noise_amplitude, rng }
    }

    /// Noise-free sensor.
    pub fn ideal() -> Self {
        Self::new(0.0, Some(0))
    }

    fn noise(&mut self) -> f64 {
        if self.noise_amplitude == 0.0 {
            return 1.0;
        }
        let u: f64 = self.rng.gen();
        1.0 + self.noise_amplitude * (2.0 * u - 1.0)
    }

    pub fn read(&mut self, truth: &BodyState) -> Telemetry {
        Telemetry {
            position: truth.position * self.noise(),
            velocity: truth.velocity * self.noise(),
            angle: wrap_angle(truth.angle) * self.noise(),
            angular_velocity: truth.angular_velocity * self.noise(),
        }
    }
}
