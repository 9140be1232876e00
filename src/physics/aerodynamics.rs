use nalgebra::Vector2;

/// Effective drag area of a slender body.
///
/// Blends the two principal projections by how closely the velocity direction
/// lines up with the body's x axis (`(cos angle, sin angle)`): moving
/// broadside exposes `length^2`, moving end-on exposes `width^2`.
pub fn exposed_area(vel: &Vector2<f64>, angle: f64, length: f64, width: f64, cd: f64) -> f64 {
    let speed = vel.norm();
    if speed <= 1e-12 {
        return 0.0;
    }
    let axis = Vector2::new(angle.cos(), angle.sin());
    let blend = (vel / speed).dot(&axis).abs();
    (blend * length * length + (1.0 - blend) * width * width) * cd
}

/// Quadratic drag, opposing velocity: |F| = k * A * v^2.
pub fn drag_force(vel: &Vector2<f64>, area: f64, k: f64) -> Vector2<f64> {
    let speed = vel.norm();
    -vel * (k * area * speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn drag_opposes_velocity() {
        let vel = Vector2::new(0.0, 300.0);
        let f = drag_force(&vel, 0.01, 30.0);
        assert!(f.y < 0.0, "Drag should oppose upward velocity");
        assert_relative_eq!(f.x, 0.0);
    }

    #[test]
    fn drag_is_quadratic_in_speed() {
        let f1 = drag_force(&Vector2::new(10.0, 0.0), 0.1, 30.0).norm();
        let f2 = drag_force(&Vector2::new(20.0, 0.0), 0.1, 30.0).norm();
        assert_relative_eq!(f2 / f1, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn no_drag_at_rest() {
        let f = drag_force(&Vector2::zeros(), 0.3, 30.0);
        assert!(f.norm() < 1e-12);
        assert_eq!(exposed_area(&Vector2::zeros(), 0.0, 150.0, 15.0, 1e-5), 0.0);
    }

    #[test]
    fn broadside_exposes_more_than_end_on() {
        // Upright body falling straight down travels along its long axis.
        let end_on = exposed_area(&Vector2::new(0.0, -100.0), 0.0, 150.0, 15.0, 1.0);
        let broadside = exposed_area(&Vector2::new(100.0, 0.0), 0.0, 150.0, 15.0, 1.0);
        assert_relative_eq!(end_on, 225.0, epsilon = 1e-9);
        assert_relative_eq!(broadside, 22_500.0, epsilon = 1e-9);

        // Same body lying on its side, falling: broadside again.
        let lying = exposed_area(&Vector2::new(0.0, -100.0), FRAC_PI_2, 150.0, 15.0, 1.0);
        assert_relative_eq!(lying, 22_500.0, epsilon = 1e-6);
    }
}
