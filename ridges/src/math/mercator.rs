use std::f64::consts::{FRAC_PI_4, PI};

/// Conformal (Mercator) transform of a latitude, in degrees.
pub fn mercator(y: f64) -> f64 {
    let y = y * PI / 180.0;
    (FRAC_PI_4 + y / 2.0).tan().ln() * 180.0 / PI
}

/// Applies [`mercator`] to every value.
pub fn project(values: &mut [f64]) {
    for value in values {
        *value = mercator(*value);
    }
}

#[cfg(test)]
mod tests {
    use super::{mercator, project};
    use approx::assert_relative_eq;

    #[test]
    fn test_mercator_known_values() {
        assert_relative_eq!(mercator(0.0), 0.0, epsilon = 1e-12);
        // ln(tan(π/4 + π/8)) in degrees.
        assert_relative_eq!(mercator(45.0), 50.498_986_7, epsilon = 1e-6);
        assert_relative_eq!(mercator(-45.0), -mercator(45.0), epsilon = 1e-12);
    }

    #[test]
    fn test_mercator_is_monotonic() {
        let mut prev = f64::NEG_INFINITY;
        for i in -899..=899 {
            let y = mercator(f64::from(i) / 10.0);
            assert!(y > prev, "not increasing at {}", f64::from(i) / 10.0);
            prev = y;
        }
    }

    #[test]
    fn test_project_in_place() {
        let mut values = [32.7, 41.9];
        project(&mut values);
        assert_relative_eq!(values[0], mercator(32.7));
        assert_relative_eq!(values[1], mercator(41.9));
        assert!(values[1] - values[0] > 41.9 - 32.7);
    }
}
