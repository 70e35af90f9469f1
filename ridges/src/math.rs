mod downsample;
mod linspace;
mod mercator;

pub use {
    downsample::downsample,
    linspace::linspace,
    mercator::{mercator, project},
};

/// Maps raw elevation into plot units stacked on `latitude`.
///
/// `scale` is normally [`Grid::elevation_scale`](crate::Grid::elevation_scale).
pub fn rescale(values: &mut [f64], scale: f64, latitude: f64) {
    for value in values {
        *value = *value * scale + latitude;
    }
}

#[cfg(test)]
mod tests {
    use super::rescale;
    use approx::assert_relative_eq;

    #[test]
    fn test_rescale() {
        let mut values = [0.0, 50.0, 100.0];
        rescale(&mut values, 0.01, 37.5);
        assert_relative_eq!(values[0], 37.5);
        assert_relative_eq!(values[1], 38.0);
        assert_relative_eq!(values[2], 38.5);
    }
}
