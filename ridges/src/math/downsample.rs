use crate::RidgeError;

/// Block-averages `values` in groups of `factor`.
///
/// When `values.len()` isn't a multiple of `factor` the remainder is
/// trimmed from both ends, the extra sample (if any) coming off the
/// end. The result has `values.len() / factor` entries.
#[allow(clippy::cast_precision_loss)]
pub fn downsample(values: &[f64], factor: usize) -> Result<Vec<f64>, RidgeError> {
    if factor == 0 {
        return Err(RidgeError::ZeroFactor);
    }
    let extra = values.len() % factor;
    let left = extra / 2;
    let right = extra - left;
    Ok(values[left..values.len() - right]
        .chunks_exact(factor)
        .map(|block| block.iter().sum::<f64>() / factor as f64)
        .collect())
}
