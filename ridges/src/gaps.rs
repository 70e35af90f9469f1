use crate::RidgeError;

/// Returns a copy of `values` with every sample for which
/// `is_missing` holds replaced by linear interpolation between the
/// nearest valid samples on either side, using the sample index as
/// the interpolation coordinate.
///
/// Missing samples before the first (after the last) valid sample
/// take its value. Fails with [`RidgeError::NoValidData`] when no
/// sample is valid.
#[allow(clippy::cast_precision_loss)]
pub fn repair_gaps<F>(values: &[f64], is_missing: F) -> Result<Vec<f64>, RidgeError>
where
    F: Fn(f64) -> bool,
{
    let valid: Vec<usize> = (0..values.len())
        .filter(|&idx| !is_missing(values[idx]))
        .collect();
    let (first, last) = match (valid.first(), valid.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(RidgeError::NoValidData),
    };

    let mut repaired = values.to_vec();
    repaired[..first].fill(values[first]);
    repaired[last + 1..].fill(values[last]);
    for pair in valid.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo > 1 {
            let (y0, y1) = (values[lo], values[hi]);
            let span = (hi - lo) as f64;
            for (idx, value) in repaired.iter_mut().enumerate().take(hi).skip(lo + 1) {
                *value = y0 + (y1 - y0) * (idx - lo) as f64 / span;
            }
        }
    }
    Ok(repaired)
}
