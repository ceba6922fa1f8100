// =============================================================================
// Moving Averages — EMA and SMA primitives
// =============================================================================
//
// Both detectors and the momentum oscillator are built on these two kernels.
//
//   EMA: multiplier k = 2 / (span + 1), seeded from the first observation so
//        the output is the same length as the input.
//   SMA: plain arithmetic mean over a sliding window; the output starts at the
//        first fully-populated window, so it is `window - 1` points shorter
//        than the input.

/// Exponential moving average over `values`.
///
/// # Arguments
/// * `values` - price series, oldest first
/// * `span`   - smoothing span (e.g. 12 for a 12-period EMA)
///
/// # Returns
/// One smoothed point per input point; empty when `span` is zero or the
/// input is empty.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);

    for &value in &values[1..] {
        let prev = out[out.len() - 1];
        out.push((value - prev) * multiplier + prev);
    }
    out
}

/// Simple moving average over `values`.
///
/// # Arguments
/// * `values` - price series, oldest first
/// * `window` - number of observations per average
///
/// # Returns
/// `values.len() - window + 1` averages, the first covering
/// `values[0..window]`; empty when `window` is zero or larger than the input.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(values.len() - window + 1);
    for i in (window - 1)..values.len() {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        out.push(sum / window as f64);
    }
    out
}
