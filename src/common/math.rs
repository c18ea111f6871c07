//! Small numeric building blocks

/// Smoothing factor for an exponential moving average of the given span
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Adjust-free exponential moving average over a whole series.
///
/// `ema[0] = values[0]`, `ema[t] = a * values[t] + (1 - a) * ema[t - 1]` with
/// `a = 2 / (span + 1)`. No bias correction is applied, so the first output
/// equals the first input. Returns an empty vector for empty input.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = ema_alpha(span);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &value in values {
        let next = match prev {
            None => value,
            Some(p) => alpha * value + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Last value of [`ema_series`]
pub fn ema(values: &[f64], span: usize) -> Option<f64> {
    ema_series(values, span).last().copied()
}

/// Simple average of the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Sign of a value as -1, 0 or 1 (NaN counts as 0)
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Fractional change between `values[len - 1 - periods]` and the last value
pub fn pct_change(values: &[f64], periods: usize) -> Option<f64> {
    if values.len() <= periods {
        return None;
    }
    let last = *values.last()?;
    let base = values[values.len() - 1 - periods];
    if base == 0.0 {
        return None;
    }
    Some(last / base - 1.0)
}
