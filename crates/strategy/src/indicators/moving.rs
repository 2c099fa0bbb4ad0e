/// Arithmetic mean of the trailing `period` values.
/// Returns `None` if fewer than `period` values exist.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let tail = &values[values.len() - period..];
    Some(tail.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average with smoothing `k = 2 / (period + 1)`.
///
/// With `previous` present only the latest value is folded in:
/// `latest * k + previous * (1 - k)`. Without it, the EMA is seeded with
/// the SMA of the first `period` values and folded over the remainder.
/// Returns `None` if fewer than `period` values exist.
pub fn ema(values: &[f64], period: usize, previous: Option<f64>) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);

    if let Some(prev) = previous {
        let latest = *values.last()?;
        return Some(latest * k + prev * (1.0 - k));
    }

    let mut value = values[..period].iter().sum::<f64>() / period as f64;
    for &price in &values[period..] {
        value = price * k + value * (1.0 - k);
    }
    Some(value)
}
