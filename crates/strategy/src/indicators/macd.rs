use super::moving::ema;

/// Fast EMA period of the MACD line.
pub const MACD_FAST: usize = 12;
/// Slow EMA period of the MACD line. Also the minimum window length.
pub const MACD_SLOW: usize = 26;

/// One MACD reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Simplified MACD over a slice of close prices (oldest first).
///
/// `value = EMA(12) - EMA(26)`. The signal line is approximated as
/// `value * 0.2`: no MACD history is retained between calls, so a true
/// 9-period EMA of the MACD line cannot be computed. The scorer's
/// thresholds were tuned against this approximation; do not "correct" it.
/// `histogram = value - signal`.
///
/// Returns `None` if fewer than 26 closes are available.
pub fn macd(closes: &[f64]) -> Option<Macd> {
    if closes.len() < MACD_SLOW {
        return None;
    }
    let value = ema(closes, MACD_FAST, None)? - ema(closes, MACD_SLOW, None)?;
    let signal = value * 0.2;
    Some(Macd { value, signal, histogram: value - signal })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_returns_none_with_insufficient_data() {
        let prices = vec![100.0; 25];
        assert!(macd(&prices).is_none());
    }

    #[test]
    fn macd_returns_some_at_minimum_window() {
        let prices: Vec<f64> = (0..26).map(|i| 100.0 + i as f64).collect();
        assert!(macd(&prices).is_some());
    }

    #[test]
    fn macd_positive_on_uptrend() {
        // Fast EMA sits above slow EMA on a sustained rise
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let m = macd(&prices).unwrap();
        assert!(m.value > 0.0);
        assert!(m.histogram > 0.0);
    }

    #[test]
    fn macd_negative_on_downtrend() {
        let prices: Vec<f64> = (0..40).map(|i| 200.0 - i as f64 * 0.5).collect();
        let m = macd(&prices).unwrap();
        assert!(m.value < 0.0);
        assert!(m.histogram < 0.0);
    }

    #[test]
    fn macd_signal_is_fifth_of_value() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let m = macd(&prices).unwrap();
        assert!((m.signal - m.value * 0.2).abs() < 1e-12);
        assert!((m.histogram - (m.value - m.signal)).abs() < 1e-12);
    }
}
