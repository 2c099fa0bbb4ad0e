/// RSI period used by the analyzer.
pub const RSI_PERIOD: usize = 14;

/// RSI (Relative Strength Index) over a slice of close prices (oldest
/// first), using Wilder's smoothed moving average.
///
/// Returns `None` unless strictly more than `period` values are available.
/// Returns exactly `100.0` when the average loss is zero (a
/// division-by-zero guard, not a special "perfect" reading).
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }

    // First average gain/loss over the initial `period` changes
    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let initial = &changes[..period];

    let mut avg_gain = initial.iter().filter(|&&c| c > 0.0).sum::<f64>() / period as f64;
    let mut avg_loss =
        initial.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum::<f64>() / period as f64;

    // Wilder smoothing over remaining changes
    for &change in &changes[period..] {
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { change.abs() } else { 0.0 };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_returns_none_when_insufficient_data() {
        // Need at least period+1 values
        let prices = vec![100.0; 14];
        assert!(rsi(&prices, 14).is_none());
    }

    #[test]
    fn rsi_returns_some_with_sufficient_data() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&prices, 14).is_some());
    }

    #[test]
    fn rsi_monotonic_rise_returns_100() {
        // Strictly increasing prices → avg loss 0 → RSI = 100
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((value - 100.0).abs() < 1e-9, "Expected 100, got {value}");
    }

    #[test]
    fn rsi_monotonic_fall_returns_0() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!(value.abs() < 1e-9, "Expected 0, got {value}");
    }

    #[test]
    fn rsi_stays_in_range_on_mixed_series() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.15, 43.61, 44.33, 44.83, 45.10,
            45.15, 44.34, 44.09, 44.52,
        ];
        let value = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "RSI out of range: {value}");
    }

    #[test]
    fn rsi_flat_series_hits_zero_loss_guard() {
        // No change at all → avg loss 0 → the guard returns 100
        let prices = vec![50.0; 20];
        assert_eq!(rsi(&prices, 14), Some(100.0));
    }
}
