use common::Trend;

/// Classifies the trend by comparing the latest close against the
/// 16-period SMA. Neutral when the SMA is absent, fewer than two closes
/// exist, or the close sits exactly on the SMA.
pub fn detect_trend(closes: &[f64], sma16: Option<f64>) -> Trend {
    let Some(sma16) = sma16 else {
        return Trend::Neutral;
    };
    if closes.len() < 2 {
        return Trend::Neutral;
    }
    let last = closes[closes.len() - 1];
    if last > sma16 {
        Trend::Up
    } else if last < sma16 {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_without_sma() {
        assert_eq!(detect_trend(&[1.0, 2.0], None), Trend::Neutral);
    }

    #[test]
    fn neutral_with_single_close() {
        assert_eq!(detect_trend(&[1.0], Some(1.0)), Trend::Neutral);
    }

    #[test]
    fn up_when_close_strictly_above_sma() {
        assert_eq!(detect_trend(&[1.0, 5.0], Some(3.0)), Trend::Up);
    }

    #[test]
    fn down_when_close_strictly_below_sma() {
        assert_eq!(detect_trend(&[5.0, 1.0], Some(3.0)), Trend::Down);
    }

    #[test]
    fn neutral_on_exact_equality() {
        assert_eq!(detect_trend(&[1.0, 3.0], Some(3.0)), Trend::Neutral);
    }
}
