mod fractal;
mod macd;
mod moving;
mod rsi;
mod trend;

pub use fractal::{detect_fractal, Fractal};
pub use macd::{macd, Macd, MACD_FAST, MACD_SLOW};
pub use moving::{ema, sma};
pub use rsi::{rsi, RSI_PERIOD};
pub use trend::detect_trend;

use common::{Candle, Trend};

/// SMA period the trend filter and the close-vs-SMA confluence use.
pub const SMA_PERIOD: usize = 16;

/// Derived, ephemeral indicator snapshot. Recomputed from the current
/// candle window on every analysis call; absent fields mean insufficient
/// history, never an error.
#[derive(Debug, Clone)]
pub struct Indicators {
    pub rsi: Option<f64>,
    pub macd: Option<Macd>,
    pub sma16: Option<f64>,
    pub fractal: Option<Fractal>,
    pub trend: Trend,
}

impl Indicators {
    pub fn compute(candles: &[Candle]) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let sma16 = sma(&closes, SMA_PERIOD);
        Self {
            rsi: rsi::rsi(&closes, RSI_PERIOD),
            macd: macd::macd(&closes),
            sma16,
            fractal: detect_fractal(candles),
            trend: detect_trend(&closes, sma16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                time: i as i64 * 60_000,
                open: c,
                high: c + 0.5,
                low: c - 0.5,
                close: c,
                volume: 1.0,
            })
            .collect()
    }

    #[test]
    fn short_window_leaves_everything_absent() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let ind = Indicators::compute(&candles);
        assert!(ind.rsi.is_none());
        assert!(ind.macd.is_none());
        assert!(ind.sma16.is_none());
        assert!(ind.fractal.is_none());
        assert_eq!(ind.trend, Trend::Neutral);
    }

    #[test]
    fn long_uptrend_populates_all_numeric_indicators() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let ind = Indicators::compute(&candles_from_closes(&closes));
        assert_eq!(ind.rsi, Some(100.0));
        assert!(ind.macd.unwrap().histogram > 0.0);
        assert!(ind.sma16.is_some());
        assert_eq!(ind.trend, Trend::Up);
        // Monotonic highs and lows carry no local extremum
        assert!(ind.fractal.is_none());
    }
}
