use chrono::{DateTime, Utc};
use tracing::debug;

use common::{
    Candle, Confidence, ConfluenceFactor, Direction, MarketType, ScannerConfig, Signal,
    SignalContext, Strength, Trend,
};
use feedback::FeedbackHistory;

use crate::indicators::{Fractal, Indicators};
use crate::jitter::ScoreJitter;
use crate::schedule;

/// Minimum matching directional conditions for a signal. 0 or 1 matches
/// on either side yields no signal, however strong the lone condition.
pub const MIN_CONFLUENCE: usize = 2;

/// Base winrate before confluence, jitter and feedback effects.
const BASE_SCORE: f64 = 75.0;
/// Points per matching confluence condition.
const CONFLUENCE_WEIGHT: f64 = 5.0;
/// Points removed per matching historical loss pattern.
const LOSS_PENALTY: f64 = 5.0;

/// Analyze one instrument's candle window and produce a directional
/// recommendation, or `None` when the minimum-confluence gate is not met.
///
/// Deterministic given `jitter` and `now`: all randomness flows through
/// the injected jitter source.
pub fn analyze(
    asset: &str,
    candles: &[Candle],
    market_type: MarketType,
    config: &ScannerConfig,
    history: &FeedbackHistory,
    jitter: &dyn ScoreJitter,
    now: DateTime<Utc>,
) -> Option<Signal> {
    let last = candles.last()?;
    let indicators = Indicators::compute(candles);

    let buys = buy_confluences(&indicators, last.close);
    let (direction, confluences) = if buys.len() >= MIN_CONFLUENCE {
        (Direction::Call, buys)
    } else {
        let sells = sell_confluences(&indicators, last.close);
        if sells.len() >= MIN_CONFLUENCE {
            (Direction::Put, sells)
        } else {
            return None;
        }
    };

    let penalty = LOSS_PENALTY * history.matching_losses(asset, direction, &confluences) as f64;
    let adjustment = history.recent_balance_adjustment(asset);
    let base = BASE_SCORE + CONFLUENCE_WEIGHT * confluences.len() as f64 + jitter.sample();
    let winrate = (base + adjustment - penalty).clamp(0.0, 100.0);

    let entry_timestamp = schedule::entry_timestamp(now, config.timeframe);

    debug!(
        asset,
        %direction,
        confluences = confluences.len(),
        winrate,
        penalty,
        adjustment,
        "Signal computed"
    );

    Some(Signal {
        timestamp: now,
        asset: asset.to_string(),
        market_type,
        direction,
        confluences: confluences.clone(),
        strength: strength_for(confluences.len()),
        confidence: confidence_for(confluences.len()),
        winrate,
        last_price: last.close,
        entry_timestamp,
        entry_time: schedule::entry_label(entry_timestamp),
        expiration: config.timeframe.expiration_label().to_string(),
        context: SignalContext {
            rsi: indicators.rsi,
            macd_histogram: indicators.macd.as_ref().map(|m| m.histogram),
            trend: indicators.trend,
            confluences,
        },
    })
}

fn buy_confluences(ind: &Indicators, last_close: f64) -> Vec<ConfluenceFactor> {
    let mut factors = Vec::new();
    if ind.fractal == Some(Fractal::Bottom) {
        factors.push(ConfluenceFactor::FractalBottom);
    }
    if ind.rsi.map(|r| r > 50.0).unwrap_or(false) {
        factors.push(ConfluenceFactor::RsiAbove50);
    }
    if ind.macd.as_ref().map(|m| m.histogram > 0.0).unwrap_or(false) {
        factors.push(ConfluenceFactor::MacdHistogramPositive);
    }
    if ind.sma16.map(|s| last_close > s).unwrap_or(false) {
        factors.push(ConfluenceFactor::CloseAboveSma16);
    }
    if ind.trend == Trend::Up {
        factors.push(ConfluenceFactor::TrendUp);
    }
    factors
}

fn sell_confluences(ind: &Indicators, last_close: f64) -> Vec<ConfluenceFactor> {
    let mut factors = Vec::new();
    if ind.fractal == Some(Fractal::Top) {
        factors.push(ConfluenceFactor::FractalTop);
    }
    if ind.rsi.map(|r| r < 50.0).unwrap_or(false) {
        factors.push(ConfluenceFactor::RsiBelow50);
    }
    if ind.macd.as_ref().map(|m| m.histogram < 0.0).unwrap_or(false) {
        factors.push(ConfluenceFactor::MacdHistogramNegative);
    }
    if ind.sma16.map(|s| last_close < s).unwrap_or(false) {
        factors.push(ConfluenceFactor::CloseBelowSma16);
    }
    if ind.trend == Trend::Down {
        factors.push(ConfluenceFactor::TrendDown);
    }
    factors
}

fn confidence_for(confluences: usize) -> Confidence {
    match confluences {
        n if n >= 5 => Confidence::MuitoAlta,
        4 => Confidence::Alta,
        3 => Confidence::Media,
        _ => Confidence::Baixa,
    }
}

fn strength_for(confluences: usize) -> Strength {
    match confluences {
        n if n >= 4 => Strength::Strong,
        3 => Strength::Medium,
        _ => Strength::Weak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::{FeedbackRecord, FeedbackResult, MarketScope, Timeframe};

    use crate::jitter::FixedJitter;

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

    fn config_m1() -> ScannerConfig {
        ScannerConfig { timeframe: Timeframe::M1, market: MarketScope::Geral }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 7, 30).unwrap()
    }

    fn run(closes: &[f64], history: &FeedbackHistory) -> Option<Signal> {
        analyze(
            "EURUSD",
            &candles_from_closes(closes),
            MarketType::Real,
            &config_m1(),
            history,
            &FixedJitter(0.0),
            now(),
        )
    }

    /// Strictly rising 40-candle window: four buy conditions (RSI 100,
    /// MACD positive, close above SMA16, trend up) and no fractal.
    fn uptrend() -> Vec<f64> {
        (0..40).map(|i| 100.0 + i as f64).collect()
    }

    fn downtrend() -> Vec<f64> {
        (0..40).map(|i| 200.0 - i as f64).collect()
    }

    /// Uptrend with a dip three candles from the end: the dip's low
    /// subceeds both neighbors on each side, adding a bottom fractal for a
    /// fifth buy condition.
    fn uptrend_with_bottom_fractal() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..40).map(|i| i as f64).collect();
        closes[37] = 30.0;
        closes
    }

    #[test]
    fn short_flat_window_yields_no_signal() {
        let history = FeedbackHistory::new();
        assert!(run(&[100.0; 10], &history).is_none());
    }

    #[test]
    fn single_condition_is_below_the_gate() {
        // 20 flat closes: RSI hits the zero-loss guard (100 > 50) but no
        // other condition holds on either side
        let history = FeedbackHistory::new();
        assert!(run(&[100.0; 20], &history).is_none());
    }

    #[test]
    fn uptrend_emits_call_with_four_confluences() {
        let history = FeedbackHistory::new();
        let signal = run(&uptrend(), &history).unwrap();
        assert_eq!(signal.direction, Direction::Call);
        assert_eq!(signal.confluences.len(), 4);
        assert_eq!(signal.confidence, Confidence::Alta);
        assert_eq!(signal.strength, Strength::Strong);
        // 75 + 5×4 + 0 jitter, no feedback
        assert!((signal.winrate - 95.0).abs() < 1e-9);
        assert_eq!(signal.last_price, 139.0);
    }

    #[test]
    fn downtrend_emits_put_with_four_confluences() {
        let history = FeedbackHistory::new();
        let signal = run(&downtrend(), &history).unwrap();
        assert_eq!(signal.direction, Direction::Put);
        assert_eq!(signal.confluences.len(), 4);
        assert!(signal.confluences.contains(&ConfluenceFactor::RsiBelow50));
        assert!(signal.confluences.contains(&ConfluenceFactor::TrendDown));
        assert!((signal.winrate - 95.0).abs() < 1e-9);
    }

    #[test]
    fn bottom_fractal_lifts_confluence_to_five() {
        let history = FeedbackHistory::new();
        let signal = run(&uptrend_with_bottom_fractal(), &history).unwrap();
        assert_eq!(signal.direction, Direction::Call);
        assert_eq!(signal.confluences.len(), 5);
        assert!(signal.confluences.contains(&ConfluenceFactor::FractalBottom));
        assert_eq!(signal.confidence, Confidence::MuitoAlta);
        assert!((signal.winrate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn two_confluences_rank_baixa_and_weak() {
        // 15 rising closes with a dip at index 12: RSI present (>14
        // closes) and a bottom fractal, but SMA16/MACD windows are unmet
        let mut closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        closes[12] = 105.0;
        let history = FeedbackHistory::new();
        let signal = run(&closes, &history).unwrap();
        assert_eq!(signal.direction, Direction::Call);
        assert_eq!(signal.confluences.len(), 2);
        assert_eq!(signal.confidence, Confidence::Baixa);
        assert_eq!(signal.strength, Strength::Weak);
        assert!((signal.winrate - 85.0).abs() < 1e-9);
    }

    fn loss_with_context(confluences: &[ConfluenceFactor]) -> FeedbackRecord {
        FeedbackRecord {
            asset: "EURUSD".into(),
            direction: Direction::Call,
            result: FeedbackResult::Loss,
            timestamp: now(),
            context: Some(SignalContext {
                rsi: Some(100.0),
                macd_histogram: Some(1.0),
                trend: Trend::Up,
                confluences: confluences.to_vec(),
            }),
        }
    }

    fn win() -> FeedbackRecord {
        FeedbackRecord {
            asset: "EURUSD".into(),
            direction: Direction::Call,
            result: FeedbackResult::Win,
            timestamp: now(),
            context: None,
        }
    }

    #[test]
    fn matching_losses_strictly_decrease_winrate() {
        let baseline = run(&uptrend(), &FeedbackHistory::new()).unwrap();
        let pattern = baseline.confluences.clone();

        // Pair each loss with a win so the recent-balance adjustment stays
        // zero and only the pattern penalty moves the score
        let mut winrates = Vec::new();
        for losses in 0..3 {
            let mut records = Vec::new();
            for _ in 0..losses {
                records.push(loss_with_context(&pattern));
                records.push(win());
            }
            let history = FeedbackHistory::from_records(records);
            winrates.push(run(&uptrend(), &history).unwrap().winrate);
        }

        assert!((winrates[0] - 95.0).abs() < 1e-9);
        assert!((winrates[1] - 90.0).abs() < 1e-9);
        assert!((winrates[2] - 85.0).abs() < 1e-9);
    }

    #[test]
    fn recent_losses_apply_double_penalty() {
        // Two losses, no matching context: −2 × 2 from the balance only
        let records = vec![loss_no_context(), loss_no_context()];
        let history = FeedbackHistory::from_records(records);
        let signal = run(&uptrend(), &history).unwrap();
        assert!((signal.winrate - 91.0).abs() < 1e-9);
    }

    fn loss_no_context() -> FeedbackRecord {
        FeedbackRecord { context: None, ..loss_with_context(&[]) }
    }

    #[test]
    fn winrate_clamps_to_zero_under_heavy_losses() {
        let baseline = run(&uptrend(), &FeedbackHistory::new()).unwrap();
        let pattern = baseline.confluences.clone();
        let records: Vec<FeedbackRecord> =
            (0..30).map(|_| loss_with_context(&pattern)).collect();
        let history = FeedbackHistory::from_records(records);

        let signal = run(&uptrend(), &history).unwrap();
        assert_eq!(signal.winrate, 0.0);
    }

    #[test]
    fn winrate_clamps_to_one_hundred() {
        // 20 wins push the balance adjustment to +20 over a 100 base
        let records: Vec<FeedbackRecord> = (0..20).map(|_| win()).collect();
        let history = FeedbackHistory::from_records(records);
        let signal = run(&uptrend_with_bottom_fractal(), &history).unwrap();
        assert_eq!(signal.winrate, 100.0);
    }

    #[test]
    fn entry_fields_follow_the_timeframe() {
        let history = FeedbackHistory::new();
        let signal = run(&uptrend(), &history).unwrap();
        // 10:07:30 M1 → 10:10:00
        assert_eq!(signal.entry_timestamp, Utc.with_ymd_and_hms(2025, 3, 14, 10, 10, 0).unwrap());
        assert_eq!(signal.entry_time, "10:10");
        assert_eq!(signal.expiration, "1 min");

        let m5 = ScannerConfig { timeframe: Timeframe::M5, market: MarketScope::Geral };
        let signal = analyze(
            "EURUSD",
            &candles_from_closes(&uptrend()),
            MarketType::Real,
            &m5,
            &history,
            &FixedJitter(0.0),
            now(),
        )
        .unwrap();
        assert_eq!(signal.entry_timestamp, Utc.with_ymd_and_hms(2025, 3, 14, 10, 10, 0).unwrap());
        assert_eq!(signal.expiration, "5 min");
    }

    #[test]
    fn context_snapshot_mirrors_the_signal() {
        let history = FeedbackHistory::new();
        let signal = run(&uptrend(), &history).unwrap();
        assert_eq!(signal.context.confluences, signal.confluences);
        assert_eq!(signal.context.rsi, Some(100.0));
        assert_eq!(signal.context.trend, Trend::Up);
        assert!(signal.context.macd_histogram.unwrap() > 0.0);
    }
}
