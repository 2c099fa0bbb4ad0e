use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closed price candle. `time` is the candle open time in epoch
/// milliseconds. Candle sequences are ordered oldest-first and append-only;
/// the producer guarantees `high >= max(open, close)` and
/// `low <= min(open, close)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Direction of a binary-options recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Call,
    Put,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Call => write!(f, "CALL"),
            Direction::Put => write!(f, "PUT"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CALL" => Ok(Direction::Call),
            "PUT" => Ok(Direction::Put),
            other => Err(crate::Error::Validation(format!(
                "direction must be 'CALL' or 'PUT', got '{other}'"
            ))),
        }
    }
}

/// Market segment an instrument belongs to. REAL and OTC are simulated
/// segments differing only in tag and random-walk seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketType {
    Real,
    Otc,
}

impl std::fmt::Display for MarketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketType::Real => write!(f, "REAL"),
            MarketType::Otc => write!(f, "OTC"),
        }
    }
}

/// Market filter requested by a scan. GERAL matches every segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketScope {
    Real,
    Otc,
    Geral,
}

impl MarketScope {
    pub fn matches(&self, market: MarketType) -> bool {
        match self {
            MarketScope::Geral => true,
            MarketScope::Real => market == MarketType::Real,
            MarketScope::Otc => market == MarketType::Otc,
        }
    }
}

/// Candle timeframe a scan targets. Drives entry scheduling and the
/// expiration label on emitted signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
}

impl Timeframe {
    pub fn expiration_label(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1 min",
            Timeframe::M5 => "5 min",
        }
    }
}

/// Position of the latest close relative to the 16-period SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

/// One independently-evaluated technical condition contributing toward a
/// directional call. Stored on signals and echoed back inside feedback
/// context; loss-pattern matching compares these as sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfluenceFactor {
    FractalBottom,
    RsiAbove50,
    MacdHistogramPositive,
    CloseAboveSma16,
    TrendUp,
    FractalTop,
    RsiBelow50,
    MacdHistogramNegative,
    CloseBelowSma16,
    TrendDown,
}

impl std::fmt::Display for ConfluenceFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConfluenceFactor::FractalBottom => "Bottom Fractal",
            ConfluenceFactor::RsiAbove50 => "RSI > 50",
            ConfluenceFactor::MacdHistogramPositive => "MACD Histogram > 0",
            ConfluenceFactor::CloseAboveSma16 => "Close > SMA16",
            ConfluenceFactor::TrendUp => "Uptrend",
            ConfluenceFactor::FractalTop => "Top Fractal",
            ConfluenceFactor::RsiBelow50 => "RSI < 50",
            ConfluenceFactor::MacdHistogramNegative => "MACD Histogram < 0",
            ConfluenceFactor::CloseBelowSma16 => "Close < SMA16",
            ConfluenceFactor::TrendDown => "Downtrend",
        };
        write!(f, "{label}")
    }
}

/// Strength tier derived from the confluence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    Medium,
    Weak,
}

/// Confidence tier derived from the confluence count. Labels keep the
/// product's original Portuguese wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Baixa,
    #[serde(rename = "Média")]
    Media,
    Alta,
    #[serde(rename = "Muito Alta")]
    MuitoAlta,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Baixa => write!(f, "Baixa"),
            Confidence::Media => write!(f, "Média"),
            Confidence::Alta => write!(f, "Alta"),
            Confidence::MuitoAlta => write!(f, "Muito Alta"),
        }
    }
}

/// Indicator snapshot embedded in every signal, used later for feedback
/// similarity matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalContext {
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub trend: Trend,
    pub confluences: Vec<ConfluenceFactor>,
}

/// One instrument's directional recommendation at a point in time.
/// Constructed fresh on each analysis call and immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub asset: String,
    pub market_type: MarketType,
    pub direction: Direction,
    pub confluences: Vec<ConfluenceFactor>,
    pub strength: Strength,
    pub confidence: Confidence,
    /// Self-reported confidence score, clamped to [0, 100]. Not a
    /// statistically validated probability.
    pub winrate: f64,
    pub last_price: f64,
    pub entry_timestamp: DateTime<Utc>,
    /// Human-readable entry time, "HH:MM" UTC.
    pub entry_time: String,
    /// Expiration label, e.g. "1 min".
    pub expiration: String,
    pub context: SignalContext,
}

/// Outcome of a signal as reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackResult {
    Win,
    Loss,
}

impl std::str::FromStr for FeedbackResult {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(FeedbackResult::Win),
            "loss" => Ok(FeedbackResult::Loss),
            other => Err(crate::Error::Validation(format!(
                "result must be exactly 'win' or 'loss', got '{other}'"
            ))),
        }
    }
}

/// One confirmed outcome appended to the feedback history. Records are
/// never mutated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub asset: String,
    pub direction: Direction,
    pub result: FeedbackResult,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SignalContext>,
}

/// Disposition of one instrument within a scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Analyzed,
    Discarded,
    Selected,
}

/// Audit-log entry produced once per evaluated instrument, in evaluation
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanLogEntry {
    pub time: DateTime<Utc>,
    pub asset: String,
    pub status: ScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScanLogEntry {
    pub fn analyzed(time: DateTime<Utc>, asset: impl Into<String>) -> Self {
        Self { time, asset: asset.into(), status: ScanStatus::Analyzed, reason: None }
    }

    pub fn discarded(
        time: DateTime<Utc>,
        asset: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            time,
            asset: asset.into(),
            status: ScanStatus::Discarded,
            reason: Some(reason.into()),
        }
    }

    pub fn selected(time: DateTime<Utc>, asset: impl Into<String>) -> Self {
        Self { time, asset: asset.into(), status: ScanStatus::Selected, reason: None }
    }
}

/// Per-request scanner configuration. Not persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub timeframe: Timeframe,
    pub market: MarketScope,
}
