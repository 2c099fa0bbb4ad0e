pub mod analyzer;
pub mod indicators;
pub mod jitter;
pub mod schedule;

pub use analyzer::{analyze, MIN_CONFLUENCE};
pub use indicators::Indicators;
pub use jitter::{FixedJitter, ScoreJitter, ThreadRngJitter};
pub use schedule::entry_timestamp;
