use chrono::{DateTime, TimeZone, Utc};
use common::Timeframe;

/// Next valid entry timestamp for a signal issued at `now`.
///
/// M1 entries land on the second whole-minute boundary after the call,
/// guaranteeing at least two minutes of lead before the priced-in candle
/// opens. M5 entries land on the next multiple-of-5 minute boundary with
/// seconds zeroed; a call exactly on a boundary advances a full five
/// minutes. Entry timing is the most safety-critical value the system
/// computes; changes here must keep the fixed-clock tests below green.
pub fn entry_timestamp(now: DateTime<Utc>, timeframe: Timeframe) -> DateTime<Utc> {
    let secs = now.timestamp();
    let entry_secs = match timeframe {
        Timeframe::M1 => {
            let rem = secs.rem_euclid(60);
            let aligned = if rem == 0 { secs } else { secs - rem + 60 };
            aligned + 120
        }
        Timeframe::M5 => secs - secs.rem_euclid(300) + 300,
    };
    Utc.timestamp_opt(entry_secs, 0).single().unwrap_or(now)
}

/// "HH:MM" wall-clock label shown alongside the entry timestamp.
pub fn entry_label(entry: DateTime<Utc>) -> String {
    entry.format("%H:%M").to_string()
}
