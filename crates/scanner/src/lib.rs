use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::{ScanLogEntry, ScannerConfig, Signal};
use feedback::FeedbackHistory;
use market::AssetSnapshot;
use strategy::ScoreJitter;

/// Signals scoring below this winrate are never surfaced. Compiled-in
/// constant, not user-configurable.
pub const MIN_WINRATE: f64 = 90.0;

/// Cross-cycle memory for one scan session (one connected client): the
/// asset and entry timestamp of the last selected signal. Replaced only by
/// a new selection, so the same asset is never recommended twice for the
/// same entry slot.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    last_sent: Option<(String, DateTime<Utc>)>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn already_sent(&self, signal: &Signal) -> bool {
        self.last_sent
            .as_ref()
            .map(|(asset, entry)| *asset == signal.asset && *entry == signal.entry_timestamp)
            .unwrap_or(false)
    }
}

/// Result of one scan cycle: at most one signal, plus the disposition of
/// every evaluated instrument in evaluation order.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub best: Option<Signal>,
    pub log: Vec<ScanLogEntry>,
}

/// Evaluate every instrument once, in catalog order, and select the single
/// best-scoring signal that survives the mute, market-scope, winrate and
/// repeat filters. Ties keep the first-seen candidate; only a strictly
/// greater winrate replaces it.
pub fn scan(
    assets: &[AssetSnapshot],
    config: &ScannerConfig,
    muted: &HashSet<String>,
    session: &mut ScanSession,
    history: &FeedbackHistory,
    jitter: &dyn ScoreJitter,
    now: DateTime<Utc>,
) -> ScanOutcome {
    let mut log = Vec::with_capacity(assets.len() + 1);
    let mut best: Option<Signal> = None;

    for asset in assets {
        if muted.contains(&asset.symbol) {
            log.push(ScanLogEntry::discarded(now, &asset.symbol, "muted"));
            continue;
        }
        if !config.market.matches(asset.market_type) {
            log.push(ScanLogEntry::discarded(now, &asset.symbol, "market type filtered"));
            continue;
        }

        let signal = match strategy::analyze(
            &asset.symbol,
            &asset.candles,
            asset.market_type,
            config,
            history,
            jitter,
            now,
        ) {
            Some(signal) => signal,
            None => {
                log.push(ScanLogEntry::discarded(now, &asset.symbol, "no minimum confluence"));
                continue;
            }
        };

        if signal.winrate < MIN_WINRATE {
            log.push(ScanLogEntry::discarded(
                now,
                &asset.symbol,
                format!("winrate {:.1} below minimum", signal.winrate),
            ));
            continue;
        }

        if session.already_sent(&signal) {
            log.push(ScanLogEntry::discarded(now, &asset.symbol, "already sent for this slot"));
            continue;
        }

        log.push(ScanLogEntry::analyzed(now, &asset.symbol));
        debug!(asset = %asset.symbol, winrate = signal.winrate, "Candidate signal");

        let replaces = best.as_ref().map(|b| signal.winrate > b.winrate).unwrap_or(true);
        if replaces {
            best = Some(signal);
        }
    }

    if let Some(signal) = &best {
        log.push(ScanLogEntry::selected(now, &signal.asset));
        session.last_sent = Some((signal.asset.clone(), signal.entry_timestamp));
        info!(
            asset = %signal.asset,
            direction = %signal.direction,
            winrate = signal.winrate,
            entry = %signal.entry_time,
            "Signal selected"
        );
    }

    ScanOutcome { best, log }
}
