use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use common::Candle;

use crate::catalog::{AssetCatalog, AssetSpec};
use crate::store::MarketStore;

/// Candles of history backfilled per instrument at startup, so indicators
/// are live from the first scan.
pub const SEED_CANDLES: usize = 100;

struct AssetState {
    spec: AssetSpec,
    rng: StdRng,
    last_close: f64,
}

/// Synthetic market-data producer. One bounded random walk per instrument,
/// seeded from the symbol and segment tag. REAL and OTC books differ only
/// in tag and seed, not in structure.
pub struct SyntheticFeed {
    store: MarketStore,
    states: Vec<AssetState>,
    tick: Duration,
}

impl SyntheticFeed {
    pub fn new(store: MarketStore, catalog: &AssetCatalog, tick: Duration) -> Self {
        let states = catalog
            .assets
            .iter()
            .map(|spec| AssetState {
                rng: StdRng::seed_from_u64(asset_seed(spec)),
                last_close: spec.base_price,
                spec: spec.clone(),
            })
            .collect();
        Self { store, states, tick }
    }

    /// Backfill each book with `SEED_CANDLES` candles ending now.
    pub async fn seed_history(&mut self) {
        let tick_ms = self.tick.as_millis() as i64;
        let now_ms = Utc::now().timestamp_millis();

        for state in &mut self.states {
            for i in 0..SEED_CANDLES {
                let time = now_ms - (SEED_CANDLES - i) as i64 * tick_ms;
                let candle = next_candle(&mut state.rng, &state.spec, state.last_close, time);
                state.last_close = candle.close;
                self.store.push_candle(&state.spec.symbol, candle).await;
            }
        }
        info!(
            assets = self.states.len(),
            candles = SEED_CANDLES,
            "Synthetic history seeded"
        );
    }

    /// Run the tick loop forever, appending one candle per instrument per
    /// tick. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!(tick = ?self.tick, assets = self.states.len(), "Synthetic feed running");
        let mut interval = tokio::time::interval(self.tick);
        loop {
            interval.tick().await;
            let now_ms = Utc::now().timestamp_millis();
            for state in &mut self.states {
                let candle = next_candle(&mut state.rng, &state.spec, state.last_close, now_ms);
                state.last_close = candle.close;
                self.store.push_candle(&state.spec.symbol, candle).await;
            }
        }
    }
}

/// FNV-1a over symbol bytes plus the segment tag.
fn asset_seed(spec: &AssetSpec) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in spec.symbol.bytes().chain(spec.market.to_string().bytes()) {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// One step of the bounded random walk. Wicks extend beyond the candle
/// body so `high >= max(open, close)` and `low <= min(open, close)` hold
/// by construction.
fn next_candle(rng: &mut StdRng, spec: &AssetSpec, last_close: f64, time: i64) -> Candle {
    let bound = spec.volatility_bps / 10_000.0;
    let ret = rng.gen_range(-bound..bound);

    let open = last_close;
    let close = open * (1.0 + ret);
    let body_high = open.max(close);
    let body_low = open.min(close);
    let high = body_high * (1.0 + rng.gen_range(0.0..bound));
    let low = body_low * (1.0 - rng.gen_range(0.0..bound));
    let volume = rng.gen_range(500.0..3_000.0);

    Candle { time, open, high, low, close, volume }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MarketType;

    fn spec(symbol: &str, market: MarketType) -> AssetSpec {
        AssetSpec { symbol: symbol.into(), market, base_price: 1.085, volatility_bps: 15.0 }
    }

    fn walk(spec: &AssetSpec, steps: usize) -> Vec<Candle> {
        let mut rng = StdRng::seed_from_u64(asset_seed(spec));
        let mut last_close = spec.base_price;
        let mut candles = Vec::with_capacity(steps);
        for i in 0..steps {
            let candle = next_candle(&mut rng, spec, last_close, i as i64);
            last_close = candle.close;
            candles.push(candle);
        }
        candles
    }

    #[test]
    fn generated_candles_respect_ohlc_invariant() {
        for candle in walk(&spec("EURUSD", MarketType::Real), 500) {
            assert!(candle.high >= candle.open.max(candle.close));
            assert!(candle.low <= candle.open.min(candle.close));
            assert!(candle.low > 0.0);
            assert!((500.0..3_000.0).contains(&candle.volume));
        }
    }

    #[test]
    fn same_seed_reproduces_the_walk() {
        let s = spec("EURUSD", MarketType::Real);
        assert_eq!(walk(&s, 50), walk(&s, 50));
    }

    #[test]
    fn real_and_otc_walks_differ_only_by_seed() {
        let real = walk(&spec("EURUSD", MarketType::Real), 50);
        let otc = walk(&spec("EURUSD", MarketType::Otc), 50);
        assert_ne!(real, otc);
    }

    #[tokio::test]
    async fn seed_history_fills_every_book() {
        let catalog = AssetCatalog {
            assets: vec![spec("EURUSD", MarketType::Real), spec("EURUSD-OTC", MarketType::Otc)],
        };
        let store = MarketStore::new(&catalog);
        let mut feed = SyntheticFeed::new(store.clone(), &catalog, Duration::from_millis(500));
        feed.seed_history().await;

        for snapshot in store.snapshot_all().await {
            assert_eq!(snapshot.candles.len(), SEED_CANDLES);
            // Oldest-first ordering
            let times: Vec<i64> = snapshot.candles.iter().map(|c| c.time).collect();
            let mut sorted = times.clone();
            sorted.sort_unstable();
            assert_eq!(times, sorted);
        }
    }
}
