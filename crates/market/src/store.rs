use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;

use common::{Candle, MarketType};

use crate::catalog::AssetCatalog;

/// Trailing candles retained per instrument. Indicators need ~26; the
/// extra headroom keeps fractal lookback and debugging comfortable.
pub const MAX_WINDOW: usize = 120;

struct AssetBook {
    symbol: String,
    market: MarketType,
    candles: VecDeque<Candle>,
}

/// Copy of one instrument's state handed to the analyzer. Snapshot-at-call:
/// the feed keeps writing while a scan reads its own copy.
#[derive(Debug, Clone)]
pub struct AssetSnapshot {
    pub symbol: String,
    pub market_type: MarketType,
    pub candles: Vec<Candle>,
}

/// Shared, ordered candle books for all catalog instruments. The synthetic
/// feed is the only writer; scans take snapshots.
#[derive(Clone)]
pub struct MarketStore {
    inner: Arc<RwLock<Vec<AssetBook>>>,
}

impl MarketStore {
    pub fn new(catalog: &AssetCatalog) -> Self {
        let books = catalog
            .assets
            .iter()
            .map(|spec| AssetBook {
                symbol: spec.symbol.clone(),
                market: spec.market,
                candles: VecDeque::with_capacity(MAX_WINDOW),
            })
            .collect();
        Self { inner: Arc::new(RwLock::new(books)) }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Catalog-ordered instrument ids.
    pub async fn symbols(&self) -> Vec<String> {
        self.inner.read().await.iter().map(|b| b.symbol.clone()).collect()
    }

    pub async fn contains(&self, symbol: &str) -> bool {
        self.inner.read().await.iter().any(|b| b.symbol == symbol)
    }

    /// Append one candle, evicting the oldest past the window cap.
    pub async fn push_candle(&self, symbol: &str, candle: Candle) {
        let mut books = self.inner.write().await;
        if let Some(book) = books.iter_mut().find(|b| b.symbol == symbol) {
            book.candles.push_back(candle);
            while book.candles.len() > MAX_WINDOW {
                book.candles.pop_front();
            }
        }
    }

    /// Snapshot one instrument; `None` for unknown ids.
    pub async fn snapshot(&self, symbol: &str) -> Option<AssetSnapshot> {
        let books = self.inner.read().await;
        books.iter().find(|b| b.symbol == symbol).map(|book| AssetSnapshot {
            symbol: book.symbol.clone(),
            market_type: book.market,
            candles: book.candles.iter().copied().collect(),
        })
    }

    /// Snapshot every instrument in catalog order; the scan cycle's view.
    pub async fn snapshot_all(&self) -> Vec<AssetSnapshot> {
        let books = self.inner.read().await;
        books
            .iter()
            .map(|book| AssetSnapshot {
                symbol: book.symbol.clone(),
                market_type: book.market,
                candles: book.candles.iter().copied().collect(),
            })
            .collect()
    }
}
