pub mod catalog;
pub mod feed;
pub mod store;

pub use catalog::{AssetCatalog, AssetSpec};
pub use feed::SyntheticFeed;
pub use store::{AssetSnapshot, MarketStore};
