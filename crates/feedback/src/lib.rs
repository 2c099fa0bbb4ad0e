pub mod history;
pub mod persist;
pub mod store;

pub use history::{overlap_ratio, FeedbackHistory, MATCH_THRESHOLD, RECENT_WINDOW};
pub use store::FeedbackStore;
