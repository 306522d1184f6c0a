// Per-user view history: dedupe window, TTL pruning, newest-first listing.

pub mod handlers;
pub mod models;
pub mod store;

pub use store::HistoryStore;
