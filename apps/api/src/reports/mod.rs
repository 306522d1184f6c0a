// Content reports from users and the admin moderation queue.

pub mod handlers;
pub mod models;
pub mod store;

pub use store::ReportStore;
