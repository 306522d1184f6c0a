// Public roadmap: feature requests, votes, comments and admin status changes.

pub mod handlers;
pub mod models;
pub mod seed;
pub mod store;

pub use store::RoadmapStore;
