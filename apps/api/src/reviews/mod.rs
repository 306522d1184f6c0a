pub mod handlers;
pub mod models;
pub mod store;

pub use store::ReviewStore;
