use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::{Catalog, TagMappings};
use crate::clock::Clock;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::reports::ReportStore;
use crate::reviews::ReviewStore;
use crate::roadmap::RoadmapStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every store is process-local: state is lost on restart and is not shared
/// between instances.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub catalog: Arc<Catalog>,
    pub tag_mappings: Arc<RwLock<TagMappings>>,
    pub history: Arc<RwLock<HistoryStore>>,
    pub roadmap: Arc<RwLock<RoadmapStore>>,
    pub reviews: Arc<RwLock<ReviewStore>>,
    pub reports: Arc<RwLock<ReportStore>>,
}

impl AppState {
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        catalog: Catalog,
        tag_mappings: TagMappings,
        history: HistoryStore,
        roadmap: RoadmapStore,
    ) -> Self {
        Self {
            config,
            clock,
            catalog: Arc::new(catalog),
            tag_mappings: Arc::new(RwLock::new(tag_mappings)),
            history: Arc::new(RwLock::new(history)),
            roadmap: Arc::new(RwLock::new(roadmap)),
            reviews: Arc::new(RwLock::new(ReviewStore::new())),
            reports: Arc::new(RwLock::new(ReportStore::new())),
        }
    }
}
