// Prompt catalog: built-in registry and bundles, weighted search, template
// rendering, category/tag facets, and admin tag-mapping overrides persisted
// to a JSON file.

pub mod bundles;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod render;
pub mod search;
pub mod tag_mappings;

pub use search::Catalog;
pub use tag_mappings::TagMappings;
