// storage/mod.rs
// Database operations module

pub mod graph;
pub mod maintenance;
pub mod migrations;
pub mod persist;
pub mod pool;
pub mod relational;
pub mod sink;
mod test_helpers;

// Re-export commonly used items
pub use graph::{GraphNode, SqliteGraphSink};
pub use maintenance::{clean_cms, CmsCleanReport};
pub use migrations::run_migrations;
pub use persist::{store_graph, store_relational};
pub use pool::init_db_pool_with_path;
pub use relational::{SqliteRelationalSink, StoredEnrichment};
pub use sink::{GraphSink, RelationalSink};
