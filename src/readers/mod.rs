pub mod dataset;
pub mod table_cache;
pub mod table_reader;

pub use dataset::{Dataset, DatasetLoader, DatasetPaths};
pub use table_cache::TableCache;
pub use table_reader::{parse_timestamp, TableReader};
