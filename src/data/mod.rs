//! Data module - tabular file ingestion and normalization

mod header;
mod loader;
mod normalizer;
mod separator;
mod source;
mod summary;

pub use header::locate_header;
pub use loader::{load_table, LoadError, LoadOptions};
pub use normalizer::normalize;
pub use separator::{detect_separator, CANDIDATE_SEPARATORS};
pub use source::{ByteSource, FileFormat};
pub use summary::{summarize, DatasetSummary};
