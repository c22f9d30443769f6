//! Multi-Destination Writer Orchestrator (spec §4.4–§4.7): sequences
//! writes to the file, search-store, and graph-store destinations.

pub mod fake;
pub mod file;
pub mod graph;
pub mod orchestrator;
pub mod search;

pub use fake::{InMemoryGraphStoreClient, InMemorySearchStoreClient};
pub use file::FileWriter;
pub use graph::GraphStoreClient;
pub use orchestrator::Orchestrator;
pub use search::SearchStoreClient;

#[cfg(feature = "http")]
pub use graph::HttpGraphStoreClient;
#[cfg(feature = "http")]
pub use search::HttpSearchStoreClient;
