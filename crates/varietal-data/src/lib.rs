pub mod config;
pub mod directory;
pub mod ingest;
pub mod loader;
pub mod parse;
pub mod provider;
pub mod schema;

pub use config::EngineConfig;
pub use directory::DirectoryProvider;
pub use ingest::{
    ConfigIngestor, DocumentFailure, DocumentKind, FailureClass, ReloadReport, SettingsOutcome,
};
pub use loader::{DataLoadError, Format};
pub use provider::{DocumentProvider, DocumentSet, MemoryProvider, RawDocument};
