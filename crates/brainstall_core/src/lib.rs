//! Core domain logic for Brainstall.
//! This crate is the single source of truth for document metadata,
//! query and aggregation invariants.

pub mod config;
pub mod frontmatter;
pub mod generation;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod stats;
pub mod store;

pub use config::{ConfigError, Settings};
pub use frontmatter::{FieldValue, Frontmatter};
pub use generation::registry::{GeneratorRegistry, RegistryError};
pub use generation::{GenerationError, GenerationRequest, GenerationResult, TextGenerator};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{DateSource, Document, DocumentType};
pub use model::time::{Clock, FixedClock, SystemClock};
pub use repo::document_repo::{DocumentRepository, RepoError, RepoResult, VaultDocumentRepository};
pub use search::query::{evaluate, run_query, QueryItem, QueryOutcome, QueryState};
pub use service::capture_service::{CaptureError, CaptureService, Reference};
pub use service::post_service::{PostError, PostService};
pub use service::topic_service::{PromoteKind, PromoteOutcome, TopicError, TopicService};
pub use stats::activity::{collect_activity, summarize, ActivityStats, HeatCell, Heatmap};
pub use store::{FsVaultStore, MemoryVaultStore, StoreError, StoreResult, VaultStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
