//! Core engine: text metrics, taxonomy reconciliation, and the article
//! lifecycle. Everything here is synchronous rusqlite work; the API
//! layer runs it on blocking threads.

pub mod articles;
pub mod metrics;
pub mod storage;
pub mod taxonomy;

pub use articles::{
    ArticleFields, CoverFile, PostStatus, create_article, delete_article, load_article,
    load_article_for_viewer, update_article,
};
pub use metrics::{TextMetrics, compute_metrics};
pub use storage::{CoverStore, Storage, file_ext};
pub use taxonomy::{TaxonomyStore, resolve_category, resolve_tags};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller sent something unusable; the message is safe to show.
    #[error("{0}")]
    Validation(String),
    /// Target row does not exist, or the caller does not own it.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("cover storage failed: {0}")]
    Storage(std::io::Error),
    #[error("database error: {0}")]
    Persistence(anyhow::Error),
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Persistence(err)
    }
}
