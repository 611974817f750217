// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod knowledge;
pub mod pipeline;
pub mod repository;
pub mod utils;

pub use crate::config::{Config, KnowledgeConfig, RepositoryConfig, SyncConfig};
pub use error::{Result, SyncError};
pub use knowledge::{KnowledgeUploader, RetryPolicy, UploadOutcome};
pub use pipeline::{CycleReport, CycleResult, CycleRunner, Daemon, SyncCycle};
pub use repository::{
    CommandRunner, EmbeddedToken, ExtensionFilter, FileScanner, PlainUrl, RepositoryMirror,
    UrlAuthenticator,
};
pub use utils::Validator;
