// file: src/knowledge/mod.rs
// description: knowledge service client module exports

pub mod client;
pub mod models;
pub mod retry;

pub use client::KnowledgeUploader;
pub use models::{AddFileRequest, UploadOutcome, UploadedFile};
pub use retry::RetryPolicy;
