// file: src/repository/mod.rs
// description: Repository operations module exports
// reference: Internal module structure

pub mod command;
pub mod credentials;
pub mod filter;
pub mod mirror;
pub mod scanner;

pub use command::CommandRunner;
pub use credentials::{EmbeddedToken, PlainUrl, UrlAuthenticator};
pub use filter::ExtensionFilter;
pub use mirror::{RepositoryMirror, VCS_METADATA_DIR, ensure_directory};
pub use scanner::FileScanner;
