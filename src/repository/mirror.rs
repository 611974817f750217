// file: src/repository/mirror.rs
// description: keeps a local working copy of the configured repository up to date
// reference: https://git-scm.com/docs/git-clone

use crate::config::{Config, RepositoryConfig};
use crate::error::{Result, SyncError};
use crate::repository::command::CommandRunner;
use crate::repository::credentials::{UrlAuthenticator, authenticator_for, redact_url};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Name of the metadata directory whose presence marks an existing mirror.
pub const VCS_METADATA_DIR: &str = ".git";

pub struct RepositoryMirror {
    config: RepositoryConfig,
    runner: CommandRunner,
    authenticator: Box<dyn UrlAuthenticator>,
}

impl RepositoryMirror {
    pub fn new(config: &Config) -> Self {
        Self {
            authenticator: authenticator_for(&config.repository),
            config: config.repository.clone(),
            runner: CommandRunner::new(),
        }
    }

    /// Replace the credential scheme used to build the clone url.
    pub fn with_authenticator(mut self, authenticator: Box<dyn UrlAuthenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub fn has_metadata(&self) -> bool {
        self.config.local_path.join(VCS_METADATA_DIR).exists()
    }

    /// Clone or update the mirror. Returns whether the clone/update command succeeded.
    ///
    /// Only a failure to create the mirror directory is returned as an error; command
    /// and url failures are logged and reported as `Ok(false)`, leaving whatever is
    /// already on disk in place.
    pub async fn sync(&self) -> Result<bool> {
        let Some(url) = self.config.url.as_deref() else {
            warn!("No repository URL provided. Skipping repository sync.");
            return Ok(false);
        };

        self.configure_identity().await;

        ensure_directory(&self.config.local_path)?;

        let authenticated_url = match self.authenticator.authenticate(url) {
            Ok(authenticated_url) => authenticated_url,
            Err(e) => {
                error!(
                    "Repository sync failed: could not build {} url for {}: {}",
                    self.authenticator.name(),
                    redact_url(url),
                    e
                );
                return Ok(false);
            }
        };

        if self.has_metadata() {
            info!("Repository exists, pulling latest changes");
            match self.pull().await {
                Ok(()) => {
                    info!("Pulled latest changes from repository");
                    Ok(true)
                }
                Err(e) => {
                    error!("Failed to pull repository: {}", e);
                    Ok(false)
                }
            }
        } else {
            info!("Cloning repository from {}", redact_url(url));
            match self.clone_repository(&authenticated_url).await {
                Ok(()) => {
                    info!("Cloned repository into {}", self.config.local_path.display());
                    Ok(true)
                }
                Err(e) => {
                    error!("Failed to clone repository: {}", e);
                    Ok(false)
                }
            }
        }
    }

    /// Set the global commit identity when both username and token are configured.
    /// Failures are logged and otherwise ignored.
    pub async fn configure_identity(&self) -> bool {
        let (Some(username), Some(_)) = (&self.config.username, &self.config.token) else {
            debug!("Repository credentials not fully configured. Skipping identity configuration.");
            return false;
        };

        let email = format!("{}@users.noreply.github.com", username);

        for (key, value) in [("user.name", username.as_str()), ("user.email", email.as_str())] {
            if let Err(e) = self
                .runner
                .run(
                    &self.config.vcs_binary,
                    &["config", "--global", key, value],
                    None,
                    true,
                )
                .await
            {
                error!("Failed to configure git credentials: {}", e);
                return false;
            }
        }

        info!("Git credentials configured");
        true
    }

    async fn pull(&self) -> Result<()> {
        self.runner
            .run(
                &self.config.vcs_binary,
                &["pull"],
                Some(&self.config.local_path),
                false,
            )
            .await
            .map(|_| ())
    }

    async fn clone_repository(&self, authenticated_url: &str) -> Result<()> {
        self.runner
            .run(
                &self.config.vcs_binary,
                &["clone", authenticated_url, "."],
                Some(&self.config.local_path),
                false,
            )
            .await
            .map(|_| ())
    }
}

/// Create `directory` and its parents if missing.
pub fn ensure_directory(directory: &Path) -> Result<()> {
    match fs::create_dir_all(directory) {
        Ok(()) => {
            debug!("Ensured directory exists: {}", directory.display());
            Ok(())
        }
        Err(source) => {
            let permission_denied = source.kind() == ErrorKind::PermissionDenied;
            if permission_denied {
                error!("Permission denied creating directory: {}", directory.display());
            } else {
                error!("Error creating directory {}: {}", directory.display(), source);
            }
            Err(SyncError::DirectoryCreate {
                path: directory.to_path_buf(),
                permission_denied,
                source,
            })
        }
    }
}
