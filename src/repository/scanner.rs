// file: src/repository/scanner.rs
// description: lazy directory walk yielding candidate files outside version-control metadata
// reference: https://docs.rs/walkdir

use crate::repository::mirror::VCS_METADATA_DIR;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree under the root, yielding absolute paths of regular files.
    ///
    /// The walk is lazy and starts over on every call. Symlinks to files are yielded;
    /// symlinked directories are not descended. The metadata marker is matched as a
    /// substring of the path relative to the root, so it excludes entries at any depth
    /// while a root such as `docs.git` still yields its files. Unreadable entries are
    /// logged and skipped.
    pub fn scan(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != VCS_METADATA_DIR)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
            })
            .map(|entry| entry.into_path())
            .filter(move |path| {
                let skip = self.is_metadata_path(path);
                if skip {
                    debug!("Skipping version-control file: {}", path.display());
                }
                !skip
            })
    }

    fn is_metadata_path(&self, path: &Path) -> bool {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .contains(VCS_METADATA_DIR)
    }
}
