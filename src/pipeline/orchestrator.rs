// file: src/pipeline/orchestrator.rs
// description: one sync cycle: mirror the repository, scan, filter and upload
// reference: orchestrates the sequential sync workflow

use crate::config::Config;
use crate::error::Result;
use crate::knowledge::KnowledgeUploader;
use crate::pipeline::stats::CycleReport;
use crate::repository::{ExtensionFilter, FileScanner, RepositoryMirror, ensure_directory};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct SyncCycle {
    local_path: PathBuf,
    mirror: RepositoryMirror,
    filter: ExtensionFilter,
    uploader: KnowledgeUploader,
}

impl SyncCycle {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            local_path: config.repository.local_path.clone(),
            mirror: RepositoryMirror::new(config),
            filter: ExtensionFilter::from_config(config),
            uploader: KnowledgeUploader::new(config)?,
        })
    }

    /// Files the next cycle would upload, in scan order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        FileScanner::new(&self.local_path)
            .scan()
            .filter(|path| self.filter.accepts(path))
            .collect()
    }

    /// Run one full pass.
    ///
    /// A failed repository sync or a failed file is logged and skipped; only errors
    /// outside those (such as the mirror directory being impossible to create) are
    /// returned.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let started = Instant::now();
        let mut report = CycleReport::new(Utc::now());

        ensure_directory(&self.local_path)?;

        report.repository_synced = self.mirror.sync().await?;
        if !report.repository_synced {
            warn!("Repository sync skipped. Proceeding with existing files.");
        }

        let scanner = FileScanner::new(&self.local_path);
        for path in scanner.scan() {
            report.files_scanned += 1;

            if !self.filter.accepts(&path) {
                debug!("Skipping file with disallowed extension: {}", path.display());
                continue;
            }

            report.files_matched += 1;
            let outcome = self.uploader.upload(&path).await;
            report.record(&outcome);
        }

        report.duration = started.elapsed();
        info!("Sync process completed. {}", report.summary());
        report.log();

        Ok(report)
    }
}
