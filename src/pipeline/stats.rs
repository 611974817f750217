// file: src/pipeline/stats.rs
// description: per-cycle counters and summary reporting
// reference: tracks processing metrics for one sync cycle

use crate::knowledge::UploadOutcome;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub repository_synced: bool,
    pub files_scanned: usize,
    /// Files accepted by the extension filter, i.e. upload attempts.
    pub files_matched: usize,
    /// Files both uploaded and registered into the collection.
    pub files_uploaded: usize,
    pub upload_failures: usize,
    pub registration_failures: usize,
    pub duration: Duration,
}

impl CycleReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            repository_synced: false,
            files_scanned: 0,
            files_matched: 0,
            files_uploaded: 0,
            upload_failures: 0,
            registration_failures: 0,
            duration: Duration::ZERO,
        }
    }

    pub fn record(&mut self, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Registered { .. } => self.files_uploaded += 1,
            UploadOutcome::UploadFailed => self.upload_failures += 1,
            UploadOutcome::RegistrationFailed { .. } => self.registration_failures += 1,
        }
    }

    pub fn files_attempted(&self) -> usize {
        self.files_matched
    }

    pub fn files_failed(&self) -> usize {
        self.upload_failures + self.registration_failures
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_matched == 0 {
            return 0.0;
        }
        (self.files_uploaded as f64 / self.files_matched as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "Files uploaded: {} of {} attempted ({} failed, {} scanned) in {:.2}s",
            self.files_uploaded,
            self.files_attempted(),
            self.files_failed(),
            self.files_scanned,
            self.duration.as_secs_f64()
        )
    }

    pub fn log(&self) {
        info!("=== Sync Cycle Summary ===");
        info!("Started: {}", self.started_at.to_rfc3339());
        info!("Repository synced: {}", self.repository_synced);
        info!("Files scanned: {}", self.files_scanned);
        info!("Files attempted: {}", self.files_attempted());
        info!("Files uploaded: {}", self.files_uploaded);
        info!("Upload failures: {}", self.upload_failures);
        info!("Registration failures: {}", self.registration_failures);
        info!("Success rate: {:.2}%", self.success_rate());
        info!("Duration: {:.2}s", self.duration.as_secs_f64());
        info!("==========================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut report = CycleReport::new(Utc::now());
        report.files_matched = 3;
        report.record(&UploadOutcome::Registered {
            file_id: "a".to_string(),
        });
        report.record(&UploadOutcome::UploadFailed);
        report.record(&UploadOutcome::RegistrationFailed {
            file_id: "c".to_string(),
        });

        assert_eq!(report.files_uploaded, 1);
        assert_eq!(report.upload_failures, 1);
        assert_eq!(report.registration_failures, 1);
        assert_eq!(report.files_failed(), 2);
        assert!((report.success_rate() - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_empty_report() {
        let report = CycleReport::new(Utc::now());
        assert_eq!(report.files_attempted(), 0);
        assert_eq!(report.success_rate(), 0.0);
        assert!(report.summary().starts_with("Files uploaded: 0 of 0 attempted"));
    }
}
