// file: src/pipeline/daemon.rs
// description: perpetual loop running sync cycles at a fixed interval
// reference: https://docs.rs/futures/latest/futures/future/trait.FutureExt.html#method.catch_unwind

use crate::error::Result;
use crate::pipeline::orchestrator::SyncCycle;
use crate::pipeline::stats::CycleReport;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{error, info, warn};

/// Something the daemon can run once per interval.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self) -> Result<CycleReport>;
}

#[async_trait]
impl CycleRunner for SyncCycle {
    async fn run_cycle(&self) -> Result<CycleReport> {
        SyncCycle::run_cycle(self).await
    }
}

#[derive(Debug, Clone)]
pub enum CycleResult {
    Completed(CycleReport),
    Failed(String),
    Panicked(String),
}

impl CycleResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, CycleResult::Completed(_))
    }
}

pub struct Daemon<C> {
    cycle: C,
    interval: Duration,
}

impl<C: CycleRunner> Daemon<C> {
    pub fn new(cycle: C, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("Sync interval is 0 seconds; cycles will run back to back");
        }
        Self { cycle, interval }
    }

    /// Run cycles until the process is killed, sleeping the interval after each one.
    pub async fn run_forever(&self) {
        info!(
            "Starting continuous sync process. Interval: {} seconds",
            self.interval.as_secs()
        );

        let mut iteration: u64 = 0;
        loop {
            iteration += 1;
            self.run_guarded(iteration).await;

            info!(
                "Waiting {} seconds before next sync...",
                self.interval.as_secs()
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run `count` cycles with the interval between them (not after the last one).
    pub async fn run_iterations(&self, count: u64) -> Vec<CycleResult> {
        let mut results = Vec::new();

        for iteration in 1..=count {
            results.push(self.run_guarded(iteration).await);

            if iteration < count {
                info!(
                    "Waiting {} seconds before next sync...",
                    self.interval.as_secs()
                );
                tokio::time::sleep(self.interval).await;
            }
        }

        results
    }

    /// Run one cycle; errors and panics are logged and turned into a result.
    pub async fn run_guarded(&self, iteration: u64) -> CycleResult {
        info!(iteration, "Starting sync cycle");

        match AssertUnwindSafe(self.cycle.run_cycle()).catch_unwind().await {
            Ok(Ok(report)) => CycleResult::Completed(report),
            Ok(Err(e)) => {
                error!(iteration, "Error in sync loop: {}", e);
                CycleResult::Failed(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(iteration, "Sync cycle panicked: {}", message);
                CycleResult::Panicked(message)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use chrono::Utc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Script {
        Fail,
        Panic,
        Succeed,
    }

    struct ScriptedCycle {
        calls: Arc<AtomicUsize>,
        script: Vec<Script>,
    }

    impl ScriptedCycle {
        fn new(script: Vec<Script>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: calls.clone(),
                    script,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl CycleRunner for ScriptedCycle {
        async fn run_cycle(&self) -> Result<CycleReport> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.get(call).unwrap_or(&Script::Succeed) {
                Script::Fail => Err(SyncError::Validation("simulated failure".to_string())),
                Script::Panic => panic!("simulated panic"),
                Script::Succeed => Ok(CycleReport::new(Utc::now())),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_then_recovery() {
        let (cycle, calls) = ScriptedCycle::new(vec![Script::Fail, Script::Succeed]);
        let daemon = Daemon::new(cycle, Duration::from_secs(30));

        let start = tokio::time::Instant::now();
        let results = daemon.run_iterations(2).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(&results[0], CycleResult::Failed(msg) if msg.contains("simulated failure")));
        assert!(results[1].is_completed());
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_is_contained() {
        let (cycle, calls) = ScriptedCycle::new(vec![Script::Panic, Script::Succeed]);
        let daemon = Daemon::new(cycle, Duration::from_secs(5));

        let results = daemon.run_iterations(2).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(&results[0], CycleResult::Panicked(msg) if msg == "simulated panic"));
        assert!(results[1].is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_iteration_does_not_sleep() {
        let (cycle, _) = ScriptedCycle::new(vec![Script::Succeed]);
        let daemon = Daemon::new(cycle, Duration::from_secs(3600));

        let start = tokio::time::Instant::now();
        let results = daemon.run_iterations(1).await;

        assert_eq!(results.len(), 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_forever_keeps_going_after_failures() {
        let (cycle, calls) = ScriptedCycle::new(vec![Script::Fail, Script::Panic, Script::Fail]);
        let daemon = Daemon::new(cycle, Duration::from_secs(30));

        let handle = tokio::spawn(async move { daemon.run_forever().await });

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[test]
    fn test_panic_message_extraction() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
