use crate::models::{OutboxReport, PendingWrite};
use crate::services::directory::MatchDirectory;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Errors from the verdict outbox
#[derive(Debug, Error)]
pub enum OutboxError {
    #[error("Outbox is closed")]
    Closed,

    #[error("Outbox worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Retry schedule for a single write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Deliver once, never retry
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before the retry that follows failed attempt number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Ordered queue of verdict writes
///
/// `enqueue` hands the write to a background task and returns immediately.
/// The task delivers writes one at a time in enqueue order, retrying failures
/// per the [`RetryPolicy`]. A write that exhausts its attempts is logged and
/// dropped; nothing is rolled back on the caller's side.
pub struct VerdictOutbox {
    sender: mpsc::UnboundedSender<PendingWrite>,
    pending: Arc<AtomicUsize>,
    worker: JoinHandle<OutboxReport>,
}

impl VerdictOutbox {
    /// Start the delivery task on the current tokio runtime
    pub fn spawn(directory: Arc<dyn MatchDirectory>, policy: RetryPolicy) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker = tokio::spawn(deliver_all(directory, policy, receiver, pending.clone()));

        Self {
            sender,
            pending,
            worker,
        }
    }

    pub fn enqueue(&self, write: PendingWrite) -> Result<(), OutboxError> {
        tracing::debug!(
            "Queueing {:?} {} -> {} ({})",
            write.kind,
            write.user_id,
            write.other_id,
            write.id
        );
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.sender.send(write).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            OutboxError::Closed
        })
    }

    /// Writes queued or in flight
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Stop accepting writes, deliver everything already queued and report
    pub async fn close(self) -> Result<OutboxReport, OutboxError> {
        drop(self.sender);
        Ok(self.worker.await?)
    }
}

async fn deliver_all(
    directory: Arc<dyn MatchDirectory>,
    policy: RetryPolicy,
    mut receiver: mpsc::UnboundedReceiver<PendingWrite>,
    pending: Arc<AtomicUsize>,
) -> OutboxReport {
    let mut report = OutboxReport::default();

    while let Some(mut write) = receiver.recv().await {
        loop {
            write.attempts += 1;
            match directory.send(&write).await {
                Ok(()) => {
                    report.delivered += 1;
                    break;
                }
                Err(e) if write.attempts < policy.max_attempts => {
                    let delay = policy.backoff(write.attempts);
                    tracing::warn!(
                        "Verdict write {:?} {} -> {} failed (attempt {}), retrying in {:?}: {}",
                        write.kind,
                        write.user_id,
                        write.other_id,
                        write.attempts,
                        delay,
                        e
                    );
                    report.retries += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        "Verdict write {:?} {} -> {} dropped after {} attempts: {}",
                        write.kind,
                        write.user_id,
                        write.other_id,
                        write.attempts,
                        e
                    );
                    report.failed += 1;
                    break;
                }
            }
        }
        pending.fetch_sub(1, Ordering::SeqCst);
    }

    tracing::debug!("Outbox drained: {:?}", report);
    report
}
