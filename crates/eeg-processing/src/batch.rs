//! Parallel epoch assessment
//!
//! Each epoch is scored on its own blocking task while a semaphore bounds how
//! many run at once. Results are reassembled in input order no matter when
//! they complete. A failure stays attached to its epoch unless the batch is
//! configured to fail fast.

use crate::assessor::QualityAssessor;
use crate::config::{BatchConfig, FailurePolicy};
use crate::report::{QualityReport, QualityTable};
use eeg_core::{EegError, EegResult, Epoch};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// What happened to one epoch in a batch
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentOutcome {
    Assessed(QualityReport),
    Failed(EegError),
    /// Cancelled before its assessment started
    Skipped,
}

/// Ordered per-epoch outcomes of a batch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    entries: Vec<(u64, AssessmentOutcome)>,
}

impl BatchOutcome {
    pub fn new(entries: Vec<(u64, AssessmentOutcome)>) -> Self {
        Self { entries }
    }

    /// `(epoch_id, outcome)` in input order
    pub fn entries(&self) -> &[(u64, AssessmentOutcome)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn epoch_ids(&self) -> Vec<u64> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Successful reports in input order
    pub fn reports(&self) -> Vec<&QualityReport> {
        self.entries
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                AssessmentOutcome::Assessed(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(u64, &EegError)> {
        self.entries
            .iter()
            .filter_map(|(id, outcome)| match outcome {
                AssessmentOutcome::Failed(e) => Some((*id, e)),
                _ => None,
            })
            .collect()
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, AssessmentOutcome::Failed(_)))
            .count()
    }

    /// Ids of epochs that never started
    pub fn skipped(&self) -> Vec<u64> {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, AssessmentOutcome::Skipped))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every epoch was assessed successfully
    pub fn is_complete(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, outcome)| matches!(outcome, AssessmentOutcome::Assessed(_)))
    }

    pub fn quality_table(&self) -> QualityTable {
        QualityTable::from_reports(self.reports().into_iter().cloned().collect())
    }
}

/// Shared stop signal for a running batch
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// No further epochs start once this is set
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounded worker pool around a [`QualityAssessor`]
#[derive(Debug, Clone)]
pub struct BatchAssessor {
    assessor: Arc<QualityAssessor>,
    config: BatchConfig,
}

impl BatchAssessor {
    pub fn new(assessor: Arc<QualityAssessor>, config: BatchConfig) -> Self {
        Self { assessor, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Assess `epochs` concurrently, returning outcomes in input order
    ///
    /// Fails only under [`FailurePolicy::FailFast`], with
    /// [`EegError::BatchAborted`] wrapping the first failure observed.
    pub async fn assess_many(&self, epochs: Vec<Epoch>, cancel: &CancellationFlag) -> EegResult<BatchOutcome> {
        let workers = self.config.effective_workers();
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        let mut slots: Vec<(u64, Option<AssessmentOutcome>)> = Vec::with_capacity(epochs.len());

        for (position, epoch) in epochs.into_iter().enumerate() {
            slots.push((epoch.epoch_id(), None));
            let assessor = Arc::clone(&self.assessor);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let outcome = assess_one(assessor, semaphore, cancel, epoch).await;
                (position, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (position, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    // the outer task only dies when aborted; its slot stays empty
                    warn!("Batch task ended abnormally: {}", e);
                    continue;
                }
            };

            let epoch_id = slots[position].0;
            if let AssessmentOutcome::Failed(e) = &outcome {
                warn!("Assessment failed for epoch {}: {}", epoch_id, e);
                if self.config.failure_policy == FailurePolicy::FailFast {
                    cancel.cancel();
                    tasks.shutdown().await;
                    return Err(EegError::BatchAborted {
                        epoch_id,
                        source: Box::new(e.clone()),
                    });
                }
            }
            slots[position].1 = Some(outcome);
        }

        let entries: Vec<(u64, AssessmentOutcome)> = slots
            .into_iter()
            .map(|(epoch_id, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    AssessmentOutcome::Failed(EegError::WorkerFailed {
                        epoch_id,
                        reason: "task ended without a result".to_string(),
                    })
                });
                (epoch_id, outcome)
            })
            .collect();
        let outcome = BatchOutcome::new(entries);

        info!(
            "Batch assessed {} epochs on {} workers: {} failed, {} skipped",
            outcome.len(),
            workers,
            outcome.failure_count(),
            outcome.skipped().len()
        );
        Ok(outcome)
    }
}

async fn assess_one(
    assessor: Arc<QualityAssessor>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationFlag,
    epoch: Epoch,
) -> AssessmentOutcome {
    let Ok(_permit) = semaphore.acquire_owned().await else {
        return AssessmentOutcome::Skipped;
    };
    if cancel.is_cancelled() {
        return AssessmentOutcome::Skipped;
    }

    let epoch_id = epoch.epoch_id();
    match tokio::task::spawn_blocking(move || assessor.assess(&epoch)).await {
        Ok(Ok(report)) => AssessmentOutcome::Assessed(report),
        Ok(Err(e)) => AssessmentOutcome::Failed(e),
        Err(e) => AssessmentOutcome::Failed(EegError::WorkerFailed {
            epoch_id,
            reason: e.to_string(),
        }),
    }
}
