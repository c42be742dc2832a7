//! Concurrent batch matching
//!
//! Each target is ranked on its own task in a bounded rayon pool. Tasks
//! report back over a channel so the caller can give up after a deadline.
//! Giving up cancels the batch: queued tasks that have not started return
//! without ranking.

use crate::error::{MatchError, Result};
use crate::matcher::{active_config, find_similar_cases, MatchOptions, RankedMatches};
use ahash::AHashMap;
use finishcase_core::{CaseRecord, MatchContext};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptions {
    pub min_similarity: u8,
    pub max_results: usize,
    /// Pool size; defaults to the available parallelism
    pub workers: Option<usize>,
    /// Overall deadline for the whole batch
    pub timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        let defaults = MatchOptions::default();
        Self {
            min_similarity: defaults.min_similarity,
            max_results: defaults.max_results,
            workers: None,
            timeout: None,
        }
    }
}

impl BatchOptions {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            min_similarity: self.min_similarity,
            max_results: self.max_results,
        }
    }

    fn worker_count(&self) -> usize {
        self.workers
            .filter(|&n| n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
    }
}

/// Per-target rankings, in the order the targets were given
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResults {
    entries: Vec<(String, RankedMatches)>,
}

impl BatchResults {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranking for the first target with this id
    pub fn get(&self, target_id: &str) -> Option<&RankedMatches> {
        self.entries
            .iter()
            .find(|(id, _)| id == target_id)
            .map(|(_, ranked)| ranked)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RankedMatches)> {
        self.entries.iter().map(|(id, ranked)| (id.as_str(), ranked))
    }

    /// Key rankings by target id; a repeated id keeps its last ranking
    pub fn into_map(self) -> AHashMap<String, RankedMatches> {
        self.entries.into_iter().collect()
    }
}

type Outcome = (usize, String, Result<RankedMatches>);

/// State shared between the caller and the batch's tasks
#[derive(Debug, Default)]
struct Progress {
    cancelled: AtomicBool,
    ranked: AtomicUsize,
    abandoned: AtomicUsize,
}

impl Progress {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn ranked(&self) -> usize {
        self.ranked.load(Ordering::Acquire)
    }

    #[cfg(test)]
    fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::Acquire)
    }
}

/// Rank every target against the same context snapshot
///
/// All targets see the same configuration and cases even if the store is
/// updated while the batch runs. If any target fails, the error of the
/// earliest such target (in input order) is returned. When the timeout
/// passes, targets whose task has not started yet are never ranked.
pub fn batch_match(
    ctx: Arc<MatchContext>,
    targets: Vec<CaseRecord>,
    options: &BatchOptions,
) -> Result<BatchResults> {
    run_batch(ctx, targets, options, Arc::new(Progress::default()))
}

fn run_batch(
    ctx: Arc<MatchContext>,
    targets: Vec<CaseRecord>,
    options: &BatchOptions,
    progress: Arc<Progress>,
) -> Result<BatchResults> {
    active_config(&ctx)?;
    let total = targets.len();
    if total == 0 {
        return Ok(BatchResults::default());
    }

    let started = Instant::now();
    let workers = options.worker_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("finishcase-match-{}", i))
        .panic_handler(|_| warn!("batch match task panicked"))
        .build()
        .map_err(|e| MatchError::WorkerPool(e.to_string()))?;

    let (tx, rx) = mpsc::channel::<Outcome>();
    let match_options = options.match_options();

    for (index, target) in targets.into_iter().enumerate() {
        let ctx = Arc::clone(&ctx);
        let tx = tx.clone();
        let progress = Arc::clone(&progress);
        pool.spawn(move || {
            if progress.is_cancelled() {
                progress.abandoned.fetch_add(1, Ordering::AcqRel);
                return;
            }
            let outcome = find_similar_cases(&ctx, &target, &match_options);
            progress.ranked.fetch_add(1, Ordering::AcqRel);
            // The receiver is gone once the caller has timed out
            let _ = tx.send((index, target.id, outcome));
        });
    }
    drop(tx);

    let deadline = options.timeout.map(|t| started + t);
    let mut slots: Vec<Option<(String, Result<RankedMatches>)>> =
        (0..total).map(|_| None).collect();
    let mut completed = 0;

    while completed < total {
        let received = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(remaining) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => {
                        progress.cancel();
                        warn!(
                            completed,
                            total,
                            ranked = progress.ranked(),
                            "batch match deadline exceeded; cancelling"
                        );
                        return Err(MatchError::Timeout { completed, total });
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(lost_workers(completed, total))
                    }
                }
            }
            None => rx.recv().map_err(|_| lost_workers(completed, total))?,
        };

        let (index, target_id, outcome) = received;
        slots[index] = Some((target_id, outcome));
        completed += 1;
    }

    let entries = slots
        .into_iter()
        .flatten()
        .map(|(id, outcome)| outcome.map(|ranked| (id, ranked)))
        .collect::<Result<Vec<_>>>()?;

    info!(
        targets = total,
        workers,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch match complete"
    );

    Ok(BatchResults { entries })
}

fn lost_workers(completed: usize, total: usize) -> MatchError {
    MatchError::WorkerPool(format!(
        "workers stopped reporting after {} of {} targets",
        completed, total
    ))
}
