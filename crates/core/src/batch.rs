//! Batch runner.
//!
//! A [`WorkerPool`] owns a dedicated rayon thread pool. Units are handed to it
//! in rounds of at most `queue_depth`; every unit runs the whole synchronous
//! pipeline (read, strip, extract, assemble) on one worker. Results come back
//! to the calling thread, which is the only place output is written.
//!
//! A failing unit never aborts the batch. It is logged at `warn` and reported
//! in [`BatchReport::failures`] together with its id. A panicking unit is
//! reported the same way as [`NormalizeError::Panicked`].

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::assemble::Normalizer;
use crate::config::NormalizeConfig;
use crate::record::{DocumentRecord, JsonLine, PageRecord};
use crate::source::{DocumentSource, FeedLine};
use crate::{NormalizeError, Result};

/// A unit that could not be normalized.
#[derive(Debug)]
pub struct DocumentFailure {
    pub id: String,
    pub error: NormalizeError,
}

/// Outcome of a batch: successes in completion order plus per-unit failures.
#[derive(Debug)]
pub struct BatchReport<R> {
    pub records: Vec<R>,
    pub failures: Vec<DocumentFailure>,
}

impl<R> BatchReport<R> {
    pub fn new() -> Self {
        Self { records: Vec::new(), failures: Vec::new() }
    }

    /// Number of units processed, successful or not.
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<R> Default for BatchReport<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-size worker pool with a bounded submission queue.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
    queue_depth: usize,
}

impl WorkerPool {
    /// Build a pool of `workers` threads. Zero values are clamped to one.
    pub fn new(workers: usize, queue_depth: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("docnorm-worker-{}", index))
            .build()?;

        Ok(Self { pool, workers, queue_depth: queue_depth.max(1) })
    }

    pub fn from_config(config: &NormalizeConfig) -> Result<Self> {
        Self::new(config.workers, config.queue_depth)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_depth(&self) -> usize {
        self.queue_depth
    }

    /// Run `work` over every unit and partition the outcomes.
    ///
    /// `id_of` names a unit in failure reports and logs.
    pub fn run<U, R, I, F>(&self, units: &[U], id_of: I, work: F) -> BatchReport<R>
    where
        U: Sync,
        R: Send,
        I: Fn(&U) -> String + Sync,
        F: Fn(&U) -> Result<R> + Sync,
    {
        let mut report = BatchReport::new();

        for chunk in units.chunks(self.queue_depth) {
            let results: Vec<std::result::Result<R, DocumentFailure>> = self.pool.install(|| {
                chunk
                    .par_iter()
                    .map(|unit| {
                        panic::catch_unwind(AssertUnwindSafe(|| work(unit)))
                            .unwrap_or_else(|payload| Err(NormalizeError::Panicked(panic_message(payload.as_ref()))))
                            .map_err(|error| DocumentFailure { id: id_of(unit), error })
                    })
                    .collect()
            });

            for result in results {
                match result {
                    Ok(record) => report.records.push(record),
                    Err(failure) => {
                        tracing::warn!(id = %failure.id, error = %failure.error, "skipping document");
                        report.failures.push(failure);
                    }
                }
            }

            tracing::debug!(round = chunk.len(), done = report.total(), of = units.len(), "round complete");
        }

        tracing::info!(
            records = report.records.len(),
            failures = report.failures.len(),
            workers = self.workers,
            "batch complete"
        );

        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("queue_depth", &self.queue_depth)
            .finish()
    }
}

/// Normalize plaintext documents into batch-file records.
pub fn run_batch<S: DocumentSource>(
    pool: &WorkerPool, normalizer: &Normalizer, sources: &[S],
) -> BatchReport<DocumentRecord> {
    pool.run(sources, |source| source.id(), |source| Ok(normalizer.assemble(&source.load()?)))
}

/// Normalize crawler feed lines into crawl records.
pub fn run_pages(pool: &WorkerPool, normalizer: &Normalizer, lines: &[FeedLine]) -> BatchReport<PageRecord> {
    pool.run(lines, FeedLine::id, |line| normalizer.assemble_page(&line.parse()?))
}

/// Write records as JSON lines and flush. Returns the number of lines written.
pub fn write_records<W: Write, R: JsonLine>(mut writer: W, records: &[R]) -> Result<usize> {
    for record in records {
        writeln!(writer, "{}", record.to_json_line()?)?;
    }
    writer.flush()?;
    Ok(records.len())
}
