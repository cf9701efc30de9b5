//! Worker-pool matrix multiplication.

use std::num::NonZeroUsize;
use std::ops::Mul;
use std::sync::Arc;
use std::thread;

use tokio::runtime::Handle;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, trace};

use crate::element::Element;
use crate::error::{Error, Shape};
use crate::matrix::{Matrix, dot, ensure_multipliable};

/// Capacity of the job and result queues.
pub const BATCH_SIZE: usize = 50;

/// One cell of the output matrix.
#[derive(Debug, Clone, Copy)]
struct Job {
    row: usize,
    column: usize,
}

#[derive(Debug)]
struct JobResult<T> {
    row: usize,
    column: usize,
    value: T,
}

/// Concurrent multiplication engine.
///
/// Each call partitions the output into one job per cell and fans the jobs
/// out to a fixed number of worker tasks over a bounded queue. Workers send
/// `(row, column, value)` records back over a second bounded queue, and the
/// calling task places each value by its indices, so arrival order does not
/// matter. The workers and both queues live only for the duration of a call.
///
/// # Example
///
/// ```
/// use dense_matrix::{Matrix, Multiplier};
///
/// #[tokio::main]
/// async fn main() -> Result<(), dense_matrix::Error> {
///     let a = Matrix::from_rows(2, 2, vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
///     let b = Matrix::from_rows(2, 2, vec![vec![5.0, 6.0], vec![7.0, 8.0]])?;
///
///     let c = Multiplier::new().with_workers(2).multiply(&a, &b).await?;
///     assert_eq!(c.into_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Multiplier {
    workers: usize,
    batch_size: usize,
}

impl Multiplier {
    /// Creates an engine with one worker per available hardware thread.
    pub fn new() -> Self {
        Self {
            workers: available_workers(),
            batch_size: BATCH_SIZE,
        }
    }

    /// Sets the number of worker tasks. Zero is raised to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the capacity of the job and result queues. Zero is raised to one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Computes `lhs` x `rhs` on the current tokio runtime.
    ///
    /// Workers are spawned as `'static` tasks, so both operands are copied
    /// into shared buffers first. Callers that already hold them in an
    /// [`Arc`] can skip the copy with [`Multiplier::multiply_shared`].
    ///
    /// Workers run in parallel only on a multi-threaded runtime.
    pub async fn multiply<T>(&self, lhs: &Matrix<T>, rhs: &Matrix<T>) -> Result<Matrix<T>, Error>
    where
        T: Element + Mul<Output = T>,
    {
        ensure_multipliable(lhs, rhs)?;
        self.multiply_shared(Arc::new(lhs.clone()), Arc::new(rhs.clone()))
            .await
    }

    /// Computes `lhs` x `rhs` on the current tokio runtime, sharing the
    /// operands with the workers without copying them.
    pub async fn multiply_shared<T>(
        &self,
        lhs: Arc<Matrix<T>>,
        rhs: Arc<Matrix<T>>,
    ) -> Result<Matrix<T>, Error>
    where
        T: Element + Mul<Output = T>,
    {
        ensure_multipliable(&*lhs, &*rhs)?;

        let shape = Shape::new(rhs.width(), lhs.height());
        let expected = shape.len();
        debug!(
            lhs = %lhs.shape(),
            rhs = %rhs.shape(),
            workers = self.workers,
            jobs = expected,
            "starting multiplication"
        );

        let (job_tx, job_rx) = mpsc::channel::<Job>(self.batch_size);
        let (result_tx, mut result_rx) = mpsc::channel::<JobResult<T>>(self.batch_size);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut workers = JoinSet::new();
        for id in 0..self.workers {
            let worker = Worker {
                id,
                jobs: Arc::clone(&job_rx),
                results: result_tx.clone(),
                lhs: Arc::clone(&lhs),
                rhs: Arc::clone(&rhs),
            };
            workers.spawn(worker.run());
        }
        drop(result_tx);

        // Submission runs beside collection: both queues are bounded, so
        // enqueuing every job before draining would stall on large outputs.
        let producer = tokio::spawn(async move {
            for row in 0..shape.height {
                for column in 0..shape.width {
                    if job_tx.send(Job { row, column }).await.is_err() {
                        return;
                    }
                }
            }
        });

        // The result queue closes early only when a worker dies, which the
        // joins below report.
        let mut elements = vec![vec![T::zero(); shape.width]; shape.height];
        let mut received = 0;
        while received < expected {
            let Some(result) = result_rx.recv().await else {
                break;
            };
            elements[result.row][result.column] = result.value;
            received += 1;
        }

        producer.await?;
        while let Some(joined) = workers.join_next().await {
            joined?;
        }

        debug!(shape = %shape, "multiplication complete");
        Ok(Matrix::from_parts(shape, elements))
    }

    /// Computes `lhs` x `rhs` on a dedicated multi-threaded runtime with one
    /// thread per worker, shut down before returning.
    ///
    /// When called from inside another tokio runtime, the dedicated runtime
    /// is driven from a separate OS thread and the calling thread blocks
    /// until it finishes.
    pub fn multiply_blocking<T>(&self, lhs: &Matrix<T>, rhs: &Matrix<T>) -> Result<Matrix<T>, Error>
    where
        T: Element + Mul<Output = T>,
    {
        ensure_multipliable(lhs, rhs)?;

        if Handle::try_current().is_err() {
            return self.run_dedicated(lhs, rhs);
        }
        thread::scope(|scope| {
            scope
                .spawn(|| self.run_dedicated(lhs, rhs))
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        })
    }

    fn run_dedicated<T>(&self, lhs: &Matrix<T>, rhs: &Matrix<T>) -> Result<Matrix<T>, Error>
    where
        T: Element + Mul<Output = T>,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers)
            .thread_name("matrix-worker")
            .build()?;
        runtime.block_on(self.multiply(lhs, rhs))
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::new()
    }
}

struct Worker<T> {
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    results: mpsc::Sender<JobResult<T>>,
    lhs: Arc<Matrix<T>>,
    rhs: Arc<Matrix<T>>,
}

impl<T> Worker<T>
where
    T: Element + Mul<Output = T>,
{
    /// Pulls jobs until the job queue is closed and empty.
    async fn run(self) {
        let mut computed = 0usize;
        loop {
            // Idle workers queue on the lock; only its holder waits on the queue.
            let job = self.jobs.lock().await.recv().await;
            let Some(Job { row, column }) = job else {
                break;
            };

            let value = dot(&*self.lhs, &*self.rhs, row, column);
            if self.results.send(JobResult { row, column, value }).await.is_err() {
                break;
            }
            computed += 1;
        }
        trace!(worker = self.id, computed, "worker finished");
    }
}

/// Number of hardware threads, at least one.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
