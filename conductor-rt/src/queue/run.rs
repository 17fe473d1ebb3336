//! Bounded job execution preserving input order.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};

// Layer 3: Internal module imports
use super::error::QueueError;

/// A unit of work for the queue.
pub type Job<T> = BoxFuture<'static, T>;

/// Execution options for one batch.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Maximum jobs in flight at once; `None` runs the whole batch
    pub concurrency: Option<usize>,

    /// Per-task timeout; `None` or zero disables it
    pub task_timeout: Option<Duration>,

    /// Shared deadline for the whole batch; `None` or zero disables it
    pub deadline: Option<Duration>,
}

/// Run a batch of jobs with bounded concurrency.
///
/// Results come back in input order regardless of completion order. The
/// first timeout aborts scheduling and cancels in-flight jobs by dropping
/// their futures. Callers that need run-to-completion semantics wrap each
/// job so it cannot fail — the orchestrator does exactly that, capturing
/// per-component outcomes inside the job's return value.
pub async fn run<T: Send + 'static>(
    jobs: Vec<Job<T>>,
    options: &RunOptions,
) -> Result<Vec<T>, QueueError> {
    let total = jobs.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let concurrency = options
        .concurrency
        .filter(|limit| *limit > 0)
        .unwrap_or(total)
        .min(total);
    let task_timeout = options.task_timeout.filter(|t| !t.is_zero());

    let gather = async move {
        let mut slots: Vec<Option<T>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        let mut in_flight = stream::iter(jobs.into_iter().enumerate().map(
            move |(index, job)| async move {
                match task_timeout {
                    Some(limit) => tokio::time::timeout(limit, job)
                        .await
                        .map(|value| (index, value))
                        .map_err(|_| QueueError::TaskTimeout {
                            index,
                            timeout: limit,
                        }),
                    None => Ok((index, job.await)),
                }
            },
        ))
        .buffer_unordered(concurrency);

        while let Some(outcome) = in_flight.next().await {
            let (index, value) = outcome?;
            slots[index] = Some(value);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| QueueError::Internal(format!("result slot {index} not filled")))
            })
            .collect()
    };

    match options.deadline.filter(|d| !d.is_zero()) {
        Some(deadline) => tokio::time::timeout(deadline, gather)
            .await
            .map_err(|_| QueueError::DeadlineExceeded { deadline })?,
        None => gather.await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn sleepy_job(index: usize, millis: u64) -> Job<usize> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            index
        })
    }

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        // Later jobs finish first; results still come back by input index.
        let jobs = vec![sleepy_job(0, 30), sleepy_job(1, 20), sleepy_job(2, 1)];

        let results = run(jobs, &RunOptions::default()).await.ok();
        assert_eq!(results, Some(vec![0, 1, 2]));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = run(Vec::<Job<u8>>::new(), &RunOptions::default()).await.ok();
        assert_eq!(results, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_concurrency_limit_is_respected() {
        let live = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let jobs: Vec<Job<()>> = (0..8)
            .map(|_| {
                let live = Arc::clone(&live);
                let peak = Arc::clone(&peak);
                let job: Job<()> = Box::pin(async move {
                    let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    live.fetch_sub(1, Ordering::SeqCst);
                });
                job
            })
            .collect();

        let options = RunOptions {
            concurrency: Some(2),
            ..RunOptions::default()
        };
        assert!(run(jobs, &options).await.is_ok());
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_task_timeout_surfaces_first_failure() {
        let jobs = vec![sleepy_job(0, 1), sleepy_job(1, 200)];

        let options = RunOptions {
            task_timeout: Some(Duration::from_millis(20)),
            ..RunOptions::default()
        };
        let err = run(jobs, &options).await.err();

        assert!(matches!(err, Some(QueueError::TaskTimeout { index: 1, .. })));
    }

    #[tokio::test]
    async fn test_shared_deadline() {
        let jobs = vec![sleepy_job(0, 200), sleepy_job(1, 200)];

        let options = RunOptions {
            deadline: Some(Duration::from_millis(30)),
            ..RunOptions::default()
        };
        let err = run(jobs, &options).await.err();

        assert!(matches!(err, Some(QueueError::DeadlineExceeded { .. })));
    }

    #[tokio::test]
    async fn test_zero_timeout_disables_bound() {
        let jobs = vec![sleepy_job(0, 5)];

        let options = RunOptions {
            task_timeout: Some(Duration::ZERO),
            deadline: Some(Duration::ZERO),
            ..RunOptions::default()
        };
        let results = run(jobs, &options).await.ok();
        assert_eq!(results, Some(vec![0]));
    }
}
