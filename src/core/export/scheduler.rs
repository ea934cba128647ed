//! Bounded task scheduling
//!
//! Runs one task per item under a concurrency ceiling. Tasks are spawned on
//! the runtime and detached: when a task fails, the scheduler returns that
//! error right away and tasks already running are left to finish on their own.
//! A task that panics is reported as a [`CardexError::Export`] failure.

use super::progress::ProgressTracker;
use crate::domain::{CardexError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

/// How new tasks are admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Start the next task as soon as any running task finishes
    Continuous {
        /// Maximum tasks in flight
        limit: usize,
    },
    /// Start `size` tasks, wait for all of them, then start the next chunk
    Chunked {
        /// Tasks per chunk
        size: usize,
    },
}

impl Admission {
    /// Upper bound on tasks in flight
    pub fn max_in_flight(&self) -> usize {
        match self {
            Admission::Continuous { limit } => (*limit).max(1),
            Admission::Chunked { size } => (*size).max(1),
        }
    }
}

/// Runs tasks under an [`Admission`] policy
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    admission: Admission,
}

impl Scheduler {
    /// Creates a scheduler
    pub fn new(admission: Admission) -> Self {
        Self { admission }
    }

    /// Admission policy in use
    pub fn admission(&self) -> Admission {
        self.admission
    }

    /// Runs `task` once per item and returns the number of completed tasks
    ///
    /// Each successful task is counted on `progress`.
    ///
    /// # Errors
    ///
    /// Returns the first task error observed; no further tasks are admitted.
    pub async fn run_all<T, F, Fut>(
        &self,
        items: Vec<T>,
        progress: Arc<ProgressTracker>,
        task: F,
    ) -> Result<usize>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let task = Arc::new(task);
        let total = items.len();

        tracing::debug!(total, admission = ?self.admission, "Scheduling tasks");

        let result = match self.admission {
            Admission::Continuous { limit } => {
                run_continuous(items, limit.max(1), &task, &progress).await
            }
            Admission::Chunked { size } => run_chunked(items, size.max(1), &task, &progress).await,
        };

        let completed = result.inspect_err(|e| {
            progress.halt();
            tracing::debug!(error = %e, "Task failed, no further tasks admitted");
        })?;

        tracing::debug!(completed, total, "All tasks completed");
        Ok(completed)
    }
}

async fn run_continuous<T, F, Fut>(
    items: Vec<T>,
    limit: usize,
    task: &Arc<F>,
    progress: &Arc<ProgressTracker>,
) -> Result<usize>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit));
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<()>>();
    let mut completed = 0;
    let mut pending = items.into_iter();
    let mut next = pending.next();

    while let Some(item) = next.take() {
        tokio::select! {
            biased;
            Some(result) = rx.recv() => {
                result?;
                completed += 1;
                next = Some(item);
            }
            permit = semaphore.clone().acquire_owned() => {
                let permit = permit
                    .map_err(|e| CardexError::Export(format!("Scheduler closed: {e}")))?;
                spawn_task(task, item, Some(permit), tx.clone(), progress.clone());
                next = pending.next();
            }
        }
    }

    drop(tx);
    while let Some(result) = rx.recv().await {
        result?;
        completed += 1;
    }
    Ok(completed)
}

async fn run_chunked<T, F, Fut>(
    items: Vec<T>,
    size: usize,
    task: &Arc<F>,
    progress: &Arc<ProgressTracker>,
) -> Result<usize>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<()>>();
    let mut completed = 0;
    let mut pending = items.into_iter().peekable();

    while pending.peek().is_some() {
        let mut in_chunk = 0;
        for item in pending.by_ref().take(size) {
            spawn_task(task, item, None, tx.clone(), progress.clone());
            in_chunk += 1;
        }

        for _ in 0..in_chunk {
            match rx.recv().await {
                Some(result) => {
                    result?;
                    completed += 1;
                }
                None => {
                    return Err(CardexError::Export(
                        "Task channel closed before the chunk finished".to_string(),
                    ))
                }
            }
        }
    }

    Ok(completed)
}

fn spawn_task<T, F, Fut>(
    task: &Arc<F>,
    item: T,
    permit: Option<OwnedSemaphorePermit>,
    tx: mpsc::UnboundedSender<Result<()>>,
    progress: Arc<ProgressTracker>,
) where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let task = task.clone();
    tokio::spawn(async move {
        let result = tokio::spawn(async move { (task.as_ref())(item).await })
            .await
            .unwrap_or_else(|e| Err(CardexError::Export(format!("Task did not complete: {e}"))));
        if result.is_ok() {
            progress.complete_one();
        }
        drop(permit);
        // The receiver is gone once the scheduler has returned an error
        let _ = tx.send(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Gauge {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            })
        }

        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_continuous_respects_limit() {
        let gauge = Gauge::new();
        let g = gauge.clone();
        let progress = Arc::new(ProgressTracker::silent(7));

        let completed = Scheduler::new(Admission::Continuous { limit: 3 })
            .run_all((0..7).collect(), progress.clone(), move |i: u64| {
                let g = g.clone();
                async move {
                    g.enter();
                    tokio::time::sleep(Duration::from_millis(5 + i % 3 * 5)).await;
                    g.leave();
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(completed, 7);
        assert_eq!(progress.completed(), 7);
        assert!(gauge.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_chunked_waits_for_whole_chunk() {
        let gauge = Gauge::new();
        let g = gauge.clone();
        let progress = Arc::new(ProgressTracker::silent(5));

        let completed = Scheduler::new(Admission::Chunked { size: 2 })
            .run_all((0..5).collect(), progress, move |_: u32| {
                let g = g.clone();
                async move {
                    g.enter();
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    g.leave();
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(completed, 5);
        assert!(gauge.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_first_error_stops_admission() {
        let started = Arc::new(AtomicUsize::new(0));
        let s = started.clone();

        let result = Scheduler::new(Admission::Continuous { limit: 1 })
            .run_all(
                (0..10).collect(),
                Arc::new(ProgressTracker::silent(10)),
                move |i: usize| {
                    let s = s.clone();
                    async move {
                        s.fetch_add(1, Ordering::SeqCst);
                        if i == 2 {
                            return Err(CardexError::Render(format!("card {i}")));
                        }
                        Ok(())
                    }
                },
            )
            .await;

        assert!(matches!(result, Err(CardexError::Render(_))));
        // With one slot, at most one extra task can start before the error is seen
        assert!(started.load(Ordering::SeqCst) <= 4);
    }

    async fn run_with_panic(admission: Admission) -> Result<usize> {
        let scheduler = Scheduler::new(admission);
        let run = scheduler.run_all(
            (0..5).collect(),
            Arc::new(ProgressTracker::silent(5)),
            |i: usize| async move {
                if i == 1 {
                    panic!("renderer crashed on card {i}");
                }
                Ok(())
            },
        );
        tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .expect("scheduler must not hang on a panicking task")
    }

    #[tokio::test]
    async fn test_panicking_task_fails_chunked_run() {
        let result = run_with_panic(Admission::Chunked { size: 3 }).await;
        assert!(matches!(result, Err(CardexError::Export(_))));
    }

    #[tokio::test]
    async fn test_panicking_task_fails_continuous_run() {
        let result = run_with_panic(Admission::Continuous { limit: 3 }).await;
        assert!(matches!(result, Err(CardexError::Export(_))));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let completed = Scheduler::new(Admission::Chunked { size: 3 })
            .run_all(
                Vec::<u8>::new(),
                Arc::new(ProgressTracker::silent(0)),
                |_| async { Ok(()) },
            )
            .await
            .unwrap();
        assert_eq!(completed, 0);
    }

    #[test]
    fn test_max_in_flight() {
        assert_eq!(Admission::Continuous { limit: 0 }.max_in_flight(), 1);
        assert_eq!(Admission::Chunked { size: 4 }.max_in_flight(), 4);
    }
}
