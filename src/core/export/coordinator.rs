//! Export coordinator - main orchestrator for the export process
//!
//! The coordinator picks a persistence backend for each job, drives the
//! scheduler over the document's cards, interprets how the run ended and
//! publishes an [`ExportStatus`] on a watch channel.
//!
//! Folder exports that fail for any reason other than the user dismissing the
//! directory request are restarted from scratch on the archive backend.

use crate::adapters::factory::Collaborators;
use crate::config::ExportConfig;
use crate::core::estimate::{preview_size, SizeEstimate, SizeEstimator};
use crate::core::export::backend::{ArchiveBackend, FolderBackend, PersistenceBackend};
use crate::core::export::progress::ProgressTracker;
use crate::core::export::scheduler::{Admission, Scheduler};
use crate::core::export::summary::{ExportError, ExportSummary};
use crate::core::inline::render_card;
use crate::core::naming::FileNamer;
use crate::adapters::renderer::RenderOptions;
use crate::domain::{
    BackendKind, CardDescriptor, CardexError, ExportJob, ExportMode, ExportOutcome, ExportTarget,
    ImageFormat, RenderedFile, Result,
};
use crate::{log_export_complete, log_export_start, log_fallback};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Tunables of the export pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    /// Tasks in flight on the folder path
    pub concurrency_limit: usize,

    /// Tasks per chunk on the archive path
    pub chunk_size: usize,

    /// Delay between two single-mode saves
    pub pacing_delay: Duration,

    /// How long the success indicator stays up
    pub success_display: Duration,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            concurrency_limit: 3,
            chunk_size: 3,
            pacing_delay: Duration::from_millis(200),
            success_display: Duration::from_millis(3000),
        }
    }
}

impl ExportSettings {
    /// Reads the settings from the export configuration
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
            chunk_size: config.chunk_size,
            pacing_delay: Duration::from_millis(config.pacing_delay_ms),
            success_display: Duration::from_millis(config.success_display_ms),
        }
    }
}

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    /// No export running
    #[default]
    Idle,
    /// An export is running on `backend`
    Running {
        /// Backend currently receiving files
        backend: BackendKind,
        /// Whether this is the archive restart after a folder failure
        fallback: bool,
    },
    /// The last export completed
    Completed,
    /// The directory request was dismissed
    CancelledByUser,
    /// The last export failed
    Failed,
}

/// Snapshot published on every state or progress change
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportStatus {
    /// Run the snapshot belongs to
    pub job_id: Option<Uuid>,

    /// Orchestrator state
    pub state: ExportState,

    /// Completion percentage, 0-100
    pub progress: u8,

    /// Whether the success indicator is visible
    pub show_success: bool,
}

/// How a direct-folder attempt ended
#[derive(Debug)]
pub enum FolderAttempt {
    /// Every card was written
    Written(usize),
    /// The directory request was dismissed; nothing was rendered
    Cancelled,
    /// Anything else went wrong; the run falls back to the archive
    Failed(CardexError),
}

/// Handle to a running export
pub struct ExportHandle {
    job_id: Uuid,
    status: watch::Receiver<ExportStatus>,
    task: JoinHandle<ExportSummary>,
}

impl ExportHandle {
    /// Run identifier
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Receiver of status snapshots
    pub fn subscribe(&self) -> watch::Receiver<ExportStatus> {
        self.status.clone()
    }

    /// Waits for the run to end and returns its summary
    ///
    /// # Errors
    ///
    /// Returns [`CardexError::Export`] if the export task panicked.
    pub async fn wait_summary(self) -> Result<ExportSummary> {
        self.task
            .await
            .map_err(|e| CardexError::Export(format!("Export task failed: {e}")))
    }

    /// Waits for the run to end and returns its outcome
    ///
    /// # Errors
    ///
    /// Returns [`CardexError::Export`] if the export task panicked.
    pub async fn wait(self) -> Result<ExportOutcome> {
        Ok(self.wait_summary().await?.outcome)
    }
}

struct Inner {
    collaborators: Collaborators,
    settings: ExportSettings,
    status: Arc<watch::Sender<ExportStatus>>,
    running: AtomicBool,
}

/// Clears the running flag however the export task ends
struct RunningGuard(Arc<Inner>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::SeqCst);
    }
}

/// Export coordinator
#[derive(Clone)]
pub struct ExportCoordinator {
    inner: Arc<Inner>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(collaborators: Collaborators, settings: ExportSettings) -> Self {
        let (status, _rx) = watch::channel(ExportStatus::default());
        Self {
            inner: Arc::new(Inner {
                collaborators,
                settings,
                status: Arc::new(status),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Receiver of status snapshots across runs
    pub fn subscribe(&self) -> watch::Receiver<ExportStatus> {
        self.inner.status.subscribe()
    }

    /// Latest status snapshot
    pub fn status(&self) -> ExportStatus {
        self.inner.status.borrow().clone()
    }

    /// Whether an export is running
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Starts an export in the background
    ///
    /// Progress restarts at 0 and the success indicator is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CardexError::Export`] if an export is already running.
    pub fn start_export(&self, job: ExportJob) -> Result<ExportHandle> {
        if self
            .inner
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!(job_id = %job.id, "Export already running, request rejected");
            return Err(CardexError::Export(
                "An export is already running".to_string(),
            ));
        }

        let initial_backend = match (job.mode, job.target) {
            (ExportMode::Single, _) => BackendKind::Individual,
            (ExportMode::Multiple, ExportTarget::Folder) => BackendKind::DirectFolder,
            (ExportMode::Multiple, ExportTarget::Archive) => BackendKind::Archive,
        };

        self.inner.status.send_replace(ExportStatus {
            job_id: Some(job.id),
            state: ExportState::Running {
                backend: initial_backend,
                fallback: false,
            },
            progress: 0,
            show_success: false,
        });

        let job_id = job.id;
        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let _running = RunningGuard(inner.clone());
            run_job(inner, job).await
        });

        Ok(ExportHandle {
            job_id,
            status: self.subscribe(),
            task,
        })
    }

    /// One-shot size projection for `format` and `scale`
    ///
    /// # Errors
    ///
    /// Returns the store or renderer error.
    pub async fn preview_size(&self, format: ImageFormat, scale: u32) -> Result<Option<SizeEstimate>> {
        let collaborators = &self.inner.collaborators;
        preview_size(
            collaborators.store.as_ref(),
            collaborators.renderer.as_ref(),
            format,
            scale,
        )
        .await
    }

    /// Debounced estimator sharing this coordinator's collaborators
    pub fn size_estimator(&self, debounce: Duration) -> SizeEstimator {
        let collaborators = &self.inner.collaborators;
        SizeEstimator::new(collaborators.store.clone(), collaborators.renderer.clone())
            .with_debounce(debounce)
    }
}

impl Inner {
    fn update(&self, job_id: Uuid, change: impl FnOnce(&mut ExportStatus)) {
        self.status.send_if_modified(|status| {
            if status.job_id != Some(job_id) {
                return false;
            }
            let before = status.clone();
            change(status);
            *status != before
        });
    }

    fn tracker(&self, job_id: Uuid, total: usize) -> Arc<ProgressTracker> {
        progress_tracker(self.status.clone(), job_id, total)
    }
}

/// Tracker publishing into `status` for the attempt that is running now
///
/// The attempt is identified by the job id and the running state at creation
/// time. Both are checked under the channel lock, so completions from a
/// superseded attempt never reach the status after a fallback reset.
fn progress_tracker(
    status: Arc<watch::Sender<ExportStatus>>,
    job_id: Uuid,
    total: usize,
) -> Arc<ProgressTracker> {
    let attempt = status.borrow().state;
    Arc::new(ProgressTracker::new(total, move |pct| {
        status.send_if_modified(|s| {
            // Completions can be reported out of order
            if s.job_id == Some(job_id) && s.state == attempt && pct > s.progress {
                s.progress = pct;
                true
            } else {
                false
            }
        });
    }))
}

async fn run_job(inner: Arc<Inner>, job: ExportJob) -> ExportSummary {
    let start_time = Instant::now();
    let mut summary = ExportSummary::new(job.id);

    let outcome = match inner.collaborators.store.list_cards().await {
        Ok(cards) => {
            summary.total_cards = cards.len();
            execute(&inner, &job, cards, &mut summary).await
        }
        Err(e) => {
            tracing::error!(job_id = %job.id, error = %e, "Failed to list cards");
            summary.add_error(ExportError::from_error(&e));
            ExportOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    finish(&inner, &job, &outcome);

    summary.set_outcome(outcome);
    let summary = summary.with_duration(start_time.elapsed());
    if summary.is_successful() {
        log_export_complete!(summary.files_written, summary.duration);
    }
    summary.log_summary();
    summary
}

async fn execute(
    inner: &Arc<Inner>,
    job: &ExportJob,
    cards: Vec<CardDescriptor>,
    summary: &mut ExportSummary,
) -> ExportOutcome {
    match (job.mode, job.target) {
        (ExportMode::Single, _) => {
            log_export_start!(job, cards.len(), BackendKind::Individual);
            match run_single(inner, job, cards).await {
                Ok(files) => ExportOutcome::Completed {
                    files,
                    backend: BackendKind::Individual,
                    fallback_cause: None,
                },
                Err(e) => failed(summary, e),
            }
        }
        (ExportMode::Multiple, ExportTarget::Archive) => {
            log_export_start!(job, cards.len(), BackendKind::Archive);
            archive_outcome(run_archive(inner, job, cards).await, None, summary)
        }
        (ExportMode::Multiple, ExportTarget::Folder) => {
            log_export_start!(job, cards.len(), BackendKind::DirectFolder);
            match attempt_folder(inner, job, cards.clone()).await {
                FolderAttempt::Written(files) => ExportOutcome::Completed {
                    files,
                    backend: BackendKind::DirectFolder,
                    fallback_cause: None,
                },
                FolderAttempt::Cancelled => {
                    tracing::info!(job_id = %job.id, "Export cancelled by user");
                    ExportOutcome::CancelledByUser
                }
                FolderAttempt::Failed(error) => {
                    log_fallback!(&error);
                    summary.add_error(
                        ExportError::from_error(&error)
                            .with_context(format!("backend={}", BackendKind::DirectFolder)),
                    );

                    inner.update(job.id, |status| {
                        status.state = ExportState::Running {
                            backend: BackendKind::Archive,
                            fallback: true,
                        };
                        status.progress = 0;
                    });

                    let cause = error.to_string();
                    archive_outcome(run_archive(inner, job, cards).await, Some(cause), summary)
                }
            }
        }
    }
}

fn failed(summary: &mut ExportSummary, error: CardexError) -> ExportOutcome {
    tracing::error!(error = %error, "Export failed");
    summary.add_error(ExportError::from_error(&error));
    ExportOutcome::Failed {
        error: error.to_string(),
    }
}

fn archive_outcome(
    result: Result<usize>,
    fallback_cause: Option<String>,
    summary: &mut ExportSummary,
) -> ExportOutcome {
    match result {
        Ok(files) => ExportOutcome::Completed {
            files,
            backend: BackendKind::Archive,
            fallback_cause,
        },
        Err(e) => failed(summary, e),
    }
}

fn finish(inner: &Arc<Inner>, job: &ExportJob, outcome: &ExportOutcome) {
    match outcome {
        ExportOutcome::Completed { .. } => {
            inner.update(job.id, |status| {
                status.state = ExportState::Completed;
                status.progress = 100;
                status.show_success = true;
            });
            settle_to_idle(inner, job.id, ExportState::Completed);
        }
        // No message is shown; the state alone tells subscribers why it stopped
        ExportOutcome::CancelledByUser => {
            inner.update(job.id, |status| {
                status.state = ExportState::CancelledByUser;
                status.progress = 0;
            });
            settle_to_idle(inner, job.id, ExportState::CancelledByUser);
        }
        // Progress stays where it froze
        ExportOutcome::Failed { .. } => {
            inner.update(job.id, |status| status.state = ExportState::Failed);
        }
    }
}

/// Returns `from` to `Idle` once the success display period has passed
fn settle_to_idle(inner: &Arc<Inner>, job_id: Uuid, from: ExportState) {
    let inner = inner.clone();
    let display = inner.settings.success_display;
    tokio::spawn(async move {
        tokio::time::sleep(display).await;
        // A newer run owns the status by now if the id changed
        inner.update(job_id, |status| {
            status.show_success = false;
            if status.state == from {
                status.state = ExportState::Idle;
            }
        });
    });
}

fn render_options(job: &ExportJob) -> RenderOptions {
    RenderOptions::new(job.format, job.scale)
}

async fn render_file(
    inner: &Inner,
    namer: &FileNamer,
    options: &RenderOptions,
    card: &CardDescriptor,
) -> Result<RenderedFile> {
    let collaborators = &inner.collaborators;
    let bytes = render_card(
        &card.handle,
        collaborators.fetcher.as_ref(),
        collaborators.renderer.as_ref(),
        options,
    )
    .await?;
    Ok(RenderedFile::new(namer.name(card.index, card.total), bytes))
}

/// Renders every card and hands each file to `backend`, then finishes it
async fn run_backend(
    inner: &Arc<Inner>,
    job: &ExportJob,
    cards: Vec<CardDescriptor>,
    backend: Arc<dyn PersistenceBackend>,
    admission: Admission,
) -> Result<usize> {
    let namer = Arc::new(FileNamer::new(job.naming.clone(), job.started_at, job.format));
    let options = Arc::new(render_options(job));
    let progress = inner.tracker(job.id, cards.len());
    let task_inner = inner.clone();
    let task_backend = backend.clone();

    tracing::debug!(
        job_id = %job.id,
        backend = %backend.kind(),
        cards = cards.len(),
        "Rendering cards"
    );

    Scheduler::new(admission)
        .run_all(cards, progress, move |card: CardDescriptor| {
            let inner = task_inner.clone();
            let backend = task_backend.clone();
            let namer = namer.clone();
            let options = options.clone();
            async move {
                let file = render_file(&inner, &namer, &options, &card).await?;
                backend.persist(file).await
            }
        })
        .await?;

    backend.finish().await
}

async fn run_archive(inner: &Arc<Inner>, job: &ExportJob, cards: Vec<CardDescriptor>) -> Result<usize> {
    let backend = Arc::new(ArchiveBackend::new(
        job.archive_name(),
        inner.collaborators.downloads.clone(),
    ));
    let admission = Admission::Chunked {
        size: inner.settings.chunk_size,
    };
    run_backend(inner, job, cards, backend, admission).await
}

/// Tries the direct-folder path; the directory is requested before any render
async fn attempt_folder(
    inner: &Arc<Inner>,
    job: &ExportJob,
    cards: Vec<CardDescriptor>,
) -> FolderAttempt {
    let backend =
        match FolderBackend::open(inner.collaborators.directories.as_ref(), &job.folder_name).await
        {
            Ok(backend) => backend,
            Err(e) if e.is_user_cancelled() => return FolderAttempt::Cancelled,
            Err(e) => return FolderAttempt::Failed(e),
        };

    let admission = Admission::Continuous {
        limit: inner.settings.concurrency_limit,
    };
    match run_backend(inner, job, cards, Arc::new(backend), admission).await {
        Ok(written) => FolderAttempt::Written(written),
        Err(e) => FolderAttempt::Failed(e),
    }
}

/// Renders and saves cards one at a time, pausing between saves
async fn run_single(inner: &Arc<Inner>, job: &ExportJob, cards: Vec<CardDescriptor>) -> Result<usize> {
    let namer = FileNamer::new(job.naming.clone(), job.started_at, job.format);
    let options = render_options(job);
    let progress = inner.tracker(job.id, cards.len());
    let last = cards.len().saturating_sub(1);

    for (position, card) in cards.iter().enumerate() {
        let file = render_file(inner, &namer, &options, card).await?;
        let name = file.name.clone();
        inner.collaborators.downloads.save(&file.name, file.bytes).await?;
        progress.complete_one();

        tracing::debug!(job_id = %job.id, name = %name, "Saved card");

        if position < last {
            tokio::time::sleep(inner.settings.pacing_delay).await;
        }
    }

    Ok(cards.len())
}
