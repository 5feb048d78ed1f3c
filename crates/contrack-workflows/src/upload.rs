//! Sequential multi-file upload orchestration.
//!
//! Each file goes through validate → transfer → remote extraction as one
//! unit; a failure is recorded in that file's result and the batch moves on.
//! Files are uploaded strictly one at a time so the extraction backend is
//! never handed a burst. Cancellation is honored between files: the file in
//! flight finishes, later files never start.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use contrack_core::models::UploadResponse;
use contrack_core::ContractService;

use crate::validator::DocumentValidator;

/// A file the user picked for upload.
#[derive(Clone, Debug)]
pub struct CandidateFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Per-file progress states. Transitions happen at real execution points,
/// never on timers. The remote gives no checkpoint between body transfer and
/// extraction, so `AwaitingRemote` is entered as soon as the request is
/// dispatched and covers the whole round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadStage {
    Validating,
    Transferring,
    AwaitingRemote,
    Done,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UploadStage::Validating => "validating",
            UploadStage::Transferring => "transferring",
            UploadStage::AwaitingRemote => "awaiting remote",
            UploadStage::Done => "done",
            UploadStage::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Snapshot handed to the observer on every stage change.
#[derive(Clone, Debug)]
pub struct UploadProgress {
    pub file_index: usize,
    pub total_files: usize,
    pub file_name: String,
    pub stage: UploadStage,
}

/// Callbacks a progress surface implements. All methods default to no-ops so
/// surfaces only override what they render.
pub trait UploadObserver: Send + Sync {
    fn on_stage(&self, _progress: &UploadProgress) {}

    /// Called exactly once per batch, after the last file, when at least one
    /// upload succeeded: the contract collection has new rows to fetch.
    fn on_refresh_needed(&self) {}
}

/// Observer for callers that don't render progress.
pub struct NoOpObserver;

impl UploadObserver for NoOpObserver {}

/// Outcome of one file's round trip. Lives for the duration of the upload
/// surface; discarded when it closes.
#[derive(Clone, Debug)]
pub struct UploadResult {
    pub file_name: String,
    pub success: bool,
    pub response: Option<UploadResponse>,
    pub error: Option<String>,
}

impl UploadResult {
    fn succeeded(file_name: String, response: UploadResponse) -> Self {
        Self {
            file_name,
            success: true,
            response: Some(response),
            error: None,
        }
    }

    fn failed(file_name: String, error: String) -> Self {
        Self {
            file_name,
            success: false,
            response: None,
            error: Some(error),
        }
    }
}

/// Everything a surface needs to decide whether to auto-dismiss (all
/// succeeded) or keep failures visible.
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<UploadResult>,
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        !self.cancelled && self.failed() == 0 && !self.results.is_empty()
    }
}

/// Drives a batch of candidate files through the store, one at a time.
pub struct UploadOrchestrator {
    service: Arc<dyn ContractService>,
    validator: DocumentValidator,
    observer: Arc<dyn UploadObserver>,
}

impl UploadOrchestrator {
    pub fn new(service: Arc<dyn ContractService>) -> Self {
        Self {
            service,
            validator: DocumentValidator::default(),
            observer: Arc::new(NoOpObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn UploadObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_validator(mut self, validator: DocumentValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Upload a batch. Returns one result per attempted file, in input
    /// order; files cancelled before starting get no entry.
    pub async fn upload_batch(
        &self,
        files: Vec<CandidateFile>,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        let total = files.len();
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, file) in files.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(
                    attempted = results.len(),
                    total,
                    "upload batch cancelled, skipping remaining files"
                );
                cancelled = true;
                break;
            }
            results.push(self.upload_one(index, total, file).await);
        }

        let outcome = BatchOutcome { results, cancelled };
        tracing::info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            cancelled = outcome.cancelled,
            "upload batch finished"
        );
        if outcome.succeeded() > 0 {
            self.observer.on_refresh_needed();
        }
        outcome
    }

    async fn upload_one(&self, index: usize, total: usize, file: CandidateFile) -> UploadResult {
        let CandidateFile {
            file_name,
            content_type,
            data,
        } = file;

        self.emit(index, total, &file_name, UploadStage::Validating);
        if let Err(err) = self.validator.validate(&content_type, data.len()) {
            tracing::warn!(file = %file_name, error = %err, "rejected before upload");
            self.emit(index, total, &file_name, UploadStage::Failed);
            return UploadResult::failed(file_name, err.to_string());
        }

        self.emit(index, total, &file_name, UploadStage::Transferring);
        let request = self
            .service
            .upload_document(&file_name, &content_type, data);
        self.emit(index, total, &file_name, UploadStage::AwaitingRemote);

        match request.await {
            Ok(response) => {
                self.emit(index, total, &file_name, UploadStage::Done);
                UploadResult::succeeded(file_name, response)
            }
            Err(err) => {
                tracing::warn!(file = %file_name, error = %err, "upload failed");
                self.emit(index, total, &file_name, UploadStage::Failed);
                let message = err.user_message("Upload");
                UploadResult::failed(file_name, message)
            }
        }
    }

    fn emit(&self, file_index: usize, total_files: usize, file_name: &str, stage: UploadStage) {
        tracing::debug!(file = %file_name, %stage, file_index, total_files, "upload stage");
        self.observer.on_stage(&UploadProgress {
            file_index,
            total_files,
            file_name: file_name.to_string(),
            stage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use contrack_core::models::ReportResponse;
    use contrack_core::ServiceError;

    /// In-memory store: records uploaded file names, fails by file name.
    #[derive(Default)]
    struct MockService {
        uploads: Mutex<Vec<String>>,
        fail_with_detail: Option<(String, String)>,
    }

    #[async_trait]
    impl ContractService for MockService {
        async fn upload_document(
            &self,
            file_name: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> Result<UploadResponse, ServiceError> {
            self.uploads.lock().unwrap().push(file_name.to_string());
            if let Some((failing, detail)) = &self.fail_with_detail {
                if failing == file_name {
                    return Err(ServiceError::Remote {
                        status: 422,
                        detail: Some(detail.clone()),
                    });
                }
            }
            Ok(UploadResponse {
                message: Some("Contract created".to_string()),
                ..Default::default()
            })
        }

        async fn generate_report(
            &self,
            _contract_id: &str,
        ) -> Result<ReportResponse, ServiceError> {
            Ok(ReportResponse {
                success: true,
                expired_status: Some("near_expiry".to_string()),
                report: Some("## Report".to_string()),
            })
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        refreshes: AtomicUsize,
        stages: Mutex<Vec<(String, UploadStage)>>,
    }

    impl UploadObserver for CountingObserver {
        fn on_stage(&self, progress: &UploadProgress) {
            self.stages
                .lock()
                .unwrap()
                .push((progress.file_name.clone(), progress.stage));
        }

        fn on_refresh_needed(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pdf(name: &str) -> CandidateFile {
        CandidateFile {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0u8; 128],
        }
    }

    fn file_of(name: &str, content_type: &str, size: usize) -> CandidateFile {
        CandidateFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: vec![0u8; size],
        }
    }

    #[tokio::test]
    async fn invalid_file_does_not_abort_batch() {
        let service = Arc::new(MockService::default());
        let orchestrator = UploadOrchestrator::new(service.clone());

        let outcome = orchestrator
            .upload_batch(
                vec![
                    pdf("a.pdf"),
                    file_of("b.zip", "application/zip", 128),
                    pdf("c.pdf"),
                ],
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results[0].success);
        assert!(!outcome.results[1].success);
        assert!(outcome.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("unsupported file type"));
        assert!(outcome.results[2].success);
        // The invalid file never hit the network.
        assert_eq!(*service.uploads.lock().unwrap(), vec!["a.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn oversize_pdf_rejected_without_network_call() {
        let service = Arc::new(MockService::default());
        let orchestrator = UploadOrchestrator::new(service.clone());

        let outcome = orchestrator
            .upload_batch(
                vec![file_of("big.pdf", "application/pdf", 11 * 1024 * 1024)],
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.results.len(), 1);
        assert!(!outcome.results[0].success);
        assert!(outcome.results[0].error.as_deref().unwrap().contains("10MB"));
        assert!(service.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn refresh_notified_exactly_once_for_successful_batch() {
        let service = Arc::new(MockService::default());
        let observer = Arc::new(CountingObserver::default());
        let orchestrator =
            UploadOrchestrator::new(service).with_observer(observer.clone());

        let outcome = orchestrator
            .upload_batch(
                vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")],
                &CancellationToken::new(),
            )
            .await;

        assert!(outcome.all_succeeded());
        assert_eq!(observer.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_refresh_when_nothing_succeeded() {
        let service = Arc::new(MockService::default());
        let observer = Arc::new(CountingObserver::default());
        let orchestrator =
            UploadOrchestrator::new(service).with_observer(observer.clone());

        let outcome = orchestrator
            .upload_batch(
                vec![file_of("b.zip", "application/zip", 128)],
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.succeeded(), 0);
        assert_eq!(observer.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn remote_failure_surfaces_detail_and_batch_continues() {
        let service = Arc::new(MockService {
            fail_with_detail: Some((
                "bad.pdf".to_string(),
                "File is not a contract".to_string(),
            )),
            ..Default::default()
        });
        let observer = Arc::new(CountingObserver::default());
        let orchestrator =
            UploadOrchestrator::new(service.clone()).with_observer(observer.clone());

        let outcome = orchestrator
            .upload_batch(vec![pdf("bad.pdf"), pdf("ok.pdf")], &CancellationToken::new())
            .await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(
            outcome.results[0].error.as_deref(),
            Some("File is not a contract")
        );
        assert!(outcome.results[1].success);
        // One success still means the collection changed.
        assert_eq!(observer.refreshes.load(Ordering::SeqCst), 1);
        assert!(!outcome.all_succeeded());
    }

    #[tokio::test]
    async fn stages_progress_through_the_machine() {
        let service = Arc::new(MockService::default());
        let observer = Arc::new(CountingObserver::default());
        let orchestrator =
            UploadOrchestrator::new(service).with_observer(observer.clone());

        orchestrator
            .upload_batch(vec![pdf("a.pdf")], &CancellationToken::new())
            .await;

        let stages: Vec<UploadStage> = observer
            .stages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, stage)| *stage)
            .collect();
        assert_eq!(
            stages,
            vec![
                UploadStage::Validating,
                UploadStage::Transferring,
                UploadStage::AwaitingRemote,
                UploadStage::Done,
            ]
        );
    }

    /// Observer that cancels the batch as soon as the first file completes.
    struct CancelAfterFirst {
        token: CancellationToken,
    }

    impl UploadObserver for CancelAfterFirst {
        fn on_stage(&self, progress: &UploadProgress) {
            if progress.stage == UploadStage::Done {
                self.token.cancel();
            }
        }
    }

    #[tokio::test]
    async fn cancellation_stops_future_files() {
        let service = Arc::new(MockService::default());
        let token = CancellationToken::new();
        let orchestrator = UploadOrchestrator::new(service.clone()).with_observer(Arc::new(
            CancelAfterFirst {
                token: token.clone(),
            },
        ));

        let outcome = orchestrator
            .upload_batch(vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")], &token)
            .await;

        assert!(outcome.cancelled);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(*service.uploads.lock().unwrap(), vec!["a.pdf"]);
    }
}
