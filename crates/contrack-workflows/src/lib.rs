//! Workflow orchestration for Contrack.
//!
//! The two asynchronous flows with real sequencing concerns live here: the
//! multi-file upload batch (validate locally, transfer sequentially, isolate
//! per-file failures) and the report workflow (one live report, stale
//! responses discarded). Both run against the [`ContractService`] seam so
//! tests drive them with an in-memory store.
//!
//! [`ContractService`]: contrack_core::ContractService

pub mod report;
pub mod upload;
pub mod validator;

pub use report::{ReportDesk, ReportOutcome};
pub use upload::{
    BatchOutcome, CandidateFile, NoOpObserver, UploadObserver, UploadOrchestrator, UploadProgress,
    UploadResult, UploadStage,
};
pub use validator::{content_type_for_extension, DocumentValidator, ValidationError};
