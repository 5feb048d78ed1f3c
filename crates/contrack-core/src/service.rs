//! The seam between workflow orchestration and the HTTP client.
//!
//! Orchestrators hold an `Arc<dyn ContractService>` so they can be exercised
//! against an in-memory implementation; `contrack-api-client` provides the
//! real one. The owning user's email travels with the implementation, not the
//! call sites.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{ReportResponse, UploadResponse};

/// Remote operations the workflows depend on.
#[async_trait]
pub trait ContractService: Send + Sync {
    /// Ship a document to the store for extraction and persistence.
    async fn upload_document(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadResponse, ServiceError>;

    /// Ask the store to generate an analysis report for a contract.
    async fn generate_report(&self, contract_id: &str) -> Result<ReportResponse, ServiceError>;
}
