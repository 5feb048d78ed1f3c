//! Domain methods for the contract-store API.
//!
//! Response types live in `contrack_core::models`; this module only knows the
//! paths and how to shape requests. The [`ContractService`] impl at the bottom
//! is what the workflow crate orchestrates against.

use async_trait::async_trait;

use contrack_core::models::{
    ContractInput, ContractListResponse, ContractResponse, HealthStatus, ReportResponse,
    UploadResponse,
};
use contrack_core::{ContractService, ServiceError};

use crate::{api_prefix, ApiClient};

impl ApiClient {
    fn user_query(&self) -> (&'static str, String) {
        ("user_email", self.session().email().to_string())
    }

    /// List the user's contracts.
    pub async fn list_contracts(&self, limit: u32) -> Result<ContractListResponse, ServiceError> {
        self.get(
            &format!("{}/contracts", api_prefix()),
            &[self.user_query(), ("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch one contract by id.
    pub async fn get_contract(&self, contract_id: &str) -> Result<ContractResponse, ServiceError> {
        self.get(
            &format!(
                "{}/contracts/{}",
                api_prefix(),
                urlencoding::encode(contract_id)
            ),
            &[self.user_query()],
        )
        .await
    }

    /// Create a contract. The owner email rides in the body alongside the
    /// contract fields.
    pub async fn create_contract(
        &self,
        input: &ContractInput,
    ) -> Result<ContractResponse, ServiceError> {
        let mut body = serde_json::to_value(input)
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        body["user_email"] = serde_json::Value::String(self.session().email().to_string());
        self.post_json(&format!("{}/contracts", api_prefix()), &body)
            .await
    }

    /// Partial update of a contract.
    pub async fn update_contract(
        &self,
        contract_id: &str,
        input: &ContractInput,
    ) -> Result<ContractResponse, ServiceError> {
        self.put_json(
            &format!(
                "{}/contracts/{}",
                api_prefix(),
                urlencoding::encode(contract_id)
            ),
            &[self.user_query()],
            input,
        )
        .await
    }

    /// Delete a contract.
    pub async fn delete_contract(
        &self,
        contract_id: &str,
    ) -> Result<ContractResponse, ServiceError> {
        self.delete(
            &format!(
                "{}/contracts/{}",
                api_prefix(),
                urlencoding::encode(contract_id)
            ),
            &[self.user_query()],
        )
        .await
    }

    /// Contract service health probe.
    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        self.get(&format!("{}/contracts/health/status", api_prefix()), &[])
            .await
    }

    /// Upload a document for extraction. One round trip: the store runs
    /// extraction and persists the resulting contract before responding.
    pub async fn upload_contract_document(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadResponse, ServiceError> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("user_email", self.session().email().to_string());

        self.post_multipart(&format!("{}/contracts/upload", api_prefix()), form)
            .await
    }

    /// Generate the analysis report for one contract. AI-backed and slow;
    /// uses the dedicated report deadline instead of the client default.
    pub async fn generate_contract_report(
        &self,
        contract_id: &str,
    ) -> Result<ReportResponse, ServiceError> {
        self.get_with_timeout(
            &format!(
                "{}/contracts/report/{}",
                api_prefix(),
                urlencoding::encode(contract_id)
            ),
            &[self.user_query()],
            self.report_timeout,
        )
        .await
    }
}

#[async_trait]
impl ContractService for ApiClient {
    async fn upload_document(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadResponse, ServiceError> {
        self.upload_contract_document(file_name, content_type, data)
            .await
    }

    async fn generate_report(&self, contract_id: &str) -> Result<ReportResponse, ServiceError> {
        self.generate_contract_report(contract_id).await
    }
}
