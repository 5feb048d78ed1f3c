use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A business contract as the store returns it.
///
/// Dates are kept as the store's `YYYY/MM/DD` strings; classification parses
/// them on demand. `id` is opaque: store-assigned for extracted contracts,
/// `contract_<millis>` for manual entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_notice_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields a caller may set when creating or partially updating a contract.
/// Absent fields are left untouched by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_notice_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_link: Option<String>,
}

/// List response: `GET /contracts?user_email=&limit=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractListResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub data: Vec<Contract>,
}

/// Single-contract response, shared by get/create/update/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Contract>,
}

/// `GET /contracts/health/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Id for a manually entered contract. The store assigns ids for extracted
/// contracts; manual entries generate their own from the creation instant.
pub fn manual_entry_id(now: DateTime<Utc>) -> String {
    format!("contract_{}", now.timestamp_millis())
}
