use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Why the store generated a report for this contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Expired,
    NearExpiry,
    MissingEndDate,
}

impl FromStr for ReportStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expired" => Ok(ReportStatus::Expired),
            "near_expiry" => Ok(ReportStatus::NearExpiry),
            "missing_end_date" => Ok(ReportStatus::MissingEndDate),
            other => Err(CoreError::UnknownReportStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportStatus::Expired => "expired",
            ReportStatus::NearExpiry => "near_expiry",
            ReportStatus::MissingEndDate => "missing_end_date",
        };
        f.write_str(label)
    }
}

/// `GET /contracts/report/{id}` wire response. `expired_status` stays a raw
/// string here; [`ContractReport`] holds the parsed form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// A generated analysis, held only while its surface is open. Never cached
/// across contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractReport {
    pub status: ReportStatus,
    /// Long-form structured text (markdown prose). This layer only hands it
    /// off for rendering.
    pub report_text: String,
}
