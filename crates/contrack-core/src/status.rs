//! Contract status classification and the expiring-contract view.
//!
//! Classification is a pure function of the contract's end date and an
//! explicit `now`; nothing here caches or mutates. Callers recompute these
//! views whenever the underlying collection changes.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::models::Contract;

const SECS_PER_DAY: i64 = 86_400;

/// Derived status of a contract relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Active,
    ExpiringSoon,
    Expired,
    MissingEndDate,
}

impl ContractStatus {
    /// Anything but `Active` needs a person to look at it.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ContractStatus::Active)
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContractStatus::Active => "Active",
            ContractStatus::ExpiringSoon => "Expiring Soon",
            ContractStatus::Expired => "Expired",
            ContractStatus::MissingEndDate => "Missing End Date",
        };
        f.write_str(label)
    }
}

/// Parse a stored contract date. The store writes `YYYY/MM/DD`; older records
/// carry `YYYY-MM-DD` or ISO datetimes. Date-only values are taken as
/// midnight UTC.
pub fn parse_contract_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y/%m/%d", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let midnight = date.and_time(NaiveTime::MIN);
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(datetime, Utc));
        }
    }
    None
}

/// Whole days until `end`, rounded up. Negative once `end` is a full day or
/// more in the past; 0 for an end date earlier the same day.
pub fn days_until_expiry(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = end.signed_duration_since(now).num_seconds();
    let mut days = secs / SECS_PER_DAY;
    if secs % SECS_PER_DAY > 0 {
        days += 1;
    }
    days
}

/// Classify a contract end date against `now`.
///
/// Absent or unparseable dates classify as `MissingEndDate`. The
/// `days == warning_days` boundary is inclusive: a contract ending exactly
/// `warning_days` from now is already `ExpiringSoon`.
pub fn classify(end_date: Option<&str>, now: DateTime<Utc>, warning_days: i64) -> ContractStatus {
    let end = match end_date.and_then(parse_contract_date) {
        Some(end) => end,
        None => return ContractStatus::MissingEndDate,
    };

    let days = days_until_expiry(end, now);
    if days < 0 {
        ContractStatus::Expired
    } else if days <= warning_days {
        ContractStatus::ExpiringSoon
    } else {
        ContractStatus::Active
    }
}

/// Classify a contract record.
pub fn classify_contract(contract: &Contract, now: DateTime<Utc>, warning_days: i64) -> ContractStatus {
    classify(contract.contract_end_date.as_deref(), now, warning_days)
}

/// The subset of contracts a person should look at: expired, expiring soon,
/// or missing an end date. Preserves input order; a view, not stored state.
pub fn needing_attention<'a>(
    contracts: &'a [Contract],
    now: DateTime<Utc>,
    warning_days: i64,
) -> Vec<&'a Contract> {
    contracts
        .iter()
        .filter(|contract| classify_contract(contract, now, warning_days).needs_attention())
        .collect()
}

/// Per-status counts over a contract collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub active: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub missing_end_date: usize,
}

impl StatusSummary {
    pub fn scan(contracts: &[Contract], now: DateTime<Utc>, warning_days: i64) -> Self {
        let mut summary = StatusSummary::default();
        for contract in contracts {
            match classify_contract(contract, now, warning_days) {
                ContractStatus::Active => summary.active += 1,
                ContractStatus::Expired => summary.expired += 1,
                ContractStatus::ExpiringSoon => summary.expiring_soon += 1,
                ContractStatus::MissingEndDate => summary.missing_end_date += 1,
            }
        }
        summary
    }

    /// How many contracts need attention.
    pub fn attention_total(&self) -> usize {
        self.expired + self.expiring_soon + self.missing_end_date
    }
}
