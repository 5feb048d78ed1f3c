//! On-demand report workflow.
//!
//! One report is live per desk. Each `open` call supersedes the previous one
//! immediately; a response arriving for a superseded request is discarded
//! rather than overwriting the newer report. The transport has no real
//! cancel, so superseding is a generation check on arrival, and the AI call
//! gets an explicit deadline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use contrack_core::models::{ContractReport, ReportStatus};
use contrack_core::{ContractService, ServiceError};

/// What an `open` call produced.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// The report is ready and is now the desk's current report.
    Ready(ContractReport),
    /// The store had no report for this contract (an empty state, not an
    /// error).
    Unavailable,
    /// A newer request was issued while this one was in flight; its response
    /// was discarded.
    Superseded,
}

struct CurrentReport {
    generation: u64,
    report: ContractReport,
}

/// Holds the single live report for a UI surface.
pub struct ReportDesk {
    service: Arc<dyn ContractService>,
    timeout: Duration,
    generation: AtomicU64,
    current: Mutex<Option<CurrentReport>>,
}

impl ReportDesk {
    pub fn new(service: Arc<dyn ContractService>, timeout: Duration) -> Self {
        Self {
            service,
            timeout,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Request a contract's report. Supersedes any in-flight request: the
    /// previous report is discarded now, and the older response will be
    /// dropped when it arrives.
    pub async fn open(&self, contract_id: &str) -> Result<ReportOutcome, ServiceError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.current.lock().await.take();
        tracing::debug!(contract_id, generation, "report requested");

        let response =
            match tokio::time::timeout(self.timeout, self.service.generate_report(contract_id))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(ServiceError::Timeout),
            };

        let mut current = self.current.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(contract_id, generation, "discarding superseded report");
            return Ok(ReportOutcome::Superseded);
        }

        if !response.success {
            return Ok(ReportOutcome::Unavailable);
        }

        let status = response
            .expired_status
            .as_deref()
            .unwrap_or_default()
            .parse::<ReportStatus>()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        let report = ContractReport {
            status,
            report_text: response.report.unwrap_or_default(),
        };

        *current = Some(CurrentReport {
            generation,
            report: report.clone(),
        });
        Ok(ReportOutcome::Ready(report))
    }

    /// The report currently on display, if any.
    pub async fn current(&self) -> Option<ContractReport> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|c| c.report.clone())
    }

    /// Close the surface: drop whatever report was showing.
    pub async fn close(&self) {
        self.current.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;
    use contrack_core::models::{ReportResponse, UploadResponse};

    struct MockService {
        delays: HashMap<String, Duration>,
        unavailable: bool,
    }

    impl MockService {
        fn with_delays(delays: &[(&str, u64)]) -> Self {
            Self {
                delays: delays
                    .iter()
                    .map(|(id, secs)| (id.to_string(), Duration::from_secs(*secs)))
                    .collect(),
                unavailable: false,
            }
        }
    }

    #[async_trait]
    impl ContractService for MockService {
        async fn upload_document(
            &self,
            _file_name: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> Result<UploadResponse, ServiceError> {
            Ok(UploadResponse::default())
        }

        async fn generate_report(
            &self,
            contract_id: &str,
        ) -> Result<ReportResponse, ServiceError> {
            if let Some(delay) = self.delays.get(contract_id) {
                tokio::time::sleep(*delay).await;
            }
            if self.unavailable {
                return Ok(ReportResponse {
                    success: false,
                    expired_status: None,
                    report: None,
                });
            }
            Ok(ReportResponse {
                success: true,
                expired_status: Some("near_expiry".to_string()),
                report: Some(format!("## Analysis for {}", contract_id)),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_cannot_overwrite_newer_report() {
        let service = Arc::new(MockService::with_delays(&[("slow", 50), ("fast", 1)]));
        let desk = ReportDesk::new(service, Duration::from_secs(60));

        // "slow" is issued first, "fast" second; "slow" resolves last.
        let (slow, fast) = tokio::join!(desk.open("slow"), desk.open("fast"));

        assert!(matches!(slow.unwrap(), ReportOutcome::Superseded));
        match fast.unwrap() {
            ReportOutcome::Ready(report) => {
                assert!(report.report_text.contains("fast"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let current = desk.current().await.unwrap();
        assert!(current.report_text.contains("fast"));
        assert_eq!(current.status, ReportStatus::NearExpiry);
    }

    #[tokio::test(start_paused = true)]
    async fn report_call_times_out() {
        let service = Arc::new(MockService::with_delays(&[("c1", 120)]));
        let desk = ReportDesk::new(service, Duration::from_secs(60));

        let err = desk.open("c1").await.unwrap_err();
        assert!(err.is_timeout());
        assert!(desk.current().await.is_none());
    }

    #[tokio::test]
    async fn logical_failure_is_an_empty_state() {
        let service = Arc::new(MockService {
            delays: HashMap::new(),
            unavailable: true,
        });
        let desk = ReportDesk::new(service, Duration::from_secs(60));

        let outcome = desk.open("c1").await.unwrap();
        assert!(matches!(outcome, ReportOutcome::Unavailable));
        assert!(desk.current().await.is_none());
    }

    #[tokio::test]
    async fn opening_a_second_contract_replaces_the_first() {
        let service = Arc::new(MockService::with_delays(&[]));
        let desk = ReportDesk::new(service, Duration::from_secs(60));

        desk.open("first").await.unwrap();
        desk.open("second").await.unwrap();

        let current = desk.current().await.unwrap();
        assert!(current.report_text.contains("second"));
    }

    #[tokio::test]
    async fn close_drops_the_current_report() {
        let service = Arc::new(MockService::with_delays(&[]));
        let desk = ReportDesk::new(service, Duration::from_secs(60));

        desk.open("c1").await.unwrap();
        assert!(desk.current().await.is_some());
        desk.close().await;
        assert!(desk.current().await.is_none());
    }
}
