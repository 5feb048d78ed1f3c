use contrack_core::StatusSummary;

/// One-line alert for the expiring-contracts view, e.g.
/// "3 contracts need attention: 1 expired, 1 expiring soon, 1 missing end date".
pub fn attention_summary(summary: &StatusSummary) -> String {
    if summary.attention_total() == 0 {
        return "No contracts need attention".to_string();
    }

    let mut parts = Vec::new();
    if summary.expired > 0 {
        parts.push(format!("{} expired", summary.expired));
    }
    if summary.expiring_soon > 0 {
        parts.push(format!("{} expiring soon", summary.expiring_soon));
    }
    if summary.missing_end_date > 0 {
        parts.push(format!("{} missing end date", summary.missing_end_date));
    }

    format!(
        "{} contracts need attention: {}",
        summary.attention_total(),
        parts.join(", ")
    )
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_with_all_parts() {
        let summary = StatusSummary {
            active: 5,
            expired: 2,
            expiring_soon: 3,
            missing_end_date: 1,
        };
        assert_eq!(
            attention_summary(&summary),
            "6 contracts need attention: 2 expired, 3 expiring soon, 1 missing end date"
        );
    }

    #[test]
    fn summary_skips_zero_buckets() {
        let summary = StatusSummary {
            active: 4,
            expired: 0,
            expiring_soon: 2,
            missing_end_date: 0,
        };
        assert_eq!(
            attention_summary(&summary),
            "2 contracts need attention: 2 expiring soon"
        );
    }

    #[test]
    fn summary_when_nothing_needs_attention() {
        let summary = StatusSummary {
            active: 7,
            ..Default::default()
        };
        assert_eq!(attention_summary(&summary), "No contracts need attention");
    }
}
