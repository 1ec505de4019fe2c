//! Per-recipient outcomes and batch roll-up

use std::collections::BTreeSet;

/// Terminal result for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message, possibly after failed attempts.
    Sent,
    /// Every delivery attempt failed; `attempts` is the number made. Zero
    /// means the message never reached the transport (render or build
    /// failure).
    FailedAfterRetries { attempts: u32 },
    /// The resolved user has no email address.
    SkippedNoEmail,
    /// A raw recipient entry was missing its name or email.
    SkippedMalformedInput,
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

/// Aggregate result of a batch dispatch, keyed by recipient identity
/// (`"Name <email>"`). Malformed entries are a distinct channel: a data
/// quality problem, not a delivery failure.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    successes: BTreeSet<String>,
    failures: BTreeSet<String>,
    malformed: Vec<String>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: String, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent => {
                self.successes.insert(key);
            }
            DispatchOutcome::FailedAfterRetries { .. } | DispatchOutcome::SkippedNoEmail => {
                self.failures.insert(key);
            }
            DispatchOutcome::SkippedMalformedInput => {
                self.malformed.push(key);
            }
        }
    }

    pub fn record_malformed(&mut self, entry: String) {
        self.malformed.push(entry);
    }

    pub fn successes(&self) -> &BTreeSet<String> {
        &self.successes
    }

    pub fn failures(&self) -> &BTreeSet<String> {
        &self.failures
    }

    pub fn malformed(&self) -> &[String] {
        &self.malformed
    }

    pub fn recipient_count(&self) -> usize {
        self.successes.len() + self.failures.len() + self.malformed.len()
    }

    /// True when the batch resolved no recipients at all. Distinguishable
    /// from a batch where every recipient failed.
    pub fn no_recipients(&self) -> bool {
        self.recipient_count() == 0
    }

    /// Every resolved recipient was sent to and no entry was malformed.
    pub fn all_sent(&self) -> bool {
        self.failures.is_empty() && self.malformed.is_empty()
    }

    /// Human-readable roll-up for the reporting side channel.
    pub fn summary(&self) -> String {
        format!(
            "{} sent, {} failed, {} malformed",
            self.successes.len(),
            self.failures.len(),
            self.malformed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classification() {
        let mut report = DispatchReport::new();
        report.record("Ann <ann@example.com>".to_string(), &DispatchOutcome::Sent);
        report.record(
            "Bob <bob@example.com>".to_string(),
            &DispatchOutcome::FailedAfterRetries { attempts: 5 },
        );
        report.record("Cal <>".to_string(), &DispatchOutcome::SkippedNoEmail);
        report.record(
            " <dee@example.com>".to_string(),
            &DispatchOutcome::SkippedMalformedInput,
        );

        assert!(report.successes().contains("Ann <ann@example.com>"));
        assert!(report.failures().contains("Bob <bob@example.com>"));
        assert!(report.failures().contains("Cal <>"));
        assert_eq!(report.malformed().len(), 1);
        assert!(!report.all_sent());
        assert!(!report.no_recipients());
        assert_eq!(report.recipient_count(), 4);
    }

    #[test]
    fn test_empty_report_is_distinguishable() {
        let empty = DispatchReport::new();
        assert!(empty.no_recipients());
        assert!(empty.all_sent());

        let mut failed = DispatchReport::new();
        failed.record(
            "Bob <bob@example.com>".to_string(),
            &DispatchOutcome::FailedAfterRetries { attempts: 5 },
        );
        assert!(!failed.no_recipients());
        assert!(!failed.all_sent());
    }

    #[test]
    fn test_summary() {
        let mut report = DispatchReport::new();
        report.record("Ann <ann@example.com>".to_string(), &DispatchOutcome::Sent);
        assert_eq!(report.summary(), "1 sent, 0 failed, 0 malformed");
    }
}
