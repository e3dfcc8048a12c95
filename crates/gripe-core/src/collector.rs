//! Accumulates complaints and the run-level counters.

use crate::types::{Complaint, Severity};

/// Message printed when a run found nothing.
pub const CLEAN_MESSAGE: &str = "No complaints. Enjoy the rest of your day!";

/// Ordered list of complaints plus severity counters.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    complaints: Vec<Complaint>,
    warnings: usize,
    critical: usize,
}

impl Collector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a complaint.
    pub fn push(&mut self, complaint: Complaint) {
        match complaint.severity {
            Severity::Warning => self.warnings += 1,
            Severity::Critical => self.critical += 1,
        }
        self.complaints.push(complaint);
    }

    /// Complaints in the order they were recorded.
    #[must_use]
    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    /// Consumes the collector, returning the complaints.
    #[must_use]
    pub fn into_complaints(self) -> Vec<Complaint> {
        self.complaints
    }

    /// Number of complaints.
    #[must_use]
    pub fn total(&self) -> usize {
        self.complaints.len()
    }

    /// Number of warning complaints.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Number of critical complaints.
    #[must_use]
    pub fn critical(&self) -> usize {
        self.critical
    }

    /// `1` if any complaint is critical, else `0`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.critical > 0)
    }

    /// One-line summary of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.complaints.is_empty() {
            CLEAN_MESSAGE.to_string()
        } else {
            format!(
                "{} Complaints found: {} Warnings, {} Critical.",
                self.total(),
                self.warnings,
                self.critical
            )
        }
    }
}

impl Extend<Complaint> for Collector {
    fn extend<I: IntoIterator<Item = Complaint>>(&mut self, iter: I) {
        for complaint in iter {
            self.push(complaint);
        }
    }
}
