//! Extraction run reporting.

use std::time::Duration;

/// Report of a completed extraction or test run.
///
/// Counters are per item as reported by the engine at each item's close.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Number of files written to a sink.
    pub files_extracted: usize,

    /// Number of directory items created.
    pub directories_created: usize,

    /// Number of items verified in test mode.
    pub items_tested: usize,

    /// Number of items the engine skipped.
    pub items_skipped: usize,

    /// Number of failures recorded during the run.
    pub items_failed: usize,

    /// Total bytes written to sinks.
    pub bytes_written: u64,

    /// Duration of the run.
    pub duration: Duration,

    /// Non-fatal problems, such as attributes that could not be restored.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns the number of items that reached their close step.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted
            + self.directories_created
            + self.items_tested
            + self.items_skipped
            + self.items_failed
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
