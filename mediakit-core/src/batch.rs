//! Result accounting for per-item batch operations.
//!
//! Batch operations never abort on a single item. Successes are counted and
//! failures are kept as `"{item}: {message}"` strings in processing order.

/// Number of error strings shown to users before the rest are summarized.
pub const ERROR_PREVIEW_LIMIT: usize = 5;

/// Counts and error strings collected over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub errors: Vec<String>,
    /// Source files removed after a successful conversion
    pub deleted_originals: usize,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    /// Records a failed item as `"{item}: {message}"`.
    pub fn record_failure(&mut self, item: impl AsRef<str>, message: impl AsRef<str>) {
        self.errors
            .push(format!("{}: {}", item.as_ref(), message.as_ref()));
    }

    pub fn fail_count(&self) -> usize {
        self.errors.len()
    }

    pub fn total(&self) -> usize {
        self.success_count + self.fail_count()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Splits an error list into the shown preview and the number left out.
pub fn error_preview(errors: &[String]) -> (&[String], usize) {
    let shown = errors.len().min(ERROR_PREVIEW_LIMIT);
    (&errors[..shown], errors.len() - shown)
}
