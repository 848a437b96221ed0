//! Report envelopes produced alongside normalized data.

use serde::{Deserialize, Serialize};

/// Non-fatal outcome of normalizing one raw payload.
///
/// Rows that cannot be represented as a valid candle are dropped rather than
/// failing the request; this report tells the caller how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Rows present in the raw payload.
    pub input_rows: usize,
    /// Rows dropped for missing, non-finite or inconsistent values.
    pub dropped_rows: usize,
    /// Rows collapsed because another row carried the same timestamp.
    pub duplicate_rows: usize,
}

impl NormalizeReport {
    /// True when every input row survived.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.dropped_rows == 0 && self.duplicate_rows == 0
    }

    /// Number of warnings a caller should surface.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.dropped_rows
    }
}
