//! Progress snapshots emitted while the fetch tool runs.

/// A structured snapshot of transfer status derived from one output line.
///
/// Amounts are kept exactly as the fetch tool reported them, units included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Amount downloaded so far, e.g. `"1450K"`.
    pub downloaded: String,
    /// Percentage complete, 0 to 100.
    pub percent: u8,
    /// Current transfer rate, e.g. `"1.23M"`.
    pub speed: String,
    /// Estimated time left, e.g. `"12s"`.
    pub time_left: String,
}

impl ProgressEvent {
    /// The event reported once the transfer finished, carrying the last
    /// known amounts forward.
    pub fn completed(last: Option<&ProgressEvent>) -> Self {
        let last = last.cloned().unwrap_or_default();
        Self {
            percent: 100,
            time_left: "0s".to_string(),
            ..last
        }
    }
}
