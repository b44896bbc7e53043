/// Convenience result type used across strokeline.
pub type StrokeResult<T> = Result<T, StrokeError>;

/// Top-level error taxonomy used by tracing APIs.
///
/// Every failure is deterministic for a given input; retrying never helps.
#[derive(thiserror::Error, Debug)]
pub enum StrokeError {
    /// Caller-supplied data or options are unusable (e.g. hint size mismatch).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No pinch point could anchor the path search for a boundary loop.
    #[error("degenerate boundary: cell {cell}, loop {boundary} has no pinch point")]
    DegenerateBoundary {
        /// Index of the owning cell.
        cell: usize,
        /// Index of the loop within its cell.
        boundary: usize,
    },

    /// The path search exhausted every branch without covering the loop.
    #[error("unreachable path: cell {cell}, loop {boundary} has no covering stroke")]
    UnreachablePath {
        /// Index of the owning cell.
        cell: usize,
        /// Index of the loop within its cell.
        boundary: usize,
    },

    /// The path search was cancelled or ran out of its step budget.
    #[error("search aborted: cell {cell}, loop {boundary} after {steps} steps")]
    SearchAborted {
        /// Index of the owning cell.
        cell: usize,
        /// Index of the loop within its cell.
        boundary: usize,
        /// Search steps taken before aborting.
        steps: u64,
    },

    /// `items` cannot fit into `buckets` buckets of capacity `limit`.
    #[error("infeasible distribution: {items} items into {buckets} buckets of {limit}")]
    InfeasibleDistribution {
        /// Requested item count.
        items: usize,
        /// Requested bucket count.
        buckets: usize,
        /// Per-bucket capacity.
        limit: usize,
    },

    /// Cache store failures (unreadable entry, unwritable directory).
    #[error("cache error: {0}")]
    Cache(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrokeError {
    /// Build a [`StrokeError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`StrokeError::Cache`] value.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Build a [`StrokeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Re-tag a per-loop failure with the owning cell and loop indices.
    ///
    /// Errors that do not identify a loop are returned unchanged.
    pub(crate) fn at_loop(self, cell: usize, boundary: usize) -> Self {
        match self {
            Self::DegenerateBoundary { .. } => Self::DegenerateBoundary { cell, boundary },
            Self::UnreachablePath { .. } => Self::UnreachablePath { cell, boundary },
            Self::SearchAborted { steps, .. } => Self::SearchAborted {
                cell,
                boundary,
                steps,
            },
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
