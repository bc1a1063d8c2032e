use thiserror::Error;

/// Faults raised by the engine.
///
/// Expected "no answer" outcomes (unreachable target, no alternative route,
/// no cycle) are not errors and are returned as `Option` or sentinel values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Edge weight is negative or NaN. Only the validating constructor checks this.
    #[error("invalid weight {weight} on edge '{from}' -- '{to}': weights must be finite and non-negative")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f64,
    },

    /// The configured deadline passed before every eccentricity was computed.
    #[error("deadline exceeded after {completed} of {total} nodes")]
    DeadlineExceeded { completed: usize, total: usize },

    /// The caller raised the cancellation flag.
    #[error("cancelled after {completed} of {total} nodes")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, GraphError>;
