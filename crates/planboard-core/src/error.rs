// ── Core error types ──
//
// Filter parsing and view matching never fail; every variant here comes
// from identifier allocation or from building a registry. Commit-time
// storage failures arrive as `CommitError` and are folded in by the
// allocator.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    // ── Configuration errors (fatal, never retried) ──────────────────
    #[error("Unknown module type: {value}")]
    UnknownModule { value: String },

    #[error("Unknown category: {value}")]
    UnknownCategory { value: String },

    #[error("Unknown entity domain: {value}")]
    UnknownEntity { value: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed object code '{value}': {reason}")]
    MalformedCode { value: String, reason: String },

    #[error("Saved view '{id}' is defined more than once")]
    DuplicateView { id: String },

    #[error("Saved view not found: {id}")]
    ViewNotFound { id: String },

    // ── Allocation errors ────────────────────────────────────────────
    #[error("Sequence numbers under {prefix} are exhausted")]
    SequenceOverflow { prefix: String },

    #[error("Could not allocate a code under {prefix} after {attempts} conflicting attempts")]
    AllocationExhausted { prefix: String, attempts: u32 },

    #[error("Storage error: {message}")]
    Storage { message: String },
}
