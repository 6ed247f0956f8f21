//! Structured error types for lru-store.

/// Errors reported by cache construction and reconfiguration.
///
/// Lookups never fail: a missing key is `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LruError {
    /// Capacity must hold at least one entry.
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LruError>;
