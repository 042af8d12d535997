//! Errors reported by keyed access.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when accessing a map entry directly by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The map holds no entry for the requested key.
    #[error("key not found")]
    KeyNotFound,
}
