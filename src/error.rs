//! Errors returned by [`crate::WindowProxy`] operations.

use crate::remote::RemoteError;
use crate::uri::UriError;

/// Scheme rejected by local validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidScheme {
    /// The scheme is empty or whitespace.
    #[error("Invalid scheme - cannot be empty")]
    Empty,
    /// The scheme is not permitted for the requested operation.
    #[error("Invalid scheme '{0}'")]
    NotAllowed(String),
}

/// Window proxy error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// The input string (or a URI returned by the main side) is malformed.
    #[error("Invalid uri - '{input}'")]
    InvalidUri {
        input: String,
        #[source]
        source: UriError,
    },
    #[error(transparent)]
    InvalidScheme(#[from] InvalidScheme),
    /// Error from the main side, unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
