//! Graphics error types.

use std::fmt;

/// Errors that can occur while talking to a render context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// Failed to create a resource.
    ResourceCreationFailed(String),
    /// Out of GPU memory.
    OutOfMemory,
    /// An invalid parameter was provided.
    InvalidParameter(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceCreationFailed(msg) => write!(f, "resource creation failed: {msg}"),
            Self::OutOfMemory => write!(f, "out of GPU memory"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
        }
    }
}

impl std::error::Error for GraphicsError {}
