//! Custom error types and result handling for Shoko operations.
//!
//! All fallible operations return a [`Result<T>`], a type alias for
//! `std::result::Result<T, Error>`. Malformed file names never produce an
//! error: they degrade through the parser's fallback chain instead. The only
//! error the parser itself raises is [`Error::InvalidArgument`], which signals
//! a caller bug (an empty path) rather than bad library data.
//!
use std::path::PathBuf;

/// Type alias for Results with Shoko errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all Shoko operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File system errors outside the walker's skip-and-continue paths
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A user supplied extension or exclude pattern failed to compile
    #[error(transparent)]
    Regex(#[from] regex::Error),
    /// A per-folder scan task panicked or was cancelled
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Semaphore(#[from] tokio::sync::AcquireError),
    /// The bounded walker pool could not be created
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    ScannerBuilder(#[from] crate::scanner::ScannerConfigBuilderError),
    /// A precondition of a public entry point was violated by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A library folder that can never be scanned, such as an empty path
    #[error("Invalid library path {0:?}: {1}")]
    InvalidPath(PathBuf, String),
    /// Configuration problems and anything else without a dedicated variant
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
