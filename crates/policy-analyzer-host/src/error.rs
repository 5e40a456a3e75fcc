//! Transport errors that end the host loop.
//!
//! Failures of an individual compile request are not errors at this level;
//! they are reported to the caller as failure responses.

use std::sync::Arc;

use thiserror::Error;

/// Errors raised by the host transport.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// Reading the next request line failed.
    #[error("failed to read compile request: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// Writing a response line failed.
    #[error("failed to write compile response: {source}")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// A response could not be serialised.
    #[error("failed to serialise compile response: {source}")]
    Serialize {
        /// Underlying serialisation error.
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl HostError {
    pub(crate) fn read(source: std::io::Error) -> Self {
        Self::Read {
            source: Arc::new(source),
        }
    }

    pub(crate) fn write(source: std::io::Error) -> Self {
        Self::Write {
            source: Arc::new(source),
        }
    }

    pub(crate) fn serialize(source: serde_json::Error) -> Self {
        Self::Serialize {
            source: Arc::new(source),
        }
    }
}
