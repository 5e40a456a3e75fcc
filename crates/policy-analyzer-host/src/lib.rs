//! Analyzer host contract shared by policy language plugins.
//!
//! A language plugin supplies a [`CompileTarget`]: a callback that turns a
//! policy program directory into a runnable artefact. The host owns the
//! transport around that callback. It decodes a [`CompileConfig`] per
//! request, invokes the target, and encodes a [`CompileResponse`].
//!
//! The transport implemented here is a line-oriented JSONL exchange over
//! stdio, matching the one-request/one-response framing used by the other
//! plugins in this workspace. [`main`] runs it on the process streams.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use std::path::PathBuf;
//!
//! use policy_analyzer_host::{CompileConfig, CompileResult, CompileTarget, MainConfig, serve};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("never fails")]
//! struct Never;
//!
//! struct Echo;
//!
//! impl CompileTarget for Echo {
//!     type Error = Never;
//!
//!     fn compile(&self, config: &CompileConfig) -> Result<CompileResult, Never> {
//!         Ok(CompileResult::new(config.program_directory().join("policy")))
//!     }
//! }
//!
//! let mut input = Cursor::new(b"{\"program_directory\":\"/proj\"}\n".to_vec());
//! let mut output = Vec::new();
//! let summary = serve(&mut input, &mut output, &MainConfig::new(Echo)).unwrap();
//! assert_eq!(summary.handled(), 1);
//! ```

pub mod error;
pub mod protocol;
pub mod serve;

#[cfg(test)]
mod tests;

pub use self::error::HostError;
pub use self::protocol::{
    CompileConfig, CompileResponse, CompileResult, DiagnosticSeverity, HostDiagnostic,
};
pub use self::serve::{CompileTarget, MainConfig, ServeSummary, main, serve};
