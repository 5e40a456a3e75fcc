//! Shared test doubles and behavioural tests for the host loop.


use std::io::Cursor;
use std::path::PathBuf;

use mockall::mock;
use thiserror::Error;

use crate::protocol::{CompileConfig, CompileResponse, CompileResult};
use crate::serve::{CompileTarget, MainConfig, ServeSummary, serve};

mock! {
    pub(crate) CompileTarget {}
    impl CompileTarget for CompileTarget {
        type Error = StubError;

        fn compile(&self, config: &CompileConfig) -> Result<CompileResult, StubError>;
    }
}

/// Error returned by mocked compile targets.
#[derive(Debug, Error)]
#[error("stub compile failure: {message}")]
pub(crate) struct StubError {
    pub(crate) message: String,
    #[source]
    pub(crate) source: Option<std::io::Error>,
}

impl StubError {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            source: None,
        }
    }
}

/// Target that resolves every request to `<program_directory>/policy`.
pub(crate) fn succeeding_target() -> MockCompileTarget {
    let mut target = MockCompileTarget::new();
    target
        .expect_compile()
        .returning(|config: &CompileConfig| {
            Ok(CompileResult::new(config.program_directory().join("policy")))
        });
    target
}

/// Target that fails every request with `message`.
pub(crate) fn failing_target(message: impl Into<String>) -> MockCompileTarget {
    let message = message.into();
    let mut target = MockCompileTarget::new();
    target
        .expect_compile()
        .returning(move |_| Err(StubError::new(&message)));
    target
}

/// Feeds `input` through [`serve`] and parses every response line.
pub(crate) fn run_serve(
    target: MockCompileTarget,
    input: impl AsRef<[u8]>,
) -> (ServeSummary, Vec<CompileResponse>) {
    let mut reader = Cursor::new(input.as_ref().to_vec());
    let mut output = Vec::new();
    let summary =
        serve(&mut reader, &mut output, &MainConfig::new(target)).expect("serve should finish");
    let text = String::from_utf8(output).expect("responses should be UTF-8");
    let responses = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("response should parse"))
        .collect();
    (summary, responses)
}

pub(crate) fn request_line(program_directory: &str) -> String {
    let config = CompileConfig::new(PathBuf::from(program_directory), None);
    let mut line = serde_json::to_string(&config).expect("request should serialise");
    line.push('\n');
    line
}
