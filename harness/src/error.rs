use std::path::PathBuf;

use common::{HashState, WidthError};
use thiserror::Error;

use crate::driver::Phase;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{field} mismatch at idx={index} got={got:08x} exp={expected:08x}")]
    Mismatch {
        field: String,
        index: usize,
        got: u32,
        expected: u32,
    },
    #[error("{field} mismatch at idx={index} (words {differing:?} differ)\n  got: {got}\n  exp: {expected}")]
    StateMismatch {
        field: &'static str,
        index: usize,
        got: HashState,
        expected: HashState,
        differing: Vec<usize>,
    },
    #[error("Timeout waiting for {signal} at idx={index} after {guard} cycles")]
    Timeout {
        signal: &'static str,
        index: usize,
        guard: u32,
    },
    #[error("{signal} asserted at idx={index} with no pending expectation")]
    UnexpectedValid { signal: &'static str, index: usize },
    #[error("{pending} expectations still queued after the drain period")]
    PipelineNotDrained { pending: usize },
    #[error("Reference implementation mismatch for {vector}\n  ref:   {got}\n  known: {expected}")]
    ReferenceSelfCheck {
        vector: &'static str,
        got: String,
        expected: String,
    },
    #[error("Cannot {action} while the driver is in the {phase} phase")]
    DriverPhase { action: &'static str, phase: Phase },
    #[error("Waveform trace error: {0}")]
    Waveform(#[source] std::io::Error),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Width(#[from] WidthError),
    #[error("Malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HarnessError {
    /// True for failures attributable to the reference model rather than the DUT.
    pub fn is_reference_failure(&self) -> bool {
        matches!(self, HarnessError::ReferenceSelfCheck { .. })
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
