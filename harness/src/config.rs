//! Run configuration: sample counts, guard bounds and the trace directory.

use std::fs;
use std::path::{Path, PathBuf};

use common::constants::ROUND_CORE_LATENCY;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

pub const COMPRESS_TRACE_FILE: &str = "sha256_compress.vcd";
pub const ROUND_TRACE_FILE: &str = "round.vcd";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Seed for every stimulus stream.
    pub seed: u64,
    pub blockgen_cases: usize,
    /// Random blocks compressed after the fixed "abc" vector.
    pub compress_cases: usize,
    pub round_samples: usize,
    /// Percentage of round-core samples driven with `valid_i` low.
    pub round_bubble_percent: u8,
    /// Cycles `rst_n` is held low before release.
    pub reset_cycles: u32,
    /// Maximum cycles to wait for `done` after a `start` strobe.
    pub done_guard: u32,
    /// Idle cycles run after the round-core stimulus stream ends.
    pub drain_cycles: u32,
    /// When set, VCD waveforms of the clocked testbenches are written here.
    pub trace_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            blockgen_cases: Self::MIN_BLOCKGEN_CASES,
            compress_cases: Self::MIN_COMPRESS_CASES,
            round_samples: Self::MIN_ROUND_SAMPLES,
            round_bubble_percent: 0,
            reset_cycles: Self::MIN_RESET_CYCLES,
            done_guard: 1000,
            drain_cycles: Self::MIN_DRAIN_CYCLES,
            trace_dir: None,
        }
    }
}

impl HarnessConfig {
    pub const MIN_BLOCKGEN_CASES: usize = 1000;
    pub const MIN_COMPRESS_CASES: usize = 100;
    pub const MIN_ROUND_SAMPLES: usize = 2000;
    pub const MIN_RESET_CYCLES: u32 = 2;
    pub const MIN_DRAIN_CYCLES: u32 = 5;

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Rejects settings the harness cannot run with and warns about sample
    /// sizes below the minimum acceptable coverage.
    pub fn validate(&self) -> Result<()> {
        if self.reset_cycles < Self::MIN_RESET_CYCLES {
            return Err(HarnessError::Config(format!(
                "reset_cycles must be at least {}, got {}",
                Self::MIN_RESET_CYCLES,
                self.reset_cycles
            )));
        }
        if self.done_guard == 0 {
            return Err(HarnessError::Config("done_guard must be non-zero".into()));
        }
        if (self.drain_cycles as usize) < ROUND_CORE_LATENCY {
            return Err(HarnessError::Config(format!(
                "drain_cycles must cover the round-core latency of {ROUND_CORE_LATENCY}, got {}",
                self.drain_cycles
            )));
        }
        if self.round_bubble_percent > 100 {
            return Err(HarnessError::Config(format!(
                "round_bubble_percent must be at most 100, got {}",
                self.round_bubble_percent
            )));
        }

        let floors = [
            ("blockgen_cases", self.blockgen_cases, Self::MIN_BLOCKGEN_CASES),
            ("compress_cases", self.compress_cases, Self::MIN_COMPRESS_CASES),
            ("round_samples", self.round_samples, Self::MIN_ROUND_SAMPLES),
            (
                "drain_cycles",
                self.drain_cycles as usize,
                Self::MIN_DRAIN_CYCLES as usize,
            ),
        ];
        for (name, value, floor) in floors {
            if value < floor {
                tracing::warn!("{name} = {value} is below the recommended minimum of {floor}");
            }
        }
        Ok(())
    }

    pub fn trace_path(&self, file: &str) -> Option<PathBuf> {
        self.trace_dir.as_ref().map(|dir| dir.join(file))
    }
}
