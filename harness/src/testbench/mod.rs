//! The testbenches: one per DUT plus the reference self-check.

pub mod blockgen;
pub mod compress;
pub mod round_core;

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::config::HarnessConfig;
use crate::dut::{MinerBlockgen, Sha256Compress, Sha256RoundCore};
use crate::error::Result;
use crate::reference;
use crate::stimulus::Stimulus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Testbench {
    SelfCheck,
    Blockgen,
    Compress,
    RoundCore,
}

impl Testbench {
    /// Stimulus stream reserved for this testbench.
    pub fn stimulus(self, seed: u64) -> Stimulus {
        Stimulus::with_stream(seed, self as u64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BenchReport {
    pub bench: Testbench,
    pub cases: usize,
    pub comparisons: u64,
    /// Simulated clock cycles, including reset and drain.
    pub cycles: u64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub reports: Vec<BenchReport>,
}

/// Runs `bench` against the bundled DUT models.
pub fn run(bench: Testbench, config: &HarnessConfig) -> Result<BenchReport> {
    match bench {
        Testbench::SelfCheck => {
            let vectors = reference::self_check()?;
            Ok(BenchReport {
                bench,
                cases: vectors,
                comparisons: vectors as u64,
                cycles: 0,
            })
        }
        Testbench::Blockgen => blockgen::run(MinerBlockgen::new(), config),
        Testbench::Compress => compress::run(Sha256Compress::new(), config),
        Testbench::RoundCore => round_core::run(Sha256RoundCore::new(), config),
    }
}

/// Runs each testbench in order, stopping at the first failure.
pub fn run_all(
    benches: impl IntoIterator<Item = Testbench>,
    config: &HarnessConfig,
) -> Result<RunSummary> {
    config.validate()?;
    let mut summary = RunSummary {
        seed: config.seed,
        reports: Vec::new(),
    };
    for bench in benches {
        let _span = tracing::info_span!("testbench", %bench).entered();
        let report = run(bench, config)?;
        tracing::info!(
            cases = report.cases,
            comparisons = report.comparisons,
            cycles = report.cycles,
            "{bench} PASS"
        );
        summary.reports.push(report);
    }
    Ok(summary)
}
