use common::{BlockWords, HashState};

use super::{BenchReport, Testbench};
use crate::compare::Scoreboard;
use crate::config::{HarnessConfig, COMPRESS_TRACE_FILE};
use crate::driver::ClockDriver;
use crate::dut::{CompressPorts, Probe};
use crate::error::{HarnessError, Result};
use crate::latency::{Observation, ValidTracker};
use crate::reference::{abc_block, check_abc, compress, sha256_iv};

/// Verifies the compression engine on the "abc" block and then on
/// `config.compress_cases` random blocks, all from the SHA-256 IV.
///
/// The reference model is self-checked before the DUT is touched.
pub fn run<D: CompressPorts + Probe>(dut: D, config: &HarnessConfig) -> Result<BenchReport> {
    config.validate()?;
    check_abc()?;

    let mut driver = ClockDriver::new(dut);
    if let Some(path) = config.trace_path(COMPRESS_TRACE_FILE) {
        driver.trace_to(&path, "sha256_compress")?;
    }
    driver.dut_mut().set_start(false);
    driver.reset(config.reset_cycles)?;

    let mut bench = CompressBench {
        driver,
        board: Scoreboard::new(),
        outstanding: ValidTracker::new(),
        guard: config.done_guard,
    };

    let iv = sha256_iv();
    bench.case(0, &iv, &abc_block())?;
    tracing::info!("abc vector PASS");

    let mut stimulus = Testbench::Compress.stimulus(config.seed);
    for tc in 0..config.compress_cases {
        let block = stimulus.block();
        bench.case(tc + 1, &iv, &block)?;
    }
    tracing::info!(cases = config.compress_cases, "random blocks PASS");

    let comparisons = bench.board.comparisons();
    let (_, cycles) = bench.driver.finish()?;
    Ok(BenchReport {
        bench: Testbench::Compress,
        cases: config.compress_cases + 1,
        comparisons,
        cycles,
    })
}

struct CompressBench<D> {
    driver: ClockDriver<D>,
    board: Scoreboard,
    outstanding: ValidTracker<HashState>,
    guard: u32,
}

impl<D: CompressPorts + Probe> CompressBench<D> {
    fn case(&mut self, index: usize, state: &HashState, block: &BlockWords) -> Result<()> {
        self.driver.apply(|dut| {
            dut.set_state_i(state.to_storage());
            dut.set_block_i(block.to_storage());
        })?;
        self.driver.pulse(|dut, level| dut.set_start(level))?;

        // `start` must clear the previous job's `done` before anything is outstanding
        if let Observation::Spurious = self.outstanding.observe(self.driver.dut().done()) {
            return Err(HarnessError::UnexpectedValid {
                signal: "done",
                index,
            });
        }
        self.outstanding.push(compress(state, block));

        let waited = self
            .driver
            .poll_until("done", index, self.guard, |dut| dut.done())?;
        if let Observation::Matched(expected) = self.outstanding.observe(true) {
            let got = HashState::from_storage(&self.driver.dut().state_o());
            self.board.state("state_o", index, &got, &expected)?;
        }
        tracing::debug!(index, waited, "compression ok");
        Ok(())
    }
}
