use common::constants::ROUND_CORE_LATENCY;

use super::{BenchReport, Testbench};
use crate::compare::Scoreboard;
use crate::config::{HarnessConfig, ROUND_TRACE_FILE};
use crate::driver::ClockDriver;
use crate::dut::{Probe, RoundCorePorts};
use crate::error::{HarnessError, Result};
use crate::latency::{LatencyTracker, Slot};
use crate::reference::{round, WorkingVars};

/// Streams one random round input per cycle into the pipelined core and checks
/// `valid_o` and `a_o..h_o` exactly [`ROUND_CORE_LATENCY`] cycles later.
///
/// With `round_bubble_percent > 0` some cycles drive `valid_i` low; their
/// outputs must then come back with `valid_o` low and are otherwise ignored.
/// After the last sample the pipeline is drained with `valid_i` held low.
pub fn run<D: RoundCorePorts + Probe>(dut: D, config: &HarnessConfig) -> Result<BenchReport> {
    config.validate()?;
    let mut driver = ClockDriver::new(dut);
    if let Some(path) = config.trace_path(ROUND_TRACE_FILE) {
        driver.trace_to(&path, "sha256_round_core")?;
    }
    driver.dut_mut().set_valid_i(false);
    driver.reset(config.reset_cycles)?;

    let mut stimulus = Testbench::RoundCore.stimulus(config.seed);
    let mut tracker = LatencyTracker::new(ROUND_CORE_LATENCY);
    let mut board = Scoreboard::new();

    for i in 0..config.round_samples {
        let valid = !stimulus.chance(config.round_bubble_percent);
        let input = stimulus.round_input();
        driver.apply(|dut| {
            dut.set_round_i(&input.vars, input.k, input.w);
            dut.set_valid_i(valid);
        })?;
        tracker.push(i, valid, round(&input));
        check_due(&mut tracker, &mut board, driver.dut())?;
        driver.tick()?;
    }

    driver.drain(config.drain_cycles, |dut, _| {
        dut.set_valid_i(false);
        tracker.push_bubble();
        check_due(&mut tracker, &mut board, dut)
    })?;
    if tracker.pending() != 0 {
        return Err(HarnessError::PipelineNotDrained {
            pending: tracker.pending(),
        });
    }
    tracing::info!(samples = config.round_samples, "pipeline drained");

    let (_, cycles) = driver.finish()?;
    Ok(BenchReport {
        bench: Testbench::RoundCore,
        cases: config.round_samples,
        comparisons: board.comparisons(),
        cycles,
    })
}

fn check_due<D: RoundCorePorts>(
    tracker: &mut LatencyTracker<WorkingVars>,
    board: &mut Scoreboard,
    dut: &D,
) -> Result<()> {
    let Some(Slot::Scheduled(expected)) = tracker.pop_due() else {
        return Ok(());
    };
    board.flag("valid_o", expected.index, dut.valid_o(), expected.valid)?;
    if expected.valid {
        board.fields(expected.index, dut.round_o().fields(), expected.output.fields())?;
    }
    Ok(())
}
