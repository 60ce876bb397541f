//! Clock and reset sequencing for clocked DUTs.
//!
//! Simulated time advances one unit per clock phase: every [`ClockDriver::tick`]
//! drives the clock low, evaluates, drives it high and evaluates again,
//! recording a waveform sample after each edge when tracing is enabled.
//! Waiting is always a bounded loop of ticks.

use std::path::Path;

use strum_macros::Display;

use crate::dut::{Clocked, Probe};
use crate::error::{HarnessError, Result};
use crate::waveform::WaveformTracer;

/// Driver lifecycle: RESET until the reset sequence completes, RUNNING while
/// stimulus is applied, DRAINING once the stimulus stream has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Phase {
    Reset,
    Running,
    Draining,
}

pub struct ClockDriver<D> {
    dut: D,
    phase: Phase,
    /// Simulation time in half cycles.
    time: u64,
    cycles: u64,
    waveform: Option<WaveformTracer>,
}

impl<D: Clocked + Probe> ClockDriver<D> {
    pub const MIN_RESET_CYCLES: u32 = 2;

    pub fn new(dut: D) -> Self {
        Self {
            dut,
            phase: Phase::Reset,
            time: 0,
            cycles: 0,
            waveform: None,
        }
    }

    /// Starts recording a VCD trace of the DUT's probes to `path`.
    pub fn trace_to(&mut self, path: &Path, top: &str) -> Result<()> {
        let tracer =
            WaveformTracer::open(path, top, &self.dut.probes()).map_err(HarnessError::Waveform)?;
        tracing::info!("writing waveform to {}", tracer.path().display());
        self.waveform = Some(tracer);
        Ok(())
    }

    pub fn dut(&self) -> &D {
        &self.dut
    }

    pub fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed clock cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Holds `rst_n` low for `cycles` clock cycles, releases it and runs one
    /// more cycle before entering RUNNING.
    pub fn reset(&mut self, cycles: u32) -> Result<()> {
        if cycles < Self::MIN_RESET_CYCLES {
            return Err(HarnessError::Config(format!(
                "reset must be held for at least {} cycles, got {cycles}",
                Self::MIN_RESET_CYCLES
            )));
        }
        self.phase = Phase::Reset;
        self.dut.set_rst_n(false);
        for _ in 0..cycles {
            self.tick()?;
        }
        self.dut.set_rst_n(true);
        self.tick()?;
        self.phase = Phase::Running;
        tracing::debug!("reset released after {cycles} cycles");
        Ok(())
    }

    /// One full clock cycle: low phase then high phase.
    pub fn tick(&mut self) -> Result<()> {
        for level in [false, true] {
            self.dut.set_clk(level);
            self.dut.eval();
            if let Some(waveform) = self.waveform.as_mut() {
                waveform
                    .dump(self.time, &self.dut.probes())
                    .map_err(HarnessError::Waveform)?;
            }
            self.time += 1;
        }
        self.cycles += 1;
        tracing::trace!(cycle = self.cycles, "tick");
        Ok(())
    }

    /// Drives stimulus onto the DUT and settles combinational logic. Only
    /// permitted while RUNNING.
    pub fn apply(&mut self, drive: impl FnOnce(&mut D)) -> Result<()> {
        if self.phase != Phase::Running {
            return Err(HarnessError::DriverPhase {
                action: "apply stimulus",
                phase: self.phase,
            });
        }
        drive(&mut self.dut);
        self.dut.eval();
        Ok(())
    }

    /// Asserts a strobe for exactly one cycle.
    pub fn pulse(&mut self, mut strobe: impl FnMut(&mut D, bool)) -> Result<()> {
        self.apply(|dut| strobe(dut, true))?;
        self.tick()?;
        strobe(&mut self.dut, false);
        self.dut.eval();
        Ok(())
    }

    /// Ticks until `cond` holds, checking once per cycle for at most `guard`
    /// cycles. Returns the number of cycles waited.
    pub fn poll_until(
        &mut self,
        signal: &'static str,
        index: usize,
        guard: u32,
        cond: impl Fn(&D) -> bool,
    ) -> Result<u32> {
        for waited in 0..guard {
            if cond(&self.dut) {
                return Ok(waited);
            }
            self.tick()?;
        }
        if cond(&self.dut) {
            return Ok(guard);
        }
        Err(HarnessError::Timeout {
            signal,
            index,
            guard,
        })
    }

    /// Enters DRAINING and runs `cycles` more cycles. `idle` runs before each
    /// cycle to hold inputs inactive and sample outputs.
    pub fn drain(
        &mut self,
        cycles: u32,
        mut idle: impl FnMut(&mut D, u32) -> Result<()>,
    ) -> Result<()> {
        self.phase = Phase::Draining;
        for cycle in 0..cycles {
            idle(&mut self.dut, cycle)?;
            self.dut.eval();
            self.tick()?;
        }
        Ok(())
    }

    /// Closes the waveform, if any, and hands back the DUT.
    pub fn finish(self) -> Result<(D, u64)> {
        if let Some(waveform) = self.waveform {
            waveform.close().map_err(HarnessError::Waveform)?;
        }
        Ok((self.dut, self.cycles))
    }
}
