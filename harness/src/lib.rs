//! Cycle-accurate verification harness for the SHA-256d mining datapath.
//!
//! Three devices are checked against bit-exact reference models: the
//! combinational block generator, the multi-cycle compression engine and the
//! two-stage round core. Each testbench drives seeded random stimulus and
//! stops at the first mismatch.

pub mod compare;
pub mod config;
pub mod driver;
pub mod dut;
pub mod error;
pub mod latency;
pub mod reference;
pub mod stimulus;
pub mod testbench;
pub mod waveform;

pub use config::HarnessConfig;
pub use driver::{ClockDriver, Phase};
pub use error::{HarnessError, Result};
pub use testbench::{run, run_all, BenchReport, RunSummary, Testbench};
