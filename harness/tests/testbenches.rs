use common::constants::{BLOCK_WORDS, STATE_WORDS, TAIL_WORDS};
use harness::dut::{
    BlockGenPorts, Clocked, CompressPorts, Evaluate, MinerBlockgen, Probe, RoundCorePorts,
    Sha256Compress, Sha256RoundCore, Signal,
};
use harness::reference::WorkingVars;
use harness::testbench::{blockgen, compress, round_core};
use harness::{run_all, HarnessConfig, HarnessError, Testbench};
use strum::IntoEnumIterator;

fn quick_config() -> HarnessConfig {
    HarnessConfig {
        blockgen_cases: 64,
        compress_cases: 4,
        round_samples: 128,
        ..HarnessConfig::default()
    }
}

#[test]
fn bundled_models_pass_default_run() {
    let config = HarnessConfig::default();
    let summary = run_all(Testbench::iter(), &config).unwrap();
    let benches: Vec<_> = summary.reports.iter().map(|r| r.bench).collect();
    assert_eq!(
        benches,
        vec![
            Testbench::SelfCheck,
            Testbench::Blockgen,
            Testbench::Compress,
            Testbench::RoundCore
        ]
    );

    let compress = &summary.reports[2];
    assert_eq!(compress.cases, config.compress_cases + 1);
    let round = &summary.reports[3];
    // one valid_o flag plus eight fields per sample
    assert_eq!(round.comparisons, 9 * config.round_samples as u64);
}

#[test]
fn round_core_with_bubbles() {
    let config = HarnessConfig {
        round_bubble_percent: 30,
        ..quick_config()
    };
    let report = round_core::run(Sha256RoundCore::new(), &config).unwrap();
    assert!(report.comparisons < 9 * config.round_samples as u64);
    assert!(report.comparisons > config.round_samples as u64);

    let all_bubbles = HarnessConfig {
        round_bubble_percent: 100,
        ..quick_config()
    };
    let report = round_core::run(Sha256RoundCore::new(), &all_bubbles).unwrap();
    assert_eq!(report.comparisons, all_bubbles.round_samples as u64);
}

#[test]
fn runs_are_reproducible() {
    let config = quick_config();
    let first = run_all(Testbench::iter(), &config).unwrap();
    let second = run_all(Testbench::iter(), &config).unwrap();
    assert_eq!(first.reports, second.reports);

    let mut a = Testbench::Compress.stimulus(42);
    let mut b = Testbench::Compress.stimulus(42);
    assert_eq!(a.block(), b.block());
    assert_ne!(
        Testbench::Compress.stimulus(42).block(),
        Testbench::Blockgen.stimulus(42).block()
    );
}

#[test]
fn direct_runners_validate_config() {
    let short_drain = HarnessConfig {
        round_samples: 10,
        drain_cycles: 0,
        ..quick_config()
    };
    let err = round_core::run(Sha256RoundCore::new(), &short_drain).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));

    let no_guard = HarnessConfig {
        done_guard: 0,
        ..quick_config()
    };
    assert!(matches!(
        compress::run(Sha256Compress::new(), &no_guard),
        Err(HarnessError::Config(_))
    ));
    assert!(matches!(
        blockgen::run(MinerBlockgen::new(), &no_guard),
        Err(HarnessError::Config(_))
    ));
}

#[test]
fn minimum_drain_checks_every_sample() {
    let config = HarnessConfig {
        round_samples: 10,
        drain_cycles: 2,
        ..quick_config()
    };
    let report = round_core::run(Sha256RoundCore::new(), &config).unwrap();
    assert_eq!(report.comparisons, 90);
}

#[test]
fn self_check_reports_vectors_checked() {
    let report = harness::run(Testbench::SelfCheck, &quick_config()).unwrap();
    assert_eq!(report.cases, 2);
    assert_eq!(report.comparisons, 2);
}

#[test]
fn invalid_config_rejected_before_running() {
    let config = HarnessConfig {
        drain_cycles: 1,
        ..quick_config()
    };
    let err = run_all([Testbench::RoundCore], &config).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
}

#[test]
fn waveforms_written_to_trace_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = HarnessConfig {
        trace_dir: Some(dir.path().join("traces")),
        ..quick_config()
    };
    run_all([Testbench::Compress, Testbench::RoundCore], &config).unwrap();

    let compress = std::fs::read_to_string(dir.path().join("traces/sha256_compress.vcd")).unwrap();
    assert!(compress.contains("sha256_compress"));
    assert!(compress.contains(" done "));
    assert!(compress.contains("$enddefinitions"));

    let round = std::fs::read_to_string(dir.path().join("traces/round.vcd")).unwrap();
    assert!(round.contains("sha256_round_core"));
    assert!(round.contains(" valid_o "));
}

/// Drives the tail words into the generator in reverse order.
#[derive(Default)]
struct SwappedTail(MinerBlockgen);

impl Evaluate for SwappedTail {
    fn eval(&mut self) {
        self.0.eval();
    }
}

impl BlockGenPorts for SwappedTail {
    fn set_block1_fixed(&mut self, storage: [u32; BLOCK_WORDS]) {
        self.0.set_block1_fixed(storage);
    }

    fn set_tail_fixed(&mut self, mut storage: [u32; TAIL_WORDS]) {
        storage.reverse();
        self.0.set_tail_fixed(storage);
    }

    fn set_nonce(&mut self, nonce: u32) {
        self.0.set_nonce(nonce);
    }

    fn block1_o(&self) -> [u32; BLOCK_WORDS] {
        self.0.block1_o()
    }

    fn block2_o(&self) -> [u32; BLOCK_WORDS] {
        self.0.block2_o()
    }
}

#[test]
fn blockgen_reports_word_order_fault() {
    let err = blockgen::run(SwappedTail::default(), &quick_config()).unwrap_err();
    match err {
        HarnessError::Mismatch { field, index, .. } => {
            assert_eq!(field, "block2_o[W0]");
            assert_eq!(index, 0);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

/// Compression engine wrapper with a configurable `done` fault.
#[derive(Default)]
struct FaultyCompress {
    inner: Sha256Compress,
    never_done: bool,
    stale_done: bool,
    seen_done: bool,
}

impl Evaluate for FaultyCompress {
    fn eval(&mut self) {
        self.inner.eval();
        self.seen_done |= self.inner.done();
    }
}

impl Clocked for FaultyCompress {
    fn set_clk(&mut self, level: bool) {
        self.inner.set_clk(level);
    }

    fn set_rst_n(&mut self, level: bool) {
        if !level {
            self.seen_done = false;
        }
        self.inner.set_rst_n(level);
    }
}

impl CompressPorts for FaultyCompress {
    fn set_state_i(&mut self, storage: [u32; STATE_WORDS]) {
        self.inner.set_state_i(storage);
    }

    fn set_block_i(&mut self, storage: [u32; BLOCK_WORDS]) {
        self.inner.set_block_i(storage);
    }

    fn set_start(&mut self, level: bool) {
        self.inner.set_start(level);
    }

    fn state_o(&self) -> [u32; STATE_WORDS] {
        self.inner.state_o()
    }

    fn done(&self) -> bool {
        if self.never_done {
            false
        } else if self.stale_done {
            self.seen_done
        } else {
            self.inner.done()
        }
    }
}

impl Probe for FaultyCompress {
    fn probes(&self) -> Vec<Signal> {
        self.inner.probes()
    }
}

#[test]
fn compress_times_out_without_done() {
    let dut = FaultyCompress {
        never_done: true,
        ..FaultyCompress::default()
    };
    let config = HarnessConfig {
        done_guard: 200,
        ..quick_config()
    };
    let err = compress::run(dut, &config).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Timeout {
            signal: "done",
            index: 0,
            guard: 200
        }
    ));
    assert_eq!(
        err.to_string(),
        "Timeout waiting for done at idx=0 after 200 cycles"
    );
}

#[test]
fn compress_catches_done_not_cleared_by_start() {
    let dut = FaultyCompress {
        stale_done: true,
        ..FaultyCompress::default()
    };
    let err = compress::run(dut, &quick_config()).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::UnexpectedValid {
            signal: "done",
            index: 1
        }
    ));
    assert_eq!(
        err.to_string(),
        "done asserted at idx=1 with no pending expectation"
    );
}

/// Round core with an extra output register, or a stuck bit on `e_o`.
#[derive(Default)]
struct FaultyRoundCore {
    inner: Sha256RoundCore,
    extra_stage: bool,
    flip_e: bool,
    clk: bool,
    last_clk: bool,
    delayed: (bool, WorkingVars),
}

impl Evaluate for FaultyRoundCore {
    fn eval(&mut self) {
        if self.clk && !self.last_clk {
            self.delayed = (self.inner.valid_o(), self.inner.round_o());
        }
        self.last_clk = self.clk;
        self.inner.eval();
    }
}

impl Clocked for FaultyRoundCore {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
        self.inner.set_clk(level);
    }

    fn set_rst_n(&mut self, level: bool) {
        self.inner.set_rst_n(level);
    }
}

impl RoundCorePorts for FaultyRoundCore {
    fn set_round_i(&mut self, vars: &WorkingVars, k: u32, w: u32) {
        self.inner.set_round_i(vars, k, w);
    }

    fn set_valid_i(&mut self, level: bool) {
        self.inner.set_valid_i(level);
    }

    fn round_o(&self) -> WorkingVars {
        let mut vars = if self.extra_stage {
            self.delayed.1
        } else {
            self.inner.round_o()
        };
        if self.flip_e {
            vars.e ^= 1;
        }
        vars
    }

    fn valid_o(&self) -> bool {
        if self.extra_stage {
            self.delayed.0
        } else {
            self.inner.valid_o()
        }
    }
}

impl Probe for FaultyRoundCore {
    fn probes(&self) -> Vec<Signal> {
        self.inner.probes()
    }
}

#[test]
fn round_core_catches_extra_pipeline_stage() {
    let dut = FaultyRoundCore {
        extra_stage: true,
        ..FaultyRoundCore::default()
    };
    let err = round_core::run(dut, &quick_config()).unwrap_err();
    match err {
        HarnessError::Mismatch {
            field,
            index,
            got,
            expected,
        } => {
            assert_eq!(field, "valid_o");
            assert_eq!((index, got, expected), (0, 0, 1));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn round_core_names_corrupted_variable() {
    let dut = FaultyRoundCore {
        flip_e: true,
        ..FaultyRoundCore::default()
    };
    let err = round_core::run(dut, &quick_config()).unwrap_err();
    match err {
        HarnessError::Mismatch {
            field,
            index,
            got,
            expected,
        } => {
            assert_eq!(field, "e");
            assert_eq!(index, 0);
            assert_eq!(got ^ expected, 1);
        }
        other => panic!("unexpected error {other:?}"),
    }
}
