use common::constants::{BLOCK_WORDS, K, ROUNDS, STATE_WORDS};
use common::{pack, unpack};

use super::{Clocked, CompressPorts, EdgeDetector, Evaluate, Probe, Signal};
use crate::reference::ops::{ch, maj, s0_big, s0_word, s1_big, s1_word};

/// Behavioral model of `sha256_compress`.
///
/// A `start` sampled on a rising edge latches `state_i`/`block_i` and clears
/// `done`. Each following edge retires one round, expanding the schedule in a
/// 16-word sliding window. The edge that retires round 63 registers the
/// feed-forward sum into `state_o` and raises `done`.
#[derive(Clone, Debug, Default)]
pub struct Sha256Compress {
    clk: bool,
    rst_n: bool,
    start: bool,
    state_i: [u32; STATE_WORDS],
    block_i: [u32; BLOCK_WORDS],

    edge: EdgeDetector,
    busy: bool,
    round: usize,
    /// a..h
    vars: [u32; STATE_WORDS],
    h_in: [u32; STATE_WORDS],
    /// W[round..round + 16]
    window: [u32; BLOCK_WORDS],

    state_o: [u32; STATE_WORDS],
    done: bool,
}

impl Sha256Compress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    fn posedge(&mut self) {
        if !self.rst_n {
            self.busy = false;
            self.done = false;
            self.round = 0;
            self.state_o = [0; STATE_WORDS];
            return;
        }

        if self.start {
            self.h_in = unpack(&self.state_i);
            self.vars = self.h_in;
            self.window = unpack(&self.block_i);
            self.round = 0;
            self.busy = true;
            self.done = false;
            return;
        }

        if self.busy {
            self.step();
            if self.round == ROUNDS {
                let digest: [u32; STATE_WORDS] =
                    core::array::from_fn(|i| self.h_in[i].wrapping_add(self.vars[i]));
                self.state_o = pack(&digest);
                self.busy = false;
                self.done = true;
            }
        }
    }

    fn step(&mut self) {
        let [a, b, c, d, e, f, g, h] = self.vars;
        let w = self.window[0];
        let t1 = h
            .wrapping_add(s1_big(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(K[self.round])
            .wrapping_add(w);
        let t2 = s0_big(a).wrapping_add(maj(a, b, c));
        self.vars = [t1.wrapping_add(t2), a, b, c, d.wrapping_add(t1), e, f, g];

        let next = s1_word(self.window[14])
            .wrapping_add(self.window[9])
            .wrapping_add(s0_word(self.window[1]))
            .wrapping_add(self.window[0]);
        self.window.rotate_left(1);
        self.window[BLOCK_WORDS - 1] = next;
        self.round += 1;
    }
}

impl Evaluate for Sha256Compress {
    fn eval(&mut self) {
        if self.edge.rising(self.clk) {
            self.posedge();
        }
    }
}

impl Clocked for Sha256Compress {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
    }

    fn set_rst_n(&mut self, level: bool) {
        self.rst_n = level;
    }
}

impl CompressPorts for Sha256Compress {
    fn set_state_i(&mut self, storage: [u32; STATE_WORDS]) {
        self.state_i = storage;
    }

    fn set_block_i(&mut self, storage: [u32; BLOCK_WORDS]) {
        self.block_i = storage;
    }

    fn set_start(&mut self, level: bool) {
        self.start = level;
    }

    fn state_o(&self) -> [u32; STATE_WORDS] {
        self.state_o
    }

    fn done(&self) -> bool {
        self.done
    }
}

impl Probe for Sha256Compress {
    fn probes(&self) -> Vec<Signal> {
        vec![
            Signal::bit("clk", self.clk),
            Signal::bit("rst_n", self.rst_n),
            Signal::bit("start", self.start),
            Signal::wide("state_i", &self.state_i),
            Signal::wide("block_i", &self.block_i),
            Signal::word("round", self.round as u32),
            Signal::bit("busy", self.busy),
            Signal::wide("state_o", &self.state_o),
            Signal::bit("done", self.done),
        ]
    }
}
