//! Port contracts of the devices under test.
//!
//! Wide ports are exchanged in simulator storage order: index 0 holds the
//! least significant 32 bits. Callers convert with [`common::pack`] /
//! [`common::unpack`] (or [`common::WideWord::to_storage`] /
//! [`common::WideWord::from_storage`]) at every boundary.
//!
//! The bundled models in this module implement the contracts so the
//! testbenches run without an external simulator.

mod blockgen;
mod compress;
mod round_core;

pub use blockgen::MinerBlockgen;
pub use compress::Sha256Compress;
pub use round_core::Sha256RoundCore;

use common::constants::{BLOCK_WORDS, STATE_WORDS, TAIL_WORDS};

use crate::reference::WorkingVars;

pub trait Evaluate {
    /// Settles combinational logic and samples clock edges.
    fn eval(&mut self);
}

pub trait Clocked: Evaluate {
    fn set_clk(&mut self, level: bool);
    /// Active-low reset.
    fn set_rst_n(&mut self, level: bool);
}

/// A named signal captured for waveform output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub name: &'static str,
    pub width: u32,
    /// Storage order, least significant word first.
    pub words: Vec<u32>,
}

impl Signal {
    pub fn bit(name: &'static str, level: bool) -> Self {
        Self {
            name,
            width: 1,
            words: vec![level as u32],
        }
    }

    pub fn word(name: &'static str, value: u32) -> Self {
        Self {
            name,
            width: 32,
            words: vec![value],
        }
    }

    pub fn wide(name: &'static str, storage: &[u32]) -> Self {
        Self {
            name,
            width: 32 * storage.len() as u32,
            words: storage.to_vec(),
        }
    }
}

pub trait Probe {
    /// Current value of every traced port, in a stable order.
    fn probes(&self) -> Vec<Signal>;
}

/// Combinational block-layout generator.
pub trait BlockGenPorts: Evaluate {
    fn set_block1_fixed(&mut self, storage: [u32; BLOCK_WORDS]);
    fn set_tail_fixed(&mut self, storage: [u32; TAIL_WORDS]);
    fn set_nonce(&mut self, nonce: u32);
    fn block1_o(&self) -> [u32; BLOCK_WORDS];
    fn block2_o(&self) -> [u32; BLOCK_WORDS];
}

/// Multi-cycle compression engine with a `start`/`done` handshake.
pub trait CompressPorts: Clocked {
    fn set_state_i(&mut self, storage: [u32; STATE_WORDS]);
    fn set_block_i(&mut self, storage: [u32; BLOCK_WORDS]);
    fn set_start(&mut self, level: bool);
    fn state_o(&self) -> [u32; STATE_WORDS];
    /// Level; stays high until the next `start`.
    fn done(&self) -> bool;
}

/// Pipelined single-round core; accepts one sample per cycle.
pub trait RoundCorePorts: Clocked {
    /// Drives `a_i..h_i`, `k_i` and `w_i`.
    fn set_round_i(&mut self, vars: &WorkingVars, k: u32, w: u32);
    fn set_valid_i(&mut self, level: bool);
    /// Reads `a_o..h_o`.
    fn round_o(&self) -> WorkingVars;
    fn valid_o(&self) -> bool;
}

/// Rising-edge detector shared by the clocked models.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub(crate) fn rising(&mut self, clk: bool) -> bool {
        let rose = clk && !self.last;
        self.last = clk;
        rose
    }
}
