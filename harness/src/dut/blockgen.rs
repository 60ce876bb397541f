use common::constants::{BLOCK_WORDS, HEADER_BIT_LENGTH, PAD_TERMINATOR, TAIL_WORDS};

use super::{BlockGenPorts, Evaluate};

/// Behavioral model of `miner_blockgen`.
///
/// Storage-order ports: `block2_o[15]` is W0, `block2_o[0]` is W15.
#[derive(Clone, Debug, Default)]
pub struct MinerBlockgen {
    block1_fixed: [u32; BLOCK_WORDS],
    tail_fixed: [u32; TAIL_WORDS],
    nonce: u32,
    block1_o: [u32; BLOCK_WORDS],
    block2_o: [u32; BLOCK_WORDS],
}

impl MinerBlockgen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluate for MinerBlockgen {
    fn eval(&mut self) {
        self.block1_o = self.block1_fixed;

        let mut block2 = [0u32; BLOCK_WORDS];
        // W0..W2 = tail[95:64], tail[63:32], tail[31:0]
        block2[15] = self.tail_fixed[2];
        block2[14] = self.tail_fixed[1];
        block2[13] = self.tail_fixed[0];
        block2[12] = self.nonce;
        block2[11] = PAD_TERMINATOR;
        block2[0] = HEADER_BIT_LENGTH;
        self.block2_o = block2;
    }
}

impl BlockGenPorts for MinerBlockgen {
    fn set_block1_fixed(&mut self, storage: [u32; BLOCK_WORDS]) {
        self.block1_fixed = storage;
    }

    fn set_tail_fixed(&mut self, storage: [u32; TAIL_WORDS]) {
        self.tail_fixed = storage;
    }

    fn set_nonce(&mut self, nonce: u32) {
        self.nonce = nonce;
    }

    fn block1_o(&self) -> [u32; BLOCK_WORDS] {
        self.block1_o
    }

    fn block2_o(&self) -> [u32; BLOCK_WORDS] {
        self.block2_o
    }
}
