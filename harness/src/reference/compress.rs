use common::constants::{BLOCK_WORDS, K, PAD_TERMINATOR, ROUNDS, SHA256_IV};
use common::{BlockWords, HashState};

use super::ops::{s0_word, s1_word};
use super::round::{round, RoundInput, WorkingVars};

/// SHA-256("abc")
pub const ABC_DIGEST: [u32; 8] = [
    0xba7816bf, 0x8f01cfea, 0x414140de, 0x5dae2223, 0xb00361a3, 0x96177a9c, 0xb410ff61, 0xf20015ad,
];

pub fn sha256_iv() -> HashState {
    HashState::new(SHA256_IV)
}

/// The single padded block encoding the 3-byte message "abc".
pub fn abc_block() -> BlockWords {
    let mut block = BlockWords::ZERO;
    block[0] = u32::from_be_bytes([b'a', b'b', b'c', 0]) | (PAD_TERMINATOR >> 24);
    block[BLOCK_WORDS - 1] = 24;
    block
}

/// Expands the 16 block words into the 64-word message schedule.
pub fn message_schedule(block: &BlockWords) -> [u32; ROUNDS] {
    let mut w = [0u32; ROUNDS];
    w[..BLOCK_WORDS].copy_from_slice(block.words());
    for i in BLOCK_WORDS..ROUNDS {
        // σ₁(w[i-2]) + w[i-7] + σ₀(w[i-15]) + w[i-16]
        w[i] = s1_word(w[i - 2])
            .wrapping_add(w[i - 7])
            .wrapping_add(s0_word(w[i - 15]))
            .wrapping_add(w[i - 16]);
    }
    w
}

/// Single-block SHA-256 compression, including the feed-forward addition.
pub fn compress(state: &HashState, block: &BlockWords) -> HashState {
    let w = message_schedule(block);
    let mut vars = WorkingVars::from(state);
    for (&k, &w) in K.iter().zip(w.iter()) {
        vars = round(&RoundInput { vars, k, w });
    }
    state.wrapping_add(&HashState::from(vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::Stimulus;
    use sha2::digest::generic_array::GenericArray;

    #[test]
    fn abc_block_layout() {
        let block = abc_block();
        assert_eq!(block[0], 0x6162_6380);
        assert!(block.words()[1..15].iter().all(|&w| w == 0));
        assert_eq!(block[15], 0x0000_0018);
    }

    #[test]
    fn abc_digest() {
        assert_eq!(compress(&sha256_iv(), &abc_block()), HashState::new(ABC_DIGEST));
    }

    #[test]
    fn schedule_extends_block() {
        let w = message_schedule(&abc_block());
        assert_eq!(w[0], 0x6162_6380);
        assert_eq!(w[16], 0x6162_6380);
        assert_eq!(w[17], 0x000f_0000);
        assert_eq!(w[63], 0x12b1_edeb);
    }

    #[test]
    fn matches_sha2_compress256() {
        let mut stimulus = Stimulus::new(9);
        for _ in 0..64 {
            let state: HashState = stimulus.wide();
            let block = stimulus.block();

            let mut oracle = state.0;
            let bytes = block.to_be_bytes();
            sha2::compress256(&mut oracle, &[GenericArray::clone_from_slice(&bytes)]);

            assert_eq!(compress(&state, &block), HashState::new(oracle));
        }
    }
}
