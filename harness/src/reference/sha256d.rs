//! SHA-256d of an 80-byte mining header, composed from the block-layout and
//! compression reference models.

use common::constants::{BLOCK_WORDS, DIGEST_BIT_LENGTH, HEADER_BYTES, PAD_TERMINATOR, STATE_WORDS};
use common::{BlockWords, HashState, TailValue};

use super::blockgen::second_block;
use super::compress::{compress, sha256_iv};

/// Bitcoin block 0 header.
pub const GENESIS_HEADER: [u8; HEADER_BYTES] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x3b, 0xa3, 0xed, 0xfd, 0x7a, 0x7b, 0x12, 0xb2, 0x7a, 0xc7, 0x2c, 0x3e,
    0x67, 0x76, 0x8f, 0x61, 0x7f, 0xc8, 0x1b, 0xc3, 0x88, 0x8a, 0x51, 0x32, 0x3a, 0x9f, 0xb8, 0xaa,
    0x4b, 0x1e, 0x5e, 0x4a, 0x29, 0xab, 0x5f, 0x49, 0xff, 0xff, 0x00, 0x1d, 0x1d, 0xac, 0x2b, 0x7c,
];

/// SHA-256d of [`GENESIS_HEADER`] in digest byte order.
pub const GENESIS_SHA256D: [u8; 32] = [
    0x6f, 0xe2, 0x8c, 0x0a, 0xb6, 0xf1, 0xb3, 0x72, 0xc1, 0xa6, 0xa2, 0x46, 0xae, 0x63, 0xf7, 0x4f,
    0x93, 0x1e, 0x83, 0x65, 0xe1, 0x5a, 0x08, 0x9c, 0x68, 0xd6, 0x19, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// A header split the way the mining pipeline consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderParts {
    pub block1: BlockWords,
    pub tail: TailValue,
    pub nonce: u32,
}

impl HeaderParts {
    pub fn split(header: &[u8; HEADER_BYTES]) -> Self {
        let word = |i: usize| {
            u32::from_be_bytes([
                header[4 * i],
                header[4 * i + 1],
                header[4 * i + 2],
                header[4 * i + 3],
            ])
        };
        Self {
            block1: BlockWords::new(core::array::from_fn(word)),
            tail: TailValue::new(core::array::from_fn(|i| word(BLOCK_WORDS + i))),
            nonce: word(BLOCK_WORDS + 3),
        }
    }
}

/// Pads a 256-bit digest into the single block hashed by the second pass.
pub fn digest_block(digest: &HashState) -> BlockWords {
    let mut block = BlockWords::ZERO;
    block.0[..STATE_WORDS].copy_from_slice(digest.words());
    block[STATE_WORDS] = PAD_TERMINATOR;
    block[BLOCK_WORDS - 1] = DIGEST_BIT_LENGTH;
    block
}

/// Midstate after the first 64 header bytes; constant across nonces.
pub fn midstate(block1: &BlockWords) -> HashState {
    compress(&sha256_iv(), block1)
}

pub fn sha256d_parts(parts: &HeaderParts) -> HashState {
    let first = compress(&midstate(&parts.block1), &second_block(&parts.tail, parts.nonce));
    compress(&sha256_iv(), &digest_block(&first))
}

pub fn sha256d_header(header: &[u8; HEADER_BYTES]) -> [u8; 32] {
    let digest = sha256d_parts(&HeaderParts::split(header));
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest.to_be_bytes());
    out
}
