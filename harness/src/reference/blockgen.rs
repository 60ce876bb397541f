use common::constants::{BLOCK_WORDS, HEADER_BIT_LENGTH, PAD_TERMINATOR};
use common::{BlockWords, TailValue};

/// Expected outputs of the block-layout generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    /// Passthrough of `block1_fixed`.
    pub block1_out: BlockWords,
    pub block2: BlockWords,
}

/// Second 512-bit block of an 80-byte header: the 12 trailing header bytes,
/// the nonce, then SHA-256 padding for a 640-bit message.
///
/// | word  | value              |
/// |-------|--------------------|
/// | 0..=2 | tail hi, mid, lo   |
/// | 3     | nonce              |
/// | 4     | `0x8000_0000`      |
/// | 5..=14| zero               |
/// | 15    | `0x0000_0280`      |
pub fn second_block(tail: &TailValue, nonce: u32) -> BlockWords {
    let mut block = BlockWords::ZERO;
    block[0] = tail.hi();
    block[1] = tail.mid();
    block[2] = tail.lo();
    block[3] = nonce;
    block[4] = PAD_TERMINATOR;
    block[BLOCK_WORDS - 1] = HEADER_BIT_LENGTH;
    block
}

pub fn block_layout(block1: &BlockWords, tail: &TailValue, nonce: u32) -> BlockLayout {
    BlockLayout {
        block1_out: *block1,
        block2: second_block(tail, nonce),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_block_words() {
        let tail = TailValue::from_fields(0x1111_1111, 0x2222_2222, 0x3333_3333);
        let block = second_block(&tail, 0xdead_beef);
        assert_eq!(
            block.words(),
            &[
                0x1111_1111,
                0x2222_2222,
                0x3333_3333,
                0xdead_beef,
                0x8000_0000,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0x0000_0280,
            ]
        );
    }

    #[test]
    fn block1_passes_through() {
        let block1 = BlockWords::new(core::array::from_fn(|i| 0x0101_0101 * i as u32));
        let layout = block_layout(&block1, &TailValue::ZERO, 0);
        assert_eq!(layout.block1_out, block1);
    }
}
