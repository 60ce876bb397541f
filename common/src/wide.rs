//! Wide multi-word values and the mapping between their numeric order and the
//! storage order used on hardware ports.
//!
//! Numerically, element 0 of a [`WideWord`] is the most significant 32-bit
//! word. A simulator exposes an N x 32-bit port as an array whose index 0 holds
//! the *least* significant word, so every value crossing a DUT boundary has to
//! go through [`pack`] on the way in and [`unpack`] on the way out.

use core::fmt;
use core::ops::{Index, IndexMut};

use thiserror::Error;

use crate::constants::{BLOCK_WORDS, STATE_WORDS, TAIL_WORDS};

pub type Word32 = u32;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthError {
    #[error("Invalid byte length, expected {expected} bytes but got {got}")]
    InvalidByteLength { expected: usize, got: usize },
}

/// Converts a numeric (most significant word first) sequence into port
/// storage order: `storage[i] = numeric[N - 1 - i]`.
pub fn pack<const N: usize>(numeric: &[Word32; N]) -> [Word32; N] {
    core::array::from_fn(|i| numeric[N - 1 - i])
}

/// Inverse of [`pack`].
pub fn unpack<const N: usize>(storage: &[Word32; N]) -> [Word32; N] {
    core::array::from_fn(|i| storage[N - 1 - i])
}

/// An N x 32-bit value held in big-endian numeric order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WideWord<const N: usize>(pub [Word32; N]);

/// A 512-bit message block.
pub type BlockWords = WideWord<BLOCK_WORDS>;
/// The 96-bit header tail.
pub type TailValue = WideWord<TAIL_WORDS>;
/// The eight chaining variables of SHA-256.
pub type HashState = WideWord<STATE_WORDS>;

impl<const N: usize> WideWord<N> {
    pub const ZERO: Self = Self([0; N]);

    pub const fn new(words: [Word32; N]) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[Word32; N] {
        &self.0
    }

    /// Port-side representation (least significant word at index 0).
    pub fn to_storage(&self) -> [Word32; N] {
        pack(&self.0)
    }

    pub fn from_storage(storage: &[Word32; N]) -> Self {
        Self(unpack(storage))
    }

    /// Reads `4 * N` bytes as big-endian 32-bit words.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, WidthError> {
        if bytes.len() != 4 * N {
            return Err(WidthError::InvalidByteLength {
                expected: 4 * N,
                got: bytes.len(),
            });
        }
        let mut words = [0u32; N];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Self(words))
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    /// Element-wise wrapping addition, as used for the SHA-256 feed-forward.
    pub fn wrapping_add(&self, other: &Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].wrapping_add(other.0[i])))
    }

    /// Indices of the words that differ from `other`.
    pub fn diff_indices(&self, other: &Self) -> Vec<usize> {
        (0..N).filter(|&i| self.0[i] != other.0[i]).collect()
    }
}

impl TailValue {
    pub const fn from_fields(hi: Word32, mid: Word32, lo: Word32) -> Self {
        Self([hi, mid, lo])
    }

    /// Bits 95..64.
    pub fn hi(&self) -> Word32 {
        self.0[0]
    }

    /// Bits 63..32.
    pub fn mid(&self) -> Word32 {
        self.0[1]
    }

    /// Bits 31..0.
    pub fn lo(&self) -> Word32 {
        self.0[2]
    }
}

impl<const N: usize> Default for WideWord<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[Word32; N]> for WideWord<N> {
    fn from(words: [Word32; N]) -> Self {
        Self(words)
    }
}

impl<const N: usize> Index<usize> for WideWord<N> {
    type Output = Word32;

    fn index(&self, index: usize) -> &Word32 {
        &self.0[index]
    }
}

impl<const N: usize> IndexMut<usize> for WideWord<N> {
    fn index_mut(&mut self, index: usize) -> &mut Word32 {
        &mut self.0[index]
    }
}

impl<const N: usize> fmt::Display for WideWord<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word:08x}")?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for WideWord<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideWord<{N}>[{self}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn storage_index_zero_is_least_significant() {
        let tail = TailValue::from_fields(0xaaaa_aaaa, 0xbbbb_bbbb, 0xcccc_cccc);
        assert_eq!(tail.to_storage(), [0xcccc_cccc, 0xbbbb_bbbb, 0xaaaa_aaaa]);

        let block = BlockWords::new(core::array::from_fn(|i| i as u32));
        let storage = block.to_storage();
        assert_eq!(storage[15], 0);
        assert_eq!(storage[0], 15);
    }

    #[test]
    fn from_be_bytes_rejects_wrong_length() {
        assert_eq!(
            HashState::from_be_bytes(&[0u8; 31]),
            Err(WidthError::InvalidByteLength {
                expected: 32,
                got: 31
            })
        );
        let state = HashState::from_be_bytes(&[0x01; 32]).unwrap();
        assert_eq!(state[7], 0x0101_0101);
        assert_eq!(state.to_be_bytes(), vec![0x01; 32]);
    }

    #[test]
    fn display_matches_state_dump_format() {
        let state = HashState::new([1, 2, 3, 4, 5, 6, 7, 0xdeadbeef]);
        assert_eq!(
            state.to_string(),
            "00000001 00000002 00000003 00000004 00000005 00000006 00000007 deadbeef"
        );
    }

    #[test]
    fn diff_indices_reports_differing_words() {
        let a = HashState::new([0; 8]);
        let mut b = a;
        b[3] = 1;
        b[7] = 2;
        assert_eq!(a.diff_indices(&b), vec![3, 7]);
    }

    proptest! {
        #[test]
        fn unpack_inverts_pack_block(words in proptest::array::uniform16(any::<u32>())) {
            prop_assert_eq!(unpack(&pack(&words)), words);
            prop_assert_eq!(pack(&unpack(&words)), words);
        }

        #[test]
        fn unpack_inverts_pack_state(words in proptest::array::uniform8(any::<u32>())) {
            let value = HashState::new(words);
            prop_assert_eq!(HashState::from_storage(&value.to_storage()), value);
        }

        #[test]
        fn unpack_inverts_pack_tail(words in proptest::array::uniform3(any::<u32>())) {
            prop_assert_eq!(unpack(&pack(&words)), words);
        }
    }
}
