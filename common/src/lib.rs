//! Types and constants shared by the SHA-256d reference models and the
//! hardware harness.

pub mod constants;
pub mod wide;

pub use wide::{pack, unpack, BlockWords, HashState, TailValue, WideWord, WidthError, Word32};
