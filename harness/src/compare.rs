//! Field-level comparison of DUT outputs against reference expectations.
//!
//! Every check returns on the first differing field so a run stops at the
//! earliest observable failure.

use common::{HashState, WideWord};
use itertools::Itertools;

use crate::error::{HarnessError, Result};

#[derive(Debug, Default)]
pub struct Scoreboard {
    comparisons: u64,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of individual field comparisons that passed.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn word(&mut self, field: &str, index: usize, got: u32, expected: u32) -> Result<()> {
        if got != expected {
            return Err(HarnessError::Mismatch {
                field: field.to_string(),
                index,
                got,
                expected,
            });
        }
        self.comparisons += 1;
        Ok(())
    }

    pub fn flag(&mut self, field: &str, index: usize, got: bool, expected: bool) -> Result<()> {
        self.word(field, index, got as u32, expected as u32)
    }

    /// Compares a wide value word by word; fields are reported as
    /// `{field}[W{i}]` with `W0` the most significant word.
    pub fn wide<const N: usize>(
        &mut self,
        field: &str,
        index: usize,
        got: &WideWord<N>,
        expected: &WideWord<N>,
    ) -> Result<()> {
        for (i, (&g, &e)) in got.words().iter().zip(expected.words()).enumerate() {
            if g != e {
                return self.word(&format!("{field}[W{i}]"), index, g, e);
            }
            self.comparisons += 1;
        }
        Ok(())
    }

    /// Compares a whole hash state, reporting both states on mismatch.
    pub fn state(
        &mut self,
        field: &'static str,
        index: usize,
        got: &HashState,
        expected: &HashState,
    ) -> Result<()> {
        if got != expected {
            return Err(HarnessError::StateMismatch {
                field,
                index,
                got: *got,
                expected: *expected,
                differing: got.diff_indices(expected),
            });
        }
        self.comparisons += 1;
        Ok(())
    }

    /// Compares named fields pairwise, in order.
    pub fn fields<I>(&mut self, index: usize, got: I, expected: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'static str, u32)>,
    {
        for ((name, g), (_, e)) in got.into_iter().zip_eq(expected) {
            self.word(name, index, g, e)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_passing_comparisons() {
        let mut board = Scoreboard::new();
        board.word("x", 0, 1, 1).unwrap();
        board.flag("valid_o", 0, true, true).unwrap();
        board
            .wide("block", 0, &WideWord::new([1, 2, 3]), &WideWord::new([1, 2, 3]))
            .unwrap();
        assert_eq!(board.comparisons(), 5);
    }

    #[test]
    fn mismatch_format() {
        let mut board = Scoreboard::new();
        let err = board.word("e", 17, 0xdead_beef, 0x1).unwrap_err();
        assert_eq!(err.to_string(), "e mismatch at idx=17 got=deadbeef exp=00000001");
    }

    #[test]
    fn wide_names_first_differing_word() {
        let mut board = Scoreboard::new();
        let err = board
            .wide(
                "block2_o",
                3,
                &WideWord::new([1, 9, 9]),
                &WideWord::new([1, 2, 3]),
            )
            .unwrap_err();
        match err {
            HarnessError::Mismatch {
                field,
                index,
                got,
                expected,
            } => {
                assert_eq!(field, "block2_o[W1]");
                assert_eq!((index, got, expected), (3, 9, 2));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn state_mismatch_lists_words() {
        let mut board = Scoreboard::new();
        let expected = HashState::new([0; 8]);
        let mut got = expected;
        got[7] = 1;
        let err = board.state("state_o", 2, &got, &expected).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("state_o mismatch at idx=2 (words [7] differ)"));
        assert!(message.contains("got: 00000000 00000000 00000000 00000000 00000000 00000000 00000000 00000001"));
    }

    #[test]
    fn fields_stop_at_first_difference() {
        let mut board = Scoreboard::new();
        let got = [("a", 1), ("b", 5), ("c", 7)];
        let expected = [("a", 1), ("b", 2), ("c", 3)];
        let err = board.fields(0, got, expected).unwrap_err();
        assert!(err.to_string().starts_with("b mismatch"));
        assert_eq!(board.comparisons(), 1);
    }
}
