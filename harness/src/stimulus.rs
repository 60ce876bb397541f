//! Seeded, reproducible test-vector generation.
//!
//! Each testbench draws from its own ChaCha stream derived from the shared
//! seed, so running one testbench alone yields the same vectors as running it
//! as part of a full pass.

use common::{BlockWords, TailValue, WideWord};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::reference::{RoundInput, WorkingVars};

#[derive(Clone, Debug)]
pub struct Stimulus {
    rng: ChaCha20Rng,
}

impl Stimulus {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Independent stream `stream` of the generator seeded with `seed`.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }

    /// A uniformly distributed 32-bit word.
    pub fn word(&mut self) -> u32 {
        self.rng.gen()
    }

    /// Returns `true` with probability `percent / 100`.
    pub fn chance(&mut self, percent: u8) -> bool {
        self.rng.gen_range(0..100u8) < percent
    }

    pub fn wide<const N: usize>(&mut self) -> WideWord<N> {
        WideWord::new(core::array::from_fn(|_| self.word()))
    }

    pub fn block(&mut self) -> BlockWords {
        self.wide()
    }

    /// Drawn in hi, mid, lo order.
    pub fn tail(&mut self) -> TailValue {
        self.wide()
    }

    /// Random a..h, k and w, drawn in that order.
    pub fn round_input(&mut self) -> RoundInput {
        let vars = WorkingVars::from(core::array::from_fn::<u32, 8, _>(|_| self.word()));
        RoundInput {
            vars,
            k: self.word(),
            w: self.word(),
        }
    }
}
