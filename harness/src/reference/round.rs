use common::HashState;

use super::ops::{ch, maj, s0_big, s1_big};

/// The eight SHA-256 working variables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkingVars {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub e: u32,
    pub f: u32,
    pub g: u32,
    pub h: u32,
}

impl WorkingVars {
    pub const NAMES: [&'static str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

    pub fn to_array(self) -> [u32; 8] {
        [self.a, self.b, self.c, self.d, self.e, self.f, self.g, self.h]
    }

    /// `(name, value)` pairs in a..h order, for field-level comparison.
    pub fn fields(&self) -> [(&'static str, u32); 8] {
        let values = self.to_array();
        core::array::from_fn(|i| (Self::NAMES[i], values[i]))
    }
}

impl From<[u32; 8]> for WorkingVars {
    fn from([a, b, c, d, e, f, g, h]: [u32; 8]) -> Self {
        Self {
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            h,
        }
    }
}

impl From<&HashState> for WorkingVars {
    fn from(state: &HashState) -> Self {
        Self::from(state.0)
    }
}

impl From<WorkingVars> for HashState {
    fn from(vars: WorkingVars) -> Self {
        HashState::new(vars.to_array())
    }
}

/// Inputs of a single round: the working variables, `K[t]` and `W[t]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundInput {
    pub vars: WorkingVars,
    pub k: u32,
    pub w: u32,
}

/// One SHA-256 round.
///
/// `T1 = h + Σ₁(e) + Ch(e,f,g) + k + w`, `T2 = Σ₀(a) + Maj(a,b,c)`, then the
/// variables shift down with `a' = T1 + T2` and `e' = d + T1`.
pub fn round(input: &RoundInput) -> WorkingVars {
    let v = &input.vars;
    let t1 = v
        .h
        .wrapping_add(s1_big(v.e))
        .wrapping_add(ch(v.e, v.f, v.g))
        .wrapping_add(input.k)
        .wrapping_add(input.w);
    let t2 = s0_big(v.a).wrapping_add(maj(v.a, v.b, v.c));

    WorkingVars {
        a: t1.wrapping_add(t2),
        b: v.a,
        c: v.b,
        d: v.c,
        e: v.d.wrapping_add(t1),
        f: v.e,
        g: v.f,
        h: v.g,
    }
}
