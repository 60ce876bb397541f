use super::{Clocked, EdgeDetector, Evaluate, Probe, RoundCorePorts, Signal};
use crate::reference::ops::{ch, maj, s0_big, s1_big};
use crate::reference::WorkingVars;

/// 3:2 carry-save adder: `x + y + z == sum + carry (mod 2^32)`.
#[inline]
fn csa(x: u32, y: u32, z: u32) -> (u32, u32) {
    let sum = x ^ y ^ z;
    let carry = ((x & y) | (x & z) | (y & z)) << 1;
    (sum, carry)
}

/// Stage-1 register: the new `a` and `e` held as unresolved sum/carry pairs.
#[derive(Clone, Copy, Debug, Default)]
struct CarrySaveStage {
    valid: bool,
    a_sum: u32,
    a_carry: u32,
    e_sum: u32,
    e_carry: u32,
    /// b'..d' and f'..h', already final.
    b: u32,
    c: u32,
    d: u32,
    f: u32,
    g: u32,
    h: u32,
}

/// Behavioral model of `sha256_round_core`, a two-stage pipeline.
///
/// Stage 1 reduces `T1 + T2` and `d + T1` through carry-save adders; stage 2
/// resolves the carries into the output registers. `valid` rides along, so
/// outputs reflect the sample applied two rising edges earlier.
#[derive(Clone, Debug, Default)]
pub struct Sha256RoundCore {
    clk: bool,
    rst_n: bool,
    valid_i: bool,
    vars_i: WorkingVars,
    k_i: u32,
    w_i: u32,

    edge: EdgeDetector,
    stage1: CarrySaveStage,
    vars_o: WorkingVars,
    valid_o: bool,
}

impl Sha256RoundCore {
    pub fn new() -> Self {
        Self::default()
    }

    fn reduce(&self) -> CarrySaveStage {
        let v = &self.vars_i;
        let (s, c) = csa(v.h, self.k_i, self.w_i);
        let (s, c) = csa(s, c, s1_big(v.e));
        let (t1_sum, t1_carry) = csa(s, c, ch(v.e, v.f, v.g));

        let (s, c) = csa(t1_sum, t1_carry, s0_big(v.a));
        let (a_sum, a_carry) = csa(s, c, maj(v.a, v.b, v.c));
        let (e_sum, e_carry) = csa(v.d, t1_sum, t1_carry);

        CarrySaveStage {
            valid: self.valid_i,
            a_sum,
            a_carry,
            e_sum,
            e_carry,
            b: v.a,
            c: v.b,
            d: v.c,
            f: v.e,
            g: v.f,
            h: v.g,
        }
    }

    fn posedge(&mut self) {
        if !self.rst_n {
            self.stage1 = CarrySaveStage::default();
            self.vars_o = WorkingVars::default();
            self.valid_o = false;
            return;
        }

        let s = self.stage1;
        self.vars_o = WorkingVars {
            a: s.a_sum.wrapping_add(s.a_carry),
            b: s.b,
            c: s.c,
            d: s.d,
            e: s.e_sum.wrapping_add(s.e_carry),
            f: s.f,
            g: s.g,
            h: s.h,
        };
        self.valid_o = s.valid;
        self.stage1 = self.reduce();
    }
}

impl Evaluate for Sha256RoundCore {
    fn eval(&mut self) {
        if self.edge.rising(self.clk) {
            self.posedge();
        }
    }
}

impl Clocked for Sha256RoundCore {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
    }

    fn set_rst_n(&mut self, level: bool) {
        self.rst_n = level;
    }
}

impl RoundCorePorts for Sha256RoundCore {
    fn set_round_i(&mut self, vars: &WorkingVars, k: u32, w: u32) {
        self.vars_i = *vars;
        self.k_i = k;
        self.w_i = w;
    }

    fn set_valid_i(&mut self, level: bool) {
        self.valid_i = level;
    }

    fn round_o(&self) -> WorkingVars {
        self.vars_o
    }

    fn valid_o(&self) -> bool {
        self.valid_o
    }
}

impl Probe for Sha256RoundCore {
    fn probes(&self) -> Vec<Signal> {
        let mut probes = vec![
            Signal::bit("clk", self.clk),
            Signal::bit("rst_n", self.rst_n),
            Signal::bit("valid_i", self.valid_i),
        ];
        const INPUTS: [&str; 8] = ["a_i", "b_i", "c_i", "d_i", "e_i", "f_i", "g_i", "h_i"];
        const OUTPUTS: [&str; 8] = ["a_o", "b_o", "c_o", "d_o", "e_o", "f_o", "g_o", "h_o"];
        for (name, value) in INPUTS.into_iter().zip(self.vars_i.to_array()) {
            probes.push(Signal::word(name, value));
        }
        probes.push(Signal::word("k_i", self.k_i));
        probes.push(Signal::word("w_i", self.w_i));
        probes.push(Signal::bit("stage1_valid", self.stage1.valid));
        for (name, value) in OUTPUTS.into_iter().zip(self.vars_o.to_array()) {
            probes.push(Signal::word(name, value));
        }
        probes.push(Signal::bit("valid_o", self.valid_o));
        probes
    }
}
