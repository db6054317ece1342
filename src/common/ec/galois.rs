use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

// Galois field GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct G(pub u8);

impl G {
    pub const ZERO: Self = G(0);
    pub const ONE: Self = G(1);

    // Returns the generator 2 raised to the given power
    pub fn gen_pow(pow: usize) -> Self {
        G(EXP_TABLE[pow % 255])
    }

    pub fn log(self) -> usize {
        debug_assert!(self.0 != 0, "Log of zero is undefined");
        LOG_TABLE[self.0 as usize] as usize
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        G(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Sub for G {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        G(self.0 ^ rhs.0)
    }
}

impl Mul for G {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.0 == 0 || rhs.0 == 0 {
            return G::ZERO;
        }
        G(EXP_TABLE[self.log() + rhs.log()])
    }
}

impl MulAssign for G {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for G {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        assert!(rhs.0 != 0, "Division by zero in GF(256)");
        if self.0 == 0 {
            return G::ZERO;
        }
        G(EXP_TABLE[(self.log() + 255 - rhs.log()) % 255])
    }
}


// Global constants
//------------------------------------------------------------------------------

// Low byte of the primitive polynomial 0x11D
const PRIMITIVE_POLY: u16 = 0x1d;

pub static EXP_TABLE: [u8; 512] = build_exp_table();

pub static LOG_TABLE: [u8; 256] = build_log_table();

// Doubled in length so that exp[log a + log b] needs no modulo
const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut val: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = val as u8;
        table[i + 255] = val as u8;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= 0x100 | PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut val: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[val as usize] = i as u8;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= 0x100 | PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}
