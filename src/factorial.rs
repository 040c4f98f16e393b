//! Factorials of small integers, as used by the Poisson mass function.

/// The largest `n` whose factorial fits in a `u128`.
pub const MAX_N: u8 = 34;

pub trait Factorial {
    fn get(&self, n: u8) -> u128;
}

#[derive(Default)]
pub struct Calculator;

impl Factorial for Calculator {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_N, "{n}! overflows");
        let mut product = 1u128;
        for i in 2..=n {
            product *= i as u128;
        }
        product
    }
}

const MAX_ENTRIES: usize = MAX_N as usize + 1;

pub struct Lookup {
    entries: [u128; MAX_ENTRIES],
}
impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_N, "{n}! overflows");
        self.entries[n as usize]
    }
}

impl Default for Lookup {
    fn default() -> Self {
        let mut entries = [1u128; MAX_ENTRIES];
        for i in 2..MAX_ENTRIES {
            entries[i] = i as u128 * entries[i - 1];
        }
        Self { entries }
    }
}
