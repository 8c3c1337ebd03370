use crate::utils::error::{LoreError, Result};

/// Terms 0..=92 of the 1, 1, 2, ... sequence fit in a `u64`.
pub const MAX_FIB_TERMS: usize = 93;

/// First `n` Fibonacci numbers starting at 1, 1.
pub fn fib_sequence(n: usize) -> Result<Vec<u64>> {
    if n > MAX_FIB_TERMS {
        return Err(LoreError::FibonacciOverflow { terms: n });
    }

    let mut seq = Vec::with_capacity(n);
    for i in 0..n {
        let term = if i < 2 { 1 } else { seq[i - 1] + seq[i - 2] };
        seq.push(term);
    }
    Ok(seq)
}

/// First `n` Fibonacci numbers reduced modulo `modulus`, for any `n`.
///
/// `fib_residues(n, m)[i] == fib_sequence(n)[i] % m` wherever the latter exists.
pub fn fib_residues(n: usize, modulus: u8) -> Vec<u8> {
    let m = u16::from(modulus.max(1));
    let mut seq: Vec<u8> = Vec::with_capacity(n);
    for i in 0..n {
        let term = if i < 2 {
            1 % m
        } else {
            (u16::from(seq[i - 1]) + u16::from(seq[i - 2])) % m
        };
        seq.push(term as u8);
    }
    seq
}

/// φ = (1 + √5) / 2
pub fn golden_ratio() -> f64 {
    (1.0 + 5f64.sqrt()) / 2.0
}

/// `x` is a Fibonacci number iff `5x² + 4` or `5x² - 4` is a perfect square.
pub fn is_fibonacci(x: u64) -> bool {
    let x = u128::from(x);
    match x.checked_mul(x).and_then(|sq| sq.checked_mul(5)) {
        Some(five_sq) => {
            five_sq.checked_add(4).is_some_and(is_square)
                || five_sq.checked_sub(4).is_some_and(is_square)
        }
        // 5x² no longer fits in u128; walk the sequence instead
        None => {
            let (mut a, mut b) = (1u128, 1u128);
            while b < x {
                (a, b) = (b, a + b);
            }
            b == x
        }
    }
}

fn is_square(k: u128) -> bool {
    let r = k.isqrt();
    r * r == k
}
