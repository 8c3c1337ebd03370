use crate::core::numeric::fib_sequence;
use crate::domain::model::QuantumPulse;
use crate::domain::ports::QuantumBackend;
use std::collections::BTreeMap;
use std::f64::consts::PI;

pub const DEFAULT_SHOTS: u32 = 256;

/// Rotation angle for one Fibonacci term: `(term mod 8) · π/8`.
pub fn pulse_angle(term: u64) -> f64 {
    (term % 8) as f64 * (PI / 8.0)
}

/// Reports that no quantum backend is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableQuantum;

impl QuantumBackend for UnavailableQuantum {
    fn run_fib_pulse(&self, _fib_terms: usize) -> Option<QuantumPulse> {
        tracing::info!("Quantum backend not available; skipping quantum job.");
        None
    }
}

/// Single-qubit state-vector simulation reporting expected counts.
///
/// One RX gate per Fibonacci term is applied to |0⟩, then the qubit is
/// measured. Counts are `round(p(1) · shots)` for `"1"` and the rest for
/// `"0"`, so repeated runs agree exactly. Outcomes with zero counts are left
/// out of the map.
#[derive(Debug, Clone, Copy)]
pub struct ExpectationSimulator {
    shots: u32,
}

impl Default for ExpectationSimulator {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
        }
    }
}

impl ExpectationSimulator {
    pub fn new(shots: u32) -> Self {
        Self { shots }
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Probability of measuring `1` after the RX chain.
    pub fn probability_of_one(terms: &[u64]) -> f64 {
        let mut state = [Complex::ONE, Complex::ZERO];
        for &term in terms {
            state = rx(pulse_angle(term), state);
        }
        state[1].norm_sqr()
    }
}

impl QuantumBackend for ExpectationSimulator {
    fn run_fib_pulse(&self, fib_terms: usize) -> Option<QuantumPulse> {
        let fibs = match fib_sequence(fib_terms) {
            Ok(fibs) => fibs,
            Err(e) => {
                tracing::warn!("Skipping quantum job: {}", e);
                return None;
            }
        };

        let p1 = Self::probability_of_one(&fibs);
        let ones = ((p1 * f64::from(self.shots)).round() as u32).min(self.shots);
        let zeros = self.shots - ones;

        let mut counts = BTreeMap::new();
        if zeros > 0 {
            counts.insert("0".to_string(), zeros);
        }
        if ones > 0 {
            counts.insert("1".to_string(), ones);
        }
        tracing::info!("Quantum fib pulse counts: {:?}", counts);
        Some(QuantumPulse { counts, fibs })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

/// RX(θ) = [[cos θ/2, -i sin θ/2], [-i sin θ/2, cos θ/2]]
fn rx(theta: f64, [a, b]: [Complex; 2]) -> [Complex; 2] {
    let (s, c) = (theta / 2.0).sin_cos();
    // -i·s·z = (s·z.im, -s·z.re)
    [
        Complex {
            re: c * a.re + s * b.im,
            im: c * a.im - s * b.re,
        },
        Complex {
            re: s * a.im + c * b.re,
            im: -s * a.re + c * b.im,
        },
    ]
}
