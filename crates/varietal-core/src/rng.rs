//! Deterministic PRNG used for variant selection.
//!
//! [`SimRng`] is SplitMix64 with 8 bytes of serializable state. Hosts may
//! plug in their own generator through [`SelectionRng`].

/// Source of uniform draws for weighted selection.
pub trait SelectionRng {
    /// Next uniformly distributed `u64`.
    fn next_u64(&mut self) -> u64;

    /// Uniform draw in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        // Multiply-shift maps the full u64 range onto [0, bound).
        ((u128::from(self.next_u64()) * u128::from(bound)) >> 64) as u64
    }
}

impl<R: SelectionRng + ?Sized> SelectionRng for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn below(&mut self, bound: u64) -> u64 {
        (**self).below(bound)
    }
}

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic across platforms, so a fixed seed reproduces a selection
/// sequence exactly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Get the internal state (for hashing/serialization).
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl SelectionRng for SimRng {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
