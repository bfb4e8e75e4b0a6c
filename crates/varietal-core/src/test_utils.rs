//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::id::Identifier;
use crate::registry::VariantRegistry;
use crate::rng::SelectionRng;
use crate::variant::VariantEntity;
use std::collections::VecDeque;

pub const TEST_NAMESPACE: &str = "varietal";

/// `varietal:<path>`.
pub fn id(path: &str) -> Identifier {
    Identifier::new(TEST_NAMESPACE, path).unwrap()
}

/// A modifier-free variant in the test namespace.
pub fn variant(path: &str, weight: u32) -> VariantEntity {
    VariantEntity::new(id(path), weight, Vec::new())
}

/// An empty registry declaring `categories`, with fallbacks in the test namespace.
pub fn registry(categories: &[&str]) -> VariantRegistry {
    VariantRegistry::new(TEST_NAMESPACE, categories.iter().copied()).unwrap()
}

/// RNG that replays fixed draws: `below(bound)` returns `draw % bound`.
///
/// Once the script is exhausted every draw is 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    draws: VecDeque<u64>,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = u64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

impl SelectionRng for ScriptedRng {
    fn next_u64(&mut self) -> u64 {
        self.draws.pop_front().unwrap_or(0)
    }

    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }
}
