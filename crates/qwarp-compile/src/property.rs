//! `PropertySet` for pass communication.
//!
//! Passes share data through a [`PropertySet`]: a global RNG seed that
//! randomized passes derive their generators from, plus an arbitrary
//! type-keyed map where passes record what they did.
//!
//! # Examples
//!
//! ```
//! use qwarp_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct RewriteStats {
//!     rewritten: usize,
//! }
//!
//! let mut props = PropertySet::new().with_seed(7);
//! props.insert(RewriteStats { rewritten: 3 });
//!
//! assert_eq!(props.seed, Some(7));
//! assert_eq!(props.get::<RewriteStats>().unwrap().rewritten, 3);
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Properties shared between compilation passes.
#[derive(Default)]
pub struct PropertySet {
    /// Seed for randomized passes. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Custom properties keyed by type.
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySet")
            .field("seed", &self.seed)
            .field("custom", &format!("{} entries", self.custom.len()))
            .finish()
    }
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A generator for a randomized pass.
    ///
    /// Seeded runs mix `salt` (usually the pass name) into the seed so that
    /// two randomized passes in one pipeline do not replay the same stream.
    pub fn rng(&self, salt: &str) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mixed = salt
                    .bytes()
                    .fold(seed, |acc, b| acc.rotate_left(5) ^ u64::from(b));
                StdRng::seed_from_u64(mixed)
            }
            None => StdRng::from_entropy(),
        }
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn test_custom_properties() {
        let mut props = PropertySet::new();
        props.insert(Marker(1));
        assert_eq!(props.get::<Marker>(), Some(&Marker(1)));

        props.get_mut::<Marker>().unwrap().0 = 2;
        assert_eq!(props.remove::<Marker>(), Some(Marker(2)));
        assert!(props.get::<Marker>().is_none());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let props = PropertySet::new().with_seed(42);
        let a: u64 = props.rng("gauge").r#gen();
        let b: u64 = props.rng("gauge").r#gen();
        let c: u64 = props.rng("pauli").r#gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
