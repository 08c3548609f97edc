use std::fmt::Debug;
use std::ops::Range;

use dyn_clone::DynClone;
use rand::Rng;
use rand::SeedableRng;

use crate::quince_assert_moderate;

/// Abstraction for randomness, in order to swap out different sources of randomness.
///
/// Propagators which break ties randomly hold a `Box<dyn Random>`, so tests can substitute a
/// generator that returns a fixed sequence.
pub trait Random: Debug + DynClone {
    /// Generates a random usize in the provided range with equal probability; this can be seen as
    /// sampling from a uniform distribution in the range `[range.start, range.end)`.
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use quince_core::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let free_values = vec![3, 5, 8];
    /// let selected_index = rng.generate_usize_in_range(0..free_values.len());
    /// assert!(selected_index < free_values.len());
    /// ```
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;
}

dyn_clone::clone_trait_object!(Random);

impl<T> Random for T
where
    T: SeedableRng + Rng + Debug + Clone,
{
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        quince_assert_moderate!(!range.is_empty(), "cannot sample from an empty range");
        self.gen_range(range)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::Random;

    #[test]
    fn equal_seeds_give_equal_sequences() {
        let mut first = SmallRng::seed_from_u64(0);
        let mut second = SmallRng::seed_from_u64(0);

        for _ in 0..32 {
            let value = first.generate_usize_in_range(3..11);
            assert!((3..11).contains(&value));
            assert_eq!(value, second.generate_usize_in_range(3..11));
        }
    }
}
