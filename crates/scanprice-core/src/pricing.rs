//! # Simulated Pricing
//!
//! The product database carries no prices, so every fresh lookup gets a
//! uniformly random whole-unit price in `[PRICE_MIN, PRICE_MAX]`.
//!
//! The random generator is passed in, which keeps this module free of
//! ambient state and lets tests use a seeded generator.

use rand::Rng;

use crate::{PRICE_MAX, PRICE_MIN};

/// Draws a simulated price in `[PRICE_MIN, PRICE_MAX]`, both inclusive.
///
/// ## Example
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use scanprice_core::pricing::simulate_price;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let price = simulate_price(&mut rng);
/// assert!((5..=150).contains(&price));
/// ```
pub fn simulate_price<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(PRICE_MIN..=PRICE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_price_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let price = simulate_price(&mut rng);
            assert!((PRICE_MIN..=PRICE_MAX).contains(&price));
        }
    }

    #[test]
    fn test_both_bounds_are_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let prices: Vec<u32> = (0..20_000).map(|_| simulate_price(&mut rng)).collect();
        assert!(prices.contains(&PRICE_MIN));
        assert!(prices.contains(&PRICE_MAX));
    }
}
