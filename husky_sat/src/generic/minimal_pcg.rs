//! A minimal permuted congruential generator.
//!
//! A translation of the minimal C PCG32 implementation from <https://www.pcg-random.org/>,
//! wired to the [rand_core] traits so a [context](crate::context) can be generic over its
//! source of randomness.
//!
//! Each engine of a portfolio seeds its generator from its engine index during
//! [diversification](crate::portfolio::PortfolioEngine::diversify), so engines which consult
//! randomness do so along distinct streams.

use rand::SeedableRng;
use rand_core::{impls, Error, RngCore};

const MULTIPLIER: u64 = 6364136223846793005;

/// State and increment of the generator.
///
/// The increment selects the stream, and is fixed odd at seeding.
#[derive(Default)]
pub struct MinimalPCG32 {
    state: u64,
    increment: u64,
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let used_state = self.state;
        self.state = used_state.wrapping_mul(MULTIPLIER).wrapping_add(self.increment);

        let xorshifted = (((used_state >> 18) ^ used_state) >> 27) as u32;
        let rotation = (used_state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        // The stream constant from the PCG reference, forced odd by the shift-and-set below.
        let increment = (0xda3e39cb94b95bdb_u64 << 1) | 1;
        let mut generator = Self {
            state: 0,
            increment,
        };
        // Advance once, mix in the seed, advance again, per pcg32_srandom.
        generator.next_u32();
        generator.state = generator.state.wrapping_add(u64::from_le_bytes(seed));
        generator.next_u32();
        generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinism() {
        let mut a = MinimalPCG32::from_seed(7_u64.to_le_bytes());
        let mut b = MinimalPCG32::from_seed(7_u64.to_le_bytes());
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn streams_diverge() {
        let mut a = MinimalPCG32::from_seed(1_u64.to_le_bytes());
        let mut b = MinimalPCG32::from_seed(2_u64.to_le_bytes());
        let pairs: Vec<_> = (0..16).map(|_| (a.next_u32(), b.next_u32())).collect();
        assert!(pairs.iter().any(|(x, y)| x != y));
    }
}
