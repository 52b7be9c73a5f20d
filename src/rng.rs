//! `rand_core` glue, so every generator plugs into `rand` distributions and
//! anything else generic over [`RngCore`].
//!
//! `next_u32` keeps the upper half of one 64-bit draw everywhere, which is what
//! the inherent `next_u32` methods return as well.
use crate::splitmix::SplitMix;
use crate::xoshiro::Xoshiro;
use crate::XoshiroSimd;
use rand_core::impls::fill_bytes_via_next;
use rand_core::le::read_u64_into;
use rand_core::{Error, RngCore, SeedableRng};

macro_rules! impl_rng_core {
    ($ty:ty) => {
        impl RngCore for $ty {
            #[inline]
            fn next_u32(&mut self) -> u32 {
                <$ty>::next_u32(self)
            }

            #[inline]
            fn next_u64(&mut self) -> u64 {
                <$ty>::next_u64(self)
            }

            #[inline]
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                fill_bytes_via_next(self, dest)
            }

            #[inline]
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }
    };
}

impl_rng_core!(SplitMix);
impl_rng_core!(Xoshiro);

impl<const CAP: usize> RngCore for XoshiroSimd<CAP> {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        fill_bytes_via_next(self, dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix {
    type Seed = [u8; 8];

    fn from_seed(seed: [u8; 8]) -> Self {
        SplitMix::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        SplitMix::new(state)
    }
}

impl SeedableRng for Xoshiro {
    type Seed = [u8; 32];

    /// Reads the seed as four little-endian state words. The all-zero seed is a
    /// fixed point of the recurrence, so it is mapped to `Xoshiro::new(0)`.
    fn from_seed(seed: [u8; 32]) -> Self {
        if seed.iter().all(|&b| b == 0) {
            return Xoshiro::new(0);
        }

        let mut s = [0u64; Xoshiro::STATE_SIZE];
        read_u64_into(&seed, &mut s);

        Xoshiro::from_state(s)
    }

    /// Same as [`Xoshiro::new`].
    fn seed_from_u64(state: u64) -> Self {
        Xoshiro::new(state)
    }
}

impl SeedableRng for XoshiroSimd {
    type Seed = [u8; 8];

    /// # Panics
    ///
    /// See [`XoshiroSimd::new`].
    fn from_seed(seed: [u8; 8]) -> Self {
        XoshiroSimd::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        XoshiroSimd::new(state)
    }
}
