//! # Portable Engine
//!
//! Four lanes held in a plain `[u64; 4]`, with every op written as a per-lane
//! loop the optimizer is free to vectorize. Compiled on every target; it is the
//! selected tier on architectures without a dedicated kernel.
use super::Lanes;

pub(crate) const PORTABLE_LANES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(align(32))]
pub(crate) struct Portable([u64; PORTABLE_LANES]);

impl Portable {
    #[inline(always)]
    fn map(self, f: impl Fn(u64) -> u64) -> Self {
        Self(self.0.map(f))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(u64, u64) -> u64) -> Self {
        let mut out = self.0;

        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = f(*o, r);
        }

        Self(out)
    }
}

impl Lanes for Portable {
    const WIDTH: usize = PORTABLE_LANES;

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self([0; PORTABLE_LANES])
    }

    #[inline(always)]
    unsafe fn load(words: &[u64]) -> Self {
        let mut lanes = [0u64; PORTABLE_LANES];
        lanes.copy_from_slice(&words[..PORTABLE_LANES]);

        Self(lanes)
    }

    #[inline(always)]
    unsafe fn store(self, out: &mut [u64]) {
        out[..PORTABLE_LANES].copy_from_slice(&self.0);
    }

    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self {
        self.zip(rhs, u64::wrapping_add)
    }

    #[inline(always)]
    unsafe fn xor(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a ^ b)
    }

    #[inline(always)]
    unsafe fn shl17(self) -> Self {
        self.map(|x| x << 17)
    }

    #[inline(always)]
    unsafe fn rotl23(self) -> Self {
        self.map(|x| x.rotate_left(23))
    }

    #[inline(always)]
    unsafe fn rotl45(self) -> Self {
        self.map(|x| x.rotate_left(45))
    }
}

kernel!(#[inline] PortableKernel, Portable, crate::simd::Isa::Portable);
