//! # NEON Engine
//!
//! **Only for aarch64 architectures!**
//!
//! Two 64-bit lanes per `uint64x2_t`. NEON is part of the aarch64 baseline, so this
//! is the only tier compiled there.
use super::Lanes;
use core::arch::aarch64::*;

pub(crate) const NEON_LANES: usize = 2;

impl Lanes for uint64x2_t {
    const WIDTH: usize = NEON_LANES;

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn zero() -> Self {
        vdupq_n_u64(0)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn load(words: &[u64]) -> Self {
        debug_assert!(words.len() >= NEON_LANES, "load needs 2 words for NEON lane");

        vld1q_u64(words.as_ptr())
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn store(self, out: &mut [u64]) {
        debug_assert!(out.len() >= NEON_LANES, "store needs 2 words for NEON lane");

        vst1q_u64(out.as_mut_ptr(), self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn add(self, rhs: Self) -> Self {
        vaddq_u64(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn xor(self, rhs: Self) -> Self {
        veorq_u64(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn shl17(self) -> Self {
        vshlq_n_u64::<17>(self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl23(self) -> Self {
        // shift-right-and-insert merges the two halves of the rotate in one op
        vsriq_n_u64::<41>(vshlq_n_u64::<23>(self), self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl45(self) -> Self {
        vsriq_n_u64::<19>(vshlq_n_u64::<45>(self), self)
    }
}

kernel!(#[target_feature(enable = "neon")] NeonKernel, uint64x2_t, crate::simd::Isa::Neon);
