//! # SSE2 Engine
//!
//! **Only for x86_64 architectures!**
//!
//! Two 64-bit lanes per `__m128i`. SSE2 is part of the x86_64 baseline, so
//! [`Sse2Kernel`] runs on every x86_64 CPU. [`Sse42Kernel`] is the exact same
//! arithmetic compiled with SSE4.2 enabled, which lets the compiler use the newer
//! encodings around the loop.
use super::Lanes;
use core::arch::x86_64::*;

pub(crate) const SSE_LANES: usize = 2;

impl Lanes for __m128i {
    const WIDTH: usize = SSE_LANES;

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn zero() -> Self {
        _mm_setzero_si128()
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn load(words: &[u64]) -> Self {
        // sanity check
        debug_assert!(words.len() >= SSE_LANES, "load needs 2 words for SSE lane");

        _mm_loadu_si128(words.as_ptr() as *const __m128i)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn store(self, out: &mut [u64]) {
        // sanity check
        debug_assert!(out.len() >= SSE_LANES, "store needs 2 words for SSE lane");

        _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn add(self, rhs: Self) -> Self {
        _mm_add_epi64(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn xor(self, rhs: Self) -> Self {
        _mm_xor_si128(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn shl17(self) -> Self {
        _mm_slli_epi64::<17>(self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl23(self) -> Self {
        // no 64-bit rotate before AVX-512, so shift both ways and merge
        _mm_or_si128(_mm_slli_epi64::<23>(self), _mm_srli_epi64::<41>(self))
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl45(self) -> Self {
        _mm_or_si128(_mm_slli_epi64::<45>(self), _mm_srli_epi64::<19>(self))
    }
}

kernel!(#[target_feature(enable = "sse2")] Sse2Kernel, __m128i, crate::simd::Isa::Sse2);
kernel!(#[target_feature(enable = "sse4.2")] Sse42Kernel, __m128i, crate::simd::Isa::Sse42);
