//! # AVX-512 Engine
//!
//! **Only for x86_64 architectures!**
//!
//! Eight 64-bit lanes per `__m512i`. AVX-512F has a native 64-bit rotate, so the
//! two rotations are a single instruction each here.
use super::Lanes;
use core::arch::x86_64::*;

pub(crate) const AVX512_LANES: usize = 8;

impl Lanes for __m512i {
    const WIDTH: usize = AVX512_LANES;

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn zero() -> Self {
        _mm512_setzero_si512()
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn load(words: &[u64]) -> Self {
        // sanity check
        debug_assert!(words.len() >= AVX512_LANES, "load needs 8 words for AVX-512 lane");

        core::ptr::read_unaligned(words.as_ptr() as *const __m512i)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn store(self, out: &mut [u64]) {
        // sanity check
        debug_assert!(out.len() >= AVX512_LANES, "store needs 8 words for AVX-512 lane");

        core::ptr::write_unaligned(out.as_mut_ptr() as *mut __m512i, self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn add(self, rhs: Self) -> Self {
        _mm512_add_epi64(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn xor(self, rhs: Self) -> Self {
        _mm512_xor_si512(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn shl17(self) -> Self {
        _mm512_slli_epi64::<17>(self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl23(self) -> Self {
        _mm512_rol_epi64::<23>(self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl45(self) -> Self {
        _mm512_rol_epi64::<45>(self)
    }
}

kernel!(#[target_feature(enable = "avx512f")] Avx512Kernel, __m512i, crate::simd::Isa::Avx512);
