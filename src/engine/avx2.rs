//! # AVX2 Engine
//!
//! **Only for x86_64 architectures!**
//!
//! Four 64-bit lanes per `__m256i`. Selected when the CPU reports both AVX2 and FMA.
use super::Lanes;
use core::arch::x86_64::*;

pub(crate) const AVX2_LANES: usize = 4;

impl Lanes for __m256i {
    const WIDTH: usize = AVX2_LANES;

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn zero() -> Self {
        _mm256_setzero_si256()
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn load(words: &[u64]) -> Self {
        // sanity check
        debug_assert!(words.len() >= AVX2_LANES, "load needs 4 words for AVX2 lane");

        _mm256_loadu_si256(words.as_ptr() as *const __m256i)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn store(self, out: &mut [u64]) {
        // sanity check
        debug_assert!(out.len() >= AVX2_LANES, "store needs 4 words for AVX2 lane");

        _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn add(self, rhs: Self) -> Self {
        _mm256_add_epi64(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn xor(self, rhs: Self) -> Self {
        _mm256_xor_si256(self, rhs)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn shl17(self) -> Self {
        _mm256_slli_epi64::<17>(self)
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl23(self) -> Self {
        _mm256_or_si256(_mm256_slli_epi64::<23>(self), _mm256_srli_epi64::<41>(self))
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn rotl45(self) -> Self {
        _mm256_or_si256(_mm256_slli_epi64::<45>(self), _mm256_srli_epi64::<19>(self))
    }
}

kernel!(#[target_feature(enable = "avx2,fma")] Avx2Kernel, __m256i, crate::simd::Isa::Avx2);

#[cfg(test)]
mod avx2_tests {
    use super::*;
    use crate::engine::{Kernel, testing};

    fn has_avx2() -> bool {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }

    #[test]
    fn test_lane_ops_match_scalar() {
        if !has_avx2() {
            return;
        }

        unsafe { testing::check_lane_ops::<__m256i>() }
    }

    #[test]
    fn test_avx2_kernel_matches_scalar_reference() {
        if !has_avx2() {
            return;
        }

        testing::check_kernel(|seed| Box::new(unsafe { Avx2Kernel::new(seed, 0, 0) }) as Box<dyn Kernel>);
    }

    #[test]
    fn test_avx2_matches_portable_of_same_width() {
        if !has_avx2() {
            return;
        }

        let mut avx2 = unsafe { Avx2Kernel::new(31337, 3, 2) };
        let mut portable = unsafe { crate::engine::portable::PortableKernel::new(31337, 3, 2) };

        let mut a = vec![0u64; 1024];
        let mut b = vec![0u64; 1024];

        avx2.populate(&mut a);
        portable.populate(&mut b);

        assert_eq!(a, b, "equal lane counts must give identical streams");

        avx2.jump();
        portable.jump();

        for lane in 0..AVX2_LANES {
            assert_eq!(avx2.lane_state(lane), portable.lane_state(lane));
        }
    }
}
