//! # Engines
//!
//! Xoshiro256++ written once against the [`Lanes`] register abstraction, then
//! compiled per instruction set through [`kernel!`]. Every register type holds
//! `WIDTH` independent 64-bit lanes and the state is four such registers, i.e.
//! a `4 x WIDTH` matrix whose columns are scalar-equivalent streams.

use crate::simd::Isa;
use crate::xoshiro::{JUMP, LONG_JUMP, STATE_WORDS, Xoshiro};

/// Widest lane count of any compiled kernel
pub(crate) const MAX_LANES: usize = 8;

/// Generates a [`Kernel`] for one register type.
///
/// The attributes (usually `#[target_feature(enable = "...")]`) are placed on
/// every entry point so the generic engine code gets inlined and compiled for
/// that instruction set. Each entry point is `unsafe`; the `Kernel` impl may
/// call them because a kernel can only be built through its `unsafe fn new`.
macro_rules! kernel {
    ($(#[$attr:meta])* $name:ident, $lane:ty, $isa:expr) => {
        pub(crate) struct $name($crate::engine::VectorEngine<$lane>);

        impl $name {
            /// # Safety
            ///
            /// The running CPU must support this kernel's instruction set.
            $(#[$attr])*
            pub(crate) unsafe fn new(seed: u64, thread_id: u64, cluster_id: u64) -> Self {
                unsafe { Self($crate::engine::VectorEngine::with_cluster(seed, thread_id, cluster_id)) }
            }

            $(#[$attr])*
            unsafe fn populate_impl(&mut self, out: &mut [u64]) {
                unsafe { self.0.fill(out) }
            }

            $(#[$attr])*
            unsafe fn jump_impl(&mut self) {
                unsafe { self.0.jump() }
            }

            $(#[$attr])*
            unsafe fn long_jump_impl(&mut self) {
                unsafe { self.0.long_jump() }
            }

            $(#[$attr])*
            unsafe fn lane_state_impl(&self, lane: usize) -> [u64; 4] {
                unsafe { self.0.lane_state(lane) }
            }
        }

        impl $crate::engine::Kernel for $name {
            fn isa(&self) -> $crate::simd::Isa {
                $isa
            }

            fn lanes(&self) -> usize {
                <$lane as $crate::engine::Lanes>::WIDTH
            }

            #[inline]
            fn populate(&mut self, out: &mut [u64]) {
                // SAFETY: `new` is the only constructor and its caller verified the ISA
                unsafe { self.populate_impl(out) }
            }

            fn jump(&mut self) {
                // SAFETY: see `populate`
                unsafe { self.jump_impl() }
            }

            fn long_jump(&mut self) {
                // SAFETY: see `populate`
                unsafe { self.long_jump_impl() }
            }

            fn lane_state(&self, lane: usize) -> [u64; 4] {
                // SAFETY: see `populate`
                unsafe { self.lane_state_impl(lane) }
            }
        }
    };
}

#[cfg(target_arch = "x86_64")]
pub(crate) mod avx2;
#[cfg(target_arch = "x86_64")]
pub(crate) mod avx512;
#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;
pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
pub(crate) mod sse2;

/// A register of `WIDTH` 64-bit lanes and the handful of lane-wise ops
/// Xoshiro256++ needs.
///
/// All ops are `unsafe` since they lower to intrinsics that are only valid when
/// the matching target feature is present.
pub(crate) trait Lanes: Copy + Send {
    const WIDTH: usize;

    unsafe fn zero() -> Self;

    /// Loads `words[..WIDTH]`
    unsafe fn load(words: &[u64]) -> Self;

    /// Stores into `out[..WIDTH]`
    unsafe fn store(self, out: &mut [u64]);

    /// Wrapping add per lane
    unsafe fn add(self, rhs: Self) -> Self;

    unsafe fn xor(self, rhs: Self) -> Self;

    unsafe fn shl17(self) -> Self;

    unsafe fn rotl23(self) -> Self;

    unsafe fn rotl45(self) -> Self;
}

/// Dynamic face of one compiled engine, picked once by [`crate::simd::select`].
pub(crate) trait Kernel: Send {
    fn isa(&self) -> Isa;

    fn lanes(&self) -> usize;

    /// Overwrites `out` with `out.len() / lanes()` consecutive steps, lane outputs
    /// of one step stored contiguously. `out.len()` must be a multiple of `lanes()`.
    fn populate(&mut self, out: &mut [u64]);

    /// Advances every lane by `lanes()` jumps.
    fn jump(&mut self);

    /// Advances every lane by one long jump.
    fn long_jump(&mut self);

    /// The four state words of `lane`, which must be `< lanes()`
    fn lane_state(&self, lane: usize) -> [u64; 4];
}

pub(crate) struct VectorEngine<L: Lanes> {
    s: [L; STATE_WORDS],
}

impl<L: Lanes> VectorEngine<L> {
    /// Lane `i` starts as `Xoshiro::new(seed)` advanced by `i` jumps.
    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn new(seed: u64) -> Self {
        // sanity check
        debug_assert!(L::WIDTH <= MAX_LANES, "lane count exceeds MAX_LANES");

        let mut scalar = Xoshiro::new(seed);
        let mut rows = [[0u64; MAX_LANES]; STATE_WORDS];

        for lane in 0..L::WIDTH {
            for (row, word) in rows.iter_mut().zip(scalar.state()) {
                row[lane] = word;
            }

            scalar.jump();
        }

        let mut s = [L::zero(); STATE_WORDS];

        for (reg, row) in s.iter_mut().zip(rows.iter()) {
            *reg = L::load(&row[..L::WIDTH]);
        }

        Self { s }
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn with_cluster(seed: u64, thread_id: u64, cluster_id: u64) -> Self {
        let mut engine = Self::new(seed);

        for _ in 0..thread_id {
            engine.jump();
        }

        for _ in 0..cluster_id {
            engine.long_jump();
        }

        engine
    }

    /// One Xoshiro256++ step on every lane
    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn next(&mut self) -> L {
        let [s0, s1, s2, s3] = self.s;

        let result = s0.add(s3).rotl23().add(s0);
        let t = s1.shl17();

        let s2 = s2.xor(s0);
        let s3 = s3.xor(s1);
        let s1 = s1.xor(s2);
        let s0 = s0.xor(s3);

        let s2 = s2.xor(t);
        let s3 = s3.rotl45();

        self.s = [s0, s1, s2, s3];
        result
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn fill(&mut self, out: &mut [u64]) {
        // sanity check
        debug_assert!(out.len() % L::WIDTH == 0, "output must hold whole steps");

        for chunk in out.chunks_exact_mut(L::WIDTH) {
            self.next().store(chunk);
        }
    }

    /// Every lane moves `WIDTH` jumps ahead, so the whole window of lanes
    /// slides past the lanes of the previous window.
    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn jump(&mut self) {
        for _ in 0..L::WIDTH {
            self.apply_polynomial(&JUMP);
        }
    }

    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn long_jump(&mut self) {
        self.apply_polynomial(&LONG_JUMP);
    }

    /// Same accumulation as [`Xoshiro`]'s jump, each lane with its own accumulator.
    #[inline(always)]
    #[allow(unsafe_op_in_unsafe_fn)]
    unsafe fn apply_polynomial(&mut self, poly: &[u64; STATE_WORDS]) {
        let mut acc = [L::zero(); STATE_WORDS];

        for &word in poly {
            for bit in 0..64 {
                if word & (1u64 << bit) != 0 {
                    for (a, s) in acc.iter_mut().zip(self.s) {
                        *a = a.xor(s);
                    }
                }

                self.next();
            }
        }

        self.s = acc;
    }

    #[allow(unsafe_op_in_unsafe_fn)]
    pub(crate) unsafe fn lane_state(&self, lane: usize) -> [u64; STATE_WORDS] {
        assert!(lane < L::WIDTH, "lane {lane} out of range for {} lanes", L::WIDTH);

        let mut row = [0u64; MAX_LANES];
        let mut out = [0u64; STATE_WORDS];

        for (word, reg) in out.iter_mut().zip(self.s) {
            reg.store(&mut row[..L::WIDTH]);
            *word = row[lane];
        }

        out
    }
}
