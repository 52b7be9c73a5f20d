//! # Vexo
//!
//! Xoshiro256++ computed across SIMD lanes, with the widest instruction set the
//! running CPU supports picked once at construction.
//!
//! Three generators are exposed:
//!
//! - [`SplitMix`], the avalanche mixer used to expand seeds
//! - [`Xoshiro`], the scalar Xoshiro256++ reference engine
//! - [`XoshiroSimd`], `W` Xoshiro256++ streams stepped together and served through
//!   an output cache
//!
//! Lane `i` of a [`XoshiroSimd`] is exactly `Xoshiro::new(seed)` advanced by `i`
//! jumps, so every output can be reproduced with the scalar engine.
//!
//! ```
//! use vexo::{Xoshiro, XoshiroSimd};
//!
//! let mut simd = XoshiroSimd::new(42);
//! let lanes = simd.lanes();
//!
//! let mut lane0 = Xoshiro::new(42);
//! let first = simd.next_u64();
//!
//! assert_eq!(first, lane0.next_u64());
//! assert!(lanes >= 2);
//! ```
//!
//! None of the generators are cryptographically secure, and none are `Sync`: one
//! instance belongs to one logical stream. Use the `thread_id`/`cluster_id`
//! constructors to derive non-overlapping streams for parallel workers.

mod bitgen;
mod engine;
mod error;
mod rng;
mod simd;
mod splitmix;
mod state;
mod xoshiro;

pub use bitgen::{BitGen, BitGenerator, BitSource};
pub use error::{Error, Result};
pub use simd::Isa;
pub use splitmix::SplitMix;
pub use xoshiro::{JUMP, LONG_JUMP, Xoshiro};

pub use rand_core;

use crate::state::State;

/// 2^-53
const UNIT_F64: f64 = 1.0 / (1u64 << 53) as f64;

/// Maps the top 53 bits of a word onto a double in `[0, 1)`.
#[inline(always)]
pub(crate) fn unit_f64(x: u64) -> f64 {
    (x >> 11) as f64 * UNIT_F64
}

/// Default cache size in words, one refill every `256 / W` kernel steps
pub const DEFAULT_CACHE: usize = 256;

/// Scratch words per round trip in [`XoshiroSimd::fill_uniform`]
const UNIFORM_CHUNK: usize = 512;

/// Xoshiro256++ over `W` SIMD lanes, where `W` depends on the tier picked at
/// construction (see [`Isa::lanes`]).
///
/// Output word `k` is draw `k / W` of lane `k % W`, and lane `i` is the scalar
/// [`Xoshiro`] stream advanced by `i` jumps. Words are served from an internal
/// cache of `CAP` words; `CAP` never changes the sequence, only how often the
/// kernel runs.
///
/// `XoshiroSimd` can be moved to another thread but not shared between threads.
pub struct XoshiroSimd<const CAP: usize = DEFAULT_CACHE> {
    state: State<CAP>,
}

impl XoshiroSimd {
    /// Seeds the widest supported tier with the default cache.
    ///
    /// # Panics
    ///
    /// Panics if no compiled tier runs on this CPU, which is impossible on
    /// x86_64 and aarch64 since their baselines are always compiled in.
    pub fn new(seed: u64) -> Self {
        Self::with_cluster(seed, 0, 0)
    }

    /// Stream for worker `thread_id`: every lane is moved `thread_id * W` jumps
    /// ahead, so workers sharing a seed never overlap.
    ///
    /// # Panics
    ///
    /// See [`XoshiroSimd::new`].
    pub fn with_stream(seed: u64, thread_id: u64) -> Self {
        Self::with_cluster(seed, thread_id, 0)
    }

    /// Like [`XoshiroSimd::with_stream`], then `cluster_id` long jumps.
    ///
    /// # Panics
    ///
    /// See [`XoshiroSimd::new`].
    pub fn with_cluster(seed: u64, thread_id: u64, cluster_id: u64) -> Self {
        match Self::builder(seed).thread(thread_id).cluster(cluster_id).build() {
            Ok(rng) => rng,
            Err(err) => panic!("cannot construct XoshiroSimd: {err}"),
        }
    }

    pub const fn builder(seed: u64) -> Builder {
        Builder::new(seed)
    }
}

impl<const CAP: usize> XoshiroSimd<CAP> {
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.state.gen_64()
    }

    /// Upper 32 bits of one [`XoshiroSimd::next_u64`] draw
    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        (self.state.gen_64() >> 32) as u32
    }

    /// Double in `[0, 1)` built from the top 53 bits of one draw
    #[inline(always)]
    pub fn uniform(&mut self) -> f64 {
        unit_f64(self.state.gen_64())
    }

    /// Fills `buf` with the next `buf.len()` words, same as calling
    /// [`XoshiroSimd::next_u64`] that many times but without the per-word
    /// cache round trip.
    pub fn fill_u64(&mut self, buf: &mut [u64]) {
        self.state.fill_u64(buf);
    }

    /// Doubles from the same words [`XoshiroSimd::fill_u64`] would produce.
    pub fn fill_uniform(&mut self, buf: &mut [f64]) {
        let mut words = [0u64; UNIFORM_CHUNK];

        for chunk in buf.chunks_mut(UNIFORM_CHUNK) {
            let words = &mut words[..chunk.len()];
            self.state.fill_u64(words);

            for (v, &w) in chunk.iter_mut().zip(words.iter()) {
                *v = unit_f64(w);
            }
        }
    }

    /// Moves every lane `W` jumps ahead. Words already in the cache are still
    /// served first; the jumped lanes show up from the next refill on.
    pub fn jump(&mut self) {
        self.state.kernel_mut().jump();
    }

    /// Moves every lane one long jump ahead, with the same cache behavior as
    /// [`XoshiroSimd::jump`].
    pub fn long_jump(&mut self) {
        self.state.kernel_mut().long_jump();
    }

    /// State of one lane, as a scalar [`Xoshiro`] state.
    ///
    /// This is the state after the last kernel step, so it runs ahead of the
    /// words still waiting in the cache.
    pub fn lane_state(&self, lane: usize) -> Result<[u64; 4]> {
        let lanes = self.lanes();

        if lane >= lanes {
            return Err(Error::LaneOutOfRange { lane, lanes });
        }

        Ok(self.state.kernel().lane_state(lane))
    }

    #[inline]
    pub fn lanes(&self) -> usize {
        self.state.kernel().lanes()
    }

    #[inline]
    pub fn isa(&self) -> Isa {
        self.state.kernel().isa()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        CAP
    }
}

impl<const CAP: usize> core::fmt::Debug for XoshiroSimd<CAP> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("XoshiroSimd")
            .field("isa", &self.isa())
            .field("lanes", &self.lanes())
            .field("capacity", &CAP)
            .finish_non_exhaustive()
    }
}

/// Configures a [`XoshiroSimd`].
///
/// ```
/// use vexo::{Isa, XoshiroSimd};
///
/// let rng = XoshiroSimd::builder(7).thread(2).cluster(1).isa(Isa::Portable).build_cached::<64>()?;
///
/// assert_eq!(rng.lanes(), 4);
/// assert_eq!(rng.capacity(), 64);
/// # Ok::<(), vexo::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builder {
    seed: u64,
    thread_id: u64,
    cluster_id: u64,
    isa: Option<Isa>,
}

impl Builder {
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            thread_id: 0,
            cluster_id: 0,
            isa: None,
        }
    }

    /// Worker index; see [`XoshiroSimd::with_stream`].
    pub const fn thread(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }

    /// Number of long jumps applied after the thread jumps.
    pub const fn cluster(mut self, cluster_id: u64) -> Self {
        self.cluster_id = cluster_id;
        self
    }

    /// Forces a tier instead of detecting one.
    pub const fn isa(mut self, isa: Isa) -> Self {
        self.isa = Some(isa);
        self
    }

    pub fn build(self) -> Result<XoshiroSimd> {
        self.build_cached()
    }

    /// Builds with a cache of `CAP` words, a non-zero multiple of 8.
    pub fn build_cached<const CAP: usize>(self) -> Result<XoshiroSimd<CAP>> {
        let isa = match self.isa {
            Some(isa) => isa,
            None => Isa::detect()?,
        };

        let kernel = simd::select(isa, self.seed, self.thread_id, self.cluster_id)?;

        Ok(XoshiroSimd {
            state: State::new(kernel),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_f64_bounds() {
        assert_eq!(unit_f64(0), 0.0);
        assert_eq!(unit_f64(0x7ff), 0.0, "low 11 bits must be ignored");
        assert!(unit_f64(u64::MAX) < 1.0);
        assert_eq!(unit_f64(u64::MAX), 1.0 - UNIT_F64);
        assert_eq!(unit_f64(1 << 63), 0.5);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let mut a = XoshiroSimd::new(123456789);
        let mut b = XoshiroSimd::new(123456789);

        let seq_a: Vec<u64> = (0..64).map(|_| a.next_u64()).collect();
        let seq_b: Vec<u64> = (0..64).map(|_| b.next_u64()).collect();

        assert_eq!(seq_a, seq_b, "identical seeds must yield same sequence");
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut a = XoshiroSimd::new(1);
        let mut b = XoshiroSimd::new(2);

        let seq_a: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let seq_b: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();

        assert_ne!(seq_a, seq_b, "different seeds should yield distinct output");
    }

    #[test]
    fn test_streams_are_deterministic_per_thread_and_cluster() {
        for (thread, cluster) in [(0, 0), (1, 0), (3, 2)] {
            let mut a = XoshiroSimd::with_cluster(7, thread, cluster);
            let mut b = XoshiroSimd::with_cluster(7, thread, cluster);

            let mut sa = Xoshiro::with_cluster(7, thread, cluster);
            let mut sb = Xoshiro::with_cluster(7, thread, cluster);

            for _ in 0..1000 {
                assert_eq!(a.next_u64(), b.next_u64());
                assert_eq!(sa.next_u64(), sb.next_u64());
            }
        }
    }

    #[test]
    fn test_can_move_across_threads_but_not_shared() {
        use std::thread;

        let mut rng = XoshiroSimd::new(1234);
        let mut reference = Xoshiro::new(1234);

        let handle = thread::spawn(move || rng.next_u64());
        let res = handle.join().expect("thread should run successfully");

        assert_eq!(res, reference.next_u64());
    }

    #[test]
    fn test_one_generator_per_worker() {
        use std::thread;

        let handles: Vec<_> = (0..4u64)
            .map(|id| thread::spawn(move || {
                let mut rng = XoshiroSimd::with_stream(99, id);
                (0..16).map(|_| rng.next_u64()).collect::<Vec<_>>()
            }))
            .collect();

        let outputs: Vec<Vec<u64>> = handles
            .into_iter()
            .map(|h| h.join().expect("worker should finish"))
            .collect();

        for i in 0..outputs.len() {
            for j in (i + 1)..outputs.len() {
                assert_ne!(outputs[i], outputs[j], "workers {i} and {j} must not share a stream");
            }
        }
    }

    mod simd_generator {
        use super::*;

        #[test]
        fn test_output_interleaves_scalar_streams() {
            let mut rng = XoshiroSimd::new(42);
            let lanes = rng.lanes();

            let mut scalars: Vec<Xoshiro> = (0..lanes as u64).map(|i| Xoshiro::with_stream(42, i)).collect();

            for k in 0..4096 {
                assert_eq!(rng.next_u64(), scalars[k % lanes].next_u64(), "word {k}");
            }
        }

        #[test]
        fn test_uniform_stays_in_unit_interval() {
            let mut rng = XoshiroSimd::new(2718);
            let mut sum = 0.0;

            for _ in 0..(1 << 15) {
                let x = rng.uniform();
                assert!((0.0..1.0).contains(&x), "{x} outside [0, 1)");
                sum += x;
            }

            let mean = sum / (1 << 15) as f64;
            assert!((mean - 0.5).abs() < 0.01, "mean {mean} too far from 0.5");
        }

        #[test]
        fn test_next_u32_is_upper_half() {
            let mut a = XoshiroSimd::new(5);
            let mut b = XoshiroSimd::new(5);

            for _ in 0..300 {
                assert_eq!(a.next_u32(), (b.next_u64() >> 32) as u32);
            }
        }

        #[test]
        fn test_fills_match_single_draws() {
            let mut a = XoshiroSimd::new(11);
            let mut b = XoshiroSimd::new(11);

            let mut words = vec![0u64; 999];
            a.fill_u64(&mut words);
            assert!(words.iter().all(|&w| w == b.next_u64()));

            let mut doubles = vec![0.0f64; 77];
            a.fill_uniform(&mut doubles);
            assert!(doubles.iter().all(|&d| d == b.uniform()));

            assert_eq!(a.next_u64(), b.next_u64());
        }

        #[test]
        fn test_jump_serves_buffered_words_before_jumped_window() {
            let mut rng = XoshiroSimd::new(8);
            let mut unjumped = XoshiroSimd::new(8);
            let lanes = rng.lanes();

            // consume part of the cache first
            for _ in 0..3 {
                assert_eq!(rng.next_u64(), unjumped.next_u64());
            }

            rng.jump();

            // the rest of the pre-jump cache comes out unchanged
            for k in 3..DEFAULT_CACHE {
                assert_eq!(rng.next_u64(), unjumped.next_u64(), "buffered word {k}");
            }

            let mut scalars: Vec<Xoshiro> = (0..lanes as u64)
                .map(|i| {
                    // lanes have stepped once per cached step before the jump
                    let mut x = Xoshiro::with_stream(8, i);
                    for _ in 0..(DEFAULT_CACHE / lanes) {
                        x.next_u64();
                    }
                    for _ in 0..lanes {
                        x.jump();
                    }
                    x
                })
                .collect();

            for lane in 0..lanes {
                assert_eq!(rng.lane_state(lane), Ok(scalars[lane].state()));
            }

            for k in 0..(3 * DEFAULT_CACHE) {
                assert_eq!(rng.next_u64(), scalars[k % lanes].next_u64(), "word {k} after jump");
            }
        }

        #[test]
        fn test_jump_after_single_draw_keeps_second_word() {
            let mut a = XoshiroSimd::new(8);
            let mut b = XoshiroSimd::new(8);

            a.next_u64();
            a.jump();

            b.next_u64();
            assert_eq!(a.next_u64(), b.next_u64(), "word 1 comes from the pre-jump cache");

            a.long_jump();
            assert_eq!(a.next_u64(), b.next_u64(), "long jump leaves the cache alone too");
        }

        #[test]
        fn test_fill_uniform_matches_fill_u64_words() {
            let mut doubles = XoshiroSimd::new(13);
            let mut words = XoshiroSimd::new(13);

            // straddle the scratch chunk and leave a partial cache between calls
            for len in [3usize, UNIFORM_CHUNK + 5, 2 * UNIFORM_CHUNK, 1] {
                let mut out = vec![0.0f64; len];
                doubles.fill_uniform(&mut out);

                let mut raw = vec![0u64; len];
                words.fill_u64(&mut raw);

                let expected: Vec<f64> = raw.into_iter().map(unit_f64).collect();
                assert_eq!(out, expected, "fill of {len} doubles");
            }

            assert_eq!(doubles.next_u64(), words.next_u64());
        }

        #[test]
        fn test_fresh_jump_equals_next_thread() {
            let mut jumped = XoshiroSimd::new(64);
            jumped.jump();

            let mut thread1 = XoshiroSimd::with_stream(64, 1);

            for _ in 0..1000 {
                assert_eq!(jumped.next_u64(), thread1.next_u64());
            }
        }

        #[test]
        fn test_long_jump_equals_next_cluster() {
            let mut jumped = XoshiroSimd::with_stream(64, 2);
            jumped.long_jump();

            let mut cluster1 = XoshiroSimd::with_cluster(64, 2, 1);

            for _ in 0..1000 {
                assert_eq!(jumped.next_u64(), cluster1.next_u64());
            }
        }

        #[test]
        fn test_lane_state_out_of_range() {
            let rng = XoshiroSimd::new(1);
            let lanes = rng.lanes();

            assert_eq!(rng.lane_state(0), Ok(Xoshiro::new(1).state()));
            assert_eq!(rng.lane_state(lanes), Err(Error::LaneOutOfRange { lane: lanes, lanes }));
        }

        #[test]
        fn test_reports_detected_tier() {
            let rng = XoshiroSimd::new(1);

            assert_eq!(Ok(rng.isa()), Isa::detect());
            assert_eq!(rng.lanes(), rng.isa().lanes());
            assert_eq!(rng.capacity(), DEFAULT_CACHE);
        }
    }

    mod builder {
        use super::*;

        #[test]
        fn test_default_build_matches_new() {
            let mut a = XoshiroSimd::builder(3).build().expect("detected tier must build");
            let mut b = XoshiroSimd::new(3);

            for _ in 0..600 {
                assert_eq!(a.next_u64(), b.next_u64());
            }
        }

        #[test]
        fn test_forced_tiers_follow_lane_width() {
            for isa in Isa::supported() {
                let mut rng = XoshiroSimd::builder(21).isa(isa).thread(1).build_cached::<32>().expect("tier is supported");

                assert_eq!(rng.isa(), isa);
                assert_eq!(rng.capacity(), 32);

                let lanes = isa.lanes();
                let mut scalars: Vec<Xoshiro> = (0..lanes as u64).map(|i| Xoshiro::with_stream(21, lanes as u64 + i)).collect();

                for k in 0..200 {
                    assert_eq!(rng.next_u64(), scalars[k % lanes].next_u64(), "{isa} word {k}");
                }
            }
        }

        #[test]
        fn test_forcing_unsupported_tier_fails() {
            let all = [Isa::Avx512, Isa::Avx2, Isa::Sse42, Isa::Sse2, Isa::Neon];

            for isa in all.into_iter().filter(|isa| !isa.is_supported()) {
                let err = XoshiroSimd::builder(1).isa(isa).build().map(|_| ()).unwrap_err();
                assert_eq!(err, Error::IsaUnavailable(isa));
            }
        }

        #[test]
        fn test_debug_names_tier() {
            let rng = XoshiroSimd::builder(1).isa(Isa::Portable).build().expect("portable always builds");
            let dbg = format!("{rng:?}");

            assert!(dbg.contains("Portable"), "{dbg}");
            assert!(dbg.contains("capacity: 256"), "{dbg}");
        }
    }
}
