use crate::splitmix::SplitMix;

/// Number of 64-bit words in a Xoshiro256++ state
pub(crate) const STATE_WORDS: usize = 4;

/// Jump polynomial, equivalent to 2^128 calls to `next_u64`
pub const JUMP: [u64; 4] = [0x180ec6d33cfd0aba, 0xd5a61266f0c9392c, 0xa9582618e03fc9aa, 0x39abdc4529b1661c];

/// Long-jump polynomial, equivalent to 2^192 calls to `next_u64`
pub const LONG_JUMP: [u64; 4] = [0x76e15d3efefdcbbf, 0xc5004e441c522fb3, 0x77710069854ee241, 0x39109bb02acbe635];

/// Scalar Xoshiro256++.
///
/// This is the reference every vector kernel is checked against: lane `i` of a
/// [`crate::XoshiroSimd`] seeded with `seed` walks the same sequence as
/// `Xoshiro::with_stream(seed, i)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoshiro {
    s: [u64; STATE_WORDS],
}

impl Xoshiro {
    pub const STATE_SIZE: usize = STATE_WORDS;

    /// Seeds the four state words with four consecutive [`SplitMix`] draws.
    pub fn new(seed: u64) -> Self {
        let mut sm = SplitMix::new(seed);
        let s = core::array::from_fn(|_| sm.next_u64());

        Self { s }
    }

    /// Stream `thread_id` of `seed`, i.e. `new(seed)` followed by `thread_id` jumps.
    pub fn with_stream(seed: u64, thread_id: u64) -> Self {
        let mut rng = Self::new(seed);

        for _ in 0..thread_id {
            rng.jump();
        }

        rng
    }

    /// Like [`Xoshiro::with_stream`], then `cluster_id` long jumps.
    pub fn with_cluster(seed: u64, thread_id: u64, cluster_id: u64) -> Self {
        let mut rng = Self::with_stream(seed, thread_id);

        for _ in 0..cluster_id {
            rng.long_jump();
        }

        rng
    }

    /// Restores a raw state. The all-zero state is a fixed point and must be avoided.
    #[inline(always)]
    pub const fn from_state(s: [u64; STATE_WORDS]) -> Self {
        Self { s }
    }

    #[inline(always)]
    pub const fn state(&self) -> [u64; STATE_WORDS] {
        self.s
    }

    #[inline(always)]
    pub fn set_state(&mut self, s: [u64; STATE_WORDS]) {
        self.s = s;
    }

    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        let s = &mut self.s;

        let result = s[0].wrapping_add(s[3]).rotate_left(23).wrapping_add(s[0]);
        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;
        s[3] = s[3].rotate_left(45);

        result
    }

    /// Upper 32 bits of one [`Xoshiro::next_u64`] draw
    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Double in `[0, 1)` built from the top 53 bits of one draw
    #[inline(always)]
    pub fn uniform(&mut self) -> f64 {
        crate::unit_f64(self.next_u64())
    }

    pub fn fill_u64(&mut self, buf: &mut [u64]) {
        for v in buf.iter_mut() {
            *v = self.next_u64();
        }
    }

    pub fn fill_uniform(&mut self, buf: &mut [f64]) {
        for v in buf.iter_mut() {
            *v = self.uniform();
        }
    }

    /// Advances the state by 2^128 steps.
    pub fn jump(&mut self) {
        self.apply_polynomial(&JUMP);
    }

    /// Advances the state by 2^192 steps.
    pub fn long_jump(&mut self) {
        self.apply_polynomial(&LONG_JUMP);
    }

    /// Walks the 256 bits of `poly` LSB first, xor-accumulating the state for every
    /// set bit and stepping once per bit, then replaces the state with the accumulator.
    fn apply_polynomial(&mut self, poly: &[u64; STATE_WORDS]) {
        let mut acc = [0u64; STATE_WORDS];

        for &word in poly {
            for bit in 0..64 {
                if word & (1u64 << bit) != 0 {
                    for (a, s) in acc.iter_mut().zip(self.s) {
                        *a ^= s;
                    }
                }

                self.next_u64();
            }
        }

        self.s = acc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Independent transcription of the published xoshiro256plusplus.c routines
    mod reference {
        pub(super) struct Reference {
            pub(super) s: [u64; 4],
        }

        fn rotl(x: u64, k: u32) -> u64 {
            (x << k) | (x >> (64 - k))
        }

        impl Reference {
            pub(super) fn next(&mut self) -> u64 {
                let s = &mut self.s;
                let result = rotl(s[0].wrapping_add(s[3]), 23).wrapping_add(s[0]);
                let t = s[1] << 17;
                s[2] ^= s[0];
                s[3] ^= s[1];
                s[1] ^= s[2];
                s[0] ^= s[3];
                s[2] ^= t;
                s[3] = rotl(s[3], 45);
                result
            }

            pub(super) fn jump(&mut self, table: [u64; 4]) {
                let (mut s0, mut s1, mut s2, mut s3) = (0, 0, 0, 0);

                for i in 0..4 {
                    for b in 0..64 {
                        if table[i] & (1u64 << b) != 0 {
                            s0 ^= self.s[0];
                            s1 ^= self.s[1];
                            s2 ^= self.s[2];
                            s3 ^= self.s[3];
                        }
                        self.next();
                    }
                }

                self.s = [s0, s1, s2, s3];
            }
        }
    }

    use reference::Reference;

    const DRAWS: usize = 1 << 15;

    mod recurrence {
        use super::*;

        #[test]
        fn test_matches_reference_for_many_draws() {
            for seed in [0u64, 1, 42, 0xDEADBEEF, u64::MAX] {
                let mut rng = Xoshiro::new(seed);
                let mut reference = Reference { s: rng.state() };

                for i in 0..DRAWS {
                    assert_eq!(rng.next_u64(), reference.next(), "seed {seed} diverged at draw {i}");
                }
            }
        }

        #[test]
        fn test_seed_42_regression_fixture() {
            let mut rng = Xoshiro::new(42);

            assert_eq!(
                rng.state(),
                [0xbdd732262feb6e95, 0x28efe333b266f103, 0x47526757130f9f52, 0x581ce1ff0e4ae394]
            );

            let s = rng.state();
            let by_hand = s[0].wrapping_add(s[3]).rotate_left(23).wrapping_add(s[0]);

            assert_eq!(rng.next_u64(), 0xd0764d4f4476689f);
            assert_eq!(by_hand, 0xd0764d4f4476689f);
            assert_eq!(rng.next_u64(), 0x519e4174576f3791);
            assert_eq!(rng.next_u64(), 0xfbe07cfb0c24ed8c);
            assert_eq!(rng.next_u64(), 0xb37d9f600cd835b8);
        }

        #[test]
        fn test_raw_state_reference_values() {
            // values published alongside the C reference for state [1, 2, 3, 4]
            let mut rng = Xoshiro::from_state([1, 2, 3, 4]);
            let expected = [
                41943041,
                58720359,
                3588806011781223,
                3591011842654386,
                9228616714210784205,
                9973669472204895162,
                14011001112246962877,
                12406186145184390807,
                15849039046786891736,
                10450023813501588000,
            ];

            for e in expected {
                assert_eq!(rng.next_u64(), e);
            }
        }

        #[test]
        fn test_uniform_in_unit_interval() {
            for seed in [3u64, 17, 1 << 40] {
                let mut rng = Xoshiro::new(seed);

                for _ in 0..DRAWS {
                    let u = rng.uniform();
                    assert!((0.0..1.0).contains(&u), "uniform out of range: {u}");
                }
            }
        }

        #[test]
        fn test_next_u32_derives_from_same_draw() {
            let mut a = Xoshiro::new(8);
            let mut b = Xoshiro::new(8);

            for _ in 0..256 {
                assert_eq!(a.next_u32(), (b.next_u64() >> 32) as u32);
            }
        }
    }

    mod jumps {
        use super::*;

        #[test]
        fn test_jump_matches_reference() {
            let mut rng = Xoshiro::new(0x1234);
            let mut reference = Reference { s: rng.state() };

            for _ in 0..100 {
                rng.next_u64();
                reference.next();
            }

            rng.jump();
            reference.jump(JUMP);
            assert_eq!(rng.state(), reference.s);

            rng.long_jump();
            reference.jump(LONG_JUMP);
            assert_eq!(rng.state(), reference.s);
        }

        #[test]
        fn test_jump_fixtures_for_seed_42() {
            let mut rng = Xoshiro::new(42);
            rng.jump();
            assert_eq!(
                rng.state(),
                [0x81746704fde896b5, 0x645e944932dae0ae, 0xf4776829231c282c, 0x2393f9798732dba1]
            );

            let mut rng = Xoshiro::new(42);
            rng.long_jump();
            assert_eq!(
                rng.state(),
                [0x1c5592a8d2450a14, 0xe09b0d035aa06fd9, 0xac4a2ed7fc28e84c, 0xdb0c552285cab3c6]
            );
        }

        #[test]
        fn test_stream_constructors_apply_jumps_in_order() {
            let mut manual = Xoshiro::new(5);
            manual.jump();
            manual.jump();
            manual.jump();

            assert_eq!(Xoshiro::with_stream(5, 3), manual);

            manual.long_jump();
            manual.long_jump();

            assert_eq!(Xoshiro::with_cluster(5, 3, 2), manual);
            assert_eq!(Xoshiro::with_cluster(5, 0, 0), Xoshiro::new(5));
        }

        #[test]
        fn test_jump_and_long_jump_commute() {
            let mut a = Xoshiro::new(11);
            a.jump();
            a.long_jump();

            let mut b = Xoshiro::new(11);
            b.long_jump();
            b.jump();

            assert_eq!(a, b);
        }
    }

    mod state {
        use super::*;

        #[test]
        fn test_set_state_replays_stream() {
            let mut rng = Xoshiro::new(21);
            let snapshot = rng.state();
            let first: Vec<u64> = (0..32).map(|_| rng.next_u64()).collect();

            rng.set_state(snapshot);
            let again: Vec<u64> = (0..32).map(|_| rng.next_u64()).collect();

            assert_eq!(first, again);
            assert_eq!(Xoshiro::STATE_SIZE, 4);
        }

        #[test]
        fn test_fill_matches_sequential_draws() {
            let mut a = Xoshiro::new(31);
            let mut b = a.clone();

            let mut buf = vec![0u64; 1001];
            a.fill_u64(&mut buf);
            assert!(buf.iter().all(|&v| v == b.next_u64()));

            let mut floats = vec![0f64; 333];
            a.fill_uniform(&mut floats);
            assert!(floats.iter().all(|&v| v == b.uniform()));
        }
    }
}
