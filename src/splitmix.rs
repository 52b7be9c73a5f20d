/// Golden-ratio increment added to the state before every draw
pub(crate) const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

const MIX1: u64 = 0xbf58476d1ce4e5b9;
const MIX2: u64 = 0x94d049bb133111eb;

/// SplitMix64 avalanche mixer.
///
/// Mostly used to expand a 64-bit seed into well distributed state words, but it
/// is a full (small) generator in its own right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMix {
    state: u64,
}

impl SplitMix {
    #[inline(always)]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);

        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(MIX1);
        z = (z ^ (z >> 27)).wrapping_mul(MIX2);

        z ^ (z >> 31)
    }

    /// Upper 32 bits of one [`SplitMix::next_u64`] draw
    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

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

    #[inline(always)]
    pub const fn state(&self) -> u64 {
        self.state
    }

    #[inline(always)]
    pub fn set_state(&mut self, state: u64) {
        self.state = state;
    }
}
