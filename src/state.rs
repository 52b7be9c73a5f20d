use crate::engine::{Kernel, MAX_LANES};

/// Output cache in front of a dispatched kernel.
///
/// The buffer holds `CAP / W` whole kernel steps and is refilled only once every
/// word has been handed out, so the word order is exactly the kernel's
/// interleaved order regardless of `CAP`.
pub(crate) struct State<const CAP: usize> {
    buf: [u64; CAP],
    kernel: Box<dyn Kernel>,
    idx: usize,
}

impl<const CAP: usize> State<CAP> {
    /// Starts out empty; the first draw triggers the first refill.
    pub(crate) fn new(kernel: Box<dyn Kernel>) -> Self {
        const { assert!(CAP > 0 && CAP % MAX_LANES == 0, "cache size must be a non-zero multiple of 8") };

        Self {
            buf: [0u64; CAP],
            kernel,
            idx: CAP,
        }
    }

    #[inline(always)]
    pub(crate) fn gen_64(&mut self) -> u64 {
        // sanity check
        debug_assert!(self.idx <= CAP);

        if self.idx == CAP {
            self.regen();
        }

        let val = self.buf[self.idx];
        self.idx += 1;

        val
    }

    #[cold]
    fn regen(&mut self) {
        self.kernel.populate(&mut self.buf);
        self.idx = 0;
    }

    /// Same words, same order, as `out.len()` calls to [`State::gen_64`].
    pub(crate) fn fill_u64(&mut self, out: &mut [u64]) {
        // drain whatever is still buffered
        let buffered = (CAP - self.idx).min(out.len());
        out[..buffered].copy_from_slice(&self.buf[self.idx..self.idx + buffered]);
        self.idx += buffered;

        let rest = &mut out[buffered..];

        if rest.is_empty() {
            return;
        }

        // the cache is empty here, so whole steps can go straight to `out`
        let direct = rest.len() - rest.len() % self.kernel.lanes();
        let (head, tail) = rest.split_at_mut(direct);

        if !head.is_empty() {
            self.kernel.populate(head);
        }

        for word in tail {
            *word = self.gen_64();
        }
    }

    #[inline]
    pub(crate) fn kernel(&self) -> &dyn Kernel {
        self.kernel.as_ref()
    }

    #[inline]
    pub(crate) fn kernel_mut(&mut self) -> &mut dyn Kernel {
        self.kernel.as_mut()
    }
}
