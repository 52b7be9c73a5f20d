//! # Bit generator table
//!
//! A C-layout callback table (`state`, `next_uint64`, `next_uint32`,
//! `next_double`, `next_raw`) in front of any generator, the shape host
//! numeric libraries expect from a pluggable bit source. The table and the
//! generator live in one heap allocation owned by [`BitGenerator`]; ownership can
//! be handed across an FFI boundary with [`BitGenerator::into_raw`] and taken
//! back with [`BitGenerator::from_raw`].
use crate::splitmix::SplitMix;
use crate::xoshiro::Xoshiro;
use crate::XoshiroSimd;
use core::ffi::c_void;
use core::ptr::NonNull;

/// A generator that can sit behind a [`BitGen`] table.
pub trait BitSource {
    /// One raw 64-bit draw; the other callbacks are derived from it.
    fn bits(&mut self) -> u64;
}

impl BitSource for SplitMix {
    #[inline]
    fn bits(&mut self) -> u64 {
        self.next_u64()
    }
}

impl BitSource for Xoshiro {
    #[inline]
    fn bits(&mut self) -> u64 {
        self.next_u64()
    }
}

impl<const CAP: usize> BitSource for XoshiroSimd<CAP> {
    #[inline]
    fn bits(&mut self) -> u64 {
        self.next_u64()
    }
}

/// C view of a bit generator. Every callback must be passed `state`.
#[repr(C)]
#[derive(Debug)]
pub struct BitGen {
    pub state: *mut c_void,
    pub next_uint64: unsafe extern "C" fn(*mut c_void) -> u64,
    pub next_uint32: unsafe extern "C" fn(*mut c_void) -> u32,
    pub next_double: unsafe extern "C" fn(*mut c_void) -> f64,
    pub next_raw: unsafe extern "C" fn(*mut c_void) -> u64,
}

#[repr(C)]
struct Payload<G> {
    // first field, so a `*mut Payload<G>` is also a `*mut BitGen`
    table: BitGen,
    rng: G,
}

/// Owns a generator together with the [`BitGen`] table pointing at it.
///
/// ```
/// use vexo::{BitGenerator, Xoshiro};
///
/// let mut bg = BitGenerator::new(Xoshiro::new(1));
/// let table = bg.table();
///
/// let x = unsafe { ((*table).next_uint64)((*table).state) };
/// assert_eq!(x, Xoshiro::new(1).next_u64());
/// ```
pub struct BitGenerator<G: BitSource> {
    payload: NonNull<Payload<G>>,
}

// SAFETY: the payload is uniquely owned, same as a `Box<Payload<G>>`
unsafe impl<G: BitSource + Send> Send for BitGenerator<G> {}

impl<G: BitSource> BitGenerator<G> {
    pub fn new(rng: G) -> Self {
        let payload = Box::new(Payload {
            table: BitGen {
                state: core::ptr::null_mut(),
                next_uint64: next_uint64::<G>,
                next_uint32: next_uint32::<G>,
                next_double: next_double::<G>,
                next_raw: next_uint64::<G>,
            },
            rng,
        });

        let raw = Box::into_raw(payload);

        // SAFETY: `raw` comes straight from `Box::into_raw`
        unsafe {
            (*raw).table.state = (&raw mut (*raw).rng).cast::<c_void>();
        }

        log::trace!("bit generator table created at {raw:p}");

        Self {
            // SAFETY: `Box::into_raw` never returns null
            payload: unsafe { NonNull::new_unchecked(raw) },
        }
    }

    /// Pointer to the callback table, valid as long as `self` is alive.
    pub fn table(&mut self) -> *mut BitGen {
        // SAFETY: `payload` is live and uniquely owned
        unsafe { &raw mut (*self.payload.as_ptr()).table }
    }

    pub fn rng(&self) -> &G {
        // SAFETY: `payload` is live and uniquely owned
        unsafe { &self.payload.as_ref().rng }
    }

    pub fn rng_mut(&mut self) -> &mut G {
        // SAFETY: `payload` is live and uniquely owned
        unsafe { &mut self.payload.as_mut().rng }
    }

    #[inline]
    pub fn next_uint64(&mut self) -> u64 {
        self.rng_mut().bits()
    }

    /// Upper half of one draw
    #[inline]
    pub fn next_uint32(&mut self) -> u32 {
        (self.rng_mut().bits() >> 32) as u32
    }

    #[inline]
    pub fn next_double(&mut self) -> f64 {
        crate::unit_f64(self.rng_mut().bits())
    }

    /// Gives up ownership. The table stays valid until passed back to
    /// [`BitGenerator::from_raw`], which must happen exactly once to free it.
    pub fn into_raw(self) -> *mut BitGen {
        let raw = self.payload.as_ptr();
        core::mem::forget(self);

        raw.cast::<BitGen>()
    }

    /// Takes back a table released by [`BitGenerator::into_raw`].
    ///
    /// # Safety
    ///
    /// `table` must come from `BitGenerator::<G>::into_raw` with the same `G`
    /// and must not have been reclaimed already.
    pub unsafe fn from_raw(table: *mut BitGen) -> Self {
        // sanity check
        debug_assert!(!table.is_null(), "bit generator table must not be null");

        Self {
            // SAFETY: non-null by contract
            payload: unsafe { NonNull::new_unchecked(table.cast::<Payload<G>>()) },
        }
    }
}

impl<G: BitSource> Drop for BitGenerator<G> {
    fn drop(&mut self) {
        log::trace!("bit generator table released at {:p}", self.payload);

        // SAFETY: allocated with `Box::into_raw` in `new`, dropped once
        drop(unsafe { Box::from_raw(self.payload.as_ptr()) });
    }
}

impl<G: BitSource + core::fmt::Debug> core::fmt::Debug for BitGenerator<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BitGenerator").field("rng", self.rng()).finish()
    }
}

/// # Safety
///
/// `state` must be the `state` field of a live `BitGen` built for `G`.
unsafe extern "C" fn next_uint64<G: BitSource>(state: *mut c_void) -> u64 {
    unsafe { (*state.cast::<G>()).bits() }
}

unsafe extern "C" fn next_uint32<G: BitSource>(state: *mut c_void) -> u32 {
    unsafe { ((*state.cast::<G>()).bits() >> 32) as u32 }
}

unsafe extern "C" fn next_double<G: BitSource>(state: *mut c_void) -> f64 {
    unsafe { crate::unit_f64((*state.cast::<G>()).bits()) }
}
