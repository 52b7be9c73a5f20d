//! # Dispatch
//!
//! Picks the widest compiled kernel the running CPU supports. Detection runs
//! once per process; kernel selection runs once per generator.
use crate::engine::Kernel;
use crate::error::{Error, Result};
use std::sync::OnceLock;

/// Instruction-set tier a [`crate::XoshiroSimd`] runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Isa {
    /// 8 lanes, AVX-512F
    Avx512,

    /// 4 lanes, AVX2 with FMA
    Avx2,

    /// 2 lanes, SSE4.2
    Sse42,

    /// 2 lanes, the x86_64 baseline
    Sse2,

    /// 2 lanes, the aarch64 baseline
    Neon,

    /// 4 lanes in plain integer registers, available everywhere
    Portable,
}

impl Isa {
    /// Compiled tiers in order of preference, widest first
    #[cfg(target_arch = "x86_64")]
    pub const PREFERENCE: &'static [Isa] = &[Isa::Avx512, Isa::Avx2, Isa::Sse42, Isa::Sse2];

    /// Compiled tiers in order of preference, widest first
    #[cfg(target_arch = "aarch64")]
    pub const PREFERENCE: &'static [Isa] = &[Isa::Neon];

    /// Compiled tiers in order of preference, widest first
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    pub const PREFERENCE: &'static [Isa] = &[Isa::Portable];

    /// Number of 64-bit lanes stepped together
    pub const fn lanes(self) -> usize {
        match self {
            Isa::Avx512 => 8,
            Isa::Avx2 | Isa::Portable => 4,
            Isa::Sse42 | Isa::Sse2 | Isa::Neon => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Isa::Avx512 => "avx512f",
            Isa::Avx2 => "avx2",
            Isa::Sse42 => "sse4.2",
            Isa::Sse2 => "sse2",
            Isa::Neon => "neon",
            Isa::Portable => "portable",
        }
    }

    /// Whether this tier is compiled in and the running CPU can execute it.
    pub fn is_supported(self) -> bool {
        match self {
            Isa::Portable => true,

            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => is_x86_feature_detected!("avx512f"),
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma"),
            #[cfg(target_arch = "x86_64")]
            Isa::Sse42 => is_x86_feature_detected!("sse4.2"),
            #[cfg(target_arch = "x86_64")]
            Isa::Sse2 => is_x86_feature_detected!("sse2"),

            #[cfg(target_arch = "aarch64")]
            Isa::Neon => std::arch::is_aarch64_feature_detected!("neon"),

            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    /// Every runnable tier, preferred ones first, [`Isa::Portable`] last.
    pub fn supported() -> Vec<Isa> {
        let mut tiers: Vec<Isa> = Self::PREFERENCE.iter().copied().filter(|isa| isa.is_supported()).collect();

        if !tiers.contains(&Isa::Portable) {
            tiers.push(Isa::Portable);
        }

        tiers
    }

    /// The widest runnable tier from [`Isa::PREFERENCE`].
    ///
    /// The answer only depends on the CPU, so it is computed once and cached
    /// for the lifetime of the process.
    pub fn detect() -> Result<Isa> {
        static DETECTED: OnceLock<Option<Isa>> = OnceLock::new();

        let detected = *DETECTED.get_or_init(|| {
            let found = Self::PREFERENCE.iter().copied().find(|isa| isa.is_supported());

            match found {
                Some(isa) => log::debug!("detected SIMD tier {isa} ({} lanes)", isa.lanes()),
                None => log::debug!("no compiled SIMD tier runs on this CPU"),
            }

            found
        });

        detected.ok_or(Error::NoSupportedIsa)
    }
}

impl core::fmt::Display for Isa {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the kernel for `isa`, seeded for `(thread_id, cluster_id)`.
///
/// Returns [`Error::IsaUnavailable`] when the CPU lacks `isa`.
pub(crate) fn select(isa: Isa, seed: u64, thread_id: u64, cluster_id: u64) -> Result<Box<dyn Kernel>> {
    if !isa.is_supported() {
        log::warn!("requested SIMD tier {isa} is not supported by this CPU");
        return Err(Error::IsaUnavailable(isa));
    }

    // SAFETY (all arms): `is_supported` confirmed the CPU runs this tier
    let kernel: Box<dyn Kernel> = match isa {
        Isa::Portable => Box::new(unsafe { crate::engine::portable::PortableKernel::new(seed, thread_id, cluster_id) }),

        #[cfg(target_arch = "x86_64")]
        Isa::Avx512 => Box::new(unsafe { crate::engine::avx512::Avx512Kernel::new(seed, thread_id, cluster_id) }),
        #[cfg(target_arch = "x86_64")]
        Isa::Avx2 => Box::new(unsafe { crate::engine::avx2::Avx2Kernel::new(seed, thread_id, cluster_id) }),
        #[cfg(target_arch = "x86_64")]
        Isa::Sse42 => Box::new(unsafe { crate::engine::sse2::Sse42Kernel::new(seed, thread_id, cluster_id) }),
        #[cfg(target_arch = "x86_64")]
        Isa::Sse2 => Box::new(unsafe { crate::engine::sse2::Sse2Kernel::new(seed, thread_id, cluster_id) }),

        #[cfg(target_arch = "aarch64")]
        Isa::Neon => Box::new(unsafe { crate::engine::neon::NeonKernel::new(seed, thread_id, cluster_id) }),

        #[allow(unreachable_patterns)]
        other => return Err(Error::IsaUnavailable(other)),
    };

    log::debug!("selected SIMD tier {isa} with {} lanes", kernel.lanes());

    Ok(kernel)
}
