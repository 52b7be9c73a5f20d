use crate::simd::Isa;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// None of the compiled kernels can run on this CPU
    #[error("no compiled SIMD tier is supported by this CPU")]
    NoSupportedIsa,

    /// A tier was forced through [`crate::Builder::isa`] but the CPU lacks it
    #[error("{0} is not supported by this CPU")]
    IsaUnavailable(Isa),

    #[error("lane {lane} is out of range for a {lanes}-lane engine")]
    LaneOutOfRange { lane: usize, lanes: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::NoSupportedIsa.to_string(),
            "no compiled SIMD tier is supported by this CPU"
        );
        assert_eq!(
            Error::IsaUnavailable(Isa::Avx512).to_string(),
            "avx512f is not supported by this CPU"
        );
        assert_eq!(
            Error::LaneOutOfRange { lane: 9, lanes: 8 }.to_string(),
            "lane 9 is out of range for a 8-lane engine"
        );
    }
}
