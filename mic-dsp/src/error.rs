use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Failures of the acquisition pipeline.
///
/// `AcquisitionTimeout` and `IncompleteTransfer` are per-cycle and the caller
/// retries on the next cycle. `PeripheralInit` only happens during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum Error {
    #[error("transfer did not complete within {waited_us} us")]
    AcquisitionTimeout { waited_us: u32 },

    #[error("transfer stopped after {written} of {expected} samples")]
    IncompleteTransfer { written: usize, expected: usize },

    #[error("failed to claim {resource}")]
    PeripheralInit { resource: &'static str },
}
