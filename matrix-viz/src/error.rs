/// Startup configuration rejected. Always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum ConfigError {
    #[error("FFT size {0} is not a power of two")]
    FftSizeNotPowerOfTwo(usize),
    #[error("FFT size {0} is not supported")]
    UnsupportedFftSize(usize),
    #[error("bin range {low}..={high} does not fit a spectrum of {spectrum_len} bins")]
    InvalidBinRange {
        low: usize,
        high: usize,
        spectrum_len: usize,
    },
    #[error("matrix must be at least 1x1")]
    EmptyMatrix,
    #[error("brightness must be within 0.0..=1.0")]
    InvalidBrightness,
    #[error("dynamic range tracking parameters out of range")]
    InvalidTracking,
    #[error("column overlap or gain out of range")]
    InvalidColumns,
    #[error("peak dot acceleration and snap offset must not be negative")]
    InvalidPeakDot,
    #[error("column {column} has no contributing spectrum bins")]
    EmptyColumn { column: usize },
}

/// Failure reported by the audio capture collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum CaptureError {
    /// Bus or transport error. The frame is lost and the visualizer restarts.
    #[error("transient capture fault")]
    TransientFault,
}

/// Why a frame was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError<E> {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("display failed")]
    Display(E),
}
