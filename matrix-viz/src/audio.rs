use crate::error::CaptureError;

/// Blocking microphone capture.
pub trait AudioSource {
    /// Fill `buf` with one frame of unsigned 16-bit samples.
    fn record(&mut self, buf: &mut [u16]) -> Result<(), CaptureError>;
}

/// Sample frame to linear magnitude spectrum. Never blocks, never fails.
pub trait SpectrumTransform {
    /// Write `samples.len() / 2` nonnegative magnitudes into `out`.
    fn magnitudes(&mut self, samples: &[u16], out: &mut [f32]);
}

impl<F> SpectrumTransform for F
where
    F: FnMut(&[u16], &mut [f32]),
{
    fn magnitudes(&mut self, samples: &[u16], out: &mut [f32]) {
        self(samples, out)
    }
}
