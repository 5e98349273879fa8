use core::f32::consts::PI;

pub const MIDPOINT: f32 = 32768.0;

/// Unsigned samples of a sine sitting exactly on `bin` of an `n`-point FFT.
pub fn sine_on_bin(n: usize, bin: usize, amplitude: f32) -> Vec<u16> {
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * bin as f32 * i as f32 / n as f32;
            (MIDPOINT + amplitude * phase.sin()).round() as u16
        })
        .collect()
}

pub fn constant(n: usize, value: u16) -> Vec<u16> {
    vec![value; n]
}

pub fn peak_bin(spectrum: &[f32]) -> usize {
    spectrum
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, f32::MIN), |best, (i, &m)| if m > best.1 { (i, m) } else { best })
        .0
}
