#![allow(dead_code)]

use std::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*, Pixel};
use matrix_viz::{AudioSource, CaptureError, DisplaySink, LedStrip};

pub const WIDTH: u32 = 8;
pub const HEIGHT: u32 = 4;

/// Display that keeps every pixel it is handed, grouped by flush.
#[derive(Default)]
pub struct RecordingDisplay {
    pub pending: Vec<Pixel<Rgb888>>,
    pub frames: Vec<Vec<Pixel<Rgb888>>>,
}

impl OriginDimensions for RecordingDisplay {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for RecordingDisplay {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.pending.extend(pixels);
        Ok(())
    }
}

impl DisplaySink for RecordingDisplay {
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

/// Microphone that hands out mid-scale samples and fails on chosen calls.
pub struct ScriptedSource {
    pub fail_on: Vec<usize>,
    pub calls: usize,
}

impl ScriptedSource {
    pub fn failing_on(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            calls: 0,
        }
    }
}

impl AudioSource for ScriptedSource {
    fn record(&mut self, buf: &mut [u16]) -> Result<(), CaptureError> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_on.contains(&call) {
            return Err(CaptureError::TransientFault);
        }
        buf.fill(32768);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingStrip {
    pub writes: Vec<Vec<Rgb888>>,
}

impl LedStrip for RecordingStrip {
    type Error = Infallible;

    fn write(&mut self, colors: &[Rgb888]) -> Result<(), Self::Error> {
        self.writes.push(colors.to_vec());
        Ok(())
    }
}

/// Strip whose bus fails on chosen write calls. Only successful writes
/// are recorded.
pub struct FlakyStrip {
    pub fail_on: Vec<usize>,
    pub attempts: usize,
    pub writes: Vec<Vec<Rgb888>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

impl FlakyStrip {
    pub fn failing_on(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            attempts: 0,
            writes: Vec::new(),
        }
    }
}

impl LedStrip for FlakyStrip {
    type Error = BusError;

    fn write(&mut self, colors: &[Rgb888]) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on.contains(&attempt) {
            return Err(BusError);
        }
        self.writes.push(colors.to_vec());
        Ok(())
    }
}

/// Every other bin loud, the rest near silent.
pub fn striped(frame: usize, out: &mut [f32], loud: f32) {
    for (bin, m) in out.iter_mut().enumerate() {
        *m = if (bin + frame) % 2 == 0 { loud } else { 1.0 };
    }
}
