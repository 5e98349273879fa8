use embedded_graphics::pixelcolor::Rgb888;

use crate::error::ConfigError;

// --- Audio Config ---
pub const FFT_SIZE: usize = 256; // Sample frame length, MUST be a power of two
pub const SAMPLE_RATE_HZ: u32 = 16_000;
// Bottom of the spectrum is noisy and the top is mostly harmonics, so only
// this inclusive bin range is graphed.
pub const LOW_BIN: usize = 35;
pub const HIGH_BIN: usize = 55;

// --- Display Config ---
pub const MATRIX_WIDTH: u32 = 8;
pub const MATRIX_HEIGHT: u32 = 4;
pub const BRIGHTNESS: f32 = 0.1;

// --- Dynamic Range Config (natural log of magnitude) ---
pub const FLOOR_MIN: f32 = 4.0;
pub const CEILING_MAX: f32 = 20.0;
pub const MIN_WINDOW: f32 = 6.0;
pub const MIN_HEADROOM: f32 = 1.0;
pub const INITIAL_LEVEL: f32 = 35.0;
pub const RISE_WEIGHT: f32 = 0.7;
pub const DECAY_WEIGHT: f32 = 0.5;
pub const OVERDRIVE_ROWS: u32 = 3;

// --- Column Config ---
pub const COLUMN_OVERLAP: f32 = 0.95;
pub const BASS_GAIN: f32 = 0.8;
pub const GAIN_SLOPE: f32 = 1.4;
pub const HUE_SPAN: u32 = 225; // red to purple, skipping magenta

// --- Peak Dot Config ---
pub const DOT_ACCELERATION: f32 = 0.2;
pub const DOT_SNAP_OFFSET: f32 = 0.5;
pub const PEAK_COLOR: Rgb888 = Rgb888::new(0xE0, 0x80, 0x80);

const MIN_FFT_SIZE: usize = 64;
const MAX_FFT_SIZE: usize = 1024;

/// Startup parameters. Fixed for the life of a `Visualizer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizerConfig {
    pub fft_size: usize,
    pub sample_rate_hz: u32,
    pub low_bin: usize,
    pub high_bin: usize,
    pub matrix_width: u32,
    pub matrix_height: u32,
    pub brightness: f32,
    pub floor_min: f32,
    pub ceiling_max: f32,
    pub min_window: f32,
    pub min_headroom: f32,
    pub initial_level: f32,
    pub rise_weight: f32,
    pub decay_weight: f32,
    pub overdrive_rows: u32,
    pub column_overlap: f32,
    pub bass_gain: f32,
    pub gain_slope: f32,
    pub hue_span: u32,
    pub dot_acceleration: f32,
    pub dot_snap_offset: f32,
    pub peak_color: Rgb888,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizerConfig {
    /// Defaults from the constants above.
    pub const fn new() -> Self {
        Self {
            fft_size: FFT_SIZE,
            sample_rate_hz: SAMPLE_RATE_HZ,
            low_bin: LOW_BIN,
            high_bin: HIGH_BIN,
            matrix_width: MATRIX_WIDTH,
            matrix_height: MATRIX_HEIGHT,
            brightness: BRIGHTNESS,
            floor_min: FLOOR_MIN,
            ceiling_max: CEILING_MAX,
            min_window: MIN_WINDOW,
            min_headroom: MIN_HEADROOM,
            initial_level: INITIAL_LEVEL,
            rise_weight: RISE_WEIGHT,
            decay_weight: DECAY_WEIGHT,
            overdrive_rows: OVERDRIVE_ROWS,
            column_overlap: COLUMN_OVERLAP,
            bass_gain: BASS_GAIN,
            gain_slope: GAIN_SLOPE,
            hue_span: HUE_SPAN,
            dot_acceleration: DOT_ACCELERATION,
            dot_snap_offset: DOT_SNAP_OFFSET,
            peak_color: PEAK_COLOR,
        }
    }

    /// Graph bins `low_bin..=high_bin`.
    pub const fn with_bins(mut self, low_bin: usize, high_bin: usize) -> Self {
        self.low_bin = low_bin;
        self.high_bin = high_bin;
        self
    }

    /// Sample frame length; the spectrum has half as many bins.
    pub const fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Matrix size in pixels, `width` columns by `height` rows.
    pub const fn with_matrix(mut self, width: u32, height: u32) -> Self {
        self.matrix_width = width;
        self.matrix_height = height;
        self
    }

    /// Number of magnitude bins the transform produces.
    pub const fn spectrum_len(&self) -> usize {
        self.fft_size / 2
    }

    /// Number of bins in the graphed range, both ends included.
    pub const fn trimmed_len(&self) -> usize {
        self.high_bin - self.low_bin + 1
    }

    /// Check every field for a usable range. Called by every constructor
    /// that takes a config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSizeNotPowerOfTwo(self.fft_size));
        }
        if !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size) {
            return Err(ConfigError::UnsupportedFftSize(self.fft_size));
        }
        // Bin 0 would put log2(0) on the column axis.
        if self.low_bin == 0 || self.low_bin >= self.high_bin || self.high_bin >= self.spectrum_len()
        {
            return Err(ConfigError::InvalidBinRange {
                low: self.low_bin,
                high: self.high_bin,
                spectrum_len: self.spectrum_len(),
            });
        }
        if self.matrix_width == 0 || self.matrix_height == 0 {
            return Err(ConfigError::EmptyMatrix);
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ConfigError::InvalidBrightness);
        }
        let weight_ok = |w: f32| w > 0.0 && w <= 1.0;
        if !(self.min_headroom > 0.0
            && self.min_window > 0.0
            && self.ceiling_max > self.floor_min
            && weight_ok(self.rise_weight)
            && weight_ok(self.decay_weight))
        {
            return Err(ConfigError::InvalidTracking);
        }
        // Boost must be positive and rise with the column index.
        if !(self.column_overlap > 0.0
            && self.column_overlap <= 1.0
            && self.bass_gain > 0.0
            && self.gain_slope > 0.0)
        {
            return Err(ConfigError::InvalidColumns);
        }
        if !(self.dot_acceleration >= 0.0 && self.dot_snap_offset >= 0.0) {
            return Err(ConfigError::InvalidPeakDot);
        }
        Ok(())
    }
}
