use alloc::vec::Vec;
use core::ops::Range;

use crate::config::VisualizerConfig;
use crate::error::ConfigError;

// Guards the float -> bin index truncation against landing one bin short.
const BIN_ROUNDING: f64 = 1e-4;

/// The spectrum bins that feed one display column.
///
/// `first_bin` indexes the trimmed spectrum (bin `low_bin` is index 0).
/// `weights` sum to 1.0; `gain` is applied on top when collapsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBand {
    first_bin: usize,
    weights: Vec<f32>,
    gain: f32,
}

impl ColumnBand {
    /// First trimmed-spectrum index with a nonzero weight.
    pub fn first_bin(&self) -> usize {
        self.first_bin
    }

    /// Normalized weights, one per bin starting at `first_bin`.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Boost multiplier, rising from bass to treble columns.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Trimmed-spectrum indices this column reads.
    pub fn bins(&self) -> Range<usize> {
        self.first_bin..self.first_bin + self.weights.len()
    }

    /// Weights with the column gain applied.
    pub fn boosted_weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.weights.iter().map(move |w| w * self.gain)
    }

    /// Weighted sum of the column's bins in `scaled`.
    pub fn collapse(&self, scaled: &[f32]) -> f32 {
        scaled[self.bins()]
            .iter()
            .zip(self.boosted_weights())
            .map(|(value, weight)| value * weight)
            .sum()
    }
}

/// Maps the linear FFT bins onto log-spaced display columns, so octaves are
/// evenly spaced across the matrix like keys on a piano.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWeightTable {
    bands: Vec<ColumnBand>,
}

impl ColumnWeightTable {
    /// Build one band per matrix column.
    ///
    /// Fails if `config` does not validate or if any column ends up with no
    /// bins, which happens when the bin range is too narrow for the width.
    pub fn new(config: &VisualizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let num_columns = config.matrix_width as usize;
        let spectrum_bits = libm::log2(config.spectrum_len() as f64);
        // Column axis runs from the start of `low_bin` to the end of
        // `high_bin`, as fractions of the full log-spaced spectrum.
        let low_frac = libm::log2(config.low_bin as f64) / spectrum_bits;
        let frac_range = libm::log2((config.high_bin + 1) as f64) / spectrum_bits - low_frac;

        let mut bands = Vec::with_capacity(num_columns);
        for column in 0..num_columns {
            let position = column as f64 / num_columns as f64;
            // Shrinking the lower bound overlaps neighbouring columns slightly.
            let lower = low_frac + frac_range * (position * config.column_overlap as f64);
            let upper = low_frac + frac_range * ((column + 1) as f64 / num_columns as f64);
            let mid = (lower + upper) * 0.5;
            let half_width = (upper - lower) * 0.5;

            let start = ((libm::exp2(spectrum_bits * lower) + BIN_ROUNDING) as usize)
                .max(config.low_bin);
            let end = ((libm::exp2(spectrum_bits * upper) + BIN_ROUNDING) as usize)
                .min(config.high_bin);

            let mut first_bin = None;
            let mut weights = Vec::new();
            for bin in start..=end {
                let bin_center = libm::log2(bin as f64 + 0.5) / spectrum_bits;
                let dist = libm::fabs(bin_center - mid) / half_width;
                if dist >= 1.0 {
                    continue;
                }
                first_bin.get_or_insert(bin);
                // Cubic falloff, 1.0 at the column center and 0.0 at its edges
                let d = 1.0 - dist;
                weights.push((3.0 - 2.0 * d) * d * d);
            }

            let first_bin = match first_bin {
                Some(bin) => bin,
                None => {
                    error!("column {} has no contributing bins", column);
                    return Err(ConfigError::EmptyColumn { column });
                }
            };
            let total: f64 = weights.iter().sum();
            let weights: Vec<f32> = weights.iter().map(|w| (w / total) as f32).collect();
            // Mute the bass columns a little and lift the treble ones.
            let gain = config.bass_gain + position as f32 * config.gain_slope;

            debug!(
                "column {}: first bin {}, {} bins, gain {}",
                column,
                first_bin,
                weights.len(),
                gain
            );
            bands.push(ColumnBand {
                first_bin: first_bin - config.low_bin,
                weights,
                gain,
            });
        }

        info!(
            "column weight table built: {} columns over bins {}..={}",
            num_columns,
            config.low_bin,
            config.high_bin
        );
        Ok(Self { bands })
    }

    /// Bands in column order, left to right.
    pub fn bands(&self) -> &[ColumnBand] {
        &self.bands
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}
