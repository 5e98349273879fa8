use crate::config::VisualizerConfig;

/// Added to every magnitude before taking the log, so silent bins stay finite.
pub const LOG_EPSILON: f32 = 1e-7;

/// Clamped log-magnitude extremes of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumBounds {
    pub floor: f32,
    pub ceiling: f32,
}

/// Auto-gain for the whole display.
///
/// Tracks a single loudness `level` across frames: it jumps up quickly when
/// the spectrum gets louder and eases down when it gets quieter, which keeps
/// the graph lively as the room volume changes.
#[derive(Debug, Clone)]
pub struct DynamicRangeTracker {
    level: f32,
    floor_min: f32,
    ceiling_max: f32,
    min_window: f32,
    min_headroom: f32,
    rise_weight: f32,
    decay_weight: f32,
    /// Display rows the `floor..level` window maps onto.
    scale: f32,
}

impl DynamicRangeTracker {
    /// Starts at `config.initial_level`.
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            level: config.initial_level,
            floor_min: config.floor_min,
            ceiling_max: config.ceiling_max,
            min_window: config.min_window,
            min_headroom: config.min_headroom,
            rise_weight: config.rise_weight,
            decay_weight: config.decay_weight,
            scale: (config.matrix_height + config.overdrive_rows) as f32,
        }
    }

    /// Current loudness level, in log-magnitude units. Maps to the top of
    /// the overdrive rows.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Replace `magnitudes` with their natural log, in place.
    pub fn linearize(magnitudes: &mut [f32]) {
        for m in magnitudes.iter_mut() {
            *m = libm::logf(*m + LOG_EPSILON);
        }
    }

    /// Frame floor and ceiling with the configured clamps applied.
    pub fn bounds(&self, log_spectrum: &[f32]) -> SpectrumBounds {
        let (min, max) = log_spectrum
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        let floor = min.max(self.floor_min);
        let ceiling = max.max(floor + self.min_window).min(self.ceiling_max);
        SpectrumBounds { floor, ceiling }
    }

    /// Fold one frame's bounds into `level` and return the new level.
    pub fn update_level(&mut self, bounds: SpectrumBounds) -> f32 {
        self.level = if bounds.ceiling > self.level {
            // Louder: move up fast but keep some of the old level so the
            // first bump still pops.
            bounds.ceiling * self.rise_weight + self.level * (1.0 - self.rise_weight)
        } else {
            self.level * (1.0 - self.decay_weight) + bounds.floor * self.decay_weight
        };
        self.level = self.level.max(bounds.floor + self.min_headroom);
        self.level
    }

    /// Map log magnitudes onto display rows. Results may exceed the matrix
    /// height; the overshoot is intentional.
    pub fn rescale(&self, log_spectrum: &[f32], floor: f32, scaled: &mut [f32]) {
        let factor = self.scale / (self.level - floor);
        for (out, &x) in scaled.iter_mut().zip(log_spectrum) {
            *out = (x - floor) * factor;
        }
    }

    /// Log, track and rescale one trimmed frame. `spectrum` holds linear
    /// magnitudes on entry and log magnitudes on return.
    pub fn process(&mut self, spectrum: &mut [f32], scaled: &mut [f32]) -> SpectrumBounds {
        Self::linearize(spectrum);
        let bounds = self.bounds(spectrum);
        self.update_level(bounds);
        self.rescale(spectrum, bounds.floor, scaled);
        trace!(
            "floor {} ceiling {} level {}",
            bounds.floor,
            bounds.ceiling,
            self.level
        );
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use approx::assert_abs_diff_eq;

    fn tracker_at(level: f32) -> DynamicRangeTracker {
        let mut config = VisualizerConfig::new();
        config.initial_level = level;
        DynamicRangeTracker::new(&config)
    }

    #[test]
    fn test_rises_faster_than_it_falls() {
        let mut tracker = tracker_at(10.0);
        let levels: Vec<f32> = [5.0, 15.0, 15.0, 5.0, 5.0, 5.0]
            .iter()
            .map(|&ceiling| tracker.update_level(SpectrumBounds { floor: 6.0, ceiling }))
            .collect();

        assert_abs_diff_eq!(levels[0], 8.0, epsilon = 1e-4);
        // Two loud frames are enough to reach 90% of the new ceiling.
        assert_abs_diff_eq!(levels[1], 12.9, epsilon = 1e-4);
        assert!(levels[2] >= 0.9 * 15.0, "levels {:?}", levels);
        // Two quiet frames are not enough to fall below 8, the third is.
        assert!(levels[3] >= 8.0 && levels[4] >= 8.0, "levels {:?}", levels);
        assert!(levels[5] < 8.0, "levels {:?}", levels);
    }

    #[test]
    fn test_silence_bounds() {
        let tracker = tracker_at(35.0);
        let mut spectrum = [0.0f32; 21];
        DynamicRangeTracker::linearize(&mut spectrum);
        let bounds = tracker.bounds(&spectrum);
        assert_eq!(bounds.floor, 4.0);
        assert_eq!(bounds.ceiling, 10.0);
    }

    #[test]
    fn test_loud_bounds_are_clamped() {
        let tracker = tracker_at(35.0);
        let bounds = tracker.bounds(&[8.0, 12.0, 25.0]);
        assert_eq!(bounds.floor, 8.0);
        assert_eq!(bounds.ceiling, 20.0);
        // Narrow frames are widened to the minimum window.
        let bounds = tracker.bounds(&[9.0, 10.0]);
        assert_eq!(bounds.ceiling, 15.0);
    }

    #[test]
    fn test_level_keeps_headroom_over_floor() {
        let mut tracker = tracker_at(35.0);
        let mut scaled = [0.0f32; 21];
        for _ in 0..50 {
            let mut spectrum = [0.0f32; 21];
            let bounds = tracker.process(&mut spectrum, &mut scaled);
            assert!(tracker.level() >= bounds.floor + 1.0);
            assert!(scaled.iter().all(|s| s.is_finite()));
        }
        // Near-silence settles the level onto the minimum window.
        assert_abs_diff_eq!(tracker.level(), 10.0, epsilon = 0.05);
    }

    #[test]
    fn test_headroom_clamp_applies() {
        let mut tracker = tracker_at(4.2);
        let level = tracker.update_level(SpectrumBounds {
            floor: 4.0,
            ceiling: 4.1,
        });
        assert_eq!(level, 5.0);
    }

    #[test]
    fn test_rescale_maps_window_to_rows() {
        let tracker = tracker_at(11.0);
        let mut scaled = [0.0f32; 3];
        tracker.rescale(&[4.0, 7.5, 11.0], 4.0, &mut scaled);
        // matrix_height 4 + 3 overdrive rows
        assert_abs_diff_eq!(scaled[0], 0.0);
        assert_abs_diff_eq!(scaled[1], 3.5, epsilon = 1e-5);
        assert_abs_diff_eq!(scaled[2], 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_process_logs_in_place() {
        let mut tracker = tracker_at(35.0);
        let mut spectrum = [libm::expf(12.0); 4];
        let mut scaled = [0.0f32; 4];
        tracker.process(&mut spectrum, &mut scaled);
        for &x in spectrum.iter() {
            assert_abs_diff_eq!(x, 12.0, epsilon = 1e-4);
        }
    }
}
