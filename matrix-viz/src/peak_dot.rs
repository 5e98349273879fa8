/// The falling dot marking a column's recent peak.
///
/// Heights are in fractional rows measured from the top of the matrix, so a
/// smaller value is a higher dot and "falling" means increasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDot {
    height: f32,
    velocity: f32,
}

impl PeakDot {
    /// A dot resting at `height` with no fall speed.
    pub const fn new(height: f32) -> Self {
        Self {
            height,
            velocity: 0.0,
        }
    }

    /// Fractional row, 0.0 at the top of the matrix.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Rows fallen per frame.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Matrix row the dot is drawn on. May be outside the matrix.
    pub fn row(&self) -> i32 {
        self.height as i32
    }

    /// Advance one frame given the column's bar top.
    ///
    /// A bar above the dot pushes it to `snap_offset` above the bar and
    /// cancels its momentum. Otherwise the dot keeps falling, gaining
    /// `acceleration` rows per frame of speed.
    pub fn update(&mut self, column_top: f32, snap_offset: f32, acceleration: f32) {
        if column_top < self.height {
            self.height = column_top - snap_offset;
            self.velocity = 0.0;
        } else {
            self.height += self.velocity;
            self.velocity += acceleration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_snap_then_fall() {
        let mut dot = PeakDot::new(4.0);
        let mut heights = [0.0f32; 5];
        let mut velocities = [0.0f32; 5];
        for (i, &top) in [2.0, 2.0, 4.0, 4.0, 4.0].iter().enumerate() {
            dot.update(top, 0.5, 0.2);
            heights[i] = dot.height();
            velocities[i] = dot.velocity();
        }

        // Frame 1: bar above the dot, snap to just above the bar.
        assert_abs_diff_eq!(heights[0], 1.5);
        assert_abs_diff_eq!(velocities[0], 0.0);
        // Frame 2: bar now below the dot, which holds still for a frame.
        assert_abs_diff_eq!(heights[1], 1.5);
        assert_abs_diff_eq!(velocities[1], 0.2, epsilon = 1e-6);
        // Then it accelerates downwards.
        assert_abs_diff_eq!(heights[2], 1.7, epsilon = 1e-6);
        assert_abs_diff_eq!(velocities[2], 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(heights[3], 2.1, epsilon = 1e-6);
        assert_abs_diff_eq!(heights[4], 2.7, epsilon = 1e-6);
        assert_abs_diff_eq!(velocities[4], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_rising_bar_resets_velocity() {
        let mut dot = PeakDot::new(1.0);
        for _ in 0..4 {
            dot.update(5.0, 0.5, 0.2);
        }
        assert!(dot.velocity() > 0.0);
        let fallen = dot.height();
        dot.update(fallen - 1.0, 0.5, 0.2);
        assert_eq!(dot.velocity(), 0.0);
        assert_abs_diff_eq!(dot.height(), fallen - 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_row_truncates_towards_zero() {
        assert_eq!(PeakDot::new(2.9).row(), 2);
        assert_eq!(PeakDot::new(-0.7).row(), 0);
        assert_eq!(PeakDot::new(-1.2).row(), -1);
    }
}
