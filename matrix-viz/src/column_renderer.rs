use alloc::vec::Vec;

use embedded_graphics::{draw_target::DrawTarget, geometry::Point, pixelcolor::Rgb888, Pixel};

use crate::color_wheel::{ColumnColor, BACKGROUND};
use crate::column_weight_table::{ColumnBand, ColumnWeightTable};
use crate::config::VisualizerConfig;
use crate::peak_dot::PeakDot;

/// Draws one bar per column plus its falling peak dot.
///
/// Row 0 is the top of the matrix. Bars grow up from below the bottom row,
/// so a quiet column has its top at `matrix_height + 1`.
pub struct ColumnRenderer {
    matrix_height: u32,
    colors: Vec<Rgb888>,
    dots: Vec<PeakDot>,
    snap_offset: f32,
    acceleration: f32,
    peak_color: Rgb888,
}

impl ColumnRenderer {
    /// One color and one resting dot per column of `table`. Dots start on
    /// the row just below the matrix.
    pub fn new<C: ColumnColor>(
        config: &VisualizerConfig,
        table: &ColumnWeightTable,
        palette: &C,
    ) -> Self {
        let num_columns = table.len();
        let colors = (0..num_columns)
            .map(|column| palette.column_color(column, num_columns))
            .collect();
        Self {
            matrix_height: config.matrix_height,
            colors,
            dots: (0..num_columns)
                .map(|_| PeakDot::new(config.matrix_height as f32))
                .collect(),
            snap_offset: config.dot_snap_offset,
            acceleration: config.dot_acceleration,
            peak_color: config.peak_color,
        }
    }

    /// Fixed color of each column.
    pub fn colors(&self) -> &[Rgb888] {
        &self.colors
    }

    /// Current peak dot of each column.
    pub fn dots(&self) -> &[PeakDot] {
        &self.dots
    }

    /// Bar top for `band`, in fractional rows. Not clamped: it goes negative
    /// for very loud input and past the bottom for very quiet input.
    pub fn column_top(&self, band: &ColumnBand, scaled: &[f32]) -> f32 {
        (self.matrix_height + 1) as f32 - band.collapse(scaled)
    }

    /// Compute the bar top of `column` and advance its peak dot.
    pub fn update_column(&mut self, column: usize, band: &ColumnBand, scaled: &[f32]) -> f32 {
        let top = self.column_top(band, scaled);
        self.dots[column].update(top, self.snap_offset, self.acceleration);
        top
    }

    /// Pixels for one column: background above the bar, column color from
    /// the bar top down, then the peak dot on top. Rows outside the matrix
    /// are never produced.
    pub fn column_pixels(
        &self,
        column: usize,
        top: f32,
    ) -> impl Iterator<Item = Pixel<Rgb888>> + '_ {
        let height = self.matrix_height as i32;
        let x = column as i32;
        let top_row = (top as i32).clamp(0, height);
        let color = self.colors[column];
        let dot_row = self.dots[column].row();

        let bar = (0..height).map(move |row| {
            let fill = if row < top_row { BACKGROUND } else { color };
            Pixel(Point::new(x, row), fill)
        });
        let dot = (0..height)
            .contains(&dot_row)
            .then(|| Pixel(Point::new(x, dot_row), self.peak_color));
        bar.chain(dot)
    }

    /// Render every column of `table` from one rescaled frame.
    pub fn draw<D>(
        &mut self,
        target: &mut D,
        table: &ColumnWeightTable,
        scaled: &[f32],
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        for (column, band) in table.bands().iter().enumerate() {
            let top = self.update_column(column, band, scaled);
            target.draw_iter(self.column_pixels(column, top))?;
        }
        Ok(())
    }
}
