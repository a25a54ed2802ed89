use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::{TimePointIndex, VisibleRange};
use crate::error::{ChartError, ChartResult};

const MIN_VISIBLE_BARS_COUNT: f64 = 2.0;

/// Fractional visible window in logical index units, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalRange {
    pub from: f64,
    pub to: f64,
}

impl LogicalRange {
    /// Widens to whole indices as the half-open range renderers consume.
    #[must_use]
    pub fn to_visible_range(self) -> VisibleRange {
        VisibleRange::new(
            self.from.floor() as TimePointIndex,
            self.to.ceil() as TimePointIndex + 1,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeScaleOptions {
    pub right_offset: f64,
    pub bar_spacing: f64,
    pub min_bar_spacing: f64,
    /// `0` means half of the current width.
    pub max_bar_spacing: f64,
    pub fix_left_edge: bool,
    pub fix_right_edge: bool,
    pub right_bar_stays_on_scroll: bool,
}

impl Default for TimeScaleOptions {
    fn default() -> Self {
        Self {
            right_offset: 0.0,
            bar_spacing: 6.0,
            min_bar_spacing: 0.5,
            max_bar_spacing: 0.0,
            fix_left_edge: false,
            fix_right_edge: false,
            right_bar_stays_on_scroll: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TransitionState {
    bar_spacing: f64,
    right_offset: f64,
}

/// Horizontal logical-index axis using a constant bar spacing.
///
/// `base_index` is the right-most populated index; `right_offset` counts the
/// bars between it and the right edge.
#[derive(Debug, Clone)]
pub struct TimeScale {
    options: TimeScaleOptions,
    width: f64,
    first_index: Option<TimePointIndex>,
    base_index: Option<TimePointIndex>,
    right_offset: f64,
    bar_spacing: f64,
    scroll_start_point: Option<f64>,
    transition_start_state: Option<TransitionState>,
    revision: u64,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(TimeScaleOptions::default())
    }
}

impl TimeScale {
    #[must_use]
    pub fn new(options: TimeScaleOptions) -> Self {
        Self {
            width: 0.0,
            first_index: None,
            base_index: None,
            right_offset: options.right_offset,
            bar_spacing: options.bar_spacing,
            scroll_start_point: None,
            transition_start_state: None,
            revision: 0,
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> TimeScaleOptions {
        self.options
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply_options(&mut self, options: TimeScaleOptions) -> ChartResult<()> {
        self.options = options;
        self.set_bar_spacing(options.bar_spacing)?;
        self.set_right_offset(options.right_offset)
    }

    pub fn set_width(&mut self, new_width: f64) -> ChartResult<()> {
        if !new_width.is_finite() || new_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale width must be finite and > 0".to_owned(),
            ));
        }
        if (self.width - new_width).abs() <= f64::EPSILON {
            return Ok(());
        }
        self.width = new_width;
        self.correct_bar_spacing();
        self.correct_offset();
        self.bump_revision();
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Tells the scale which logical indices are populated.
    ///
    /// `last` becomes the base index that `right_offset` is measured from.
    pub fn set_index_bounds(&mut self, bounds: Option<(TimePointIndex, TimePointIndex)>) {
        let (first, last) = match bounds {
            Some((first, last)) => (Some(first.min(last)), Some(first.max(last))),
            None => (None, None),
        };
        if self.first_index == first && self.base_index == last {
            return;
        }
        self.first_index = first;
        self.base_index = last;
        self.correct_offset();
        self.bump_revision();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.base_index.is_none()
    }

    #[must_use]
    pub fn base_index(&self) -> TimePointIndex {
        self.base_index.unwrap_or(0)
    }

    #[must_use]
    pub fn right_offset(&self) -> f64 {
        self.right_offset
    }

    pub fn set_right_offset(&mut self, offset: f64) -> ChartResult<()> {
        if !offset.is_finite() {
            return Err(ChartError::InvalidData(
                "time scale right offset must be finite".to_owned(),
            ));
        }
        self.right_offset = offset;
        self.correct_offset();
        self.bump_revision();
        Ok(())
    }

    #[must_use]
    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    pub fn set_bar_spacing(&mut self, new_bar_spacing: f64) -> ChartResult<()> {
        if !new_bar_spacing.is_finite() || new_bar_spacing <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale bar spacing must be finite and > 0".to_owned(),
            ));
        }
        self.bar_spacing = new_bar_spacing;
        self.correct_bar_spacing();
        self.correct_offset();
        self.bump_revision();
        Ok(())
    }

    #[must_use]
    pub fn index_to_coordinate(&self, index: TimePointIndex) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let delta_from_right = self.base_index() as f64 + self.right_offset - index as f64;
        self.width - (delta_from_right + 0.5) * self.bar_spacing - 1.0
    }

    pub fn coordinate_to_float_index(&self, x: f64) -> ChartResult<f64> {
        if !x.is_finite() {
            return Err(ChartError::InvalidData(
                "coordinate must be finite".to_owned(),
            ));
        }
        let delta_from_right = (self.width - 1.0 - x) / self.bar_spacing;
        let index = self.base_index() as f64 + self.right_offset - delta_from_right;
        Ok((index * 1_000_000.0).round() / 1_000_000.0)
    }

    pub fn coordinate_to_index(&self, x: f64) -> ChartResult<TimePointIndex> {
        Ok(self.coordinate_to_float_index(x)?.ceil() as TimePointIndex)
    }

    #[must_use]
    pub fn visible_logical_range(&self) -> Option<LogicalRange> {
        if self.is_empty() {
            return None;
        }
        let bars_length = self.width / self.bar_spacing;
        let right_border = self.right_offset + self.base_index() as f64;
        Some(LogicalRange {
            from: right_border - bars_length + 1.0,
            to: right_border,
        })
    }

    /// Half-open index range covering every bar at least partly on screen.
    #[must_use]
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.visible_logical_range()
            .map(LogicalRange::to_visible_range)
    }

    /// Changes bar spacing by `scale` tenths, keeping the index under
    /// `zoom_point` fixed unless the right bar is pinned.
    pub fn zoom(&mut self, zoom_point: f64, scale: f64) -> ChartResult<()> {
        if self.is_empty() || !scale.is_finite() || scale == 0.0 {
            return Ok(());
        }
        let clamped_zoom_point = zoom_point.clamp(1.0, self.width);
        let anchor = self.coordinate_to_float_index(clamped_zoom_point)?;
        let bar_spacing = self.bar_spacing;
        self.set_bar_spacing(bar_spacing + scale * (bar_spacing / 10.0))?;
        if !self.options.right_bar_stays_on_scroll {
            let corrected =
                self.right_offset + (anchor - self.coordinate_to_float_index(clamped_zoom_point)?);
            self.set_right_offset(corrected)?;
        }
        trace!(zoom_point, scale, bar_spacing = self.bar_spacing, "zoom time scale");
        Ok(())
    }

    pub fn start_scroll(&mut self, x: f64) {
        if self.scroll_start_point.is_some() || self.is_empty() {
            return;
        }
        self.scroll_start_point = Some(x);
        self.transition_start_state = Some(TransitionState {
            bar_spacing: self.bar_spacing,
            right_offset: self.right_offset,
        });
    }

    pub fn scroll_to(&mut self, x: f64) {
        let Some(scroll_start_point) = self.scroll_start_point else {
            return;
        };
        let start = self.transition_start_state.unwrap_or(TransitionState {
            bar_spacing: self.bar_spacing,
            right_offset: self.right_offset,
        });
        let shift_in_logical = (scroll_start_point - x) / start.bar_spacing;
        self.right_offset = start.right_offset + shift_in_logical;
        self.correct_offset();
        self.bump_revision();
    }

    pub fn end_scroll(&mut self) {
        self.scroll_start_point = None;
        self.transition_start_state = None;
    }

    fn correct_bar_spacing(&mut self) {
        let min = self.options.min_bar_spacing;
        let max = self.max_bar_spacing().max(min);
        self.bar_spacing = self.bar_spacing.clamp(min, max);
    }

    fn max_bar_spacing(&self) -> f64 {
        if self.options.max_bar_spacing > 0.0 {
            self.options.max_bar_spacing
        } else {
            self.width * 0.5
        }
    }

    fn populated_count(&self) -> f64 {
        match (self.first_index, self.base_index) {
            (Some(first), Some(last)) => (last - first + 1) as f64,
            _ => 0.0,
        }
    }

    fn min_right_offset(&self) -> Option<f64> {
        let first = self.first_index?;
        let base = self.base_index?;
        let bars_estimation = if self.options.fix_left_edge {
            self.width / self.bar_spacing
        } else {
            MIN_VISIBLE_BARS_COUNT.min(self.populated_count())
        };
        Some(first as f64 - base as f64 - 1.0 + bars_estimation)
    }

    fn max_right_offset(&self) -> f64 {
        if self.options.fix_right_edge {
            0.0
        } else {
            self.width / self.bar_spacing - MIN_VISIBLE_BARS_COUNT.min(self.populated_count())
        }
    }

    fn correct_offset(&mut self) {
        if self.width <= 0.0 {
            return;
        }
        if let Some(min_right_offset) = self.min_right_offset()
            && self.right_offset < min_right_offset
        {
            self.right_offset = min_right_offset;
        }
        let max_right_offset = self.max_right_offset();
        if self.right_offset > max_right_offset {
            self.right_offset = max_right_offset;
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{LogicalRange, TimeScale, TimeScaleOptions};
    use crate::core::types::VisibleRange;

    #[test]
    fn fix_left_edge_keeps_first_bar_on_screen() {
        let mut time_scale = TimeScale::new(TimeScaleOptions {
            fix_left_edge: true,
            ..TimeScaleOptions::default()
        });
        time_scale.set_width(60.0).expect("width");
        time_scale.set_index_bounds(Some((0, 99)));
        time_scale.set_right_offset(-500.0).expect("offset");

        assert!((time_scale.min_right_offset().expect("min") + 90.0).abs() <= 1e-9);
        assert!((time_scale.right_offset() + 90.0).abs() <= 1e-9);
        let logical = time_scale.visible_logical_range().expect("range");
        assert!(logical.from.abs() <= 1e-9);
    }

    #[test]
    fn right_offset_leaves_two_bars_visible() {
        let mut time_scale = TimeScale::default();
        time_scale.set_width(60.0).expect("width");
        time_scale.set_index_bounds(Some((0, 99)));
        assert!((time_scale.max_right_offset() - 8.0).abs() <= 1e-9);
        time_scale.set_right_offset(50.0).expect("offset");
        assert!((time_scale.right_offset() - 8.0).abs() <= 1e-9);
    }

    #[test]
    fn unset_max_bar_spacing_is_half_the_width() {
        let mut time_scale = TimeScale::default();
        time_scale.set_width(40.0).expect("width");
        time_scale.set_bar_spacing(100.0).expect("spacing");
        assert!((time_scale.bar_spacing() - 20.0).abs() <= 1e-9);
    }

    #[test]
    fn negative_logical_bounds_floor_outwards() {
        let range = LogicalRange {
            from: -0.5,
            to: 2.2,
        };
        assert_eq!(range.to_visible_range(), VisibleRange::new(-1, 4));
    }
}
