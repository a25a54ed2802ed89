use tracing::debug;

use crate::core::plot_list::{PlotList, UpsertOutcome};
use crate::core::price_scale::{AutoScaleInfo, AutoScaleSource};
use crate::core::row_normalizer::{SeriesDataItem, SeriesKind, normalize};
use crate::core::series_options::SeriesOptions;
use crate::core::types::{OriginalTime, TimePoint, TimePointIndex, VisibleRange};
use crate::error::{ChartError, ChartResult};

/// Input item already placed on the shared logical index axis.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedItem {
    pub index: TimePointIndex,
    pub time: TimePoint,
    pub original_time: OriginalTime,
    pub item: SeriesDataItem,
}

impl IndexedItem {
    #[must_use]
    pub fn new(index: TimePointIndex, time: TimePoint, item: impl Into<SeriesDataItem>) -> Self {
        Self {
            index,
            time,
            original_time: OriginalTime::from(time),
            item: item.into(),
        }
    }

    #[must_use]
    pub fn whitespace(index: TimePointIndex, time: TimePoint) -> Self {
        Self {
            index,
            time,
            original_time: OriginalTime::from(time),
            item: SeriesDataItem::Whitespace,
        }
    }

    #[must_use]
    pub fn with_original_time(mut self, original_time: OriginalTime) -> Self {
        self.original_time = original_time;
        self
    }
}

/// One data series: its kind, style record and plot-row store.
#[derive(Debug, Clone)]
pub struct Series {
    kind: SeriesKind,
    options: SeriesOptions,
    options_revision: u64,
    data: PlotList,
    visible: bool,
    min_move: f64,
}

impl Series {
    /// Creates a series with the documented defaults for `kind`.
    #[must_use]
    pub fn new(kind: SeriesKind) -> Self {
        Self::with_options(SeriesOptions::defaults(kind))
    }

    #[must_use]
    pub fn with_options(options: SeriesOptions) -> Self {
        Self {
            kind: options.kind(),
            options,
            options_revision: 0,
            data: PlotList::new(),
            visible: true,
            min_move: 0.01,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &SeriesOptions {
        &self.options
    }

    #[must_use]
    pub fn options_revision(&self) -> u64 {
        self.options_revision
    }

    pub fn apply_options(&mut self, options: SeriesOptions) -> ChartResult<()> {
        if options.kind() != self.kind {
            return Err(ChartError::InvalidOptions(format!(
                "{} options cannot be applied to a {} series",
                options.kind(),
                self.kind
            )));
        }
        self.options = options;
        self.options_revision = self.options_revision.wrapping_add(1);
        Ok(())
    }

    /// Parses and applies a partial JSON style record.
    pub fn apply_options_json(&mut self, json: &str) -> ChartResult<()> {
        let options = SeriesOptions::from_json_str(self.kind, json)?;
        self.apply_options(options)
    }

    #[must_use]
    pub fn data(&self) -> &PlotList {
        &self.data
    }

    /// Replaces all rows. Items must match this series' kind.
    pub fn set_data(&mut self, items: Vec<IndexedItem>) {
        let kind = self.kind;
        let rows = items
            .into_iter()
            .map(|item| normalize(kind, item.item, item.index, item.time, item.original_time))
            .collect();
        self.data.set_data(rows);
        debug!(kind = %kind, rows = self.data.len(), "series data replaced");
    }

    /// Appends or updates the row at `item.index`.
    pub fn update(&mut self, item: IndexedItem) -> UpsertOutcome {
        let row = normalize(self.kind, item.item, item.index, item.time, item.original_time);
        self.data.upsert(row)
    }

    /// Drops every row at or after `from`.
    pub fn truncate_from(&mut self, from: TimePointIndex) {
        self.data.truncate_from(from);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.options_revision = self.options_revision.wrapping_add(1);
        }
    }

    pub fn set_min_move(&mut self, min_move: f64) -> ChartResult<()> {
        if !min_move.is_finite() || min_move <= 0.0 {
            return Err(ChartError::InvalidOptions(
                "min move must be finite and > 0".to_owned(),
            ));
        }
        self.min_move = min_move;
        Ok(())
    }

    /// Close of the first value row in `visible`, the base for percentage
    /// and indexed price modes.
    #[must_use]
    pub fn base_value(&self, visible: VisibleRange) -> Option<f64> {
        self.data
            .first_value_in_range(visible.from, visible.to)
            .and_then(|row| row.close())
    }
}

impl AutoScaleSource for Series {
    fn visible(&self) -> bool {
        self.visible
    }

    fn first_value(&self, visible: VisibleRange) -> Option<f64> {
        self.base_value(visible)
    }

    fn autoscale_info(&self, visible: VisibleRange) -> Option<AutoScaleInfo> {
        let price_range = self.data.min_max_in_range(
            visible.from,
            visible.to,
            self.kind.autoscale_channels(),
        )?;
        Some(AutoScaleInfo {
            price_range: Some(price_range),
            margins: None,
        })
    }

    fn min_move(&self) -> f64 {
        self.min_move
    }
}
