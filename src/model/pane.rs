use tracing::{debug, trace};

use crate::core::plot_list::UpsertOutcome;
use crate::core::price_scale::{AutoScaleSource, PriceRange, PriceScale, PriceScaleOptions};
use crate::core::time_scale::{TimeScale, TimeScaleOptions};
use crate::core::types::{TimePointIndex, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::model::series::{IndexedItem, Series};
use crate::render::{DrawingSurface, PaneRenderer};
use crate::views::SeriesPaneView;

/// Handle of a series inside one [`Pane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(usize);

#[derive(Debug, Clone)]
struct PaneSeries {
    series: Series,
    view: SeriesPaneView,
}

/// Inputs the auto-scaled price range was last computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AutoScaleKey {
    time_scale: u64,
    /// Data and options revision per series; options cover visibility.
    series: Vec<(u64, u64)>,
    price_options: u64,
}

/// One price/time coordinate system and the series drawn into it.
///
/// Series draw in insertion order.
#[derive(Debug, Clone)]
pub struct Pane {
    viewport: Viewport,
    time_scale: TimeScale,
    price_scale: PriceScale,
    series: Vec<PaneSeries>,
    price_options_revision: u64,
    last_autoscale: Option<AutoScaleKey>,
}

impl Pane {
    pub fn new(viewport: Viewport) -> ChartResult<Self> {
        Self::with_options(
            viewport,
            TimeScaleOptions::default(),
            PriceScaleOptions::default(),
        )
    }

    pub fn with_options(
        viewport: Viewport,
        time_options: TimeScaleOptions,
        price_options: PriceScaleOptions,
    ) -> ChartResult<Self> {
        let mut pane = Self {
            viewport,
            time_scale: TimeScale::new(time_options),
            price_scale: PriceScale::new(price_options),
            series: Vec::new(),
            price_options_revision: 0,
            last_autoscale: None,
        };
        pane.set_viewport(viewport)?;
        Ok(pane)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.time_scale.set_width(f64::from(viewport.width))?;
        self.price_scale.set_height(f64::from(viewport.height))?;
        Ok(())
    }

    #[must_use]
    pub fn time_scale(&self) -> &TimeScale {
        &self.time_scale
    }

    pub fn time_scale_mut(&mut self) -> &mut TimeScale {
        &mut self.time_scale
    }

    #[must_use]
    pub fn price_scale(&self) -> &PriceScale {
        &self.price_scale
    }

    pub fn apply_price_scale_options(&mut self, options: PriceScaleOptions) -> ChartResult<()> {
        self.price_scale.apply_options(options)?;
        self.price_options_revision = self.price_options_revision.wrapping_add(1);
        Ok(())
    }

    /// Pins the price range and turns auto-scale off.
    pub fn set_custom_price_range(&mut self, min: f64, max: f64) -> ChartResult<()> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ChartError::InvalidData(
                "custom price range must be finite with min < max".to_owned(),
            ));
        }
        self.price_scale
            .set_custom_price_range(Some(PriceRange::new(min, max)));
        self.price_options_revision = self.price_options_revision.wrapping_add(1);
        Ok(())
    }

    pub fn add_series(&mut self, series: Series) -> SeriesId {
        let id = SeriesId(self.series.len());
        debug!(kind = %series.kind(), position = id.0, "add series");
        self.series.push(PaneSeries {
            series,
            view: SeriesPaneView::new(),
        });
        self.sync_index_bounds();
        id
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&Series> {
        self.series.get(id.0).map(|entry| &entry.series)
    }

    /// Mutable access to a series; index bounds are re-synced on the next
    /// render pass.
    pub fn series_mut(&mut self, id: SeriesId) -> Option<&mut Series> {
        self.series.get_mut(id.0).map(|entry| &mut entry.series)
    }

    #[must_use]
    pub fn series_view(&self, id: SeriesId) -> Option<&SeriesPaneView> {
        self.series.get(id.0).map(|entry| &entry.view)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn set_series_data(&mut self, id: SeriesId, items: Vec<IndexedItem>) -> ChartResult<()> {
        self.entry_mut(id)?.series.set_data(items);
        self.sync_index_bounds();
        Ok(())
    }

    pub fn update_series(&mut self, id: SeriesId, item: IndexedItem) -> ChartResult<UpsertOutcome> {
        let outcome = self.entry_mut(id)?.series.update(item);
        self.sync_index_bounds();
        Ok(outcome)
    }

    /// Recomputes the auto-scaled price range when visible data or the
    /// visible window changed since the last computation.
    ///
    /// Returns `true` when a recomputation ran.
    pub fn update_price_range(&mut self) -> bool {
        if !self.price_scale.is_auto_scale() {
            return false;
        }
        let key = AutoScaleKey {
            time_scale: self.time_scale.revision(),
            series: self
                .series
                .iter()
                .map(|entry| {
                    (
                        entry.series.data().revision(),
                        entry.series.options_revision(),
                    )
                })
                .collect(),
            price_options: self.price_options_revision,
        };
        if self.last_autoscale.as_ref() == Some(&key) {
            return false;
        }
        let Some(visible) = self.time_scale.visible_range() else {
            return false;
        };
        let sources: Vec<&dyn AutoScaleSource> = self
            .series
            .iter()
            .map(|entry| &entry.series as &dyn AutoScaleSource)
            .collect();
        let changed = self.price_scale.recalculate_price_range(visible, &sources);
        trace!(from = visible.from, to = visible.to, changed, "auto-scale pass");
        self.last_autoscale = Some(key);
        true
    }

    /// Runs one render pass: refreshes scale domains, then draws every
    /// visible series in insertion order.
    pub fn render(&mut self, surface: &mut dyn DrawingSurface) {
        self.sync_index_bounds();
        self.update_price_range();
        for entry in &mut self.series {
            if let Some(renderer) =
                entry
                    .view
                    .renderer(&entry.series, &self.time_scale, &self.price_scale)
            {
                renderer.draw(surface);
            }
        }
    }

    fn entry_mut(&mut self, id: SeriesId) -> ChartResult<&mut PaneSeries> {
        self.series
            .get_mut(id.0)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown series id {}", id.0)))
    }

    fn sync_index_bounds(&mut self) {
        let bounds = self
            .series
            .iter()
            .filter_map(|entry| {
                let data = entry.series.data();
                Some((data.first_index()?, data.last_index()?))
            })
            .reduce(|(first_a, last_a): (TimePointIndex, TimePointIndex), (first_b, last_b)| {
                (first_a.min(first_b), last_a.max(last_b))
            });
        self.time_scale.set_index_bounds(bounds);
    }
}
