#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use tracing::trace;

use crate::core::plot_row::{PlotRow, PlotRowValue};
use crate::core::price_scale::PriceScale;
use crate::core::series_options::SeriesOptions;
use crate::core::time_scale::TimeScale;
use crate::core::types::{TimePointIndex, VisibleRange};
use crate::model::Series;
use crate::render::{
    AreaRenderer, BarItem, BarsRenderer, BaselineRenderer, CandlestickItem, CandlesticksRenderer,
    DominatingItem, DominatingRenderer, DrawingSurface, HistogramItem, HistogramRenderer,
    LineItem, LineRenderer, PaneRenderer,
};

/// Below this many rows projection stays sequential.
#[cfg(feature = "parallel-projection")]
const PARALLEL_PROJECTION_THRESHOLD: usize = 4096;

/// Revisions of every input a renderer is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCacheKey {
    pub data: u64,
    pub time_scale: u64,
    pub price_scale: u64,
    pub options: u64,
}

impl RenderCacheKey {
    #[must_use]
    pub fn of(series: &Series, time_scale: &TimeScale, price_scale: &PriceScale) -> Self {
        Self {
            data: series.data().revision(),
            time_scale: time_scale.revision(),
            price_scale: price_scale.revision(),
            options: series.options_revision(),
        }
    }
}

/// Renderer for any series kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesRenderer {
    Line(LineRenderer),
    Area(AreaRenderer),
    Baseline(BaselineRenderer),
    Histogram(HistogramRenderer),
    Bars(BarsRenderer),
    Candlesticks(CandlesticksRenderer),
    Dominating(DominatingRenderer),
}

impl PaneRenderer for SeriesRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        match self {
            Self::Line(renderer) => renderer.draw(surface),
            Self::Area(renderer) => renderer.draw(surface),
            Self::Baseline(renderer) => renderer.draw(surface),
            Self::Histogram(renderer) => renderer.draw(surface),
            Self::Bars(renderer) => renderer.draw(surface),
            Self::Candlesticks(renderer) => renderer.draw(surface),
            Self::Dominating(renderer) => renderer.draw(surface),
        }
    }
}

/// Row mapped to device space, every channel projected.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProjectedRow {
    x: f64,
    ys: PlotRowValue,
}

/// Builds and caches the renderer of one series.
///
/// The cached renderer is reused until any revision in its
/// [`RenderCacheKey`] moves.
#[derive(Debug, Clone, Default)]
pub struct SeriesPaneView {
    cache: Option<(RenderCacheKey, SeriesRenderer)>,
    rebuild_count: u64,
}

impl SeriesPaneView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the renderer items were rebuilt.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    #[must_use]
    pub fn cache_key(&self) -> Option<RenderCacheKey> {
        self.cache.as_ref().map(|(key, _)| *key)
    }

    /// Returns the renderer for the current frame, or `None` for hidden
    /// series.
    pub fn renderer(
        &mut self,
        series: &Series,
        time_scale: &TimeScale,
        price_scale: &PriceScale,
    ) -> Option<&SeriesRenderer> {
        if !series.is_visible() {
            return None;
        }
        let key = RenderCacheKey::of(series, time_scale, price_scale);
        let stale = self
            .cache
            .as_ref()
            .is_none_or(|(cached_key, _)| *cached_key != key);
        if stale {
            let renderer = build_renderer(series, time_scale, price_scale);
            self.rebuild_count += 1;
            trace!(kind = %series.kind(), ?key, "rebuilt series renderer");
            self.cache = Some((key, renderer));
        }
        self.cache.as_ref().map(|(_, renderer)| renderer)
    }
}

fn build_renderer(series: &Series, time_scale: &TimeScale, price_scale: &PriceScale) -> SeriesRenderer {
    let visible = time_scale.visible_range();
    let base_value = visible
        .and_then(|range| series.base_value(range))
        .unwrap_or_default();

    // One extra row on each side so walkers have real neighbours.
    let rows: Vec<&PlotRow> = visible
        .map(|range| series.data().rows_in_range(range.from - 1, range.to + 1))
        .unwrap_or_default()
        .iter()
        .filter(|row| !row.is_gap())
        .collect();
    let projected = project_rows(&rows, time_scale, price_scale, base_value);
    let item_range = visible.map(|range| item_positions(&rows, range));

    let bar_spacing = time_scale.bar_spacing();
    let height = price_scale.height();

    match series.options() {
        SeriesOptions::Line(options) => SeriesRenderer::Line(LineRenderer {
            items: line_items(&rows, &projected, true),
            visible_range: item_range,
            line_type: options.line_type,
            line_style: options.line_style,
            line_width: options.line_width,
            line_color: options.color.clone(),
            bar_width: bar_spacing,
            height,
        }),
        SeriesOptions::Area(options) => SeriesRenderer::Area(AreaRenderer {
            items: line_items(&rows, &projected, false),
            visible_range: item_range,
            line_type: options.line_type,
            line_style: options.line_style,
            line_width: options.line_width,
            line_color: options.line_color.clone(),
            fill_color: options.top_color.clone(),
            bar_width: bar_spacing,
            bottom: height,
        }),
        SeriesOptions::Baseline(options) => SeriesRenderer::Baseline(BaselineRenderer {
            items: line_items(&rows, &projected, false),
            visible_range: item_range,
            base_y: price_scale.price_to_coordinate(options.base_value, base_value),
            line_type: options.line_type,
            line_style: options.line_style,
            line_width: options.line_width,
            top_line_color: options.top_line_color.clone(),
            bottom_line_color: options.bottom_line_color.clone(),
            top_fill_color: options.top_fill_color.clone(),
            bottom_fill_color: options.bottom_fill_color.clone(),
            bar_width: bar_spacing,
        }),
        SeriesOptions::Histogram(options) => SeriesRenderer::Histogram(HistogramRenderer {
            items: rows
                .iter()
                .zip(&projected)
                .map(|(row, point)| HistogramItem {
                    time: row.index,
                    x: point.x,
                    y: point.ys[3],
                    color: row.style.color.clone().unwrap_or_else(|| options.color.clone()),
                })
                .collect(),
            visible_range: item_range,
            bar_spacing,
            base_y: price_scale.price_to_coordinate(options.base, base_value),
        }),
        SeriesOptions::Bar(options) => SeriesRenderer::Bars(BarsRenderer {
            items: rows
                .iter()
                .zip(&projected)
                .map(|(row, point)| BarItem {
                    time: row.index,
                    x: point.x,
                    open_y: point.ys[0],
                    high_y: point.ys[1],
                    low_y: point.ys[2],
                    close_y: point.ys[3],
                    color: row.style.color.clone().unwrap_or_else(|| {
                        if is_up(row) {
                            options.up_color.clone()
                        } else {
                            options.down_color.clone()
                        }
                    }),
                })
                .collect(),
            visible_range: item_range,
            bar_spacing,
            open_visible: options.open_visible,
            thin_bars: options.thin_bars,
        }),
        SeriesOptions::Candlestick(options) => {
            SeriesRenderer::Candlesticks(CandlesticksRenderer {
                items: rows
                    .iter()
                    .zip(&projected)
                    .map(|(row, point)| {
                        let up = is_up(row);
                        // an empty direction color falls back to the shared one
                        let pick = |up_color: &String, down_color: &String, shared: &String| {
                            let chosen = if up { up_color } else { down_color };
                            if chosen.is_empty() {
                                shared.clone()
                            } else {
                                chosen.clone()
                            }
                        };
                        CandlestickItem {
                            time: row.index,
                            x: point.x,
                            open_y: point.ys[0],
                            high_y: point.ys[1],
                            low_y: point.ys[2],
                            close_y: point.ys[3],
                            color: row.style.color.clone().unwrap_or_else(|| {
                                if up {
                                    options.up_color.clone()
                                } else {
                                    options.down_color.clone()
                                }
                            }),
                            border_color: row.style.border_color.clone().unwrap_or_else(|| {
                                pick(
                                    &options.border_up_color,
                                    &options.border_down_color,
                                    &options.border_color,
                                )
                            }),
                            wick_color: row.style.wick_color.clone().unwrap_or_else(|| {
                                pick(
                                    &options.wick_up_color,
                                    &options.wick_down_color,
                                    &options.wick_color,
                                )
                            }),
                        }
                    })
                    .collect(),
                visible_range: item_range,
                bar_spacing,
                wick_visible: options.wick_visible,
                border_visible: options.border_visible,
            })
        }
        SeriesOptions::Dominating(options) => SeriesRenderer::Dominating(DominatingRenderer {
            items: rows
                .iter()
                .zip(&projected)
                .map(|(row, point)| DominatingItem {
                    time: row.index,
                    x: point.x,
                    high_y: point.ys[1],
                    low_y: point.ys[2],
                    close_y: point.ys[3],
                    middle_color: row.style.middle_color.clone(),
                })
                .collect(),
            visible_range: item_range,
            bar_width: bar_spacing,
            top_line_color: options.top_color.clone(),
            top_line_style: options.top_line_style,
            top_line_type: options.top_line_type,
            top_line_width: options.top_line_width,
            middle_line_color: options.middle_color.clone(),
            middle_line_style: options.middle_line_style,
            middle_line_type: options.middle_line_type,
            middle_line_width: options.middle_line_width,
            bottom_line_color: options.bottom_color.clone(),
            bottom_line_style: options.bottom_line_style,
            bottom_line_type: options.bottom_line_type,
            bottom_line_width: options.bottom_line_width,
            top_background: options.top_background.resolve().to_owned(),
            bottom_background: options.bottom_background.resolve().to_owned(),
        }),
    }
}

fn is_up(row: &PlotRow) -> bool {
    match (row.open(), row.close()) {
        (Some(open), Some(close)) => close >= open,
        _ => true,
    }
}

/// Positions in `rows` whose index falls inside `visible`.
fn item_positions(rows: &[&PlotRow], visible: VisibleRange) -> VisibleRange {
    let from = rows.partition_point(|row| row.index < visible.from);
    let to = rows.partition_point(|row| row.index < visible.to);
    VisibleRange::new(from as TimePointIndex, to as TimePointIndex)
}

fn line_items(rows: &[&PlotRow], projected: &[ProjectedRow], with_style: bool) -> Vec<LineItem> {
    rows.iter()
        .zip(projected)
        .map(|(row, point)| LineItem {
            time: row.index,
            price: row.close().unwrap_or_default(),
            x: point.x,
            y: point.ys[3],
            color: row.style.color.clone().filter(|_| with_style),
            background: row.style.background.clone().filter(|_| with_style),
        })
        .collect()
}

fn project_row(
    row: &PlotRow,
    time_scale: &TimeScale,
    price_scale: &PriceScale,
    base_value: f64,
) -> ProjectedRow {
    let value = row.value.unwrap_or_default();
    ProjectedRow {
        x: time_scale.index_to_coordinate(row.index),
        ys: value.map(|price| price_scale.price_to_coordinate(price, base_value)),
    }
}

#[cfg(not(feature = "parallel-projection"))]
fn project_rows(
    rows: &[&PlotRow],
    time_scale: &TimeScale,
    price_scale: &PriceScale,
    base_value: f64,
) -> Vec<ProjectedRow> {
    rows.iter()
        .map(|row| project_row(row, time_scale, price_scale, base_value))
        .collect()
}

#[cfg(feature = "parallel-projection")]
fn project_rows(
    rows: &[&PlotRow],
    time_scale: &TimeScale,
    price_scale: &PriceScale,
    base_value: f64,
) -> Vec<ProjectedRow> {
    if rows.len() < PARALLEL_PROJECTION_THRESHOLD {
        return rows
            .iter()
            .map(|row| project_row(row, time_scale, price_scale, base_value))
            .collect();
    }
    rows.par_iter()
        .map(|row| project_row(row, time_scale, price_scale, base_value))
        .collect()
}
