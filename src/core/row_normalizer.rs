use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::plot_row::{BandFill, PlotRow, PlotRowChannel, PlotRowStyle};
use crate::core::primitives::decimal_to_f64;
use crate::core::types::{OriginalTime, TimePoint, TimePointIndex};
use crate::error::{ChartError, ChartResult};

/// Closed set of series kinds understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Bar,
    Candlestick,
    Area,
    Baseline,
    Histogram,
    Line,
    Dominating,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 7] = [
        Self::Bar,
        Self::Candlestick,
        Self::Area,
        Self::Baseline,
        Self::Histogram,
        Self::Line,
        Self::Dominating,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Candlestick => "Candlestick",
            Self::Area => "Area",
            Self::Baseline => "Baseline",
            Self::Histogram => "Histogram",
            Self::Line => "Line",
            Self::Dominating => "Dominating",
        }
    }

    /// Channels that bound the visible price envelope of this kind.
    #[must_use]
    pub const fn autoscale_channels(self) -> &'static [PlotRowChannel] {
        match self {
            Self::Bar | Self::Candlestick => &[PlotRowChannel::High, PlotRowChannel::Low],
            // Band tracks may cross each other, so every line participates.
            Self::Dominating => &[
                PlotRowChannel::High,
                PlotRowChannel::Low,
                PlotRowChannel::Close,
            ],
            Self::Area | Self::Baseline | Self::Histogram | Self::Line => &[PlotRowChannel::Close],
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesKind {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ChartError::UnknownSeriesKind(value.to_owned()))
    }
}

/// Single-value input used by line, area, baseline and histogram series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleValueData {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl SingleValueData {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            color: None,
            background: None,
        }
    }

    pub fn from_decimal(value: Decimal) -> ChartResult<Self> {
        Ok(Self::new(decimal_to_f64(value, "value")?))
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }
}

/// OHLC input used by bar and candlestick series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcData {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wick_color: Option<String>,
}

impl OhlcData {
    #[must_use]
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            color: None,
            border_color: None,
            wick_color: None,
        }
    }

    /// Converts exact decimal prices into channel values.
    pub fn from_decimal(open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> ChartResult<Self> {
        Ok(Self::new(
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        ))
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_wick_color(mut self, color: impl Into<String>) -> Self {
        self.wick_color = Some(color.into());
        self
    }
}

/// Three-line band input used by dominating series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandData {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_background: Option<BandFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_background: Option<BandFill>,
}

impl BandData {
    #[must_use]
    pub fn new(high: f64, low: f64, close: f64) -> Self {
        Self {
            high,
            low,
            close,
            top_color: None,
            middle_color: None,
            bottom_color: None,
            background: None,
            top_background: None,
            bottom_background: None,
        }
    }

    #[must_use]
    pub fn with_middle_color(mut self, color: impl Into<String>) -> Self {
        self.middle_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_top_color(mut self, color: impl Into<String>) -> Self {
        self.top_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_bottom_color(mut self, color: impl Into<String>) -> Self {
        self.bottom_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_top_background(mut self, fill: BandFill) -> Self {
        self.top_background = Some(fill);
        self
    }

    #[must_use]
    pub fn with_bottom_background(mut self, fill: BandFill) -> Self {
        self.bottom_background = Some(fill);
        self
    }
}

/// Public, already-validated input item for one logical index.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesDataItem {
    /// Time-only marker without a renderable value.
    Whitespace,
    Single(SingleValueData),
    Ohlc(OhlcData),
    Band(BandData),
}

impl SeriesDataItem {
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    fn shape_name(&self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Single(_) => "single-value",
            Self::Ohlc(_) => "ohlc",
            Self::Band(_) => "band",
        }
    }
}

impl From<SingleValueData> for SeriesDataItem {
    fn from(value: SingleValueData) -> Self {
        Self::Single(value)
    }
}

impl From<OhlcData> for SeriesDataItem {
    fn from(value: OhlcData) -> Self {
        Self::Ohlc(value)
    }
}

impl From<BandData> for SeriesDataItem {
    fn from(value: BandData) -> Self {
        Self::Band(value)
    }
}

/// Converts a public input item into the uniform stored row.
///
/// Optional style fields are copied only when the input defined them.
///
/// # Panics
///
/// Panics when the item shape does not belong to `kind`; callers validate
/// data upstream, so a mismatch is a programming error.
#[must_use]
pub fn normalize(
    kind: SeriesKind,
    item: SeriesDataItem,
    index: TimePointIndex,
    time: TimePoint,
    original_time: OriginalTime,
) -> PlotRow {
    if item.is_whitespace() {
        return PlotRow::gap(index, time, original_time);
    }

    let shape = item.shape_name();
    let (value, style) = match (kind, item) {
        (SeriesKind::Area | SeriesKind::Baseline, SeriesDataItem::Single(data)) => {
            (single_channels(data.value), PlotRowStyle::default())
        }
        (SeriesKind::Line | SeriesKind::Histogram, SeriesDataItem::Single(data)) => {
            let style = PlotRowStyle {
                color: data.color,
                background: data.background,
                ..PlotRowStyle::default()
            };
            (single_channels(data.value), style)
        }
        (SeriesKind::Bar, SeriesDataItem::Ohlc(data)) => {
            let style = PlotRowStyle {
                color: data.color,
                ..PlotRowStyle::default()
            };
            ([data.open, data.high, data.low, data.close], style)
        }
        (SeriesKind::Candlestick, SeriesDataItem::Ohlc(data)) => {
            let style = PlotRowStyle {
                color: data.color,
                border_color: data.border_color,
                wick_color: data.wick_color,
                ..PlotRowStyle::default()
            };
            ([data.open, data.high, data.low, data.close], style)
        }
        (SeriesKind::Dominating, SeriesDataItem::Band(data)) => {
            let style = PlotRowStyle {
                top_color: data.top_color,
                middle_color: data.middle_color,
                bottom_color: data.bottom_color,
                background: data.background,
                top_background: data.top_background,
                bottom_background: data.bottom_background,
                ..PlotRowStyle::default()
            };
            ([0.0, data.high, data.low, data.close], style)
        }
        (kind, _) => panic!("{shape} data item cannot be normalized for a {kind} series"),
    };

    PlotRow {
        index,
        time,
        original_time,
        value: Some(value),
        style,
    }
}

fn single_channels(value: f64) -> [f64; 4] {
    [value, value, value, value]
}
