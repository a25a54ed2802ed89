use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::core::plot_row::BandFill;
use crate::core::row_normalizer::SeriesKind;
use crate::error::{ChartError, ChartResult};

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    LargeDashed,
    SparseDotted,
}

/// Interpolation between consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineType {
    #[default]
    #[serde(alias = "Simple")]
    Straight,
    #[serde(alias = "WithSteps")]
    Stepped,
    Curved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineStyleOptions {
    pub color: String,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub line_type: LineType,
}

impl Default for LineStyleOptions {
    fn default() -> Self {
        Self {
            color: "#2196f3".to_owned(),
            line_style: LineStyle::Solid,
            line_width: 3.0,
            line_type: LineType::Straight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaStyleOptions {
    pub top_color: String,
    pub bottom_color: String,
    pub line_color: String,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub line_type: LineType,
}

impl Default for AreaStyleOptions {
    fn default() -> Self {
        Self {
            top_color: "rgba( 46, 220, 135, 0.4)".to_owned(),
            bottom_color: "rgba( 40, 221, 100, 0)".to_owned(),
            line_color: "#33D778".to_owned(),
            line_style: LineStyle::Solid,
            line_width: 3.0,
            line_type: LineType::Straight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaselineStyleOptions {
    pub base_value: f64,
    pub top_line_color: String,
    #[serde(alias = "topFillColor1")]
    pub top_fill_color: String,
    pub bottom_line_color: String,
    #[serde(alias = "bottomFillColor2")]
    pub bottom_fill_color: String,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub line_type: LineType,
}

impl Default for BaselineStyleOptions {
    fn default() -> Self {
        Self {
            base_value: 0.0,
            top_line_color: "rgba(38, 166, 154, 1)".to_owned(),
            top_fill_color: "rgba(38, 166, 154, 0.28)".to_owned(),
            bottom_line_color: "rgba(239, 83, 80, 1)".to_owned(),
            bottom_fill_color: "rgba(239, 83, 80, 0.28)".to_owned(),
            line_style: LineStyle::Solid,
            line_width: 3.0,
            line_type: LineType::Straight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistogramStyleOptions {
    pub color: String,
    pub base: f64,
}

impl Default for HistogramStyleOptions {
    fn default() -> Self {
        Self {
            color: "#26a69a".to_owned(),
            base: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarStyleOptions {
    pub up_color: String,
    pub down_color: String,
    pub open_visible: bool,
    pub thin_bars: bool,
}

impl Default for BarStyleOptions {
    fn default() -> Self {
        Self {
            up_color: "#26a69a".to_owned(),
            down_color: "#ef5350".to_owned(),
            open_visible: true,
            thin_bars: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandlestickStyleOptions {
    pub up_color: String,
    pub down_color: String,
    pub wick_visible: bool,
    pub border_visible: bool,
    pub border_color: String,
    pub border_up_color: String,
    pub border_down_color: String,
    pub wick_color: String,
    pub wick_up_color: String,
    pub wick_down_color: String,
}

impl Default for CandlestickStyleOptions {
    fn default() -> Self {
        Self {
            up_color: "#26a69a".to_owned(),
            down_color: "#ef5350".to_owned(),
            wick_visible: true,
            border_visible: true,
            border_color: "#378658".to_owned(),
            border_up_color: "#26a69a".to_owned(),
            border_down_color: "#ef5350".to_owned(),
            wick_color: "#737375".to_owned(),
            wick_up_color: "#26a69a".to_owned(),
            wick_down_color: "#ef5350".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DominatingStyleOptions {
    pub top_color: String,
    pub middle_color: String,
    pub bottom_color: String,
    pub top_background: BandFill,
    pub bottom_background: BandFill,
    pub top_line_style: LineStyle,
    pub top_line_width: f64,
    pub top_line_type: LineType,
    pub middle_line_style: LineStyle,
    pub middle_line_width: f64,
    pub middle_line_type: LineType,
    pub bottom_line_style: LineStyle,
    pub bottom_line_width: f64,
    pub bottom_line_type: LineType,
}

impl Default for DominatingStyleOptions {
    fn default() -> Self {
        Self {
            top_color: "#56e35c".to_owned(),
            middle_color: "#2196f3".to_owned(),
            bottom_color: "#e85242".to_owned(),
            top_background: BandFill::default(),
            bottom_background: BandFill::default(),
            top_line_style: LineStyle::Solid,
            top_line_width: 3.0,
            top_line_type: LineType::Straight,
            middle_line_style: LineStyle::Solid,
            middle_line_width: 3.0,
            middle_line_type: LineType::Straight,
            bottom_line_style: LineStyle::Solid,
            bottom_line_width: 3.0,
            bottom_line_type: LineType::Straight,
        }
    }
}

/// Style record of one series, one variant per [`SeriesKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOptions {
    Bar(BarStyleOptions),
    Candlestick(CandlestickStyleOptions),
    Area(AreaStyleOptions),
    Baseline(BaselineStyleOptions),
    Histogram(HistogramStyleOptions),
    Line(LineStyleOptions),
    Dominating(DominatingStyleOptions),
}

impl SeriesOptions {
    /// Documented defaults for `kind`.
    #[must_use]
    pub fn defaults(kind: SeriesKind) -> Self {
        match kind {
            SeriesKind::Bar => Self::Bar(BarStyleOptions::default()),
            SeriesKind::Candlestick => Self::Candlestick(CandlestickStyleOptions::default()),
            SeriesKind::Area => Self::Area(AreaStyleOptions::default()),
            SeriesKind::Baseline => Self::Baseline(BaselineStyleOptions::default()),
            SeriesKind::Histogram => Self::Histogram(HistogramStyleOptions::default()),
            SeriesKind::Line => Self::Line(LineStyleOptions::default()),
            SeriesKind::Dominating => Self::Dominating(DominatingStyleOptions::default()),
        }
    }

    /// Parses a partial JSON record for `kind`; omitted fields take defaults.
    pub fn from_json_str(kind: SeriesKind, json: &str) -> ChartResult<Self> {
        Ok(match kind {
            SeriesKind::Bar => Self::Bar(parse(kind, json)?),
            SeriesKind::Candlestick => Self::Candlestick(parse(kind, json)?),
            SeriesKind::Area => Self::Area(parse(kind, json)?),
            SeriesKind::Baseline => Self::Baseline(parse(kind, json)?),
            SeriesKind::Histogram => Self::Histogram(parse(kind, json)?),
            SeriesKind::Line => Self::Line(parse(kind, json)?),
            SeriesKind::Dominating => Self::Dominating(parse(kind, json)?),
        })
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        match self {
            Self::Bar(_) => SeriesKind::Bar,
            Self::Candlestick(_) => SeriesKind::Candlestick,
            Self::Area(_) => SeriesKind::Area,
            Self::Baseline(_) => SeriesKind::Baseline,
            Self::Histogram(_) => SeriesKind::Histogram,
            Self::Line(_) => SeriesKind::Line,
            Self::Dominating(_) => SeriesKind::Dominating,
        }
    }

    pub fn to_json_string(&self) -> ChartResult<String> {
        let result = match self {
            Self::Bar(options) => serde_json::to_string(options),
            Self::Candlestick(options) => serde_json::to_string(options),
            Self::Area(options) => serde_json::to_string(options),
            Self::Baseline(options) => serde_json::to_string(options),
            Self::Histogram(options) => serde_json::to_string(options),
            Self::Line(options) => serde_json::to_string(options),
            Self::Dominating(options) => serde_json::to_string(options),
        };
        result.map_err(|err| ChartError::InvalidOptions(format!("{}: {err}", self.kind())))
    }
}

fn parse<T: DeserializeOwned>(kind: SeriesKind, json: &str) -> ChartResult<T> {
    serde_json::from_str(json).map_err(|err| ChartError::InvalidOptions(format!("{kind}: {err}")))
}
