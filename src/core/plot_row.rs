use serde::{Deserialize, Serialize};

use crate::core::types::{OriginalTime, TimePoint, TimePointIndex};

/// Fill value that means "draw nothing".
pub const TRANSPARENT: &str = "transparent";

/// Four numeric channels of a plot row, `[open, high, low, close]`.
pub type PlotRowValue = [f64; 4];

/// Channel selector used by scans over the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotRowChannel {
    Open = 0,
    High = 1,
    Low = 2,
    Close = 3,
}

impl PlotRowChannel {
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }
}

/// Band fill as supplied by the host: one color/gradient string or a list of
/// stops, of which only the first is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BandFill {
    Single(String),
    Stops(Vec<String>),
}

impl BandFill {
    /// Resolves the fill to a single style string, defaulting to transparent.
    #[must_use]
    pub fn resolve(&self) -> &str {
        let resolved = match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Stops(stops) => stops.first().map(String::as_str),
        };
        resolved
            .filter(|value| !value.is_empty())
            .unwrap_or(TRANSPARENT)
    }
}

impl Default for BandFill {
    fn default() -> Self {
        Self::Single(TRANSPARENT.to_owned())
    }
}

impl From<&str> for BandFill {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

/// Resolves an optional fill, treating absence as transparent.
#[must_use]
pub fn resolve_fill(fill: Option<&BandFill>) -> &str {
    fill.map_or(TRANSPARENT, BandFill::resolve)
}

/// Per-row style overrides.
///
/// A field is `Some` only when the source item explicitly defined it; `None`
/// means "use the series option", which is different from an explicit color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRowStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wick_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_background: Option<BandFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_background: Option<BandFill>,
}

impl PlotRowStyle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalized per-index record stored for every series.
///
/// `value == None` marks a gap (whitespace) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRow {
    pub index: TimePointIndex,
    pub time: TimePoint,
    pub original_time: OriginalTime,
    pub value: Option<PlotRowValue>,
    #[serde(default, skip_serializing_if = "PlotRowStyle::is_empty")]
    pub style: PlotRowStyle,
}

impl PlotRow {
    /// Builds a gap row carrying only time information.
    #[must_use]
    pub fn gap(index: TimePointIndex, time: TimePoint, original_time: OriginalTime) -> Self {
        Self {
            index,
            time,
            original_time,
            value: None,
            style: PlotRowStyle::default(),
        }
    }

    #[must_use]
    pub fn with_value(
        index: TimePointIndex,
        time: TimePoint,
        original_time: OriginalTime,
        value: PlotRowValue,
    ) -> Self {
        Self {
            index,
            time,
            original_time,
            value: Some(value),
            style: PlotRowStyle::default(),
        }
    }

    #[must_use]
    pub fn is_gap(&self) -> bool {
        self.value.is_none()
    }

    #[must_use]
    pub fn channel(&self, channel: PlotRowChannel) -> Option<f64> {
        self.value.map(|value| value[channel.position()])
    }

    #[must_use]
    pub fn open(&self) -> Option<f64> {
        self.channel(PlotRowChannel::Open)
    }

    #[must_use]
    pub fn high(&self) -> Option<f64> {
        self.channel(PlotRowChannel::High)
    }

    #[must_use]
    pub fn low(&self) -> Option<f64> {
        self.channel(PlotRowChannel::Low)
    }

    #[must_use]
    pub fn close(&self) -> Option<f64> {
        self.channel(PlotRowChannel::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::{BandFill, TRANSPARENT, resolve_fill};

    #[test]
    fn band_fill_uses_first_stop_only() {
        let fill = BandFill::Stops(vec!["#111111".to_owned(), "#222222".to_owned()]);
        assert_eq!(fill.resolve(), "#111111");
    }

    #[test]
    fn empty_or_missing_fill_resolves_to_transparent() {
        assert_eq!(BandFill::Stops(Vec::new()).resolve(), TRANSPARENT);
        assert_eq!(BandFill::Single(String::new()).resolve(), TRANSPARENT);
        assert_eq!(resolve_fill(None), TRANSPARENT);
    }
}
