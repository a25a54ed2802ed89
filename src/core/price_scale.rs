use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::VisibleRange;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceScaleMode {
    #[default]
    Normal,
    Logarithmic,
    Percentage,
    IndexedTo100,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl Default for PriceScaleMargins {
    fn default() -> Self {
        Self {
            top: 0.2,
            bottom: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceScaleOptions {
    pub auto_scale: bool,
    pub mode: PriceScaleMode,
    pub invert_scale: bool,
    pub scale_margins: PriceScaleMargins,
}

impl Default for PriceScaleOptions {
    fn default() -> Self {
        Self {
            auto_scale: true,
            mode: PriceScaleMode::Normal,
            invert_scale: false,
            scale_margins: PriceScaleMargins::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceScaleStateChange {
    pub auto_scale: Option<bool>,
    pub is_inverted: Option<bool>,
    pub mode: Option<PriceScaleMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.min == self.max || self.min.is_nan() || self.max.is_nan()
    }

    #[must_use]
    pub fn contains(self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    #[must_use]
    pub fn merge(self, other: PriceRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScaleMargins {
    pub above: f64,
    pub below: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScaleInfo {
    pub price_range: Option<PriceRange>,
    pub margins: Option<AutoScaleMargins>,
}

/// Anything that can contribute a visible price envelope to a price scale.
pub trait AutoScaleSource {
    fn visible(&self) -> bool;
    /// Base value for percentage/indexed modes over the visible range.
    fn first_value(&self, visible: VisibleRange) -> Option<f64>;
    fn autoscale_info(&self, visible: VisibleRange) -> Option<AutoScaleInfo>;
    fn min_move(&self) -> f64 {
        0.01
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LogFormula {
    logical_offset: f64,
    coord_offset: f64,
}

impl Default for LogFormula {
    fn default() -> Self {
        Self {
            logical_offset: 4.0,
            coord_offset: 0.0001,
        }
    }
}

/// Vertical price axis.
///
/// Maps prices to pixel Y inside `height`, honouring margins, inversion and
/// the transformed display modes. `revision` increases on every domain
/// change so cached render items can detect staleness.
#[derive(Debug, Clone)]
pub struct PriceScale {
    options: PriceScaleOptions,
    height: f64,
    price_range: Option<PriceRange>,
    is_custom_price_range: bool,
    margin_above: f64,
    margin_below: f64,
    log_formula: LogFormula,
    min_move: f64,
    revision: u64,
}

impl Default for PriceScale {
    fn default() -> Self {
        Self::new(PriceScaleOptions::default())
    }
}

impl PriceScale {
    #[must_use]
    pub fn new(options: PriceScaleOptions) -> Self {
        Self {
            options,
            height: 0.0,
            price_range: None,
            is_custom_price_range: false,
            margin_above: 0.0,
            margin_below: 0.0,
            log_formula: LogFormula::default(),
            min_move: 0.01,
            revision: 0,
        }
    }

    #[must_use]
    pub fn options(&self) -> PriceScaleOptions {
        self.options
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply_options(&mut self, options: PriceScaleOptions) -> ChartResult<()> {
        validate_margins(options.scale_margins)?;
        let change = PriceScaleStateChange {
            auto_scale: Some(options.auto_scale),
            is_inverted: Some(options.invert_scale),
            mode: Some(options.mode),
        };
        self.options.scale_margins = options.scale_margins;
        self.set_mode(change);
        self.bump_revision();
        Ok(())
    }

    pub fn set_mode(&mut self, change: PriceScaleStateChange) {
        let old_mode = self.options.mode;
        if let Some(auto_scale) = change.auto_scale {
            self.options.auto_scale = auto_scale;
        }
        if let Some(mode) = change.mode {
            self.options.mode = mode;
            if matches!(
                mode,
                PriceScaleMode::Percentage | PriceScaleMode::IndexedTo100
            ) {
                self.options.auto_scale = true;
            }
        }
        if old_mode == PriceScaleMode::Logarithmic && self.options.mode != old_mode {
            match convert_price_range_from_log(self.price_range, self.log_formula) {
                Some(raw) => self.price_range = Some(raw),
                None => self.options.auto_scale = true,
            }
        }
        if self.options.mode == PriceScaleMode::Logarithmic && self.options.mode != old_mode {
            self.price_range = convert_price_range_to_log(self.price_range, self.log_formula);
        }
        if let Some(inverted) = change.is_inverted {
            self.options.invert_scale = inverted;
        }
        self.bump_revision();
    }

    #[must_use]
    pub fn is_auto_scale(&self) -> bool {
        self.options.auto_scale
    }

    #[must_use]
    pub fn is_custom_price_range(&self) -> bool {
        self.is_custom_price_range
    }

    #[must_use]
    pub fn is_log(&self) -> bool {
        self.options.mode == PriceScaleMode::Logarithmic
    }

    #[must_use]
    pub fn is_percentage(&self) -> bool {
        self.options.mode == PriceScaleMode::Percentage
    }

    #[must_use]
    pub fn is_indexed_to_100(&self) -> bool {
        self.options.mode == PriceScaleMode::IndexedTo100
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.options.invert_scale
    }

    pub fn set_height(&mut self, value: f64) -> ChartResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ChartError::InvalidData(
                "price scale height must be finite and >= 0".to_owned(),
            ));
        }
        if (self.height - value).abs() <= f64::EPSILON {
            return Ok(());
        }
        self.height = value;
        self.bump_revision();
        Ok(())
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn internal_height(&self) -> f64 {
        self.height - self.top_margin_px() - self.bottom_margin_px()
    }

    /// Current range in the scale's internal (possibly transformed) units.
    #[must_use]
    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        if self.price_range == range {
            return;
        }
        self.price_range = range;
        self.bump_revision();
    }

    /// Pins the range explicitly and leaves auto-scale mode.
    pub fn set_custom_price_range(&mut self, range: Option<PriceRange>) {
        self.set_price_range(range);
        self.is_custom_price_range = range.is_some();
        if range.is_some() {
            self.options.auto_scale = false;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height == 0.0 || self.price_range.is_none_or(PriceRange::is_empty)
    }

    /// Minimum price step of the first visible source, used to widen flat
    /// ranges.
    #[must_use]
    pub fn min_move(&self) -> f64 {
        self.min_move
    }

    /// Recomputes the auto-scaled range from `sources` over `visible`.
    ///
    /// Returns `true` when the stored range changed.
    pub fn recalculate_price_range(
        &mut self,
        visible: VisibleRange,
        sources: &[&dyn AutoScaleSource],
    ) -> bool {
        if self.is_custom_price_range && !self.options.auto_scale {
            return false;
        }
        let mut price_range: Option<PriceRange> = None;
        let mut margin_above: f64 = 0.0;
        let mut margin_below: f64 = 0.0;
        let mut min_move: Option<f64> = None;

        for source in sources {
            if !source.visible() {
                continue;
            }
            min_move.get_or_insert_with(|| source.min_move());
            let Some(first_value) = source.first_value(visible) else {
                continue;
            };
            let Some(info) = source.autoscale_info(visible) else {
                continue;
            };
            let Some(mut source_range) = info.price_range else {
                continue;
            };
            source_range = match self.options.mode {
                PriceScaleMode::Logarithmic => {
                    convert_price_range_to_log(Some(source_range), self.log_formula)
                        .unwrap_or(source_range)
                }
                PriceScaleMode::Percentage => to_percent_range(source_range, first_value),
                PriceScaleMode::IndexedTo100 => to_indexed_to_100_range(source_range, first_value),
                PriceScaleMode::Normal => source_range,
            };
            price_range = Some(price_range.map_or(source_range, |acc| acc.merge(source_range)));
            if let Some(margins) = info.margins {
                margin_above = margin_above.max(margins.above);
                margin_below = margin_below.max(margins.below);
            }
        }

        self.margin_above = margin_above;
        self.margin_below = margin_below;
        match min_move {
            Some(value) if value.is_finite() && value > 0.0 => self.min_move = value,
            Some(value) => warn!(min_move = value, "ignoring non-positive source min move"),
            None => {}
        }

        let previous = self.price_range;
        if let Some(mut range) = price_range {
            if (range.min() - range.max()).abs() <= f64::EPSILON {
                let extend = 5.0 * self.min_move;
                if self.is_log() {
                    if let Some(raw) = convert_price_range_from_log(Some(range), self.log_formula) {
                        range = raw;
                    }
                }
                range = PriceRange::new(range.min() - extend, range.max() + extend);
                if self.is_log() {
                    if let Some(log_range) =
                        convert_price_range_to_log(Some(range), self.log_formula)
                    {
                        range = log_range;
                    }
                }
            }
            if self.is_log() {
                if let Some(raw) = convert_price_range_from_log(Some(range), self.log_formula) {
                    let new_formula = log_formula_for_price_range(Some(raw));
                    if !log_formulas_are_same(new_formula, self.log_formula) {
                        self.log_formula = new_formula;
                        if let Some(log_range) =
                            convert_price_range_to_log(Some(raw), self.log_formula)
                        {
                            range = log_range;
                        }
                    }
                }
            }
            self.price_range = Some(range);
        } else if self.price_range.is_none() {
            self.price_range = Some(PriceRange::new(-0.5, 0.5));
            self.log_formula = log_formula_for_price_range(None);
        }

        let changed = previous != self.price_range;
        if changed {
            self.bump_revision();
            debug!(
                from = visible.from,
                to = visible.to,
                min = self.price_range.map(PriceRange::min),
                max = self.price_range.map(PriceRange::max),
                "recalculated price range"
            );
        }
        changed
    }

    /// Maps a raw price to pixel Y.
    ///
    /// `base_value` anchors percentage and indexed-to-100 modes and is ignored
    /// otherwise.
    #[must_use]
    pub fn price_to_coordinate(&self, price: f64, base_value: f64) -> f64 {
        let logical = if self.is_percentage() {
            to_percent(price, base_value)
        } else if self.is_indexed_to_100() {
            to_indexed_to_100(price, base_value)
        } else {
            price
        };
        self.logical_to_coordinate(logical)
    }

    #[must_use]
    pub fn coordinate_to_price(&self, coordinate: f64, base_value: f64) -> f64 {
        let logical = self.coordinate_to_logical(coordinate);
        if self.is_percentage() {
            from_percent(logical, base_value)
        } else if self.is_indexed_to_100() {
            from_indexed_to_100(logical, base_value)
        } else {
            logical
        }
    }

    fn logical_to_coordinate(&self, mut logical: f64) -> f64 {
        let Some(range) = self.price_range.filter(|_| !self.is_empty()) else {
            return 0.0;
        };
        if self.is_log() && logical != 0.0 {
            logical = to_log(logical, self.log_formula);
        }
        let inv_coordinate = self.bottom_margin_px()
            + (self.internal_height() - 1.0) * (logical - range.min()) / range.length();
        self.inverted_coordinate(inv_coordinate)
    }

    fn coordinate_to_logical(&self, coordinate: f64) -> f64 {
        let Some(range) = self.price_range.filter(|_| !self.is_empty()) else {
            return 0.0;
        };
        let inv_coordinate = self.inverted_coordinate(coordinate);
        let logical = range.min()
            + range.length()
                * ((inv_coordinate - self.bottom_margin_px()) / (self.internal_height() - 1.0));
        if self.is_log() {
            from_log(logical, self.log_formula)
        } else {
            logical
        }
    }

    fn inverted_coordinate(&self, coordinate: f64) -> f64 {
        if self.is_inverted() {
            coordinate
        } else {
            self.height - 1.0 - coordinate
        }
    }

    fn top_margin_px(&self) -> f64 {
        if self.is_inverted() {
            self.options.scale_margins.bottom * self.height + self.margin_below
        } else {
            self.options.scale_margins.top * self.height + self.margin_above
        }
    }

    fn bottom_margin_px(&self) -> f64 {
        if self.is_inverted() {
            self.options.scale_margins.top * self.height + self.margin_above
        } else {
            self.options.scale_margins.bottom * self.height + self.margin_below
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn validate_margins(margins: PriceScaleMargins) -> ChartResult<()> {
    if !(0.0..=1.0).contains(&margins.top) {
        return Err(ChartError::InvalidData(
            "price scale top margin must be in [0,1]".to_owned(),
        ));
    }
    if !(0.0..=1.0).contains(&margins.bottom) {
        return Err(ChartError::InvalidData(
            "price scale bottom margin must be in [0,1]".to_owned(),
        ));
    }
    if margins.top + margins.bottom >= 1.0 {
        return Err(ChartError::InvalidData(
            "sum of price scale margins must be < 1".to_owned(),
        ));
    }
    Ok(())
}

fn from_percent(value: f64, base_value: f64) -> f64 {
    let value = if base_value < 0.0 { -value } else { value };
    (value / 100.0) * base_value + base_value
}

fn to_percent(value: f64, base_value: f64) -> f64 {
    let result = 100.0 * (value - base_value) / base_value;
    if base_value < 0.0 { -result } else { result }
}

fn to_percent_range(range: PriceRange, base_value: f64) -> PriceRange {
    PriceRange::new(
        to_percent(range.min(), base_value),
        to_percent(range.max(), base_value),
    )
}

fn from_indexed_to_100(value: f64, base_value: f64) -> f64 {
    let mut value = value - 100.0;
    if base_value < 0.0 {
        value = -value;
    }
    (value / 100.0) * base_value + base_value
}

fn to_indexed_to_100(value: f64, base_value: f64) -> f64 {
    let result = 100.0 * (value - base_value) / base_value + 100.0;
    if base_value < 0.0 { -result } else { result }
}

fn to_indexed_to_100_range(range: PriceRange, base_value: f64) -> PriceRange {
    PriceRange::new(
        to_indexed_to_100(range.min(), base_value),
        to_indexed_to_100(range.max(), base_value),
    )
}

fn to_log(price: f64, log_formula: LogFormula) -> f64 {
    let magnitude = price.abs();
    if magnitude < 1e-15 {
        return 0.0;
    }
    let value = (magnitude + log_formula.coord_offset).log10() + log_formula.logical_offset;
    if price < 0.0 { -value } else { value }
}

fn from_log(logical: f64, log_formula: LogFormula) -> f64 {
    let magnitude = logical.abs();
    if magnitude < 1e-15 {
        return 0.0;
    }
    let value = 10f64.powf(magnitude - log_formula.logical_offset) - log_formula.coord_offset;
    if logical < 0.0 { -value } else { value }
}

fn convert_price_range_to_log(
    range: Option<PriceRange>,
    formula: LogFormula,
) -> Option<PriceRange> {
    range.map(|r| PriceRange::new(to_log(r.min(), formula), to_log(r.max(), formula)))
}

fn convert_price_range_from_log(
    range: Option<PriceRange>,
    formula: LogFormula,
) -> Option<PriceRange> {
    range.map(|r| PriceRange::new(from_log(r.min(), formula), from_log(r.max(), formula)))
}

fn log_formula_for_price_range(range: Option<PriceRange>) -> LogFormula {
    let default = LogFormula::default();
    let Some(range) = range else {
        return default;
    };
    let diff = (range.max() - range.min()).abs();
    if !(1e-15..1.0).contains(&diff) {
        return default;
    }
    let digits = diff.log10().abs().ceil();
    let logical_offset = default.logical_offset + digits;
    let coord_offset = 1.0 / 10f64.powf(logical_offset);
    LogFormula {
        logical_offset,
        coord_offset,
    }
}

fn log_formulas_are_same(left: LogFormula, right: LogFormula) -> bool {
    (left.logical_offset - right.logical_offset).abs() <= f64::EPSILON
        && (left.coord_offset - right.coord_offset).abs() <= f64::EPSILON
}
