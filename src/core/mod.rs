pub mod plot_list;
pub mod plot_row;
pub mod price_scale;
pub mod primitives;
pub mod row_normalizer;
pub mod series_options;
pub mod time_scale;
pub mod types;

pub use plot_list::{PlotList, SearchMode, UpsertOutcome};
pub use plot_row::{BandFill, PlotRow, PlotRowChannel, PlotRowStyle, PlotRowValue, TRANSPARENT};
pub use price_scale::{
    AutoScaleInfo, AutoScaleMargins, AutoScaleSource, PriceRange, PriceScale, PriceScaleMargins,
    PriceScaleMode, PriceScaleOptions, PriceScaleStateChange,
};
pub use row_normalizer::{
    BandData, OhlcData, SeriesDataItem, SeriesKind, SingleValueData, normalize,
};
pub use series_options::{
    AreaStyleOptions, BarStyleOptions, BaselineStyleOptions, CandlestickStyleOptions,
    DominatingStyleOptions, HistogramStyleOptions, LineStyle, LineStyleOptions, LineType,
    SeriesOptions,
};
pub use time_scale::{LogicalRange, TimeScale, TimeScaleOptions};
pub use types::{OriginalTime, TimePoint, TimePointIndex, Viewport, VisibleRange};
