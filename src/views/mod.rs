mod series_pane_view;

pub use series_pane_view::{RenderCacheKey, SeriesPaneView, SeriesRenderer};
