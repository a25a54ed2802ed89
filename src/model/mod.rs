mod pane;
mod series;

pub use pane::{Pane, SeriesId};
pub use series::{IndexedItem, Series};
