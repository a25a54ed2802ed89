use tracing::{debug, trace};

use crate::core::plot_row::{PlotRow, PlotRowChannel};
use crate::core::price_scale::PriceRange;
use crate::core::types::{TimePoint, TimePointIndex};

/// Lookup policy for [`PlotList::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Exact,
    /// Closest value row at or before the requested index.
    NearestLeft,
    /// Closest value row at or after the requested index.
    NearestRight,
}

/// Result of a single [`PlotList::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Appended,
    Inserted,
    Replaced { previous_had_value: bool },
}

/// Index-ordered store of plot rows for one series.
///
/// Rows are kept strictly ordered by `index` without duplicates. Every
/// mutation bumps `revision`, which views use to invalidate caches.
#[derive(Debug, Clone, Default)]
pub struct PlotList {
    rows: Vec<PlotRow>,
    revision: u64,
}

impl PlotList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn rows(&self) -> &[PlotRow] {
        &self.rows
    }

    #[must_use]
    pub fn first_index(&self) -> Option<TimePointIndex> {
        self.rows.first().map(|row| row.index)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<TimePointIndex> {
        self.rows.last().map(|row| row.index)
    }

    /// Replaces every stored row.
    ///
    /// Input is sorted by index; for duplicate indices the last row wins.
    pub fn set_data(&mut self, mut rows: Vec<PlotRow>) {
        let original_count = rows.len();
        rows.sort_by_key(|row| row.index);
        let mut canonical: Vec<PlotRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match canonical.last_mut() {
                Some(last) if last.index == row.index => *last = row,
                _ => canonical.push(row),
            }
        }
        debug!(
            original_count,
            canonical_count = canonical.len(),
            "set plot rows"
        );
        self.rows = canonical;
        self.bump_revision();
    }

    /// Inserts `row` at its index, replacing any existing row there.
    pub fn upsert(&mut self, row: PlotRow) -> UpsertOutcome {
        let index = row.index;
        let outcome = match self.rows.last() {
            None => {
                self.rows.push(row);
                UpsertOutcome::Appended
            }
            Some(last) if last.index < index => {
                self.rows.push(row);
                UpsertOutcome::Appended
            }
            Some(_) => match self.rows.binary_search_by_key(&index, |existing| existing.index) {
                Ok(position) => {
                    let previous_had_value = !self.rows[position].is_gap();
                    if previous_had_value && row.is_gap() {
                        debug!(index, "value row explicitly overwritten by gap row");
                    }
                    self.rows[position] = row;
                    UpsertOutcome::Replaced { previous_had_value }
                }
                Err(position) => {
                    self.rows.insert(position, row);
                    UpsertOutcome::Inserted
                }
            },
        };
        trace!(index, count = self.rows.len(), ?outcome, "upsert plot row");
        self.bump_revision();
        outcome
    }

    /// Removes every row with `index >= from`.
    pub fn truncate_from(&mut self, from: TimePointIndex) {
        let position = self.lower_bound(from);
        if position == self.rows.len() {
            return;
        }
        self.rows.truncate(position);
        debug!(from, count = self.rows.len(), "truncate plot rows");
        self.bump_revision();
    }

    pub fn clear(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.rows.clear();
        self.bump_revision();
    }

    /// Returns stored rows whose index lies in `[from, to)`.
    #[must_use]
    pub fn rows_in_range(&self, from: TimePointIndex, to: TimePointIndex) -> &[PlotRow] {
        if to <= from {
            return &[];
        }
        let start = self.lower_bound(from);
        let end = self.lower_bound(to);
        &self.rows[start..end.max(start)]
    }

    /// Returns stored rows whose time lies in `[from, to]`.
    #[must_use]
    pub fn rows_in_time_range(&self, from: TimePoint, to: TimePoint) -> &[PlotRow] {
        if to < from {
            return &[];
        }
        let start = self.rows.partition_point(|row| row.time < from);
        let end = self.rows.partition_point(|row| row.time <= to);
        &self.rows[start..end.max(start)]
    }

    /// Returns the row stored at `index`, including gap rows.
    #[must_use]
    pub fn row_at(&self, index: TimePointIndex) -> Option<&PlotRow> {
        self.rows
            .binary_search_by_key(&index, |row| row.index)
            .ok()
            .map(|position| &self.rows[position])
    }

    /// Returns the row at `index` when it exists and carries a value.
    #[must_use]
    pub fn value_at(&self, index: TimePointIndex) -> Option<&PlotRow> {
        self.row_at(index).filter(|row| !row.is_gap())
    }

    /// Finds a value row relative to `index`; gap rows are never returned.
    #[must_use]
    pub fn search(&self, index: TimePointIndex, mode: SearchMode) -> Option<&PlotRow> {
        match mode {
            SearchMode::Exact => self.value_at(index),
            SearchMode::NearestLeft => {
                let end = self.rows.partition_point(|row| row.index <= index);
                self.rows[..end].iter().rev().find(|row| !row.is_gap())
            }
            SearchMode::NearestRight => {
                let start = self.lower_bound(index);
                self.rows[start..].iter().find(|row| !row.is_gap())
            }
        }
    }

    /// First row that carries a value.
    #[must_use]
    pub fn first_value(&self) -> Option<&PlotRow> {
        self.rows.iter().find(|row| !row.is_gap())
    }

    /// First value row whose index lies in `[from, to)`.
    #[must_use]
    pub fn first_value_in_range(
        &self,
        from: TimePointIndex,
        to: TimePointIndex,
    ) -> Option<&PlotRow> {
        self.rows_in_range(from, to).iter().find(|row| !row.is_gap())
    }

    /// Min/max over the selected channels of value rows in `[from, to)`.
    #[must_use]
    pub fn min_max_in_range(
        &self,
        from: TimePointIndex,
        to: TimePointIndex,
        channels: &[PlotRowChannel],
    ) -> Option<PriceRange> {
        let mut range: Option<PriceRange> = None;
        for value in self
            .rows_in_range(from, to)
            .iter()
            .filter_map(|row| row.value)
        {
            for channel in channels {
                let price = value[channel.position()];
                if !price.is_finite() {
                    continue;
                }
                let point = PriceRange::new(price, price);
                range = Some(range.map_or(point, |acc| acc.merge(point)));
            }
        }
        range
    }

    fn lower_bound(&self, index: TimePointIndex) -> usize {
        self.rows.partition_point(|row| row.index < index)
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
