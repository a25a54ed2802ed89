use chart_series::core::{
    OriginalTime, PlotList, PlotRow, PlotRowChannel, SearchMode, TimePoint, UpsertOutcome,
};
use proptest::prelude::*;

fn value_row(index: i64, value: f64) -> PlotRow {
    PlotRow::with_value(
        index,
        TimePoint::new(1_700_000_000 + index * 60),
        OriginalTime::Timestamp(1_700_000_000 + index * 60),
        [value; 4],
    )
}

fn gap_row(index: i64) -> PlotRow {
    PlotRow::gap(
        index,
        TimePoint::new(1_700_000_000 + index * 60),
        OriginalTime::Timestamp(1_700_000_000 + index * 60),
    )
}

#[test]
fn rows_in_range_is_half_open_and_tolerates_out_of_bounds() {
    let mut list = PlotList::new();
    list.set_data((0..10).map(|i| value_row(i, i as f64)).collect());

    let indices: Vec<i64> = list.rows_in_range(3, 6).iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![3, 4, 5]);

    assert_eq!(list.rows_in_range(-100, 2).len(), 2);
    assert_eq!(list.rows_in_range(8, 1_000).len(), 2);
    assert!(list.rows_in_range(50, 60).is_empty());
    assert!(list.rows_in_range(6, 3).is_empty());
}

#[test]
fn value_at_is_absent_for_gaps_and_unpopulated_indices() {
    let mut list = PlotList::new();
    list.set_data(vec![value_row(0, 1.0), gap_row(1), value_row(2, 3.0)]);

    assert!(list.value_at(0).is_some());
    assert!(list.value_at(1).is_none());
    assert!(list.row_at(1).is_some_and(PlotRow::is_gap));
    assert!(list.value_at(-1).is_none());
    assert!(list.value_at(99).is_none());
}

#[test]
fn gap_row_can_be_overwritten_by_value_row() {
    let mut list = PlotList::new();
    list.upsert(gap_row(4));
    let outcome = list.upsert(value_row(4, 12.5));

    assert_eq!(
        outcome,
        UpsertOutcome::Replaced {
            previous_had_value: false
        }
    );
    assert_eq!(list.value_at(4).and_then(PlotRow::close), Some(12.5));
}

#[test]
fn set_data_sorts_and_keeps_last_duplicate() {
    let mut list = PlotList::new();
    list.set_data(vec![value_row(5, 1.0), value_row(2, 2.0), value_row(5, 9.0)]);

    let rows: Vec<(i64, Option<f64>)> = list.rows().iter().map(|row| (row.index, row.close())).collect();
    assert_eq!(rows, vec![(2, Some(2.0)), (5, Some(9.0))]);
    assert_eq!(list.first_index(), Some(2));
    assert_eq!(list.last_index(), Some(5));
}

#[test]
fn first_value_skips_leading_gaps() {
    let mut list = PlotList::new();
    list.set_data(vec![gap_row(0), gap_row(1), value_row(2, 7.0), value_row(3, 8.0)]);

    assert_eq!(list.first_value().map(|row| row.index), Some(2));
    assert_eq!(list.first_value_in_range(3, 10).map(|row| row.index), Some(3));
    assert!(list.first_value_in_range(0, 2).is_none());
}

#[test]
fn min_max_uses_requested_channels_only() {
    let mut list = PlotList::new();
    list.upsert(PlotRow::with_value(
        0,
        TimePoint::new(0),
        OriginalTime::Timestamp(0),
        [10.0, 15.0, 5.0, 12.0],
    ));
    list.upsert(PlotRow::with_value(
        1,
        TimePoint::new(60),
        OriginalTime::Timestamp(60),
        [12.0, 20.0, 8.0, 9.0],
    ));

    let close = list
        .min_max_in_range(0, 2, &[PlotRowChannel::Close])
        .expect("close range");
    assert_eq!((close.min(), close.max()), (9.0, 12.0));

    let high_low = list
        .min_max_in_range(0, 2, &[PlotRowChannel::High, PlotRowChannel::Low])
        .expect("high/low range");
    assert_eq!((high_low.min(), high_low.max()), (5.0, 20.0));
}

#[test]
fn truncate_and_clear_bump_revision() {
    let mut list = PlotList::new();
    list.set_data((0..6).map(|i| value_row(i, 1.0)).collect());
    let revision = list.revision();

    list.truncate_from(4);
    assert_eq!(list.last_index(), Some(3));
    assert!(list.revision() > revision);

    let revision = list.revision();
    list.truncate_from(100);
    assert_eq!(list.revision(), revision);

    list.clear();
    assert!(list.is_empty());
    assert!(list.revision() > revision);
}

#[test]
fn time_range_and_nearest_search() {
    let mut list = PlotList::new();
    list.set_data(vec![value_row(0, 1.0), gap_row(1), value_row(3, 2.0), value_row(4, 3.0)]);

    let rows = list.rows_in_time_range(
        TimePoint::new(1_700_000_000 + 60),
        TimePoint::new(1_700_000_000 + 180),
    );
    let indices: Vec<i64> = rows.iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![1, 3]);

    assert_eq!(list.search(2, SearchMode::NearestLeft).map(|row| row.index), Some(0));
    assert_eq!(list.search(2, SearchMode::NearestRight).map(|row| row.index), Some(3));
    assert_eq!(list.search(4, SearchMode::Exact).map(|row| row.index), Some(4));
}

proptest! {
    #[test]
    fn upserts_keep_rows_strictly_ordered(
        ops in prop::collection::vec((-200i64..200, prop::option::of(-1_000.0f64..1_000.0)), 0..200),
        from in -250i64..250,
        span in 0i64..300
    ) {
        let mut list = PlotList::new();
        for (index, value) in ops {
            let row = match value {
                Some(value) => value_row(index, value),
                None => gap_row(index),
            };
            list.upsert(row);
        }

        for pair in list.rows().windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }

        let to = from + span;
        let slice = list.rows_in_range(from, to);
        for pair in slice.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
        for row in slice {
            prop_assert!(row.index >= from && row.index < to);
        }
        let expected = list
            .rows()
            .iter()
            .filter(|row| row.index >= from && row.index < to)
            .count();
        prop_assert_eq!(slice.len(), expected);
    }

    #[test]
    fn min_max_never_sees_gap_rows(
        values in prop::collection::vec(prop::option::of(-500.0f64..500.0), 1..80)
    ) {
        let mut list = PlotList::new();
        for (index, value) in values.iter().enumerate() {
            let index = index as i64;
            list.upsert(match value {
                Some(value) => value_row(index, *value),
                None => gap_row(index),
            });
        }

        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let range = list.min_max_in_range(0, values.len() as i64, &[PlotRowChannel::Close]);
        if present.is_empty() {
            prop_assert!(range.is_none());
        } else {
            let range = range.expect("range over value rows");
            let min = present.iter().copied().fold(f64::INFINITY, f64::min);
            let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(range.min(), min);
            prop_assert_eq!(range.max(), max);
        }
    }
}
