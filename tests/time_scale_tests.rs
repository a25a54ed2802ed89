use approx::assert_relative_eq;
use chart_series::core::{LogicalRange, TimeScale, TimeScaleOptions, VisibleRange};
use proptest::prelude::*;

fn populated(width: f64, first: i64, last: i64) -> TimeScale {
    let mut time_scale = TimeScale::new(TimeScaleOptions::default());
    time_scale.set_width(width).expect("width");
    time_scale.set_index_bounds(Some((first, last)));
    time_scale
}

#[test]
fn last_bar_sits_half_a_bar_left_of_the_right_edge() {
    let time_scale = populated(600.0, 0, 99);
    assert_relative_eq!(time_scale.index_to_coordinate(99), 600.0 - 3.0 - 1.0);
    assert_relative_eq!(time_scale.index_to_coordinate(98), 600.0 - 9.0 - 1.0);
}

#[test]
fn visible_range_rounds_outward_and_is_half_open() {
    let time_scale = populated(60.0, 0, 99);
    assert_eq!(time_scale.visible_range(), Some(VisibleRange::new(90, 100)));

    let logical = time_scale.visible_logical_range().expect("logical range");
    assert_relative_eq!(logical.from, 90.0);
    assert_relative_eq!(logical.to, 99.0);
}

#[test]
fn fractional_logical_range_widens_to_whole_indices() {
    let range = LogicalRange {
        from: 3.4,
        to: 7.2,
    };
    assert_eq!(range.to_visible_range(), VisibleRange::new(3, 9));
}

#[test]
fn empty_scale_reports_nothing_visible() {
    let mut time_scale = TimeScale::default();
    time_scale.set_width(300.0).expect("width");
    assert!(time_scale.is_empty());
    assert_eq!(time_scale.visible_range(), None);
    assert_relative_eq!(time_scale.index_to_coordinate(5), 0.0);
}

#[test]
fn right_offset_shifts_bars_left() {
    let mut time_scale = populated(600.0, 0, 99);
    let before = time_scale.index_to_coordinate(99);
    time_scale.set_right_offset(5.0).expect("offset");
    let after = time_scale.index_to_coordinate(99);
    assert_relative_eq!(before - after, 30.0);
}

#[test]
fn coordinate_to_index_inverts_index_to_coordinate() {
    let time_scale = populated(800.0, 0, 500);
    for index in [380, 420, 499, 500] {
        let x = time_scale.index_to_coordinate(index);
        assert_eq!(time_scale.coordinate_to_index(x).expect("index"), index);
    }
    assert!(time_scale.coordinate_to_float_index(f64::NAN).is_err());
}

#[test]
fn bar_spacing_is_clamped_to_options() {
    let options = TimeScaleOptions {
        min_bar_spacing: 2.0,
        max_bar_spacing: 20.0,
        ..TimeScaleOptions::default()
    };
    let mut time_scale = TimeScale::new(options);
    time_scale.set_width(400.0).expect("width");
    time_scale.set_bar_spacing(0.1).expect("spacing");
    assert_relative_eq!(time_scale.bar_spacing(), 2.0);
    time_scale.set_bar_spacing(500.0).expect("spacing");
    assert_relative_eq!(time_scale.bar_spacing(), 20.0);
    assert!(time_scale.set_bar_spacing(0.0).is_err());
}

#[test]
fn zoom_keeps_anchor_index_under_cursor() {
    let mut time_scale = populated(600.0, 0, 999);
    let anchor_x = 300.0;
    let anchor = time_scale
        .coordinate_to_float_index(anchor_x)
        .expect("anchor");
    time_scale.zoom(anchor_x, 3.0).expect("zoom");

    assert!(time_scale.bar_spacing() > 6.0);
    let after = time_scale
        .coordinate_to_float_index(anchor_x)
        .expect("anchor after");
    assert_relative_eq!(after, anchor, epsilon = 1e-5);
}

#[test]
fn scroll_drag_translates_right_offset() {
    let mut time_scale = populated(600.0, 0, 999);
    time_scale.start_scroll(300.0);
    time_scale.scroll_to(330.0);
    time_scale.end_scroll();
    assert_relative_eq!(time_scale.right_offset(), -5.0);
}

#[test]
fn fixed_right_edge_forbids_positive_offset() {
    let options = TimeScaleOptions {
        fix_right_edge: true,
        ..TimeScaleOptions::default()
    };
    let mut time_scale = TimeScale::new(options);
    time_scale.set_width(600.0).expect("width");
    time_scale.set_index_bounds(Some((0, 99)));
    time_scale.set_right_offset(10.0).expect("offset");
    assert_relative_eq!(time_scale.right_offset(), 0.0);
}

#[test]
fn index_bound_changes_bump_revision_only_when_different() {
    let mut time_scale = populated(600.0, 0, 10);
    let revision = time_scale.revision();
    time_scale.set_index_bounds(Some((0, 10)));
    assert_eq!(time_scale.revision(), revision);
    time_scale.set_index_bounds(Some((0, 11)));
    assert!(time_scale.revision() > revision);
    assert_eq!(time_scale.base_index(), 11);
}

#[test]
fn invalid_width_is_rejected() {
    let mut time_scale = TimeScale::default();
    assert!(time_scale.set_width(0.0).is_err());
    assert!(time_scale.set_width(f64::INFINITY).is_err());
}

proptest! {
    #[test]
    fn visible_range_covers_every_on_screen_bar(
        width in 50.0f64..2_000.0,
        spacing in 0.5f64..25.0,
        last in 0i64..5_000
    ) {
        let mut time_scale = TimeScale::new(TimeScaleOptions {
            bar_spacing: spacing,
            ..TimeScaleOptions::default()
        });
        time_scale.set_width(width).expect("width");
        time_scale.set_index_bounds(Some((0, last)));

        let range = time_scale.visible_range().expect("visible range");
        prop_assert!(range.from < range.to);
        prop_assert!(range.contains(last));
        let spacing = time_scale.bar_spacing();
        let right_most = time_scale.index_to_coordinate(range.to - 1);
        prop_assert!(right_most - spacing / 2.0 < width);
        let before = time_scale.index_to_coordinate(range.from - 1);
        prop_assert!(before + spacing / 2.0 <= 1.0);
    }
}
