use chart_series::core::{
    BandData, OhlcData, PriceScaleMode, PriceScaleOptions, SeriesDataItem, SeriesKind,
    SingleValueData, TimePoint, Viewport,
};
use chart_series::render::{DrawCommand, Point, RecordingSurface};
use chart_series::views::SeriesRenderer;
use chart_series::{ChartError, IndexedItem, Pane, Series};

fn time(index: i64) -> TimePoint {
    TimePoint::new(1_700_000_000 + index * 86_400)
}

fn single(index: i64, value: f64) -> IndexedItem {
    IndexedItem::new(index, time(index), SingleValueData::new(value))
}

fn line_series(values: &[f64]) -> Series {
    let mut series = Series::new(SeriesKind::Line);
    series.set_data(
        values
            .iter()
            .enumerate()
            .map(|(index, value)| single(index as i64, *value))
            .collect(),
    );
    series
}

fn pane() -> Pane {
    Pane::new(Viewport::new(600, 400)).expect("pane")
}

fn item_for(kind: SeriesKind, index: i64) -> SeriesDataItem {
    let base = 100.0 + index as f64;
    match kind {
        SeriesKind::Bar | SeriesKind::Candlestick => {
            OhlcData::new(base, base + 3.0, base - 2.0, base + 1.0).into()
        }
        SeriesKind::Dominating => BandData::new(base + 2.0, base, base + 1.0).into(),
        SeriesKind::Area | SeriesKind::Baseline | SeriesKind::Histogram | SeriesKind::Line => {
            SingleValueData::new(base).into()
        }
    }
}

#[test]
fn invalid_viewport_is_rejected() {
    let err = Pane::new(Viewport::new(0, 400)).expect_err("zero width");
    assert!(matches!(
        err,
        ChartError::InvalidViewport {
            width: 0,
            height: 400
        }
    ));
}

#[test]
fn realtime_update_extends_the_price_range() {
    let mut pane = pane();
    let id = pane.add_series(line_series(&[10.0; 10]));
    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    pane.update_series(id, single(10, 50.0)).expect("update");
    surface.clear();
    pane.render(&mut surface);

    let range = pane.price_scale().price_range().expect("range");
    assert!(range.max() >= 50.0);
    assert_eq!(pane.time_scale().base_index(), 10);
}

#[test]
fn renderer_is_rebuilt_only_when_inputs_change() {
    let mut pane = pane();
    let id = pane.add_series(line_series(&[1.0, 2.0, 3.0, 4.0]));
    let mut surface = RecordingSurface::new();

    pane.render(&mut surface);
    pane.render(&mut surface);
    let view = pane.series_view(id).expect("view");
    assert_eq!(view.rebuild_count(), 1);

    pane.update_series(id, single(4, 5.0)).expect("update");
    pane.render(&mut surface);
    assert_eq!(pane.series_view(id).expect("view").rebuild_count(), 2);

    pane.series_mut(id)
        .expect("series")
        .apply_options_json(r#"{"lineWidth": 1}"#)
        .expect("options");
    pane.render(&mut surface);
    assert_eq!(pane.series_view(id).expect("view").rebuild_count(), 3);
}

#[test]
fn gap_rows_are_skipped_by_the_walker() {
    let mut pane = pane();
    let mut series = Series::new(SeriesKind::Line);
    series.set_data(vec![
        single(0, 10.0),
        IndexedItem::whitespace(1, time(1)),
        single(2, 12.0),
    ]);
    pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let strokes = surface.strokes();
    assert_eq!(strokes.len(), 1);
    let vertices = strokes[0].vertices();
    assert_eq!(vertices.len(), 2);
    let x0 = pane.time_scale().index_to_coordinate(0);
    let x2 = pane.time_scale().index_to_coordinate(2);
    assert!((vertices[0].x - x0).abs() <= 1e-9);
    assert!((vertices[1].x - x2).abs() <= 1e-9);
}

#[test]
fn every_series_kind_draws_something() {
    for kind in SeriesKind::ALL {
        let mut pane = pane();
        let mut series = Series::new(kind);
        series.set_data(
            (0..20)
                .map(|index| IndexedItem::new(index, time(index), item_for(kind, index)))
                .collect(),
        );
        let id = pane.add_series(series);

        let mut surface = RecordingSurface::new();
        pane.render(&mut surface);

        let drawn = surface.stroke_count() + surface.fills().len() + surface.fill_rects().len();
        assert!(drawn > 0, "{kind} drew nothing");
        assert!(pane.series_view(id).expect("view").cache_key().is_some());
    }
}

#[test]
fn hidden_series_draws_nothing_and_leaves_autoscale() {
    let mut pane = pane();
    let visible = pane.add_series(line_series(&[10.0, 11.0, 12.0]));
    let hidden = pane.add_series(line_series(&[1_000.0, 2_000.0, 3_000.0]));
    pane.series_mut(hidden).expect("series").set_visible(false);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    assert_eq!(surface.stroke_count(), 1);
    assert!(pane.series_view(hidden).expect("view").cache_key().is_none());
    assert!(pane.series_view(visible).expect("view").cache_key().is_some());
    let range = pane.price_scale().price_range().expect("range");
    assert!(range.max() < 100.0);
}

#[test]
fn custom_price_range_disables_autoscale() {
    let mut pane = pane();
    pane.add_series(line_series(&[10.0, 20.0, 30.0]));
    pane.set_custom_price_range(0.0, 100.0).expect("custom range");

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    assert!(!pane.price_scale().is_auto_scale());
    let range = pane.price_scale().price_range().expect("range");
    assert_eq!((range.min(), range.max()), (0.0, 100.0));
    assert!(!pane.update_price_range());
    assert!(pane.set_custom_price_range(5.0, 5.0).is_err());
}

#[test]
fn autoscale_only_reruns_after_inputs_move() {
    let mut pane = pane();
    let id = pane.add_series(line_series(&[1.0, 2.0]));
    assert!(pane.update_price_range());
    assert!(!pane.update_price_range());

    pane.update_series(id, single(2, 3.0)).expect("update");
    assert!(pane.update_price_range());

    pane.apply_price_scale_options(PriceScaleOptions {
        mode: PriceScaleMode::Percentage,
        ..PriceScaleOptions::default()
    })
    .expect("options");
    assert!(pane.update_price_range());
}

#[test]
fn series_draw_in_insertion_order() {
    let mut pane = pane();
    let mut first = Series::new(SeriesKind::Line);
    first
        .apply_options_json(r#"{"color": "first"}"#)
        .expect("options");
    first.set_data(vec![single(0, 1.0), single(1, 2.0)]);
    let mut second = Series::new(SeriesKind::Line);
    second
        .apply_options_json(r#"{"color": "second"}"#)
        .expect("options");
    second.set_data(vec![single(0, 2.0), single(1, 1.0)]);
    pane.add_series(first);
    pane.add_series(second);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let styles: Vec<String> = surface.strokes().into_iter().map(|path| path.style).collect();
    assert_eq!(styles, vec!["first", "second"]);
}

#[test]
fn per_item_line_color_switches_stroke() {
    let mut pane = pane();
    let mut series = Series::new(SeriesKind::Line);
    series.set_data(vec![
        single(0, 1.0),
        single(1, 2.0),
        IndexedItem::new(2, time(2), SingleValueData::new(3.0).with_color("#ff0000")),
        single(3, 4.0),
    ]);
    pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let strokes = surface.strokes();
    let styles: Vec<&str> = strokes.iter().map(|path| path.style.as_str()).collect();
    assert_eq!(styles, vec!["#2196f3", "#ff0000", "#2196f3"]);
    assert_eq!(strokes[0].end(), strokes[1].start());
}

#[test]
fn candlestick_colors_follow_direction_and_overrides() {
    let mut pane = pane();
    let mut series = Series::new(SeriesKind::Candlestick);
    series.set_data(vec![
        IndexedItem::new(0, time(0), OhlcData::new(10.0, 12.0, 9.0, 11.0)),
        IndexedItem::new(1, time(1), OhlcData::new(11.0, 12.0, 8.0, 9.0)),
        IndexedItem::new(
            2,
            time(2),
            OhlcData::new(9.0, 10.0, 8.0, 9.5).with_color("#123456"),
        ),
    ]);
    let id = pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let view = pane.series_view(id).expect("view");
    assert!(view.cache_key().is_some());
    let rects = surface.fill_rects();
    let styles: Vec<&str> = rects.iter().map(|rect| rect.style.as_str()).collect();
    assert!(styles.contains(&"#26a69a"));
    assert!(styles.contains(&"#ef5350"));
    assert!(styles.contains(&"#123456"));
}

#[test]
fn baseline_splits_stroke_where_line_crosses_base() {
    let mut pane = pane();
    let mut series = Series::new(SeriesKind::Baseline);
    series
        .apply_options_json(r#"{"baseValue": 10.0, "topLineColor": "up", "bottomLineColor": "down"}"#)
        .expect("options");
    series.set_data(vec![single(0, 5.0), single(1, 15.0), single(2, 5.0)]);
    pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let strokes = surface.strokes();
    let styles: Vec<&str> = strokes.iter().map(|path| path.style.as_str()).collect();
    assert_eq!(styles, vec!["down", "up", "down"]);
    let base_y = pane.price_scale().price_to_coordinate(10.0, 0.0);
    let crossing: Point = strokes[0].end().expect("crossing");
    assert!((crossing.y - base_y).abs() <= 1e-6);
    assert_eq!(surface.fills().len(), 2);
}

#[test]
fn renderer_exposes_visible_items_only_with_neighbours() {
    let mut pane = pane();
    let id = pane.add_series(line_series(&(0..500).map(f64::from).collect::<Vec<_>>()));
    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let visible = pane.time_scale().visible_range().expect("visible");
    assert_eq!(visible.to, 500);
    let first_visible = visible.from;

    let view = pane.series_view(id).expect("view");
    assert!(view.cache_key().is_some());
    let first_command_x = surface.commands().iter().find_map(|command| match command {
        DrawCommand::MoveTo(point) => Some(point.x),
        _ => None,
    });
    let expected_x = pane.time_scale().index_to_coordinate(first_visible);
    assert_eq!(first_command_x, Some(expected_x));
}

#[test]
fn pane_renderer_enum_matches_series_kind() {
    let mut pane = pane();
    let id = pane.add_series(line_series(&[1.0, 2.0]));
    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let mut view = pane.series_view(id).expect("view").clone();
    let series = pane.series(id).expect("series");
    let renderer = view
        .renderer(series, pane.time_scale(), pane.price_scale())
        .expect("renderer");
    assert!(matches!(renderer, SeriesRenderer::Line(_)));
}

fn first_rect_height(kind: SeriesKind, invert_scale: bool) -> f64 {
    let mut pane = pane();
    pane.apply_price_scale_options(PriceScaleOptions {
        invert_scale,
        ..PriceScaleOptions::default()
    })
    .expect("options");
    let mut series = Series::new(kind);
    series.set_data(
        (0..3)
            .map(|index| IndexedItem::new(index, time(index), OhlcData::new(10.0, 20.0, 0.0, 12.0)))
            .collect(),
    );
    pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);
    surface.fill_rects().first().expect("stem").height
}

#[test]
fn inverted_scale_keeps_full_bar_stems_and_wicks() {
    for kind in [SeriesKind::Bar, SeriesKind::Candlestick] {
        let upright = first_rect_height(kind, false);
        let inverted = first_rect_height(kind, true);
        assert!(upright > 100.0, "{kind} stem {upright}");
        assert!((inverted - upright).abs() <= 1e-6, "{kind} inverted stem {inverted}");
    }
}

#[test]
fn empty_direction_wick_and_border_colors_fall_back_to_shared() {
    let mut pane = pane();
    let mut series = Series::new(SeriesKind::Candlestick);
    series
        .apply_options_json(
            r##"{"wickUpColor": "", "wickColor": "#737375", "borderUpColor": "", "borderColor": "#378658"}"##,
        )
        .expect("options");
    series.set_data(vec![
        IndexedItem::new(0, time(0), OhlcData::new(10.0, 12.0, 9.0, 11.0)),
        IndexedItem::new(1, time(1), OhlcData::new(11.0, 12.0, 8.0, 9.0)),
    ]);
    pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let rects = surface.fill_rects();
    let styles: Vec<&str> = rects.iter().map(|rect| rect.style.as_str()).collect();
    assert_eq!(&styles[..2], &["#737375", "#ef5350"]);
    assert!(styles.contains(&"#378658"));
    assert!(!styles.contains(&""));
}

#[test]
fn dominating_row_overrides_other_than_middle_stay_in_the_store() {
    let mut pane = pane();
    let mut series = Series::new(SeriesKind::Dominating);
    series.set_data(vec![
        IndexedItem::new(0, time(0), BandData::new(12.0, 8.0, 10.0)),
        IndexedItem::new(
            1,
            time(1),
            BandData::new(13.0, 9.0, 11.0)
                .with_top_color("#abcdef")
                .with_middle_color("#ff00ff"),
        ),
        IndexedItem::new(2, time(2), BandData::new(14.0, 10.0, 12.0)),
    ]);
    let id = pane.add_series(series);

    let mut surface = RecordingSurface::new();
    pane.render(&mut surface);

    let stored = pane
        .series(id)
        .expect("series")
        .data()
        .value_at(1)
        .expect("row");
    assert_eq!(stored.style.top_color.as_deref(), Some("#abcdef"));

    let strokes = surface.strokes();
    let styles: Vec<&str> = strokes.iter().map(|path| path.style.as_str()).collect();
    assert_eq!(styles[0], "#56e35c");
    assert!(styles.contains(&"#ff00ff"));
    assert!(!styles.contains(&"#abcdef"));
}
