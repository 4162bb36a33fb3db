use geostamp::app::map_view::{MapView, MAX_ZOOM, MIN_ZOOM};
use geostamp::app::parse_coordinate;
use geostamp::picker::{Coordinate, CoordinatePicker, MapSurface};

#[test]
fn goto_field_accepts_comma_or_space() {
    assert_eq!(parse_coordinate("116.4, 39.9"), Some(Coordinate::new(116.4, 39.9)));
    assert_eq!(parse_coordinate(" -73.98 40.75 "), Some(Coordinate::new(-73.98, 40.75)));
    assert_eq!(parse_coordinate("10,20"), Some(Coordinate::new(10.0, 20.0)));
}

#[test]
fn goto_field_rejects_garbage_and_out_of_range() {
    assert_eq!(parse_coordinate(""), None);
    assert_eq!(parse_coordinate("Paris"), None);
    assert_eq!(parse_coordinate("1, 2, 3"), None);
    assert_eq!(parse_coordinate("10, 95"), None);
}

#[test]
fn map_view_keeps_one_target_marker() {
    let mut map = MapView::new(Coordinate::new(0.0, 0.0), 2.0);
    let mut picker = CoordinatePicker::new();
    picker.map_clicked(&mut map, Coordinate::new(1.0, 1.0));
    picker.map_clicked(&mut map, Coordinate::new(2.0, 2.0));
    assert_eq!(map.marker_count(), 1);
    picker.show_located(&mut map, Coordinate::new(3.0, 3.0));
    assert_eq!(map.marker_count(), 2);
}

#[test]
fn center_on_detaches_and_clamps_zoom() {
    let mut map = MapView::new(Coordinate::new(0.0, 0.0), 2.0);
    map.center_on(Coordinate::new(5.0, 6.0), 40.0);
    assert_eq!(map.center(), Coordinate::new(5.0, 6.0));
    assert_eq!(map.zoom(), MAX_ZOOM);
    map.zoom_by(-100.0);
    assert_eq!(map.zoom(), MIN_ZOOM);
}

#[test]
fn reset_returns_home_without_markers() {
    let mut map = MapView::new(Coordinate::new(0.0, 0.0), 2.0);
    let mut picker = CoordinatePicker::new();
    picker.map_clicked(&mut map, Coordinate::new(1.0, 1.0));
    map.center_on(Coordinate::new(9.0, 9.0), 12.0);

    map.reset(Coordinate::new(-3.0, 50.0), 4.0);
    picker.reset();
    assert_eq!(map.marker_count(), 0);
    assert_eq!(map.center(), Coordinate::new(-3.0, 50.0));
    assert_eq!(map.zoom(), 4.0);
    assert!(!picker.is_set());
}
