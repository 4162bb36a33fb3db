use geostamp::coord::{
    decimal_to_dms, dms_to_decimal, gcj02_to_wgs84, wgs84_to_gcj02, Datum, SECONDS_PRECISION,
};
use geostamp::picker::Coordinate;

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

#[test]
fn dms_references_follow_sign() {
    assert_eq!(decimal_to_dms(116.4, true).reference, 'E');
    assert_eq!(decimal_to_dms(-73.9, true).reference, 'W');
    assert_eq!(decimal_to_dms(39.9, false).reference, 'N');
    assert_eq!(decimal_to_dms(-33.8, false).reference, 'S');
}

#[test]
fn dms_parts_for_known_value() {
    // 116.397128 = 116° 23' 49.6608"
    let dms = decimal_to_dms(116.397128, true);
    assert_eq!(dms.parts[0], (116, 1));
    assert_eq!(dms.parts[1], (23, 1));
    assert_eq!(dms.parts[2], (496_608, SECONDS_PRECISION));
}

#[test]
fn dms_survives_a_round_trip_within_precision() {
    for &value in &[0.0, 12.345678, -45.5, 179.999999, -89.000001] {
        let dms = decimal_to_dms(value, true);
        let back = dms_to_decimal(&dms.parts, &dms.reference.to_string()).unwrap();
        // 1e-4 arc seconds
        assert!(close(back, value, 1e-7), "{value} -> {back}");
    }
}

#[test]
fn southern_and_western_are_negative() {
    let parts = [(33, 1), (52, 1), (0, 1)];
    assert!(close(dms_to_decimal(&parts, "S").unwrap(), -(33.0 + 52.0 / 60.0), 1e-9));
    assert!(close(dms_to_decimal(&parts, "W\0").unwrap(), -(33.0 + 52.0 / 60.0), 1e-9));
    assert!(dms_to_decimal(&parts, "N").unwrap() > 0.0);
}

#[test]
fn short_rational_list_is_rejected() {
    assert_eq!(dms_to_decimal(&[(1, 1), (2, 1)], "N"), None);
}

#[test]
fn gcj02_offsets_inside_china_only() {
    let beijing = Coordinate::new(116.397128, 39.916527);
    let shifted = wgs84_to_gcj02(beijing);
    assert!(shifted.longitude != beijing.longitude);
    // the offset is a few hundred meters at most
    assert!(close(shifted.longitude, beijing.longitude, 0.01));
    assert!(close(shifted.latitude, beijing.latitude, 0.01));

    let paris = Coordinate::new(2.3522, 48.8566);
    assert_eq!(wgs84_to_gcj02(paris), paris);
    assert_eq!(gcj02_to_wgs84(paris), paris);
}

#[test]
fn gcj02_inverse_is_close() {
    let shanghai = Coordinate::new(121.4737, 31.2304);
    let back = gcj02_to_wgs84(wgs84_to_gcj02(shanghai));
    // single-step inverse, good to a few metres
    assert!(close(back.longitude, shanghai.longitude, 5e-5));
    assert!(close(back.latitude, shanghai.latitude, 5e-5));
}

#[test]
fn wgs84_datum_is_identity() {
    let at = Coordinate::new(121.0, 31.0);
    assert_eq!(Datum::Wgs84.to_wgs84(at), at);
    assert_eq!(Datum::Wgs84.from_wgs84(at), at);
    assert_ne!(Datum::Gcj02.from_wgs84(at), at);
}
