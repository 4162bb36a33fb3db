use std::f64::consts::PI;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::picker::Coordinate;

/// Seconds are stored as a rational over this denominator (4 decimals).
pub const SECONDS_PRECISION: u32 = 10_000;

/// Coordinate reference used by the map and by typed coordinates.
/// EXIF always stores WGS84.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datum {
    #[default]
    Wgs84,
    /// The offset datum used by maps published in mainland China.
    Gcj02,
}

impl Datum {
    pub fn to_wgs84(self, at: Coordinate) -> Coordinate {
        match self {
            Datum::Wgs84 => at,
            Datum::Gcj02 => gcj02_to_wgs84(at),
        }
    }

    pub fn from_wgs84(self, at: Coordinate) -> Coordinate {
        match self {
            Datum::Wgs84 => at,
            Datum::Gcj02 => wgs84_to_gcj02(at),
        }
    }
}

/// Degrees, minutes and seconds as EXIF rationals `(numerator, denominator)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dms {
    pub reference: char,
    pub parts: [(u32, u32); 3],
}

pub fn decimal_to_dms(decimal: f64, is_longitude: bool) -> Dms {
    let reference = match (decimal >= 0.0, is_longitude) {
        (true, true) => 'E',
        (false, true) => 'W',
        (true, false) => 'N',
        (false, false) => 'S',
    };
    let abs = decimal.abs();
    let degrees = abs.trunc();
    let remainder = (abs - degrees) * 60.0;
    let minutes = remainder.trunc();
    let seconds = (remainder - minutes) * 60.0;
    let mut seconds = (seconds * SECONDS_PRECISION as f64).round() as u32;
    let mut minutes = minutes as u32;
    let mut degrees = degrees as u32;
    // rounding can carry 59.99995" up to a full minute
    if seconds >= 60 * SECONDS_PRECISION {
        seconds -= 60 * SECONDS_PRECISION;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }
    Dms {
        reference,
        parts: [(degrees, 1), (minutes, 1), (seconds, SECONDS_PRECISION)],
    }
}

/// Returns `None` when fewer than three parts are given or a denominator is 0.
pub fn dms_to_decimal(parts: &[(u32, u32)], reference: &str) -> Option<f64> {
    if parts.len() < 3 || parts[..3].iter().any(|&(_, den)| den == 0) {
        return None;
    }
    let value = |(num, den): (u32, u32)| num as f64 / den as f64;
    let mut decimal = value(parts[0]) + value(parts[1]) / 60.0 + value(parts[2]) / 3600.0;
    let reference = reference.trim_matches(char::from(0)).trim();
    if reference.eq_ignore_ascii_case("W") || reference.eq_ignore_ascii_case("S") {
        decimal = -decimal;
    }
    Some(decimal)
}

const KRASOVSKY_A: f64 = 6_378_245.0;
const KRASOVSKY_EE: f64 = 0.006_693_421_622_965_943;

fn out_of_china(at: Coordinate) -> bool {
    !(73.66..=135.05).contains(&at.longitude) || !(3.86..=53.55).contains(&at.latitude)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

fn gcj02_offset(at: Coordinate) -> (f64, f64) {
    let x = at.longitude - 105.0;
    let y = at.latitude - 35.0;
    let rad_lat = at.latitude / 180.0 * PI;
    let magic = 1.0 - KRASOVSKY_EE * rad_lat.sin().powi(2);
    let sqrt_magic = magic.sqrt();
    let d_lat = transform_lat(x, y) * 180.0
        / ((KRASOVSKY_A * (1.0 - KRASOVSKY_EE)) / (magic * sqrt_magic) * PI);
    let d_lng = transform_lng(x, y) * 180.0 / (KRASOVSKY_A / sqrt_magic * rad_lat.cos() * PI);
    (d_lng, d_lat)
}

pub fn wgs84_to_gcj02(at: Coordinate) -> Coordinate {
    if out_of_china(at) {
        return at;
    }
    let (d_lng, d_lat) = gcj02_offset(at);
    Coordinate::new(at.longitude + d_lng, at.latitude + d_lat)
}

/// Single-step inverse, good to a few metres.
pub fn gcj02_to_wgs84(at: Coordinate) -> Coordinate {
    if out_of_china(at) {
        return at;
    }
    let (d_lng, d_lat) = gcj02_offset(at);
    Coordinate::new(at.longitude - d_lng, at.latitude - d_lat)
}
