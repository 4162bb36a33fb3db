use std::path::Path;

use anyhow::{anyhow, Context, Result};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use serde::{Deserialize, Serialize};

use crate::coord::{decimal_to_dms, dms_to_decimal, Datum, Dms};
use crate::picker::Coordinate;

/// Per-image result of a batch write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub path: String,
    pub success: bool,
}

/// Reads and writes the GPS position embedded in image files.
///
/// An `Err` from either method means the request could not be carried out at
/// all. A write that was attempted but failed for one file is reported as a
/// `WriteOutcome` with `success: false` instead.
pub trait GeoMetadata: Send + Sync {
    fn read_coordinate(&self, path: &str) -> Result<Option<Coordinate>>;
    fn write_coordinates(&self, paths: &[String], at: Coordinate) -> Result<Vec<WriteOutcome>>;
}

/// EXIF GPS tags through `little_exif`. Coordinates cross this boundary in
/// the map datum and are stored as WGS84.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifGeoMetadata {
    pub datum: Datum,
}

impl ExifGeoMetadata {
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }

    fn write_one(path: &Path, longitude: &Dms, latitude: &Dms) -> Result<()> {
        let mut metadata = Metadata::new_from_path(path)
            .with_context(|| format!("Unable to read metadata of {}", path.display()))?;
        metadata.set_tag(ExifTag::GPSLongitudeRef(longitude.reference.to_string()));
        metadata.set_tag(ExifTag::GPSLongitude(to_rationals(longitude)));
        metadata.set_tag(ExifTag::GPSLatitudeRef(latitude.reference.to_string()));
        metadata.set_tag(ExifTag::GPSLatitude(to_rationals(latitude)));
        metadata
            .write_to_file(path)
            .with_context(|| format!("Unable to write metadata to {}", path.display()))
    }
}

impl GeoMetadata for ExifGeoMetadata {
    fn read_coordinate(&self, path: &str) -> Result<Option<Coordinate>> {
        let path = Path::new(path);
        std::fs::metadata(path).with_context(|| format!("Unable to access {}", path.display()))?;
        let metadata = match Metadata::new_from_path(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::debug!("no readable metadata in {}: {err}", path.display());
                return Ok(None);
            }
        };
        Ok(gps_position(&metadata).map(|at| self.datum.from_wgs84(at)))
    }

    fn write_coordinates(&self, paths: &[String], at: Coordinate) -> Result<Vec<WriteOutcome>> {
        if !at.is_valid() {
            return Err(anyhow!("Refusing to write out-of-range coordinate {at}"));
        }
        let wgs84 = self.datum.to_wgs84(at);
        let longitude = decimal_to_dms(wgs84.longitude, true);
        let latitude = decimal_to_dms(wgs84.latitude, false);
        tracing::info!("writing {wgs84} (WGS84) to {} images", paths.len());

        let outcomes = paths
            .iter()
            .map(|path| {
                let result = Self::write_one(Path::new(path), &longitude, &latitude);
                if let Err(err) = &result {
                    tracing::warn!("{err:#}");
                }
                WriteOutcome {
                    path: path.clone(),
                    success: result.is_ok(),
                }
            })
            .collect();
        Ok(outcomes)
    }
}

fn to_rationals(dms: &Dms) -> Vec<uR64> {
    dms.parts
        .iter()
        .map(|&(nominator, denominator)| uR64 {
            nominator,
            denominator,
        })
        .collect()
}

fn from_rationals(values: &[uR64]) -> Vec<(u32, u32)> {
    values.iter().map(|v| (v.nominator, v.denominator)).collect()
}

/// WGS84 position stored in the GPS tags, if all four are present.
fn gps_position(metadata: &Metadata) -> Option<Coordinate> {
    let lon_ref = match metadata.get_tag(&ExifTag::GPSLongitudeRef(String::new())).next() {
        Some(ExifTag::GPSLongitudeRef(value)) => value.clone(),
        _ => return None,
    };
    let lat_ref = match metadata.get_tag(&ExifTag::GPSLatitudeRef(String::new())).next() {
        Some(ExifTag::GPSLatitudeRef(value)) => value.clone(),
        _ => return None,
    };
    let lon = match metadata.get_tag(&ExifTag::GPSLongitude(Vec::new())).next() {
        Some(ExifTag::GPSLongitude(value)) => from_rationals(value),
        _ => return None,
    };
    let lat = match metadata.get_tag(&ExifTag::GPSLatitude(Vec::new())).next() {
        Some(ExifTag::GPSLatitude(value)) => from_rationals(value),
        _ => return None,
    };
    Some(Coordinate::new(
        dms_to_decimal(&lon, &lon_ref)?,
        dms_to_decimal(&lat, &lat_ref)?,
    ))
}
