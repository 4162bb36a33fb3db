use std::fmt;

use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.longitude, self.latitude)
    }
}

/// Opaque handle to a marker living on a [`MapSurface`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// The user-chosen write target.
    Target,
    /// Position read back from an image.
    Located,
}

/// What the picker needs from a map.
pub trait MapSurface {
    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind) -> MarkerId;
    fn remove_marker(&mut self, marker: MarkerId);
    fn center_on(&mut self, at: Coordinate, zoom: f64);
}

/// Owns at most one marker on a surface.
#[derive(Debug)]
pub struct MarkerSlot {
    kind: MarkerKind,
    live: Option<(Coordinate, MarkerId)>,
}

impl MarkerSlot {
    pub fn new(kind: MarkerKind) -> Self {
        Self { kind, live: None }
    }

    /// Removes the held marker from `surface` before placing the new one.
    pub fn replace(&mut self, surface: &mut dyn MapSurface, at: Coordinate) -> MarkerId {
        if let Some((_, old)) = self.live.take() {
            surface.remove_marker(old);
        }
        let marker = surface.add_marker(at, self.kind);
        self.live = Some((at, marker));
        marker
    }

    /// Drops the handle without touching the surface, for when the map
    /// itself has been torn down.
    pub fn forget(&mut self) {
        self.live = None;
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.live.map(|(at, _)| at)
    }

    pub fn marker(&self) -> Option<MarkerId> {
        self.live.map(|(_, marker)| marker)
    }
}

/// Target coordinate chosen on the map, plus the secondary marker used when
/// jumping to an image's stored position.
#[derive(Debug)]
pub struct CoordinatePicker {
    target: MarkerSlot,
    located: MarkerSlot,
}

impl Default for CoordinatePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinatePicker {
    pub fn new() -> Self {
        Self {
            target: MarkerSlot::new(MarkerKind::Target),
            located: MarkerSlot::new(MarkerKind::Located),
        }
    }

    pub fn map_clicked(&mut self, surface: &mut dyn MapSurface, at: Coordinate) {
        let marker = self.target.replace(surface, at);
        tracing::debug!(?marker, "target set to {at}");
    }

    pub fn show_located(&mut self, surface: &mut dyn MapSurface, at: Coordinate) {
        self.located.replace(surface, at);
    }

    pub fn reset(&mut self) {
        self.target.forget();
        self.located.forget();
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.target.coordinate()
    }

    pub fn is_set(&self) -> bool {
        self.target.coordinate().is_some()
    }

    pub fn target_marker(&self) -> Option<MarkerId> {
        self.target.marker()
    }

    pub fn located(&self) -> Option<Coordinate> {
        self.located.coordinate()
    }
}
