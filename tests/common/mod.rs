#![allow(dead_code)]

use anyhow::{anyhow, Result};
use geostamp::geotag::{GeoMetadata, WriteOutcome};
use geostamp::picker::{Coordinate, MapSurface, MarkerId, MarkerKind};
use image::{DynamicImage, Rgba, RgbaImage};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let pixel = Rgba(color);
    let buffer = RgbaImage::from_pixel(width, height, pixel);
    DynamicImage::ImageRgba8(buffer)
}

pub fn write_image(path: impl Into<PathBuf>, image: &DynamicImage) {
    image
        .save(path.into())
        .expect("failed to write image to disk");
}

/// Small baseline JPEG without any EXIF segment.
pub fn write_jpeg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let image = DynamicImage::ImageRgb8(solid_image(16, 12, [90, 120, 200, 255]).to_rgb8());
    write_image(&path, &image);
    path
}

pub fn ids(paths: &[&str]) -> HashSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

/// In-memory metadata store with scripted failures.
#[derive(Default)]
pub struct FakeMetadata {
    pub failing: HashSet<String>,
    pub broken: bool,
    pub stored: Mutex<HashMap<String, Coordinate>>,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl FakeMetadata {
    pub fn failing_on(paths: &[&str]) -> Self {
        Self {
            failing: ids(paths),
            ..Default::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }
}

impl GeoMetadata for FakeMetadata {
    fn read_coordinate(&self, path: &str) -> Result<Option<Coordinate>> {
        if self.broken {
            return Err(anyhow!("metadata backend unavailable"));
        }
        Ok(self.stored.lock().unwrap().get(path).copied())
    }

    fn write_coordinates(&self, paths: &[String], at: Coordinate) -> Result<Vec<WriteOutcome>> {
        self.batches.lock().unwrap().push(paths.to_vec());
        if self.broken {
            return Err(anyhow!("metadata backend unavailable"));
        }
        let mut stored = self.stored.lock().unwrap();
        Ok(paths
            .iter()
            .map(|path| {
                let success = !self.failing.contains(path);
                if success {
                    stored.insert(path.clone(), at);
                }
                WriteOutcome {
                    path: path.clone(),
                    success,
                }
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Added(MarkerId, MarkerKind),
    Removed(MarkerId),
    Centered(Coordinate, f64),
}

/// Map stand-in that logs every call in order.
#[derive(Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    pub live: HashMap<MarkerId, (Coordinate, MarkerKind)>,
    next: u64,
}

impl RecordingSurface {
    pub fn live_of(&self, kind: MarkerKind) -> usize {
        self.live.values().filter(|(_, k)| *k == kind).count()
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind) -> MarkerId {
        self.next += 1;
        let id = MarkerId(self.next);
        self.live.insert(id, (at, kind));
        self.events.push(SurfaceEvent::Added(id, kind));
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.live.remove(&marker);
        self.events.push(SurfaceEvent::Removed(marker));
    }

    fn center_on(&mut self, at: Coordinate, zoom: f64) {
        self.events.push(SurfaceEvent::Centered(at, zoom));
    }
}

/// Panics on its first `panics` calls, then behaves like `FakeMetadata`.
#[derive(Default)]
pub struct PanickingMetadata {
    pub panics: usize,
    pub calls: AtomicUsize,
    pub inner: FakeMetadata,
}

impl PanickingMetadata {
    pub fn panicking_once() -> Self {
        Self {
            panics: 1,
            ..Default::default()
        }
    }

    fn maybe_panic(&self) {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.panics {
            panic!("corrupt metadata block");
        }
    }
}

impl GeoMetadata for PanickingMetadata {
    fn read_coordinate(&self, path: &str) -> Result<Option<Coordinate>> {
        self.maybe_panic();
        self.inner.read_coordinate(path)
    }

    fn write_coordinates(&self, paths: &[String], at: Coordinate) -> Result<Vec<WriteOutcome>> {
        self.maybe_panic();
        self.inner.write_coordinates(paths, at)
    }
}
