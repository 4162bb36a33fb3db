use std::collections::BTreeMap;

use eframe::egui::{self, Color32, Rect, Stroke};
use walkers::{
    lat_lon, sources::OpenStreetMap, HttpTiles, Map, MapMemory, Position, Projector, Tiles,
};

use crate::picker::{Coordinate, MapSurface, MarkerId, MarkerKind};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;

struct PlacedMarker {
    at: Coordinate,
    kind: MarkerKind,
}

fn position(at: Coordinate) -> Position {
    lat_lon(at.latitude, at.longitude)
}

fn coordinate(position: Position) -> Coordinate {
    Coordinate::new(position.x(), position.y())
}

/// Slippy map on OpenStreetMap tiles: drag to pan, scroll to zoom, click to
/// pick. Without tiles (tests, no context yet) only the markers are drawn.
pub struct MapView {
    tiles: Option<HttpTiles>,
    memory: MapMemory,
    home: Coordinate,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_marker: u64,
}

impl MapView {
    pub fn new(home: Coordinate, zoom: f64) -> Self {
        let mut view = Self {
            tiles: None,
            memory: MapMemory::default(),
            home,
            markers: BTreeMap::new(),
            next_marker: 0,
        };
        view.set_zoom(zoom);
        view
    }

    pub fn with_tiles(mut self, ctx: &egui::Context) -> Self {
        self.tiles = Some(HttpTiles::new(OpenStreetMap, ctx.clone()));
        self
    }

    /// Back to the home position with no markers; tiles stay loaded.
    pub fn reset(&mut self, home: Coordinate, zoom: f64) {
        self.memory = MapMemory::default();
        self.home = home;
        self.markers.clear();
        self.set_zoom(zoom);
    }

    pub fn center(&self) -> Coordinate {
        self.memory.detached().map(coordinate).unwrap_or(self.home)
    }

    pub fn zoom(&self) -> f64 {
        self.memory.zoom()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn zoom_by(&mut self, steps: f64) {
        self.set_zoom(self.memory.zoom() + steps);
    }

    fn set_zoom(&mut self, zoom: f64) {
        if let Err(err) = self.memory.set_zoom(zoom.clamp(MIN_ZOOM, MAX_ZOOM)) {
            tracing::warn!("cannot zoom to {zoom}: {err:?}");
        }
    }

    /// Draws the map and returns the coordinate the user clicked, if any.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<Coordinate> {
        let markers = &self.markers;
        let tiles = self.tiles.as_mut().map(|t| t as &mut dyn Tiles);
        let response = Map::new(tiles, &mut self.memory, position(self.home)).show(
            ui,
            |ui, _response, projector, _memory| {
                let rect = ui.max_rect();
                draw_markers(ui.painter(), rect, projector, markers);

                let click = ui.input(|i| {
                    if i.pointer.primary_clicked() {
                        i.pointer.interact_pos()
                    } else {
                        None
                    }
                });
                click
                    .filter(|pos| rect.contains(*pos))
                    .map(|pos| coordinate(projector.unproject(pos.to_vec2())))
            },
        );

        let rect = response.response.rect;
        ui.painter().text(
            rect.right_bottom() - egui::vec2(4.0, 2.0),
            egui::Align2::RIGHT_BOTTOM,
            "© OpenStreetMap contributors",
            egui::FontId::proportional(10.0),
            Color32::from_gray(60),
        );

        response.inner.filter(Coordinate::is_valid)
    }
}

fn draw_markers(
    painter: &egui::Painter,
    rect: Rect,
    projector: &Projector,
    markers: &BTreeMap<MarkerId, PlacedMarker>,
) {
    for marker in markers.values() {
        let pos = projector.project(position(marker.at)).to_pos2();
        if !rect.expand(20.0).contains(pos) {
            continue;
        }
        let color = match marker.kind {
            MarkerKind::Target => Color32::from_rgb(220, 38, 38),
            MarkerKind::Located => Color32::from_rgb(37, 99, 235),
        };
        let head = pos - egui::vec2(0.0, 22.0);
        painter.line_segment([pos, head], Stroke::new(3.0, color));
        painter.circle_filled(head, 8.0, color);
        painter.circle_filled(head, 3.0, Color32::WHITE);
        painter.text(
            head + egui::vec2(11.0, 0.0),
            egui::Align2::LEFT_CENTER,
            marker.at.to_string(),
            egui::FontId::monospace(11.0),
            Color32::BLACK,
        );
    }
}

impl MapSurface for MapView {
    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, PlacedMarker { at, kind });
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn center_on(&mut self, at: Coordinate, zoom: f64) {
        self.memory.center_at(position(at));
        self.set_zoom(zoom);
    }
}
