pub mod list_view;
pub mod locator;
pub mod map_view;
pub mod thumbnails;
pub mod writer;

use std::{collections::HashSet, path::PathBuf, sync::Arc, time::Duration};

use eframe::{
    egui::{self, Color32, RichText},
    App, Frame,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    catalog::{CatalogChange, ImageEntry},
    config::Settings,
    fs_utils::{expand_paths, path_id, ScanOptions, SUPPORTED_EXTENSIONS},
    geotag::GeoMetadata,
    picker::{Coordinate, MapSurface},
    session::Session,
    ui::KeyboardState,
};

use self::{
    list_view::RowAction,
    locator::Locator,
    map_view::MapView,
    thumbnails::{PreviewState, Thumbnails},
    writer::{BatchEvent, BatchWriter},
};

/// `lng, lat` in decimal degrees, comma or whitespace separated.
static COORDINATE_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*[,\s]\s*(-?\d+(?:\.\d+)?)\s*$")
        .expect("coordinate pattern is valid")
});

pub fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let caps = COORDINATE_INPUT.captures(text)?;
    let at = Coordinate::new(caps[1].parse().ok()?, caps[2].parse().ok()?);
    at.is_valid().then_some(at)
}

pub struct GeostampApp {
    pub session: Session,
    pub settings: Settings,
    pub scan: ScanOptions,
    pub map: MapView,
    pub writer: BatchWriter,
    pub locator: Locator,
    pub thumbnails: Thumbnails,
    pub status: String,
    pub notice: Option<String>,
    pub goto_text: String,
}

impl GeostampApp {
    pub fn new(
        ctx: &egui::Context,
        settings: Settings,
        scan: ScanOptions,
        metadata: Arc<dyn GeoMetadata>,
        initial: Vec<PathBuf>,
        parallel: usize,
    ) -> Self {
        let map = MapView::new(settings.home, settings.home_zoom).with_tiles(ctx);
        let mut app = Self {
            session: Session::new(),
            map,
            writer: BatchWriter::new(metadata.clone()),
            locator: Locator::new(metadata),
            thumbnails: Thumbnails::new(parallel),
            settings,
            scan,
            status: String::from("Add images, then click the map to choose a position"),
            notice: None,
            goto_text: String::new(),
        };
        app.add_files(initial);
        app
    }

    fn add_files(&mut self, files: Vec<PathBuf>) {
        if files.is_empty() {
            return;
        }
        let change = self.session.add_paths(files.iter().map(|p| path_id(p)));
        let added = match change {
            CatalogChange::Grew { added } => added,
            _ => 0,
        };
        tracing::info!("added {added} of {} images", files.len());
        self.status = format!(
            "Added {added} images ({} skipped as duplicates)",
            files.len() - added
        );
    }

    fn add_paths(&mut self, inputs: Vec<PathBuf>) {
        match expand_paths(&inputs, &self.scan) {
            Ok(files) => self.add_files(files),
            Err(err) => {
                tracing::error!("{err:#}");
                self.status = format!("{err:#}");
            }
        }
    }

    fn pick_files(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Add images")
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .pick_files();
        if let Some(files) = picked {
            self.add_paths(files);
        }
    }

    fn catalog_changed(&mut self, change: CatalogChange) {
        if change.shrinks() {
            self.thumbnails.retain(self.session.catalog());
        }
    }

    fn remove(&mut self, ids: HashSet<String>) {
        let change = self.session.remove(&ids);
        self.catalog_changed(change);
    }

    fn remove_selected(&mut self) {
        let change = self.session.remove_selected();
        self.catalog_changed(change);
    }

    fn clear(&mut self) {
        let change = self.session.clear();
        self.catalog_changed(change);
    }

    fn submit(&mut self) {
        if let Err(err) = self.writer.submit(&self.session) {
            tracing::error!("{err:#}");
            self.notice = Some(format!("Write failed: {err:#}"));
            return;
        }
        self.status = format!("Writing {} images...", self.writer.pending());
    }

    fn map_clicked(&mut self, at: Coordinate) {
        self.session.picker.map_clicked(&mut self.map, at);
        tracing::info!("target position {at}");
        self.status = format!("Target: {at}");
    }

    /// Re-centers on home and drops every marker.
    fn reset_map(&mut self) {
        self.map.reset(self.settings.home, self.settings.home_zoom);
        self.session.picker.reset();
        self.status = "Map reset".into();
    }

    fn goto(&mut self) {
        match parse_coordinate(&self.goto_text) {
            Some(at) => self.map.center_on(at, self.settings.locate_zoom),
            None => self.status = format!("Not a coordinate: {:?}", self.goto_text),
        }
    }

    fn poll_workers(&mut self, ctx: &egui::Context) {
        if self.thumbnails.update(ctx) {
            ctx.request_repaint();
        }

        for located in self.locator.update() {
            match located.result {
                Ok(Some(at)) => {
                    self.session.picker.show_located(&mut self.map, at);
                    self.map.center_on(at, self.settings.locate_zoom);
                    self.status = format!("{} is at {at}", located.path);
                }
                Ok(None) => {
                    tracing::info!("{} has no stored position", located.path);
                    self.status = format!("{} has no stored position", located.path);
                }
                Err(err) => tracing::error!("reading position of {} failed: {err:#}", located.path),
            }
        }

        match self.writer.poll(&mut self.session) {
            Some(BatchEvent::Finished(outcome)) => self.status = outcome.message(),
            Some(BatchEvent::Failed(message)) => {
                self.status = "Write failed".into();
                self.notice = Some(format!("Write failed: {message}"));
            }
            None => {}
        }

        if self.writer.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }

    fn handle_keyboard(ctx: &egui::Context) -> KeyboardState {
        ctx.input(|input| KeyboardState {
            toggle_all: input.modifiers.command && input.key_pressed(egui::Key::A),
            remove_selected: input.key_pressed(egui::Key::Delete),
            dismiss: input.key_pressed(egui::Key::Escape),
        })
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.add_paths(dropped);
        }
    }

    fn show_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("➕ Add images").clicked() {
                self.pick_files();
            }
            if ui
                .add_enabled(!self.session.catalog().is_empty(), egui::Button::new("Clear all"))
                .clicked()
            {
                self.clear();
            }
        });
        ui.separator();

        let total = self.session.catalog().len();
        let selected = self.session.selection().len();
        if total > 0 {
            ui.horizontal(|ui| {
                let mut all = selected == total;
                if ui
                    .checkbox(&mut all, format!("Select all ({selected}/{total})"))
                    .changed()
                {
                    self.session.toggle_all();
                }
                if selected > 0 {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Remove selected").clicked() {
                            self.remove_selected();
                        }
                    });
                }
            });
        }

        let write_height = 40.0;
        let list_height = (ui.available_height() - write_height - 12.0).max(0.0);
        ui.allocate_ui(egui::vec2(ui.available_width(), list_height), |ui| {
            if total == 0 {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No images yet. Add or drop files here.").weak());
                });
                return;
            }
            match list_view::show(ui, &mut self.session, &mut self.thumbnails) {
                Some(RowAction::Toggle(id)) => self.session.toggle(&id),
                Some(RowAction::Remove(id)) => self.remove(HashSet::from([id])),
                Some(RowAction::Locate(id)) => self.locator.locate(&id),
                Some(RowAction::Preview(id)) => self.thumbnails.open_preview(&id),
                None => {}
            }
        });

        ui.separator();
        let label = if self.writer.is_busy() {
            format!("Writing {}...", self.writer.pending())
        } else if selected > 0 {
            format!("Write coordinates ({selected})")
        } else {
            "Write coordinates".to_string()
        };
        let enabled = self.writer.can_submit(&self.session);
        let button = egui::Button::new(RichText::new(label).strong())
            .min_size(egui::vec2(ui.available_width(), write_height - 8.0));
        if ui.add_enabled(enabled, button).clicked() {
            self.submit();
        }
    }

    fn show_map(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.goto_text)
                    .hint_text("Go to lng, lat")
                    .desired_width(220.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Go").clicked() || submitted {
                self.goto();
            }
            ui.separator();
            if ui.button("+").clicked() {
                self.map.zoom_by(1.0);
            }
            if ui.button("−").clicked() {
                self.map.zoom_by(-1.0);
            }
            if ui.button("Reset map").clicked() {
                self.reset_map();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                match self.session.picker.coordinate() {
                    Some(at) => ui.label(RichText::new(format!("Target {at}")).monospace()),
                    None => ui.label(RichText::new("Click the map to choose a position").weak()),
                };
            });
        });
        if let Some(at) = self.map.show(ui) {
            self.map_clicked(at);
        }
    }

    fn show_result_dialog(&mut self, ctx: &egui::Context) {
        let Some(outcome) = self.session.presenter.outcome() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Write result")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(outcome.icon()).size(40.0).color(outcome.color()));
                    ui.add_space(8.0);
                    ui.label(outcome.message());
                    ui.add_space(12.0);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.session.presenter.dismiss();
        }
    }

    /// Enlarged image; any click on it closes the window.
    fn show_preview(&mut self, ctx: &egui::Context) {
        let Some(state) = self.thumbnails.preview() else {
            return;
        };
        let title = match &state {
            PreviewState::Loading(path)
            | PreviewState::Ready(path, _)
            | PreviewState::Failed(path) => ImageEntry::new(*path).file_name().to_string(),
        };
        let max = ctx.viewport_rect().size() * 0.85;
        let mut open = true;
        let mut clicked = false;
        egui::Window::new(title)
            .id(egui::Id::new("image-preview"))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| match state {
                PreviewState::Ready(_, texture) => {
                    let response = ui.add(
                        egui::Image::from_texture(texture)
                            .max_size(max)
                            .sense(egui::Sense::click()),
                    );
                    clicked = response.clicked();
                }
                PreviewState::Loading(_) => {
                    ui.add_sized([240.0, 160.0], egui::Spinner::new());
                }
                PreviewState::Failed(_) => {
                    let label = egui::Label::new("This image cannot be displayed")
                        .sense(egui::Sense::click());
                    clicked = ui.add(label).clicked();
                }
            });
        if !open || clicked {
            self.thumbnails.close_preview();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(message).color(Color32::from_rgb(239, 68, 68)));
            });
        if !open {
            self.notice = None;
        }
    }
}

impl App for GeostampApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_workers(ctx);
        self.handle_dropped_files(ctx);

        let keys = Self::handle_keyboard(ctx);
        if keys.dismiss {
            self.session.presenter.dismiss();
            self.thumbnails.close_preview();
            self.notice = None;
        }
        if keys.toggle_all && !ctx.wants_keyboard_input() {
            self.session.toggle_all();
        }
        if keys.remove_selected && !ctx.wants_keyboard_input() {
            self.remove_selected();
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(RichText::new(&self.status).monospace());
        });

        egui::SidePanel::left("images")
            .resizable(true)
            .default_width(380.0)
            .min_width(280.0)
            .show(ctx, |ui| self.show_sidebar(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.show_map(ui));

        self.show_preview(ctx);
        self.show_result_dialog(ctx);
        self.show_notice(ctx);
    }
}

