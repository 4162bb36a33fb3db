use eframe::egui::{self, Color32, Rect, RichText, UiBuilder};

use crate::{
    app::thumbnails::Thumbnails,
    catalog::{ImageEntry, WriteStatus},
    session::Session,
};

const THUMB_EDGE: f32 = 56.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Toggle(String),
    Remove(String),
    Locate(String),
    Preview(String),
}

/// Draws the rows inside the current render window only. The spacer keeps
/// the scrollbar sized for the whole catalog.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut Session,
    thumbnails: &mut Thumbnails,
) -> Option<RowAction> {
    let mut action = None;
    egui::ScrollArea::vertical()
        .id_salt("image-list")
        .auto_shrink([false, false])
        .show_viewport(ui, |ui, viewport| {
            session.viewport.observe(viewport.min.y, viewport.height());
            ui.set_height(session.viewport.content_height());

            let window = session.viewport.window();
            let item_height = session.viewport.item_height();
            let origin = ui.max_rect().top();
            let x_range = ui.max_rect().x_range();
            ui.skip_ahead_auto_ids(window.render_start);

            for index in window.rows() {
                let Some(entry) = session.catalog().get(index) else {
                    break;
                };
                let top = origin + session.viewport.row_top(index);
                let rect = Rect::from_x_y_ranges(x_range, top..=top + item_height);
                let selected = session.selection().contains(&entry.id);
                let row_action = ui
                    .scope_builder(UiBuilder::new().max_rect(rect).id_salt(&entry.id), |ui| {
                        draw_row(ui, rect, entry, selected, thumbnails)
                    })
                    .inner;
                if row_action.is_some() {
                    action = row_action;
                }
            }
        });
    action
}

fn draw_row(
    ui: &mut egui::Ui,
    rect: Rect,
    entry: &ImageEntry,
    selected: bool,
    thumbnails: &mut Thumbnails,
) -> Option<RowAction> {
    let fill = match (entry.status, selected) {
        (WriteStatus::Failed, _) => Color32::from_rgba_unmultiplied(239, 68, 68, 40),
        (_, true) => ui.visuals().selection.bg_fill.gamma_multiply(0.35),
        _ => Color32::TRANSPARENT,
    };
    ui.painter().rect_filled(rect.shrink2(egui::vec2(2.0, 1.0)), 4.0, fill);

    let mut action = None;
    ui.horizontal_centered(|ui| {
        ui.add_space(6.0);
        let mut checked = selected;
        if ui.checkbox(&mut checked, "").changed() {
            action = Some(RowAction::Toggle(entry.id.clone()));
        }

        let thumb = if let Some(texture) = thumbnails.get(&entry.id) {
            ui.add(
                egui::Image::from_texture(texture)
                    .max_size(egui::vec2(THUMB_EDGE, THUMB_EDGE))
                    .sense(egui::Sense::click()),
            )
        } else if thumbnails.is_failed(&entry.id) {
            let placeholder = RichText::new("⚠").size(24.0).weak();
            ui.add_sized(
                [THUMB_EDGE, THUMB_EDGE],
                egui::Label::new(placeholder).sense(egui::Sense::click()),
            )
        } else {
            thumbnails.request(&entry.id);
            ui.add_sized([THUMB_EDGE, THUMB_EDGE], egui::Spinner::new())
        };
        if thumb.on_hover_text("Preview").clicked() {
            action = Some(RowAction::Preview(entry.id.clone()));
        }

        ui.vertical(|ui| {
            ui.add_space(10.0);
            let title = egui::Label::new(RichText::new(entry.file_name()).strong())
                .sense(egui::Sense::click());
            let title = ui
                .add(title)
                .on_hover_text("Show stored position on map");
            if title.clicked() {
                action = Some(RowAction::Locate(entry.id.clone()));
            }
            ui.label(RichText::new(entry.short_path()).small().weak());
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(6.0);
            if ui.small_button("✖").on_hover_text("Remove").clicked() {
                action = Some(RowAction::Remove(entry.id.clone()));
            }
            match entry.status {
                WriteStatus::Succeeded => {
                    ui.label(RichText::new("✔").color(Color32::from_rgb(34, 197, 94)));
                }
                WriteStatus::Failed => {
                    ui.label(RichText::new("✖ failed").color(Color32::from_rgb(239, 68, 68)));
                }
                WriteStatus::Unset => {}
            }
        });
    });
    action
}
