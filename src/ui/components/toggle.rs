// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Labeled on/off switch used for the host's boolean input parameters.

use eframe::egui;

/// Draw a compact switch followed by `label`. Clicking either toggles `on`.
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool, label: &str) -> egui::Response {
    let spacing = ui.style().spacing.interact_size;
    let switch_size = egui::vec2(spacing.x.max(32.0), spacing.y.max(18.0));
    let galley = ui.painter().layout_no_wrap(
        label.to_owned(),
        egui::TextStyle::Button.resolve(ui.style()),
        ui.visuals().text_color(),
    );
    let gap = ui.style().spacing.item_spacing.x;
    let desired_size = egui::vec2(
        switch_size.x + gap + galley.size().x,
        switch_size.y.max(galley.size().y),
    );

    let (rect, mut response) = ui.allocate_exact_size(desired_size, egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    if ui.is_rect_visible(rect) {
        let switch_rect = egui::Rect::from_min_size(
            egui::pos2(rect.left(), rect.center().y - switch_size.y / 2.0),
            switch_size,
        );
        let how_on = ui.ctx().animate_bool(response.id, *on);
        let visuals = ui.style().interact_selectable(&response, *on);
        let rail_off = ui.visuals().widgets.inactive.bg_fill;
        let fill = lerp_color(rail_off, visuals.bg_fill, how_on);

        ui.painter().rect_filled(
            switch_rect.expand(visuals.expansion),
            switch_rect.height() * 0.45,
            fill,
        );
        let knob_x =
            egui::lerp((switch_rect.left() + 8.0)..=(switch_rect.right() - 8.0), how_on);
        ui.painter().circle(
            egui::pos2(knob_x, switch_rect.center().y),
            6.5,
            visuals.bg_fill,
            visuals.fg_stroke,
        );

        let text_pos = egui::pos2(
            switch_rect.right() + gap,
            rect.center().y - galley.size().y / 2.0,
        );
        ui.painter()
            .galley(text_pos, galley, ui.visuals().text_color());
    }

    response
}

fn lerp_color(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let channel = |a: u8, b: u8| egui::lerp(a as f32..=b as f32, t) as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
        channel(from.a(), to.a()),
    )
}

#[cfg(test)]
mod tests {
    use super::lerp_color;
    use eframe::egui::Color32;

    #[test]
    fn lerp_color_hits_endpoints() {
        let off = Color32::from_rgb(10, 20, 30);
        let on = Color32::from_rgb(200, 100, 0);

        assert_eq!(lerp_color(off, on, 0.0), off);
        assert_eq!(lerp_color(off, on, 1.0), on);
    }
}
