use egui::Context;

use crate::view::frame::{Frame, OverlayText};
use crate::view::render::OverlayOutput;

/// Lay out the frame's overlay text and tessellate it for the renderer.
pub fn build_overlay(egui_ctx: &Context, mut raw_input: egui::RawInput, frame: &Frame, pixels_per_point: f32) -> OverlayOutput {
    raw_input.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(frame.size.x as f32 / pixels_per_point, frame.size.y as f32 / pixels_per_point),
    ));
    egui_ctx.set_pixels_per_point(pixels_per_point);

    let full_output = egui_ctx.run(raw_input, |ctx| {
        let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("instructions")));
        for text in &frame.overlay {
            draw_text(&painter, text, frame, pixels_per_point);
        }
    });

    let primitives = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
    OverlayOutput {
        primitives,
        textures_delta: full_output.textures_delta,
        pixels_per_point: full_output.pixels_per_point,
    }
}

fn draw_text(painter: &egui::Painter, text: &OverlayText, frame: &Frame, pixels_per_point: f32) {
    let (pos, size_px) = text.to_pixels(frame.overlay_aspect, frame.size);
    let [r, g, b, a] = text.color;
    painter.text(
        egui::pos2(pos.x / pixels_per_point, pos.y / pixels_per_point),
        egui::Align2::LEFT_BOTTOM,
        &text.text,
        egui::FontId::monospace(size_px / pixels_per_point),
        egui::Color32::from_rgba_unmultiplied(r, g, b, a),
    );
}
