use crate::bubble::TailPolygon;
use crate::model;
use eframe::egui;

use super::geometry::rounded_rect_points;

pub(super) const BUBBLE_FILL: egui::Color32 = egui::Color32::from_rgb(243, 244, 246);
pub(super) const BUBBLE_RADIUS: f32 = 16.0;
pub(super) const BUBBLE_PADDING: f32 = 12.0;
const OUTLINE: egui::Stroke = egui::Stroke {
    width: 2.0,
    color: egui::Color32::BLACK,
};
const HANDLE_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(200, 50, 130, 210);

pub(super) fn draw_panel_background(
    painter: &egui::Painter,
    container: egui::Rect,
    texture: Option<&egui::TextureHandle>,
) {
    match texture {
        Some(texture) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), container, uv, egui::Color32::WHITE);
        }
        None => {
            painter.rect_filled(container, 0.0, egui::Color32::from_rgb(17, 24, 39));
            painter.text(
                container.center(),
                egui::Align2::CENTER_CENTER,
                "No panel image",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(140),
            );
        }
    }
}

/// Draws the tail first so the body covers its base.
pub(super) fn draw_bubble(
    painter: &egui::Painter,
    body: egui::Rect,
    tail: Option<&TailPolygon>,
    kind: model::BubbleKind,
) {
    if let Some(tail) = tail {
        let points = tail.clockwise_points().to_vec();
        if kind.is_dashed() {
            painter.add(egui::Shape::convex_polygon(
                points.clone(),
                BUBBLE_FILL,
                egui::Stroke::NONE,
            ));
            draw_dashed_polyline(painter, &points, OUTLINE, 4.0, 4.0);
        } else {
            painter.add(egui::Shape::convex_polygon(points, BUBBLE_FILL, OUTLINE));
        }
    }

    painter.rect_filled(body, BUBBLE_RADIUS, BUBBLE_FILL);
    if kind.is_dashed() {
        let outline = rounded_rect_points(body, BUBBLE_RADIUS);
        draw_dashed_polyline(painter, &outline, OUTLINE, 4.0, 4.0);
    } else {
        painter.rect_stroke(body, BUBBLE_RADIUS, OUTLINE, egui::StrokeKind::Middle);
    }
}

pub(super) fn draw_bubble_text(
    painter: &egui::Painter,
    body: egui::Rect,
    text: &str,
    font_id: egui::FontId,
) {
    let inner = body.shrink(BUBBLE_PADDING);
    if inner.width() <= 0.0 || inner.height() <= 0.0 {
        return;
    }
    let shown = if text.is_empty() { " " } else { text };
    let galley = painter.layout(
        shown.to_string(),
        font_id,
        egui::Color32::BLACK,
        inner.width(),
    );
    painter
        .with_clip_rect(inner)
        .galley(inner.left_top(), galley, egui::Color32::BLACK);
}

pub(super) fn draw_resize_handle(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 2.0, HANDLE_FILL);
    painter.rect_stroke(
        rect,
        2.0,
        egui::Stroke::new(1.0, egui::Color32::WHITE),
        egui::StrokeKind::Middle,
    );
}

pub(super) fn draw_tail_handle(painter: &egui::Painter, center: egui::Pos2, radius: f32) {
    painter.circle_filled(center, radius, HANDLE_FILL);
    painter.circle_stroke(center, radius, egui::Stroke::new(2.0, egui::Color32::WHITE));
}

/// Dashes along the whole polyline; the on/off phase carries across vertices
/// so short arc segments still show a regular pattern.
fn draw_dashed_polyline(
    painter: &egui::Painter,
    points: &[egui::Pos2],
    stroke: egui::Stroke,
    dash: f32,
    gap: f32,
) {
    let period = dash + gap;
    if period <= f32::EPSILON {
        return;
    }
    let mut travelled = 0.0_f32;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg = b - a;
        let len = seg.length();
        if len <= f32::EPSILON {
            continue;
        }
        let dir = seg / len;
        let mut t = 0.0;
        while t < len {
            let phase = (travelled + t) % period;
            let (on, left) = if phase < dash {
                (true, dash - phase)
            } else {
                (false, period - phase)
            };
            let t_next = (t + left.max(1e-3)).min(len);
            if on {
                painter.line_segment([a + dir * t, a + dir * t_next], stroke);
            }
            t = t_next;
        }
        travelled += len;
    }
}
