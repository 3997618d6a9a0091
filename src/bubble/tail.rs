use eframe::egui;

use super::metrics::ContainerRect;
use crate::model;

pub const TAIL_BASE_MAX_PX: f32 = 20.0;
pub const TAIL_BASE_WIDTH_RATIO: f32 = 0.4;

/// Triangle joining a bubble edge to its tail tip, in pixels relative to the
/// container's top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TailPolygon {
    pub base_a: egui::Pos2,
    pub tip: egui::Pos2,
    pub base_b: egui::Pos2,
    /// Point on the bubble perimeter the base is centered on.
    pub anchor: egui::Pos2,
}

impl TailPolygon {
    pub fn translated(&self, offset: egui::Vec2) -> Self {
        Self {
            base_a: self.base_a + offset,
            tip: self.tip + offset,
            base_b: self.base_b + offset,
            anchor: self.anchor + offset,
        }
    }

    /// SVG path data with coordinates relative to `origin`.
    pub fn to_svg_path(&self, origin: egui::Pos2) -> String {
        let a = self.base_a - origin;
        let t = self.tip - origin;
        let b = self.base_b - origin;
        format!(
            "M {:.3} {:.3} L {:.3} {:.3} L {:.3} {:.3} Z",
            a.x, a.y, t.x, t.y, b.x, b.y
        )
    }

    /// The three corners in clockwise order on screen (y down), as egui's
    /// convex polygon feathering expects.
    pub fn clockwise_points(&self) -> [egui::Pos2; 3] {
        let ab = self.tip - self.base_a;
        let bc = self.base_b - self.tip;
        if ab.x * bc.y - ab.y * bc.x >= 0.0 {
            [self.base_a, self.tip, self.base_b]
        } else {
            [self.base_b, self.tip, self.base_a]
        }
    }
}

/// Returns `None` when no tail should be drawn: the container has no area or
/// the tip sits inside the bubble body.
pub fn compute_tail_path(
    position: model::Point,
    size: model::Size,
    tail_tip: model::Point,
    container: ContainerRect,
) -> Option<TailPolygon> {
    if container.is_degenerate() {
        return None;
    }

    let min = container.percent_to_local(position);
    let body = container.size_to_px(size);
    let tip = container.percent_to_local(tail_tip);

    let half_w = body.x * 0.5;
    let half_h = body.y * 0.5;
    let center = min + egui::vec2(half_w, half_h);
    let d = tip - center;

    if d.x.abs() < half_w && d.y.abs() < half_h {
        return None;
    }

    let scale_x = if d.x.abs() > f32::EPSILON {
        half_w / d.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if d.y.abs() > f32::EPSILON {
        half_h / d.y.abs()
    } else {
        f32::INFINITY
    };
    let scale = 1.0_f32.min(scale_x).min(scale_y);
    let anchor = center + d * scale;

    let len = d.length();
    let perp = if len > f32::EPSILON {
        egui::vec2(-d.y / len, d.x / len)
    } else {
        egui::vec2(1.0, 0.0)
    };
    let half_base = TAIL_BASE_MAX_PX.min(body.x * TAIL_BASE_WIDTH_RATIO) * 0.5;

    Some(TailPolygon {
        base_a: anchor + perp * half_base,
        tip,
        base_b: anchor - perp * half_base,
        anchor,
    })
}
