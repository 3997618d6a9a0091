use eframe::egui;

use crate::model;

/// Pixel bounding box of the panel image at the moment it was measured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_rect(rect: egui::Rect) -> Self {
        Self::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    pub fn is_degenerate(self) -> bool {
        self.width <= f32::EPSILON || self.height <= f32::EPSILON
    }

    pub fn origin(self) -> egui::Pos2 {
        egui::pos2(self.left, self.top)
    }

    /// Percent point to pixels relative to the container's top-left.
    pub fn percent_to_local(self, p: model::Point) -> egui::Pos2 {
        egui::pos2(p.x / 100.0 * self.width, p.y / 100.0 * self.height)
    }

    /// Percent point to absolute screen pixels.
    pub fn percent_to_screen(self, p: model::Point) -> egui::Pos2 {
        self.origin() + self.percent_to_local(p).to_vec2()
    }

    pub fn size_to_px(self, s: model::Size) -> egui::Vec2 {
        egui::vec2(s.width / 100.0 * self.width, s.height / 100.0 * self.height)
    }

    pub fn local_to_percent(self, p: egui::Pos2) -> model::Point {
        model::Point::new(p.x / self.width * 100.0, p.y / self.height * 100.0)
    }

    pub fn screen_to_percent(self, p: egui::Pos2) -> model::Point {
        self.local_to_percent(p - self.origin().to_vec2())
    }

    pub fn px_to_size(self, v: egui::Vec2) -> model::Size {
        model::Size::new(v.x / self.width * 100.0, v.y / self.height * 100.0)
    }

    /// Bubble body in absolute screen pixels.
    pub fn bubble_screen_rect(self, position: model::Point, size: model::Size) -> egui::Rect {
        egui::Rect::from_min_size(self.percent_to_screen(position), self.size_to_px(size))
    }
}

/// Source of the live container measurement.
///
/// The host measures the painted image rect every frame; tests hand the
/// engine a fixed [`ContainerRect`].
pub trait ContainerMetrics {
    fn container_rect(&self) -> ContainerRect;
}

impl ContainerMetrics for ContainerRect {
    fn container_rect(&self) -> ContainerRect {
        *self
    }
}

impl ContainerMetrics for egui::Rect {
    fn container_rect(&self) -> ContainerRect {
        ContainerRect::from_rect(*self)
    }
}
