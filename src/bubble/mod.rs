//! Pointer-driven bubble geometry.
//!
//! Stored geometry is in percent of the container; interaction math runs in
//! screen pixels against the container rect measured at each call, then
//! converts back.

use eframe::egui;
use tracing::debug;

use crate::model::{self, BubbleGeometry};

mod metrics;
mod tail;
#[cfg(test)]
mod tests;

pub use metrics::{ContainerMetrics, ContainerRect};
pub use tail::{TailPolygon, compute_tail_path};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeDirection {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::TopLeft,
        ResizeDirection::Top,
        ResizeDirection::TopRight,
        ResizeDirection::Left,
        ResizeDirection::Right,
        ResizeDirection::BottomLeft,
        ResizeDirection::Bottom,
        ResizeDirection::BottomRight,
    ];

    pub fn touches_top(self) -> bool {
        matches!(
            self,
            ResizeDirection::TopLeft | ResizeDirection::Top | ResizeDirection::TopRight
        )
    }

    pub fn touches_bottom(self) -> bool {
        matches!(
            self,
            ResizeDirection::BottomLeft | ResizeDirection::Bottom | ResizeDirection::BottomRight
        )
    }

    pub fn touches_left(self) -> bool {
        matches!(
            self,
            ResizeDirection::TopLeft | ResizeDirection::Left | ResizeDirection::BottomLeft
        )
    }

    pub fn touches_right(self) -> bool {
        matches!(
            self,
            ResizeDirection::TopRight | ResizeDirection::Right | ResizeDirection::BottomRight
        )
    }

    /// Handle offset from the bubble center in half-extents (-1, 0 or 1 per axis).
    pub fn unit_offset(self) -> egui::Vec2 {
        let x = if self.touches_left() {
            -1.0
        } else if self.touches_right() {
            1.0
        } else {
            0.0
        };
        let y = if self.touches_top() {
            -1.0
        } else if self.touches_bottom() {
            1.0
        } else {
            0.0
        };
        egui::vec2(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    Drag,
    TailDrag,
    Resize(ResizeDirection),
}

/// Pixel floors applied while resizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineLimits {
    pub min_width_px: f32,
    pub min_height_px: f32,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            min_width_px: 50.0,
            min_height_px: 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Grab {
    Drag {
        offset: egui::Vec2,
    },
    Tail,
    Resize {
        direction: ResizeDirection,
        start_pointer: egui::Pos2,
        start_min_local: egui::Pos2,
        start_size_px: egui::Vec2,
    },
}

#[derive(Clone, Debug)]
struct ActiveInteraction {
    bubble_id: u64,
    grab: Grab,
    original: BubbleGeometry,
    live: BubbleGeometry,
    tail: Option<TailPolygon>,
}

/// Final geometry handed back to the owning panel when the pointer is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Commit {
    pub bubble_id: u64,
    pub geometry: BubbleGeometry,
}

/// Owns the single live interaction, if any.
#[derive(Debug, Default)]
pub struct BubbleEngine {
    limits: EngineLimits,
    active: Option<ActiveInteraction>,
}

impl BubbleEngine {
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            limits,
            active: None,
        }
    }

    pub fn set_limits(&mut self, limits: EngineLimits) {
        self.limits = limits;
    }

    pub fn is_interacting(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_bubble(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.bubble_id)
    }

    /// Live geometry of `bubble_id` if it is the one being manipulated.
    pub fn live_geometry(&self, bubble_id: u64) -> Option<BubbleGeometry> {
        self.active
            .as_ref()
            .filter(|a| a.bubble_id == bubble_id)
            .map(|a| a.live)
    }

    /// Tail of the bubble under interaction, recomputed on every update.
    pub fn live_tail(&self, bubble_id: u64) -> Option<TailPolygon> {
        self.active
            .as_ref()
            .filter(|a| a.bubble_id == bubble_id)
            .and_then(|a| a.tail)
    }

    pub fn begin(
        &mut self,
        bubble_id: u64,
        kind: InteractionKind,
        pointer: egui::Pos2,
        geometry: BubbleGeometry,
        metrics: &impl ContainerMetrics,
    ) {
        let container = metrics.container_rect();
        if let Some(prev) = self.active.take() {
            debug!(bubble = prev.bubble_id, "dropping unfinished interaction");
        }
        let min_screen = container.percent_to_screen(geometry.position);
        let grab = match kind {
            InteractionKind::Drag => Grab::Drag {
                offset: pointer - min_screen,
            },
            InteractionKind::TailDrag => Grab::Tail,
            InteractionKind::Resize(direction) => Grab::Resize {
                direction,
                start_pointer: pointer,
                start_min_local: container.percent_to_local(geometry.position),
                start_size_px: container.size_to_px(geometry.size),
            },
        };
        debug!(bubble = bubble_id, ?kind, "interaction started");
        self.active = Some(ActiveInteraction {
            bubble_id,
            grab,
            original: geometry,
            live: geometry,
            tail: compute_tail_path(geometry.position, geometry.size, geometry.tail_tip, container),
        });
    }

    /// Applies a pointer move to the live geometry. No-op without an active
    /// interaction or with a degenerate container.
    pub fn update(
        &mut self,
        pointer: egui::Pos2,
        metrics: &impl ContainerMetrics,
    ) -> Option<BubbleGeometry> {
        let container = metrics.container_rect();
        let limits = self.limits;
        let active = self.active.as_mut()?;
        if container.is_degenerate() {
            return Some(active.live);
        }

        let mut g = active.live;
        match active.grab {
            Grab::Drag { offset } => {
                g.position = drag_position(pointer - offset, g.size, container);
            }
            Grab::Tail => {
                let p = container.screen_to_percent(pointer);
                g.tail_tip = model::Point::new(p.x.clamp(0.0, 100.0), p.y.clamp(0.0, 100.0));
            }
            Grab::Resize {
                direction,
                start_pointer,
                start_min_local,
                start_size_px,
            } => {
                let (min, size) = resize_rect(
                    direction,
                    pointer - start_pointer,
                    start_min_local,
                    start_size_px,
                    limits,
                    container,
                );
                g.position = container.local_to_percent(min);
                g.size = container.px_to_size(size);
            }
        }

        active.live = g;
        active.tail = compute_tail_path(g.position, g.size, g.tail_tip, container);
        Some(g)
    }

    /// Releases the pointer. Always commits, even if nothing moved.
    pub fn end(&mut self) -> Option<Commit> {
        let active = self.active.take()?;
        debug!(bubble = active.bubble_id, "interaction committed");
        Some(Commit {
            bubble_id: active.bubble_id,
            geometry: active.live,
        })
    }

    /// Abandons the interaction and hands back the geometry captured at begin.
    pub fn cancel(&mut self) -> Option<Commit> {
        let active = self.active.take()?;
        debug!(bubble = active.bubble_id, "interaction cancelled");
        Some(Commit {
            bubble_id: active.bubble_id,
            geometry: active.original,
        })
    }
}

fn drag_position(
    min_screen: egui::Pos2,
    size: model::Size,
    container: ContainerRect,
) -> model::Point {
    let p = container.screen_to_percent(min_screen);
    let max_x = (100.0 - size.width).max(0.0);
    let max_y = (100.0 - size.height).max(0.0);
    model::Point::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
}

/// Resize in container-local pixels. Returns the new top-left and size.
fn resize_rect(
    direction: ResizeDirection,
    delta: egui::Vec2,
    start_min: egui::Pos2,
    start_size: egui::Vec2,
    limits: EngineLimits,
    container: ContainerRect,
) -> (egui::Pos2, egui::Vec2) {
    let mut min = start_min;
    let mut size = start_size;

    if direction.touches_bottom() {
        size.y = (start_size.y + delta.y).max(limits.min_height_px);
    }
    if direction.touches_right() {
        size.x = (start_size.x + delta.x).max(limits.min_width_px);
    }
    if direction.touches_top() {
        let h = (start_size.y - delta.y).max(limits.min_height_px);
        min.y = start_min.y + (start_size.y - h);
        size.y = h;
    }
    if direction.touches_left() {
        let w = (start_size.x - delta.x).max(limits.min_width_px);
        min.x = start_min.x + (start_size.x - w);
        size.x = w;
    }

    // Clip to the container; the edge that stayed put stays put.
    if min.x < 0.0 {
        size.x += min.x;
        min.x = 0.0;
    }
    if min.y < 0.0 {
        size.y += min.y;
        min.y = 0.0;
    }
    if min.x + size.x > container.width {
        size.x = container.width - min.x;
    }
    if min.y + size.y > container.height {
        size.y = container.height - min.y;
    }

    (min, size)
}
