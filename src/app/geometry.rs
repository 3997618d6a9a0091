use eframe::egui;

use crate::bubble::ResizeDirection;

/// Largest rect of the given aspect (width / height) centered in `avail`.
pub(super) fn fit_aspect(avail: egui::Rect, aspect: f32) -> egui::Rect {
    if avail.width() <= f32::EPSILON || avail.height() <= f32::EPSILON || aspect <= f32::EPSILON {
        return egui::Rect::from_center_size(avail.center(), egui::Vec2::ZERO);
    }
    let size = if avail.width() / avail.height() > aspect {
        egui::vec2(avail.height() * aspect, avail.height())
    } else {
        egui::vec2(avail.width(), avail.width() / aspect)
    };
    egui::Rect::from_center_size(avail.center(), size)
}

pub(super) fn resize_handle_rect(
    bubble: egui::Rect,
    direction: ResizeDirection,
    handle_size: f32,
) -> egui::Rect {
    let center = bubble.center() + direction.unit_offset() * bubble.size() * 0.5;
    egui::Rect::from_center_size(center, egui::vec2(handle_size, handle_size))
}

pub(super) fn resize_cursor(direction: ResizeDirection) -> egui::CursorIcon {
    match direction {
        ResizeDirection::Top | ResizeDirection::Bottom => egui::CursorIcon::ResizeVertical,
        ResizeDirection::Left | ResizeDirection::Right => egui::CursorIcon::ResizeHorizontal,
        ResizeDirection::TopRight | ResizeDirection::BottomLeft => egui::CursorIcon::ResizeNeSw,
        ResizeDirection::TopLeft | ResizeDirection::BottomRight => egui::CursorIcon::ResizeNwSe,
    }
}

/// Closed outline of a rounded rect, clockwise from the top edge.
pub(super) fn rounded_rect_points(rect: egui::Rect, radius: f32) -> Vec<egui::Pos2> {
    let r = radius.min(rect.width() * 0.5).min(rect.height() * 0.5).max(0.0);
    if r <= f32::EPSILON {
        return vec![
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
    }
    let steps = 8;
    let corners = [
        (egui::pos2(rect.right() - r, rect.top() + r), -90.0_f32),
        (egui::pos2(rect.right() - r, rect.bottom() - r), 0.0),
        (egui::pos2(rect.left() + r, rect.bottom() - r), 90.0),
        (egui::pos2(rect.left() + r, rect.top() + r), 180.0),
    ];
    let mut points = Vec::with_capacity(corners.len() * (steps + 1) + 1);
    for (center, start_deg) in corners {
        for i in 0..=steps {
            let t = (start_deg + 90.0 * (i as f32) / (steps as f32)).to_radians();
            points.push(center + egui::vec2(t.cos(), t.sin()) * r);
        }
    }
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_aspect_tall_in_wide() {
        let avail = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1000.0, 800.0));
        let r = fit_aspect(avail, 9.0 / 16.0);
        assert!((r.height() - 800.0).abs() < 1e-3);
        assert!((r.width() - 450.0).abs() < 1e-3);
        assert!((r.center().x - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_aspect_wide_in_tall() {
        let avail = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 900.0));
        let r = fit_aspect(avail, 2.0);
        assert!((r.width() - 400.0).abs() < 1e-3);
        assert!((r.height() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_handles_sit_on_edges() {
        let bubble = egui::Rect::from_min_size(egui::pos2(100.0, 100.0), egui::vec2(200.0, 80.0));
        let r = resize_handle_rect(bubble, ResizeDirection::BottomRight, 10.0);
        assert_eq!(r.center(), egui::pos2(300.0, 180.0));
        let r = resize_handle_rect(bubble, ResizeDirection::Top, 10.0);
        assert_eq!(r.center(), egui::pos2(200.0, 100.0));
    }

    #[test]
    fn test_rounded_rect_points_closed_and_bounded() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 50.0));
        let pts = rounded_rect_points(rect, 16.0);
        assert_eq!(pts.first(), pts.last());
        for p in &pts {
            assert!(rect.expand(1e-3).contains(*p));
        }
    }
}
