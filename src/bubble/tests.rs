use eframe::egui;

use super::*;
use crate::model::{BubbleGeometry, Point, Size};

const EPS: f32 = 1e-3;

fn geom(x: f32, y: f32, w: f32, h: f32) -> BubbleGeometry {
    BubbleGeometry {
        position: Point::new(x, y),
        size: Size::new(w, h),
        tail_tip: Point::new(50.0, 95.0),
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

/// Absolute pixel edges (left, top, right, bottom) of a geometry.
fn edges_px(g: BubbleGeometry, c: ContainerRect) -> (f32, f32, f32, f32) {
    let r = c.bubble_screen_rect(g.position, g.size);
    (r.left(), r.top(), r.right(), r.bottom())
}

#[test]
fn test_drag_scenario() {
    let container = ContainerRect::new(0.0, 0.0, 500.0, 800.0);
    let mut engine = BubbleEngine::default();
    let start = geom(5.0, 10.0, 30.0, 15.0);
    let grab = egui::pos2(40.0, 90.0);
    engine.begin(1, InteractionKind::Drag, grab, start, &container);
    assert!(engine.is_interacting());

    let g = engine
        .update(grab + egui::vec2(50.0, 20.0), &container)
        .unwrap();
    assert!(approx(g.position.x, 15.0), "x = {}", g.position.x);
    assert!(approx(g.position.y, 12.5), "y = {}", g.position.y);
    assert_eq!(g.size, start.size);

    let commit = engine.end().unwrap();
    assert_eq!(commit.bubble_id, 1);
    assert_eq!(commit.geometry, g);
    assert!(!engine.is_interacting());
}

#[test]
fn test_drag_respects_container_offset() {
    let container = ContainerRect::new(300.0, 120.0, 400.0, 400.0);
    let mut engine = BubbleEngine::default();
    let start = geom(10.0, 10.0, 20.0, 20.0);
    // Grab exactly at the bubble's top-left corner on screen.
    let grab = egui::pos2(340.0, 160.0);
    engine.begin(7, InteractionKind::Drag, grab, start, &container);
    let g = engine.update(egui::pos2(380.0, 200.0), &container).unwrap();
    assert!(approx(g.position.x, 20.0));
    assert!(approx(g.position.y, 20.0));
}

#[test]
fn test_drag_always_stays_inside() {
    let container = ContainerRect::new(10.0, 20.0, 640.0, 480.0);
    let start = geom(30.0, 40.0, 25.0, 18.0);
    let grab = container.percent_to_screen(Point::new(35.0, 45.0));
    for dx in (-2000..=2000).step_by(250) {
        for dy in (-2000..=2000).step_by(250) {
            let mut engine = BubbleEngine::default();
            engine.begin(1, InteractionKind::Drag, grab, start, &container);
            engine.update(grab + egui::vec2(dx as f32, dy as f32), &container);
            let g = engine.end().unwrap().geometry;
            assert!(g.position.x >= 0.0 && g.position.x <= 100.0 - g.size.width + EPS);
            assert!(g.position.y >= 0.0 && g.position.y <= 100.0 - g.size.height + EPS);
        }
    }
}

#[test]
fn test_drag_clamps_to_ceiling() {
    let container = ContainerRect::new(0.0, 0.0, 500.0, 800.0);
    let mut engine = BubbleEngine::default();
    let start = geom(5.0, 10.0, 30.0, 15.0);
    let grab = egui::pos2(40.0, 90.0);
    engine.begin(1, InteractionKind::Drag, grab, start, &container);
    let g = engine.update(egui::pos2(5000.0, 5000.0), &container).unwrap();
    assert!(approx(g.position.x, 70.0));
    assert!(approx(g.position.y, 85.0));
    let g = engine.update(egui::pos2(-5000.0, -5000.0), &container).unwrap();
    assert_eq!(g.position, Point::new(0.0, 0.0));
}

#[test]
fn test_tail_drag_clamps_each_axis() {
    let container = ContainerRect::new(0.0, 0.0, 200.0, 100.0);
    let mut engine = BubbleEngine::default();
    let start = geom(10.0, 10.0, 30.0, 30.0);
    engine.begin(2, InteractionKind::TailDrag, egui::pos2(100.0, 95.0), start, &container);

    let g = engine.update(egui::pos2(50.0, 50.0), &container).unwrap();
    assert!(approx(g.tail_tip.x, 25.0));
    assert!(approx(g.tail_tip.y, 50.0));

    let g = engine.update(egui::pos2(-30.0, 300.0), &container).unwrap();
    assert_eq!(g.tail_tip, Point::new(0.0, 100.0));
    assert_eq!(g.position, start.position);
    assert_eq!(g.size, start.size);
}

#[test]
fn test_resize_bottom_right_scenario() {
    let container = ContainerRect::new(0.0, 0.0, 800.0, 600.0);
    let start = geom(10.0, 10.0, 18.75, 20.0);
    let (_, _, right, bottom) = edges_px(start, container);
    assert!(approx(right - 80.0, 150.0));
    assert!(approx(bottom - 60.0, 120.0));

    let mut engine = BubbleEngine::default();
    let grab = egui::pos2(right, bottom);
    engine.begin(
        3,
        InteractionKind::Resize(ResizeDirection::BottomRight),
        grab,
        start,
        &container,
    );
    let g = engine
        .update(grab + egui::vec2(100.0, 40.0), &container)
        .unwrap();
    assert!(approx(g.size.width, 31.25), "w = {}", g.size.width);
    assert!(approx(g.size.height, 26.666_666), "h = {}", g.size.height);
    assert!(approx(g.position.x, 10.0));
    assert!(approx(g.position.y, 10.0));
}

#[test]
fn test_resize_never_below_minimum() {
    let container = ContainerRect::new(0.0, 0.0, 1000.0, 800.0);
    let limits = EngineLimits::default();
    let min_w = limits.min_width_px / container.width * 100.0;
    let min_h = limits.min_height_px / container.height * 100.0;
    let start = geom(30.0, 30.0, 20.0, 20.0);
    let deltas = [-3000.0, -400.0, -150.0, -10.0, 0.0, 10.0, 150.0, 400.0, 3000.0];

    for direction in ResizeDirection::ALL {
        for &dx in &deltas {
            for &dy in &deltas {
                let mut engine = BubbleEngine::new(limits);
                let grab = egui::pos2(500.0, 400.0);
                engine.begin(1, InteractionKind::Resize(direction), grab, start, &container);
                engine.update(grab + egui::vec2(dx, dy), &container);
                let g = engine.end().unwrap().geometry;
                assert!(
                    g.size.width >= min_w - EPS,
                    "{direction:?} ({dx},{dy}) width {}",
                    g.size.width
                );
                assert!(
                    g.size.height >= min_h - EPS,
                    "{direction:?} ({dx},{dy}) height {}",
                    g.size.height
                );
                assert!(g.position.x >= 0.0 && g.position.y >= 0.0);
                assert!(g.position.x + g.size.width <= 100.0 + EPS);
                assert!(g.position.y + g.size.height <= 100.0 + EPS);
            }
        }
    }
}

#[test]
fn test_resize_top_left_keeps_opposite_edges() {
    let container = ContainerRect::new(0.0, 0.0, 1000.0, 1000.0);
    let start = geom(40.0, 40.0, 20.0, 20.0);
    let (_, _, right0, bottom0) = edges_px(start, container);

    for delta in [
        egui::vec2(50.0, 30.0),
        egui::vec2(-120.0, -80.0),
        egui::vec2(500.0, 500.0),
        egui::vec2(-1000.0, -1000.0),
    ] {
        let mut engine = BubbleEngine::default();
        let grab = egui::pos2(400.0, 400.0);
        engine.begin(
            1,
            InteractionKind::Resize(ResizeDirection::TopLeft),
            grab,
            start,
            &container,
        );
        let g = engine.update(grab + delta, &container).unwrap();
        let (left, top, right, bottom) = edges_px(g, container);
        assert!(approx(right, right0), "{delta:?}: right {right}");
        assert!(approx(bottom, bottom0), "{delta:?}: bottom {bottom}");
        assert!(left >= 0.0 && top >= 0.0);
    }
}

#[test]
fn test_resize_top_moves_only_top_edge() {
    let container = ContainerRect::new(0.0, 0.0, 1000.0, 1000.0);
    let start = geom(40.0, 40.0, 20.0, 20.0);
    let (left0, top0, right0, bottom0) = edges_px(start, container);
    let mut engine = BubbleEngine::default();
    let grab = egui::pos2(500.0, 400.0);
    engine.begin(
        1,
        InteractionKind::Resize(ResizeDirection::Top),
        grab,
        start,
        &container,
    );
    let g = engine.update(grab + egui::vec2(77.0, 60.0), &container).unwrap();
    let (left, top, right, bottom) = edges_px(g, container);
    assert!(approx(left, left0));
    assert!(approx(right, right0));
    assert!(approx(bottom, bottom0));
    assert!(approx(top, top0 + 60.0));
}

#[test]
fn test_resize_left_floor_pins_right_edge() {
    let container = ContainerRect::new(0.0, 0.0, 1000.0, 1000.0);
    let start = geom(40.0, 40.0, 20.0, 20.0);
    let (_, _, right0, _) = edges_px(start, container);
    let mut engine = BubbleEngine::default();
    let grab = egui::pos2(400.0, 500.0);
    engine.begin(
        1,
        InteractionKind::Resize(ResizeDirection::Left),
        grab,
        start,
        &container,
    );
    let g = engine.update(grab + egui::vec2(900.0, 0.0), &container).unwrap();
    let (left, _, right, _) = edges_px(g, container);
    assert!(approx(right, right0));
    assert!(approx(right - left, 50.0));
}

#[test]
fn test_resize_clipped_by_container() {
    let container = ContainerRect::new(0.0, 0.0, 400.0, 400.0);
    let start = geom(50.0, 50.0, 25.0, 25.0);
    let mut engine = BubbleEngine::default();
    let grab = egui::pos2(300.0, 300.0);
    engine.begin(
        1,
        InteractionKind::Resize(ResizeDirection::BottomRight),
        grab,
        start,
        &container,
    );
    let g = engine.update(egui::pos2(900.0, 900.0), &container).unwrap();
    assert!(approx(g.size.width, 50.0));
    assert!(approx(g.size.height, 50.0));
}

#[test]
fn test_click_without_move_commits_unchanged() {
    let container = ContainerRect::new(0.0, 0.0, 300.0, 300.0);
    let start = geom(12.0, 34.0, 30.0, 15.0);
    let mut engine = BubbleEngine::default();
    engine.begin(9, InteractionKind::Drag, egui::pos2(50.0, 120.0), start, &container);
    let commit = engine.end().unwrap();
    assert_eq!(commit.geometry, start);

    let mut bubble = crate::model::Bubble::new_default(9);
    bubble.apply_geometry(commit.geometry);
    let snapshot = bubble.clone();
    assert!(!bubble.apply_geometry(commit.geometry));
    assert_eq!(bubble, snapshot);
}

#[test]
fn test_cancel_restores_original() {
    let container = ContainerRect::new(0.0, 0.0, 500.0, 500.0);
    let start = geom(10.0, 10.0, 30.0, 15.0);
    let mut engine = BubbleEngine::default();
    let grab = egui::pos2(60.0, 60.0);
    engine.begin(4, InteractionKind::Drag, grab, start, &container);
    engine.update(grab + egui::vec2(100.0, 100.0), &container);
    assert_ne!(engine.live_geometry(4), Some(start));

    let restored = engine.cancel().unwrap();
    assert_eq!(restored.bubble_id, 4);
    assert_eq!(restored.geometry, start);
    assert!(!engine.is_interacting());
    assert!(engine.end().is_none());
}

#[test]
fn test_update_without_interaction_is_noop() {
    let container = ContainerRect::new(0.0, 0.0, 500.0, 500.0);
    let mut engine = BubbleEngine::default();
    assert!(engine.update(egui::pos2(10.0, 10.0), &container).is_none());
    assert!(engine.end().is_none());
    assert!(engine.cancel().is_none());
}

#[test]
fn test_live_state_scoped_to_active_bubble() {
    let container = ContainerRect::new(0.0, 0.0, 500.0, 500.0);
    let mut engine = BubbleEngine::default();
    engine.begin(
        1,
        InteractionKind::TailDrag,
        egui::pos2(0.0, 0.0),
        geom(10.0, 10.0, 30.0, 15.0),
        &container,
    );
    assert_eq!(engine.active_bubble(), Some(1));
    assert!(engine.live_geometry(1).is_some());
    assert!(engine.live_geometry(2).is_none());
    assert!(engine.live_tail(2).is_none());
}

#[test]
fn test_live_tail_follows_updates() {
    let container = ContainerRect::new(0.0, 0.0, 400.0, 400.0);
    let mut engine = BubbleEngine::default();
    let mut start = geom(10.0, 10.0, 30.0, 15.0);
    start.tail_tip = Point::new(20.0, 15.0);
    engine.begin(1, InteractionKind::TailDrag, egui::pos2(80.0, 60.0), start, &container);
    assert!(engine.live_tail(1).is_none());
    engine.update(egui::pos2(200.0, 360.0), &container);
    let tail = engine.live_tail(1).unwrap();
    assert!(approx(tail.tip.x, 200.0));
    assert!(approx(tail.tip.y, 360.0));
}

#[test]
fn test_tail_empty_when_tip_inside() {
    let container = ContainerRect::new(0.0, 0.0, 800.0, 600.0);
    let tail = compute_tail_path(
        Point::new(10.0, 10.0),
        Size::new(30.0, 15.0),
        Point::new(20.0, 15.0),
        container,
    );
    assert!(tail.is_none());
}

#[test]
fn test_tail_empty_for_degenerate_container() {
    let tail = compute_tail_path(
        Point::new(10.0, 10.0),
        Size::new(30.0, 15.0),
        Point::new(90.0, 90.0),
        ContainerRect::new(0.0, 0.0, 0.0, 600.0),
    );
    assert!(tail.is_none());
}

#[test]
fn test_tail_polygon_outside() {
    let container = ContainerRect::new(0.0, 0.0, 800.0, 600.0);
    let position = Point::new(25.0, 70.0);
    let size = Size::new(50.0, 20.0);
    let tip = Point::new(50.0, 95.0);
    let tail = compute_tail_path(position, size, tip, container).unwrap();

    // Bubble body: x 200..600, y 420..540; center (400, 480); tip (400, 570).
    assert!(approx(tail.tip.x, 400.0) && approx(tail.tip.y, 570.0));
    assert!(approx(tail.anchor.x, 400.0) && approx(tail.anchor.y, 540.0));

    let da = (tail.base_a - tail.anchor).length();
    let db = (tail.base_b - tail.anchor).length();
    assert!(approx(da, db));
    assert!(approx(da, 10.0));
    assert_eq!(tail.clockwise_points().len(), 3);
}

#[test]
fn test_tail_anchor_on_binding_edge() {
    let container = ContainerRect::new(0.0, 0.0, 1000.0, 1000.0);
    // Body x 100..300, y 100..200; tip far to the right and slightly down.
    let tail = compute_tail_path(
        Point::new(10.0, 10.0),
        Size::new(20.0, 10.0),
        Point::new(60.0, 20.0),
        container,
    )
    .unwrap();
    assert!(approx(tail.anchor.x, 300.0), "anchor {:?}", tail.anchor);
    assert!(tail.anchor.y > 150.0 && tail.anchor.y < 200.0);

    let da = (tail.base_a - tail.anchor).length();
    let db = (tail.base_b - tail.anchor).length();
    assert!(approx(da, db));
}

#[test]
fn test_tail_base_narrow_bubble() {
    let container = ContainerRect::new(0.0, 0.0, 100.0, 100.0);
    // 30px wide body caps the base at 12px.
    let tail = compute_tail_path(
        Point::new(10.0, 10.0),
        Size::new(30.0, 20.0),
        Point::new(25.0, 90.0),
        container,
    )
    .unwrap();
    assert!(approx((tail.base_a - tail.base_b).length(), 12.0));
}

#[test]
fn test_tail_zero_length_direction_falls_back() {
    let container = ContainerRect::new(0.0, 0.0, 100.0, 100.0);
    let tail = compute_tail_path(
        Point::new(40.0, 40.0),
        Size::new(0.0, 0.0),
        Point::new(40.0, 40.0),
        container,
    )
    .unwrap();
    for p in tail.clockwise_points() {
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

#[test]
fn test_tail_svg_path_relative_to_origin() {
    let tail = TailPolygon {
        base_a: egui::pos2(110.0, 120.0),
        tip: egui::pos2(150.0, 200.0),
        base_b: egui::pos2(130.0, 120.0),
        anchor: egui::pos2(120.0, 120.0),
    };
    assert_eq!(
        tail.to_svg_path(egui::pos2(100.0, 100.0)),
        "M 10.000 20.000 L 50.000 100.000 L 30.000 20.000 Z"
    );
}

#[test]
fn test_tail_points_clockwise_in_every_direction() {
    let c = ContainerRect::new(0.0, 0.0, 800.0, 600.0);
    let tips = [
        Point::new(50.0, 5.0),
        Point::new(95.0, 5.0),
        Point::new(95.0, 50.0),
        Point::new(95.0, 95.0),
        Point::new(50.0, 95.0),
        Point::new(5.0, 95.0),
        Point::new(5.0, 50.0),
        Point::new(5.0, 5.0),
    ];
    for tip in tips {
        let tail = compute_tail_path(Point::new(40.0, 40.0), Size::new(20.0, 20.0), tip, c)
            .expect("tip outside body");
        let [a, b, d] = tail.clockwise_points();
        let cross = (b - a).x * (d - b).y - (b - a).y * (d - b).x;
        assert!(cross > 0.0, "tip {tip:?} wound counter-clockwise");
        assert_eq!(b, tail.tip);
    }
}

#[test]
fn test_handle_unit_offsets() {
    assert_eq!(ResizeDirection::TopLeft.unit_offset(), egui::vec2(-1.0, -1.0));
    assert_eq!(ResizeDirection::Bottom.unit_offset(), egui::vec2(0.0, 1.0));
    assert_eq!(ResizeDirection::Right.unit_offset(), egui::vec2(1.0, 0.0));
}
