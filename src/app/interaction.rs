use crate::bubble::{ContainerRect, InteractionKind, ResizeDirection, compute_tail_path};
use crate::model;
use eframe::egui;

use super::geometry::{resize_cursor, resize_handle_rect};
use super::render::{
    BUBBLE_PADDING, draw_bubble, draw_bubble_text, draw_resize_handle, draw_tail_handle,
};
use super::svg::BASE_FONT_PX;
use super::{BubbleAction, ComicApp, TextEditState};

const TAIL_HANDLE_RADIUS: f32 = 8.0;
const TOOLBAR_ZONE: egui::Vec2 = egui::vec2(300.0, 48.0);

fn toolbar_zone(body: egui::Rect) -> egui::Rect {
    egui::Rect::from_center_size(
        body.center_top() - egui::vec2(0.0, TOOLBAR_ZONE.y * 0.5),
        TOOLBAR_ZONE,
    )
}

impl ComicApp {
    /// Drives the live interaction from raw pointer state; runs before widgets
    /// so a release is seen even if the grabbing widget is hidden.
    fn pump_interaction(&mut self, ctx: &egui::Context, container: egui::Rect) {
        if !self.engine.is_interacting() {
            return;
        }
        let (pointer, released) = ctx.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.any_released() || !i.pointer.primary_down(),
            )
        });
        if let Some(p) = pointer {
            self.engine.update(p, &container);
        }
        if released {
            if let Some(commit) = self.engine.end() {
                self.commit_geometry(commit);
            }
        }
    }

    fn update_hovered_bubble(&mut self, ctx: &egui::Context, container: egui::Rect) {
        if self.engine.is_interacting() || self.text_edit.is_some() {
            self.hovered_bubble = None;
            return;
        }
        let Some(hover) = ctx.input(|i| i.pointer.hover_pos()) else {
            self.hovered_bubble = None;
            return;
        };
        let Some(panel) = self.selected_panel() else {
            self.hovered_bubble = None;
            return;
        };
        let metrics = ContainerRect::from_rect(container);
        let handle = self.settings.handle_size;

        // Keep the current bubble's controls while the pointer is on them.
        if let Some(current) = self.hovered_bubble.and_then(|id| panel.bubble(id)) {
            let body = metrics.bubble_screen_rect(current.position, current.size);
            let tip = metrics.percent_to_screen(current.tail_tip);
            if body.expand(handle).contains(hover)
                || toolbar_zone(body).contains(hover)
                || tip.distance(hover) <= TAIL_HANDLE_RADIUS + handle * 0.5
            {
                return;
            }
        }

        self.hovered_bubble = panel
            .bubbles
            .iter()
            .rev()
            .find(|b| {
                metrics
                    .bubble_screen_rect(b.position, b.size)
                    .expand(handle * 0.5)
                    .contains(hover)
            })
            .map(|b| b.id);
    }

    pub(super) fn interact_panel(
        &mut self,
        ui: &mut egui::Ui,
        container: egui::Rect,
        ctx: &egui::Context,
    ) {
        self.pump_interaction(ctx, container);
        self.update_hovered_bubble(ctx, container);

        let Some(panel) = self.selected_panel() else {
            return;
        };
        let panel_id = panel.id;
        let bubbles = panel.bubbles.clone();
        let metrics = ContainerRect::from_rect(container);
        let painter = ui.painter_at(container);
        let handle_size = self.settings.handle_size;
        let font_step = self.settings.font_size_step;
        let mut actions: Vec<(u64, BubbleAction)> = Vec::new();

        for bubble in &bubbles {
            let geometry = self
                .engine
                .live_geometry(bubble.id)
                .unwrap_or_else(|| bubble.geometry());
            let body = metrics.bubble_screen_rect(geometry.position, geometry.size);
            let tail = if self.engine.active_bubble() == Some(bubble.id) {
                self.engine.live_tail(bubble.id)
            } else {
                compute_tail_path(geometry.position, geometry.size, geometry.tail_tip, metrics)
            }
            .map(|t| t.translated(container.min.to_vec2()));

            draw_bubble(&painter, body, tail.as_ref(), bubble.kind);

            let font_id =
                egui::FontId::new(BASE_FONT_PX * bubble.font_size, self.font_family(bubble.font));
            let editing = self
                .text_edit
                .as_ref()
                .is_some_and(|t| t.bubble_id == bubble.id);

            let body_id = ui.id().with(("bubble", panel_id, bubble.id));
            let resp = ui.interact(body, body_id, egui::Sense::click_and_drag());

            if editing {
                self.show_text_editor(ui, ctx, body, font_id);
                continue;
            }
            draw_bubble_text(&painter, body, &bubble.text, font_id);

            if resp.double_clicked() && !self.engine.is_interacting() {
                self.text_edit = Some(TextEditState {
                    bubble_id: bubble.id,
                    buffer: bubble.text.clone(),
                    request_focus: true,
                });
                continue;
            }
            if resp.hovered() && !self.engine.is_interacting() {
                ctx.set_cursor_icon(egui::CursorIcon::Grab);
            }
            if resp.drag_started() {
                self.begin_interaction(ctx, bubble.id, InteractionKind::Drag, geometry, container);
            }

            if self.hovered_bubble != Some(bubble.id) || self.engine.is_interacting() {
                continue;
            }

            for direction in ResizeDirection::ALL {
                let r = resize_handle_rect(body, direction, handle_size);
                let id = ui.id().with(("resize", panel_id, bubble.id, direction as u8));
                let hresp = ui.interact(r, id, egui::Sense::drag());
                draw_resize_handle(&painter, r);
                if hresp.hovered() || hresp.dragged() {
                    ctx.set_cursor_icon(resize_cursor(direction));
                }
                if hresp.drag_started() {
                    self.begin_interaction(
                        ctx,
                        bubble.id,
                        InteractionKind::Resize(direction),
                        geometry,
                        container,
                    );
                }
            }

            let tip = metrics.percent_to_screen(geometry.tail_tip);
            let tip_rect = egui::Rect::from_center_size(
                tip,
                egui::vec2(TAIL_HANDLE_RADIUS * 2.0, TAIL_HANDLE_RADIUS * 2.0),
            );
            let tresp = ui.interact(
                tip_rect,
                ui.id().with(("tail", panel_id, bubble.id)),
                egui::Sense::drag(),
            );
            draw_tail_handle(&ui.painter_at(container.expand(TAIL_HANDLE_RADIUS)), tip, TAIL_HANDLE_RADIUS);
            if tresp.hovered() || tresp.dragged() {
                ctx.set_cursor_icon(egui::CursorIcon::Move);
            }
            if tresp.drag_started() {
                self.begin_interaction(ctx, bubble.id, InteractionKind::TailDrag, geometry, container);
            }

            if !self.engine.is_interacting() {
                if let Some(action) = bubble_toolbar(ctx, panel_id, bubble, body, font_step) {
                    actions.push((bubble.id, action));
                }
            }
        }

        for (bubble_id, action) in actions {
            self.apply_bubble_action(bubble_id, action);
        }
    }

    fn begin_interaction(
        &mut self,
        ctx: &egui::Context,
        bubble_id: u64,
        kind: InteractionKind,
        geometry: model::BubbleGeometry,
        container: egui::Rect,
    ) {
        let (origin, current) =
            ctx.input(|i| (i.pointer.press_origin(), i.pointer.interact_pos()));
        let Some(origin) = origin.or(current) else {
            return;
        };
        self.engine.begin(bubble_id, kind, origin, geometry, &container);
        // Catch up with the movement that crossed the drag threshold.
        if let Some(p) = current {
            self.engine.update(p, &container);
        }
        self.hovered_bubble = None;
    }

    fn show_text_editor(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        body: egui::Rect,
        font_id: egui::FontId,
    ) {
        let Some(state) = self.text_edit.as_mut() else {
            return;
        };
        let (commit, revert) = ctx.input_mut(|i| {
            let shift = i.modifiers.shift;
            let enter = !shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter);
            let escape = i.consume_key(egui::Modifiers::NONE, egui::Key::Escape);
            (enter, escape)
        });
        let inner = body.shrink(BUBBLE_PADDING);
        let resp = ui.put(
            inner,
            egui::TextEdit::multiline(&mut state.buffer)
                .font(font_id)
                .frame(false)
                .text_color(egui::Color32::BLACK)
                .desired_width(inner.width()),
        );
        if state.request_focus {
            resp.request_focus();
            state.request_focus = false;
        }
        if revert {
            self.text_edit = None;
        } else if commit || resp.lost_focus() {
            self.finish_text_edit();
        }
    }
}

fn bubble_toolbar(
    ctx: &egui::Context,
    panel_id: u64,
    bubble: &model::Bubble,
    body: egui::Rect,
    font_step: f32,
) -> Option<BubbleAction> {
    let mut action = None;
    egui::Area::new(egui::Id::new(("bubble_toolbar", panel_id, bubble.id)))
        .order(egui::Order::Foreground)
        .fixed_pos(body.center_top() - egui::vec2(0.0, 6.0))
        .pivot(egui::Align2::CENTER_BOTTOM)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    if !bubble.character.is_empty() {
                        ui.weak(&bubble.character);
                    }
                    if ui.button("🗑").on_hover_text("Delete bubble").clicked() {
                        action = Some(BubbleAction::Delete);
                    }
                    if ui.small_button("−").on_hover_text("Smaller text").clicked() {
                        action = Some(BubbleAction::FontStep(-font_step));
                    }
                    ui.monospace(format!("{:.1}", bubble.font_size));
                    if ui.small_button("+").on_hover_text("Larger text").clicked() {
                        action = Some(BubbleAction::FontStep(font_step));
                    }
                    let mut font = bubble.font;
                    egui::ComboBox::from_id_salt(("bubble_font", panel_id, bubble.id))
                        .selected_text(font.display_name())
                        .show_ui(ui, |ui| {
                            for f in model::ComicFont::ALL {
                                ui.selectable_value(&mut font, f, f.display_name());
                            }
                        });
                    if font != bubble.font {
                        action = Some(BubbleAction::SetFont(font));
                    }
                    let other = match bubble.kind {
                        model::BubbleKind::Spoken => model::BubbleKind::Thought,
                        model::BubbleKind::Thought => model::BubbleKind::Spoken,
                    };
                    if ui
                        .button(bubble.kind.label())
                        .on_hover_text(format!("Switch to {}", other.label()))
                        .clicked()
                    {
                        action = Some(BubbleAction::ToggleKind);
                    }
                });
            });
        });
    action
}
