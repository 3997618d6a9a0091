use eframe::egui;

use super::{BubbleAction, ComicApp};
use super::geometry::fit_aspect;
use super::help::draw_help_window;
use super::render::draw_panel_background;

impl eframe::App for ComicApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_textures(ctx);

        let wants_keyboard = ctx.wants_keyboard_input();
        let editing_text = self.text_edit.is_some();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                self.show_help = true;
            }
            if self.engine.is_interacting()
                && i.consume_key(egui::Modifiers::NONE, egui::Key::Escape)
            {
                self.cancel_interaction();
            }
            if wants_keyboard || editing_text {
                return;
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::B) {
                self.add_bubble_to_selected();
            }
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::S) {
                self.export_svg_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                self.set_panel_image_dialog();
            }
            if !self.engine.is_interacting() {
                if let Some(id) = self.hovered_bubble {
                    if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                        || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
                    {
                        self.apply_bubble_action(id, BubbleAction::Delete);
                    }
                }
            }
        });

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Set panel image... (⌘O)").clicked() {
                        self.set_panel_image_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Export panel SVG... (⌘⇧S)").clicked() {
                        self.export_svg_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.small("Last SVG:");
                    ui.label(&self.settings.svg_path);
                });
                ui.menu_button("Settings", |ui| {
                    ui.add(
                        egui::Slider::new(&mut self.settings.min_bubble_width_px, 10.0..=300.0)
                            .text("Min width (px)"),
                    );
                    ui.add(
                        egui::Slider::new(&mut self.settings.min_bubble_height_px, 10.0..=300.0)
                            .text("Min height (px)"),
                    );
                    ui.add(
                        egui::Slider::new(&mut self.settings.handle_size, 6.0..=24.0)
                            .text("Handle size"),
                    );
                    ui.add(
                        egui::Slider::new(&mut self.settings.font_size_step, 0.05..=0.5)
                            .text("Font step"),
                    );
                    if ui.button("Save settings").clicked() {
                        self.save_settings();
                        ui.close_menu();
                    }
                });
                if ui.button("Help (F1)").clicked() {
                    self.show_help = true;
                }
            });
        });

        egui::SidePanel::left("storybook_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.storybook_list(ui);
                ui.separator();

                let Some(book) = self.library.selected() else {
                    ui.label("No storybook open");
                    return;
                };
                ui.strong(&book.name);

                let mut clicked = None;
                egui::ScrollArea::vertical()
                    .id_salt("panels")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for panel in &book.panels {
                            let label = format!(
                                "Panel {} · {} bubble(s)",
                                panel.panel_number,
                                panel.bubbles.len()
                            );
                            let selected = self.selected_panel == Some(panel.id);
                            if ui.selectable_label(selected, label).clicked() {
                                clicked = Some(panel.id);
                            }
                        }
                    });
                if let Some(id) = clicked {
                    self.select_panel(id);
                }

                ui.horizontal(|ui| {
                    if ui.button("Add panel").clicked() {
                        self.add_panel();
                    }
                    if ui.button("Delete").clicked() {
                        self.delete_selected_panel();
                    }
                    if ui.button("▲").on_hover_text("Move up").clicked() {
                        self.move_selected_panel(-1);
                    }
                    if ui.button("▼").on_hover_text("Move down").clicked() {
                        self.move_selected_panel(1);
                    }
                });
                ui.separator();

                if let Some(panel) = self.selected_panel_mut() {
                    ui.label(format!("Narration (panel {})", panel.panel_number));
                    ui.add(
                        egui::TextEdit::multiline(&mut panel.narrative_text)
                            .desired_rows(4)
                            .desired_width(f32::INFINITY),
                    );
                    ui.label("Visual description");
                    ui.add(
                        egui::TextEdit::multiline(&mut panel.visual_description)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                    ui.separator();
                    if ui.button("Add bubble (⌘B)").clicked() {
                        self.add_bubble_to_selected();
                    }
                    if ui.button("Set image... (⌘O)").clicked() {
                        self.set_panel_image_dialog();
                    }
                } else {
                    ui.label("No panel selected");
                }
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                }
                if self.engine.is_interacting() {
                    ui.separator();
                    ui.label("Esc to cancel");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_rect_before_wrap();
            let Some(panel) = self.selected_panel() else {
                ui.centered_and_justified(|ui| ui.label("Add a panel to start"));
                return;
            };
            let container = fit_aspect(avail.shrink(16.0), self.panel_aspect(panel));
            draw_panel_background(ui.painter(), container, self.panel_texture(panel));
            self.interact_panel(ui, container, ctx);
            if self.engine.is_interacting() {
                ctx.request_repaint();
            }
        });

        draw_help_window(ctx, &mut self.show_help);
    }
}

impl ComicApp {
    fn storybook_list(&mut self, ui: &mut egui::Ui) {
        ui.label("Storybooks");
        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.new_storybook_name)
                    .hint_text("New storybook name")
                    .desired_width(150.0),
            );
            let entered = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Create").clicked() || entered {
                self.create_storybook();
            }
        });

        let mut select = None;
        let mut delete = None;
        let mut start_rename = None;
        let mut rename_done = false;
        let mut rename_cancel = false;
        egui::ScrollArea::vertical()
            .id_salt("storybooks")
            .max_height(160.0)
            .show(ui, |ui| {
                for book in &self.library.storybooks {
                    ui.horizontal(|ui| {
                        if let Some((_, name)) =
                            self.renaming.as_mut().filter(|(id, _)| *id == book.id)
                        {
                            let resp = ui.text_edit_singleline(name);
                            if resp.lost_focus() {
                                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                                    rename_cancel = true;
                                } else {
                                    rename_done = true;
                                }
                            }
                            return;
                        }
                        let open = self.library.selected == Some(book.id);
                        let label = format!("{} · {} panel(s)", book.name, book.panels.len());
                        if ui.selectable_label(open, label).clicked() {
                            select = Some(book.id);
                        }
                        if ui.small_button("✏").on_hover_text("Rename").clicked() {
                            start_rename = Some((book.id, book.name.clone()));
                        }
                        if ui.small_button("🗑").on_hover_text("Delete storybook").clicked() {
                            delete = Some(book.id);
                        }
                    });
                }
            });

        if rename_cancel {
            self.renaming = None;
        } else if rename_done {
            self.finish_rename();
        }
        if let Some(rename) = start_rename {
            self.finish_rename();
            self.renaming = Some(rename);
        }
        if let Some(id) = select {
            self.select_storybook(id);
        }
        if let Some(id) = delete {
            self.delete_storybook(id);
        }
    }
}
