use crate::bubble::Commit;
use crate::errors::AppError;
use crate::model;
use eframe::egui;
use tracing::{debug, info, warn};

use super::{BubbleAction, ComicApp, PLACEHOLDER_ASPECT, settings, svg};

const SVG_EXPORT_HEIGHT: f32 = 1600.0;

impl ComicApp {
    pub(super) fn selected_panel(&self) -> Option<&model::Panel> {
        let id = self.selected_panel?;
        self.library.selected()?.panel(id)
    }

    pub(super) fn selected_panel_mut(&mut self) -> Option<&mut model::Panel> {
        let id = self.selected_panel?;
        self.library.selected_mut()?.panel_mut(id)
    }

    /// Drops any live interaction, edit and hover before the canvas changes.
    fn leave_canvas(&mut self) {
        if let Some(commit) = self.engine.cancel() {
            self.commit_geometry(commit);
        }
        self.text_edit = None;
        self.hovered_bubble = None;
    }

    pub(super) fn select_panel(&mut self, id: u64) {
        if self.selected_panel == Some(id) {
            return;
        }
        self.leave_canvas();
        self.selected_panel = Some(id);
    }

    /// Opens a storybook (or closes it if already open) on its first panel.
    pub(super) fn select_storybook(&mut self, id: u64) {
        self.leave_canvas();
        self.renaming = None;
        self.library.select_storybook(id);
        self.selected_panel = self
            .library
            .selected()
            .and_then(|b| b.panels.first())
            .map(|p| p.id);
    }

    pub(super) fn create_storybook(&mut self) {
        let name = std::mem::take(&mut self.new_storybook_name);
        match self.library.create_storybook(&name) {
            Some(id) => {
                if self.library.selected.is_none() {
                    self.select_storybook(id);
                }
            }
            None => self.status = Some("Storybook name is empty".to_string()),
        }
    }

    pub(super) fn delete_storybook(&mut self, id: u64) {
        if self.library.selected == Some(id) {
            self.leave_canvas();
            self.selected_panel = None;
        }
        if self.renaming.as_ref().is_some_and(|(r, _)| *r == id) {
            self.renaming = None;
        }
        self.library.delete_storybook(id);
    }

    pub(super) fn finish_rename(&mut self) {
        if let Some((id, name)) = self.renaming.take() {
            self.library.rename_storybook(id, &name);
        }
    }

    pub(super) fn commit_geometry(&mut self, commit: Commit) {
        let Some(panel) = self.selected_panel_mut() else {
            return;
        };
        let mut changed = false;
        panel.update_bubble(commit.bubble_id, |b| changed = b.apply_geometry(commit.geometry));
        debug!(bubble = commit.bubble_id, changed, "geometry committed");
    }

    pub(super) fn cancel_interaction(&mut self) {
        if let Some(restore) = self.engine.cancel() {
            self.commit_geometry(restore);
            self.status = Some("Move cancelled".to_string());
        }
    }

    pub(super) fn finish_text_edit(&mut self) {
        let Some(state) = self.text_edit.take() else {
            return;
        };
        if let Some(panel) = self.selected_panel_mut() {
            panel.update_bubble(state.bubble_id, |b| b.text = state.buffer);
        }
    }

    pub(super) fn apply_bubble_action(&mut self, bubble_id: u64, action: BubbleAction) {
        let Some(panel) = self.selected_panel_mut() else {
            return;
        };
        match action {
            BubbleAction::Delete => {
                panel.remove_bubble(bubble_id);
                if self.hovered_bubble == Some(bubble_id) {
                    self.hovered_bubble = None;
                }
            }
            BubbleAction::FontStep(delta) => {
                panel.update_bubble(bubble_id, |b| b.step_font_size(delta));
            }
            BubbleAction::SetFont(font) => {
                panel.update_bubble(bubble_id, |b| b.font = font);
            }
            BubbleAction::ToggleKind => {
                panel.update_bubble(bubble_id, |b| {
                    b.kind = match b.kind {
                        model::BubbleKind::Spoken => model::BubbleKind::Thought,
                        model::BubbleKind::Thought => model::BubbleKind::Spoken,
                    }
                });
            }
        }
    }

    pub(super) fn add_bubble_to_selected(&mut self) {
        if let Some(panel) = self.selected_panel_mut() {
            panel.add_bubble();
        }
    }

    pub(super) fn add_panel(&mut self) {
        let Some(book) = self.library.selected_mut() else {
            self.status = Some("Open a storybook first".to_string());
            return;
        };
        let id = book.add_panel();
        self.select_panel(id);
    }

    pub(super) fn delete_selected_panel(&mut self) {
        let Some(id) = self.selected_panel else {
            return;
        };
        self.leave_canvas();
        let Some(book) = self.library.selected_mut() else {
            return;
        };
        let idx = book.panels.iter().position(|p| p.id == id);
        book.remove_panel(id);
        self.selected_panel = idx
            .and_then(|i| book.panels.get(i).or_else(|| book.panels.last()))
            .map(|p| p.id);
    }

    /// Swaps the selected panel with its neighbour `delta` places away.
    pub(super) fn move_selected_panel(&mut self, delta: isize) {
        let Some(id) = self.selected_panel else {
            return;
        };
        let Some(book) = self.library.selected_mut() else {
            return;
        };
        let Some(idx) = book.panels.iter().position(|p| p.id == id) else {
            return;
        };
        let target = idx as isize + delta;
        if target < 0 || target as usize >= book.panels.len() {
            return;
        }
        let target_id = book.panels[target as usize].id;
        book.reorder_panels(id, target_id);
    }

    pub(super) fn panel_texture(&self, panel: &model::Panel) -> Option<&egui::TextureHandle> {
        panel.image_path.as_ref().and_then(|p| self.textures.get(p))
    }

    /// Width / height of the selected panel's image, or the placeholder aspect.
    pub(super) fn panel_aspect(&self, panel: &model::Panel) -> f32 {
        match self.panel_texture(panel) {
            Some(texture) => {
                let [w, h] = texture.size();
                if h == 0 {
                    PLACEHOLDER_ASPECT
                } else {
                    w as f32 / h as f32
                }
            }
            None => PLACEHOLDER_ASPECT,
        }
    }

    fn load_texture(ctx: &egui::Context, path: &str) -> Result<egui::TextureHandle, AppError> {
        let img = image::open(path)?.to_rgba8();
        let size = [img.width() as usize, img.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        Ok(ctx.load_texture(path, color, egui::TextureOptions::LINEAR))
    }

    /// Loads textures for panels whose image has not been uploaded yet.
    pub(super) fn ensure_textures(&mut self, ctx: &egui::Context) {
        let missing: Vec<String> = self
            .library
            .storybooks
            .iter()
            .flat_map(|b| b.panels.iter())
            .filter_map(|p| p.image_path.clone())
            .filter(|p| !self.textures.contains_key(p))
            .collect();
        for path in missing {
            match Self::load_texture(ctx, &path) {
                Ok(texture) => {
                    self.textures.insert(path, texture);
                }
                Err(e) => {
                    warn!(%path, error = %e, "could not load panel image");
                    self.status = Some(format!("Image load failed: {e}"));
                    for panel in self
                        .library
                        .storybooks
                        .iter_mut()
                        .flat_map(|b| b.panels.iter_mut())
                    {
                        if panel.image_path.as_deref() == Some(path.as_str()) {
                            panel.image_path = None;
                        }
                    }
                }
            }
        }
    }

    pub(super) fn set_panel_image_dialog(&mut self) {
        if self.selected_panel.is_none() {
            self.status = Some(AppError::NoPanel.to_string());
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            let path_str = path.display().to_string();
            if let Some(panel) = self.selected_panel_mut() {
                panel.image_path = Some(path_str.clone());
            }
            info!(path = %path_str, "panel image set");
        }
    }

    fn export_svg(&self, path: &str) -> Result<(), AppError> {
        let panel = self.selected_panel().ok_or(AppError::NoPanel)?;
        let aspect = self.panel_aspect(panel);
        let svg = svg::panel_to_svg(panel, SVG_EXPORT_HEIGHT * aspect, SVG_EXPORT_HEIGHT);
        std::fs::write(path, svg)?;
        Ok(())
    }

    pub(super) fn export_svg_dialog(&mut self) {
        let number = self.selected_panel().map(|p| p.panel_number).unwrap_or(1);
        let default_name = format!("panel-{number}.svg");
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&default_name)
            .add_filter("SVG", &["svg"])
            .save_file()
        {
            let path_str = path.display().to_string();
            match self.export_svg(&path_str) {
                Ok(()) => {
                    info!(path = %path_str, "exported panel overlay");
                    self.settings.svg_path = path_str.clone();
                    self.status = Some(format!("Saved {path_str}"));
                }
                Err(e) => {
                    warn!(path = %path_str, error = %e, "svg export failed");
                    self.status = Some(format!("SVG export failed: {e}"));
                }
            }
        }
    }

    pub(super) fn save_settings(&mut self) {
        match settings::save_settings(&self.settings_path, &self.settings) {
            Ok(()) => {
                self.engine.set_limits(self.settings.engine_limits());
                self.status = Some(format!("Settings saved to {}", self.settings_path));
            }
            Err(e) => {
                warn!(path = %self.settings_path, error = %e, "settings save failed");
                self.status = Some(format!("Settings save failed: {e}"));
            }
        }
    }
}
