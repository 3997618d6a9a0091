use crate::bubble::BubbleEngine;
use crate::model;
use eframe::egui;
use std::collections::HashMap;
use tracing::{debug, info, warn};

mod actions;
mod geometry;
mod help;
mod interaction;
mod render;
mod settings;
mod svg;
mod update;

/// Aspect (width / height) of a panel without an image.
const PLACEHOLDER_ASPECT: f32 = 9.0 / 16.0;

#[derive(Clone, Debug)]
struct TextEditState {
    bubble_id: u64,
    buffer: String,
    request_focus: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BubbleAction {
    Delete,
    FontStep(f32),
    SetFont(model::ComicFont),
    ToggleKind,
}

pub struct ComicApp {
    library: model::Library,
    selected_panel: Option<u64>,
    new_storybook_name: String,
    renaming: Option<(u64, String)>,
    engine: BubbleEngine,
    hovered_bubble: Option<u64>,
    text_edit: Option<TextEditState>,
    textures: HashMap<String, egui::TextureHandle>,
    settings: settings::AppSettings,
    settings_path: String,
    status: Option<String>,
    loaded_fonts: Vec<String>,
    show_help: bool,
}

impl ComicApp {
    /// `$HOME/.config/comicbubble.toml` if present, else `./settings.toml`.
    fn config_path() -> String {
        std::env::var_os("HOME")
            .map(|home| {
                std::path::PathBuf::from(home)
                    .join(".config")
                    .join("comicbubble.toml")
            })
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "settings.toml".to_string())
    }

    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path();
        let settings = settings::load_settings(&settings_path).unwrap_or_default();
        info!(path = %settings_path, "settings resolved");

        let loaded_fonts = settings
            .font_directory
            .as_deref()
            .map(|dir| Self::load_comic_fonts(&cc.egui_ctx, dir))
            .unwrap_or_default();

        let mut library = model::Library::default();
        let mut first = None;
        if let Some(book_id) = library.create_storybook("Untitled storybook") {
            library.select_storybook(book_id);
            if let Some(book) = library.selected_mut() {
                let panel_id = book.add_panel();
                if let Some(panel) = book.panel_mut(panel_id) {
                    panel.add_bubble();
                }
                first = Some(panel_id);
            }
        }

        Self {
            library,
            selected_panel: first,
            new_storybook_name: String::new(),
            renaming: None,
            engine: BubbleEngine::new(settings.engine_limits()),
            hovered_bubble: None,
            text_edit: None,
            textures: HashMap::new(),
            settings,
            settings_path,
            status: None,
            loaded_fonts,
            show_help: false,
        }
    }

    /// Looks for each [`model::ComicFont`] in `font_dir` by file stem and
    /// registers the ones found as named families. Returns the stems loaded.
    fn load_comic_fonts(ctx: &egui::Context, font_dir: &str) -> Vec<String> {
        let dir = std::path::Path::new(font_dir);
        if !dir.is_dir() {
            warn!(font_dir, "font directory not found");
            return Vec::new();
        }

        let mut defs = egui::FontDefinitions::default();
        let fallback = defs
            .families
            .get(&egui::FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();
        let mut loaded = Vec::new();

        for font in model::ComicFont::ALL {
            let stem = font.file_stem();
            let Some(file) = ["ttf", "otf", "TTF", "OTF"]
                .iter()
                .map(|ext| dir.join(format!("{stem}.{ext}")))
                .find(|p| p.is_file())
            else {
                debug!(font = font.display_name(), "no font file");
                continue;
            };
            let bytes = match std::fs::read(&file) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "skipping font");
                    continue;
                }
            };
            defs.font_data.insert(
                stem.to_string(),
                std::sync::Arc::new(egui::FontData::from_owned(bytes)),
            );
            // Missing glyphs fall through to the default proportional fonts.
            let chain = std::iter::once(stem.to_string())
                .chain(fallback.iter().cloned())
                .collect();
            defs.families
                .insert(egui::FontFamily::Name(stem.into()), chain);
            loaded.push(stem.to_string());
        }

        if !loaded.is_empty() {
            ctx.set_fonts(defs);
        }
        info!(count = loaded.len(), "loaded comic fonts");
        loaded
    }

    pub(super) fn font_family(&self, font: model::ComicFont) -> egui::FontFamily {
        let stem = font.file_stem();
        if self.loaded_fonts.iter().any(|f| f == stem) {
            egui::FontFamily::Name(stem.into())
        } else {
            egui::FontFamily::Proportional
        }
    }
}
