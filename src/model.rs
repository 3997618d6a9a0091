use serde::{Deserialize, Serialize};
use tracing::info;

pub const MIN_FONT_SIZE: f32 = 0.5;
pub const MAX_FONT_SIZE: f32 = 3.0;

/// A point in percent of the container (0..=100 on each axis).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height in percent of the container.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BubbleKind {
    #[default]
    #[serde(rename = "dialogue")]
    Spoken,
    #[serde(rename = "monologue")]
    Thought,
}

impl BubbleKind {
    pub fn is_dashed(self) -> bool {
        self == BubbleKind::Thought
    }

    pub fn label(self) -> &'static str {
        match self {
            BubbleKind::Spoken => "Speech",
            BubbleKind::Thought => "Thought",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ComicFont {
    #[default]
    ComicNeue,
    Bangers,
    PermanentMarker,
    Creepster,
}

impl ComicFont {
    pub const ALL: [ComicFont; 4] = [
        ComicFont::ComicNeue,
        ComicFont::Bangers,
        ComicFont::PermanentMarker,
        ComicFont::Creepster,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ComicFont::ComicNeue => "Comic Neue",
            ComicFont::Bangers => "Bangers",
            ComicFont::PermanentMarker => "Permanent Marker",
            ComicFont::Creepster => "Creepster",
        }
    }

    pub fn css_family(self) -> &'static str {
        match self {
            ComicFont::ComicNeue => "'Comic Neue', cursive",
            ComicFont::Bangers => "'Bangers', cursive",
            ComicFont::PermanentMarker => "'Permanent Marker', cursive",
            ComicFont::Creepster => "'Creepster', cursive",
        }
    }

    /// File stem a matching font file is expected to have in the font directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            ComicFont::ComicNeue => "ComicNeue-Regular",
            ComicFont::Bangers => "Bangers-Regular",
            ComicFont::PermanentMarker => "PermanentMarker-Regular",
            ComicFont::Creepster => "Creepster-Regular",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bubble {
    pub id: u64,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub kind: BubbleKind,
    #[serde(default = "default_position")]
    pub position: Point,
    #[serde(default = "default_size")]
    pub size: Size,
    #[serde(default = "default_tail_tip")]
    pub tail_tip: Point,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font: ComicFont,
}

fn default_position() -> Point {
    Point::new(10.0, 10.0)
}

fn default_size() -> Size {
    Size::new(30.0, 15.0)
}

fn default_tail_tip() -> Point {
    Point::new(50.0, 50.0)
}

fn default_font_size() -> f32 {
    1.0
}

/// Geometry triple the bubble engine reads and commits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BubbleGeometry {
    pub position: Point,
    pub size: Size,
    pub tail_tip: Point,
}

impl Bubble {
    /// The bubble a panel gains from the "add bubble" action.
    pub fn new_default(id: u64) -> Self {
        Self {
            id,
            character: "[NEW]".to_string(),
            text: "New text...".to_string(),
            kind: BubbleKind::Spoken,
            position: Point::new(25.0, 70.0),
            size: Size::new(50.0, 20.0),
            tail_tip: Point::new(50.0, 95.0),
            font_size: 1.0,
            font: ComicFont::ComicNeue,
        }
    }

    pub fn geometry(&self) -> BubbleGeometry {
        BubbleGeometry {
            position: self.position,
            size: self.size,
            tail_tip: self.tail_tip,
        }
    }

    /// Returns true if anything changed.
    pub fn apply_geometry(&mut self, geometry: BubbleGeometry) -> bool {
        if self.geometry() == geometry {
            return false;
        }
        self.position = geometry.position;
        self.size = geometry.size;
        self.tail_tip = geometry.tail_tip;
        true
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    pub fn step_font_size(&mut self, delta: f32) {
        // Round to one decimal so repeated 0.1 steps don't accumulate noise.
        let next = ((self.font_size + delta) * 10.0).round() / 10.0;
        self.set_font_size(next);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Panel {
    pub id: u64,
    pub panel_number: u32,
    #[serde(default)]
    pub narrative_text: String,
    #[serde(default)]
    pub visual_description: String,
    #[serde(default)]
    pub bubbles: Vec<Bubble>,
    #[serde(default)]
    pub image_path: Option<String>,
}

impl Panel {
    pub fn blank(id: u64, panel_number: u32) -> Self {
        Self {
            id,
            panel_number,
            narrative_text: "New narration...".to_string(),
            visual_description: String::new(),
            bubbles: Vec::new(),
            image_path: None,
        }
    }

    fn next_bubble_id(&self) -> u64 {
        self.bubbles.iter().map(|b| b.id).max().unwrap_or(0) + 1
    }

    pub fn add_bubble(&mut self) -> u64 {
        let id = self.next_bubble_id();
        self.bubbles.push(Bubble::new_default(id));
        info!(panel = self.id, bubble = id, "added bubble");
        id
    }

    pub fn bubble(&self, id: u64) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn bubble_mut(&mut self, id: u64) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    /// Applies `f` to the bubble with `id`; returns false if no such bubble.
    pub fn update_bubble(&mut self, id: u64, f: impl FnOnce(&mut Bubble)) -> bool {
        match self.bubble_mut(id) {
            Some(bubble) => {
                f(bubble);
                true
            }
            None => false,
        }
    }

    pub fn remove_bubble(&mut self, id: u64) -> Option<Bubble> {
        let idx = self.bubbles.iter().position(|b| b.id == id)?;
        info!(panel = self.id, bubble = id, "removed bubble");
        Some(self.bubbles.remove(idx))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Storybook {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl Storybook {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            panels: Vec::new(),
        }
    }

    pub fn panel(&self, id: u64) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn panel_mut(&mut self, id: u64) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    pub fn add_panel(&mut self) -> u64 {
        let id = self.panels.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let number = self.panels.len() as u32 + 1;
        self.panels.push(Panel::blank(id, number));
        info!(storybook = self.id, panel = id, number, "added panel");
        id
    }

    pub fn remove_panel(&mut self, id: u64) -> Option<Panel> {
        let idx = self.panels.iter().position(|p| p.id == id)?;
        let removed = self.panels.remove(idx);
        self.renumber();
        info!(storybook = self.id, panel = id, "removed panel");
        Some(removed)
    }

    /// Moves `dragged_id` to the index currently held by `target_id`.
    pub fn reorder_panels(&mut self, dragged_id: u64, target_id: u64) -> bool {
        if dragged_id == target_id {
            return false;
        }
        let Some(drag_idx) = self.panels.iter().position(|p| p.id == dragged_id) else {
            return false;
        };
        let Some(target_idx) = self.panels.iter().position(|p| p.id == target_id) else {
            return false;
        };
        let panel = self.panels.remove(drag_idx);
        self.panels.insert(target_idx, panel);
        self.renumber();
        info!(
            storybook = self.id,
            panel = dragged_id,
            to = target_idx,
            "reordered panels"
        );
        true
    }

    fn renumber(&mut self) {
        for (i, panel) in self.panels.iter_mut().enumerate() {
            panel.panel_number = i as u32 + 1;
        }
    }
}

/// Every storybook in the session and which one is open.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Library {
    #[serde(default)]
    pub storybooks: Vec<Storybook>,
    #[serde(default)]
    pub selected: Option<u64>,
}

impl Library {
    pub fn storybook(&self, id: u64) -> Option<&Storybook> {
        self.storybooks.iter().find(|b| b.id == id)
    }

    pub fn storybook_mut(&mut self, id: u64) -> Option<&mut Storybook> {
        self.storybooks.iter_mut().find(|b| b.id == id)
    }

    pub fn selected(&self) -> Option<&Storybook> {
        self.selected.and_then(|id| self.storybook(id))
    }

    pub fn selected_mut(&mut self) -> Option<&mut Storybook> {
        let id = self.selected?;
        self.storybook_mut(id)
    }

    /// Appends an empty storybook. Blank names are rejected.
    pub fn create_storybook(&mut self, name: &str) -> Option<u64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.storybooks.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        self.storybooks.push(Storybook::new(id, name));
        info!(storybook = id, name, "created storybook");
        Some(id)
    }

    /// Trims and applies `name`; blank names leave the storybook untouched.
    pub fn rename_storybook(&mut self, id: u64, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(book) = self.storybook_mut(id) else {
            return false;
        };
        book.name = name.to_string();
        info!(storybook = id, name, "renamed storybook");
        true
    }

    /// Removes the storybook, clearing the selection if it was open.
    pub fn delete_storybook(&mut self, id: u64) -> Option<Storybook> {
        let idx = self.storybooks.iter().position(|b| b.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        info!(storybook = id, "deleted storybook");
        Some(self.storybooks.remove(idx))
    }

    /// Opens `id`, or closes it if it is already open. Returns the new selection.
    pub fn select_storybook(&mut self, id: u64) -> Option<u64> {
        if self.selected == Some(id) {
            self.selected = None;
        } else if self.storybook(id).is_some() {
            self.selected = Some(id);
        }
        self.selected
    }
}
