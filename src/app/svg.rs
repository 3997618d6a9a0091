use crate::bubble::{ContainerRect, compute_tail_path};
use crate::model;
use eframe::egui;

pub(super) const BASE_FONT_PX: f32 = 16.0;
const BUBBLE_FILL: &str = "#f3f4f6";
const BUBBLE_PADDING_PX: f32 = 12.0;
const CORNER_RADIUS_PX: f32 = 16.0;
/// Average advance of a glyph relative to its font size, used for wrapping.
const GLYPH_WIDTH_EM: f32 = 0.55;

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn dasharray_attr(kind: model::BubbleKind) -> &'static str {
    if kind.is_dashed() {
        r#" stroke-dasharray="4 4""#
    } else {
        ""
    }
}

/// Greedy word wrap to `max_chars` per line. Explicit newlines are kept and
/// words longer than a line are broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;
        for word in para.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while !chars.is_empty() {
                let sep = usize::from(line_len > 0);
                if line_len + sep + chars.len() <= max_chars {
                    if sep == 1 {
                        line.push(' ');
                    }
                    line.extend(chars.iter());
                    line_len += sep + chars.len();
                    break;
                }
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                    continue;
                }
                let rest = chars.split_off(max_chars.min(chars.len()));
                lines.push(chars.iter().collect());
                chars = rest;
            }
        }
        lines.push(line);
    }
    lines
}

fn text_tspans(lines: &[String], x: f32, line_height: f32) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { line_height };
        out.push_str(&format!(
            r#"<tspan x="{:.3}" dy="{:.3}">{}</tspan>"#,
            x,
            dy,
            escape_xml(line)
        ));
    }
    out
}

fn bubble_to_svg(bubble: &model::Bubble, container: ContainerRect) -> String {
    let rect = container.bubble_screen_rect(bubble.position, bubble.size);
    let radius = CORNER_RADIUS_PX.min(rect.width() * 0.5).min(rect.height() * 0.5);
    let dash = dasharray_attr(bubble.kind);
    let mut out = String::new();

    if let Some(tail) =
        compute_tail_path(bubble.position, bubble.size, bubble.tail_tip, container)
    {
        out.push_str(&format!(
            r#"<path d="{}" fill="{}" stroke="black" stroke-width="2"{}/>"#,
            tail.to_svg_path(egui::Pos2::ZERO),
            BUBBLE_FILL,
            dash
        ));
        out.push('\n');
    }

    out.push_str(&format!(
        r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" rx="{:.3}" fill="{}" stroke="black" stroke-width="2"{}/>"#,
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        radius,
        BUBBLE_FILL,
        dash
    ));
    out.push('\n');

    let inner = rect.shrink(BUBBLE_PADDING_PX);
    let clip_id = format!("bubble-{}-text", bubble.id);
    out.push_str(&format!(
        r#"<clipPath id="{}"><rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}"/></clipPath>"#,
        clip_id,
        inner.left(),
        inner.top(),
        inner.width().max(0.0),
        inner.height().max(0.0)
    ));
    out.push('\n');

    let font_px = BASE_FONT_PX * bubble.font_size;
    let max_chars = (inner.width() / (font_px * GLYPH_WIDTH_EM)).floor().max(1.0) as usize;
    let lines = wrap_text(&bubble.text, max_chars);
    out.push_str(&format!(
        r#"<text x="{:.3}" y="{:.3}" font-family="{}" font-size="{:.3}" fill="black" clip-path="url(#{})">{}</text>"#,
        inner.left(),
        inner.top() + font_px,
        escape_xml(bubble.font.css_family()),
        font_px,
        clip_id,
        text_tspans(&lines, inner.left(), font_px * 1.2)
    ));
    out.push('\n');
    out
}

/// One panel at `width` x `height` pixels: its image, if any, stretched to
/// the full size with the bubbles drawn over it.
pub(super) fn panel_to_svg(panel: &model::Panel, width: f32, height: f32) -> String {
    let container = ContainerRect::new(0.0, 0.0, width, height);
    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.3} {:.3}">"#,
        width, height, width, height
    ));
    out.push('\n');
    out.push_str(&format!(
        "<title>Panel {}</title>\n",
        panel.panel_number
    ));
    if let Some(path) = &panel.image_path {
        out.push_str(&format!(
            r#"<image href="{}" x="0" y="0" width="{:.3}" height="{:.3}" preserveAspectRatio="none"/>"#,
            escape_xml(path),
            width,
            height
        ));
        out.push('\n');
    }
    for bubble in &panel.bubbles {
        out.push_str(&bubble_to_svg(bubble, container));
    }
    out.push_str("</svg>\n");
    out
}
