//! SVG markup writer.

use std::fmt::Write as _;
use std::path::Path;

use scenekit_svg::path::serialize;
use scenekit_svg::{
    Color, DrawingSurface, Gradient, GradientKind, PathCommand, PathPaint, Point, SurfaceError,
};
use tracing::{debug, warn};

/// What opened a `<g>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenGroup {
    Plain,
    Transform,
}

/// A [`DrawingSurface`] that re-emits drawing calls as SVG markup.
#[derive(Debug, Clone)]
pub struct SvgWriter {
    buffer: String,
    initialized: bool,
    fill: Color,
    stroke: Color,
    stroke_width: f32,
    /// Gradient id and opacity replacing the flat fill.
    fill_gradient: Option<(String, f32)>,
    stroke_gradient: Option<(String, f32)>,
    /// Gradients not yet written to a `<defs>` block.
    pending_defs: Vec<Gradient>,
    groups: Vec<OpenGroup>,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            initialized: false,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            fill_gradient: None,
            stroke_gradient: None,
            pending_defs: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl SvgWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete document so far, with pending gradient definitions
    /// written, any open groups and the root element closed. Empty before
    /// [`initialize`](DrawingSurface::initialize).
    pub fn markup(&self) -> String {
        if !self.initialized {
            return String::new();
        }
        let mut out = self.buffer.clone();
        write_defs(&mut out, self.groups.len(), &self.pending_defs);
        for depth in (0..self.groups.len()).rev() {
            out.push_str(&indent(depth));
            out.push_str("</g>\n");
        }
        out.push_str("</svg>\n");
        out
    }

    /// Current nesting depth of `<g>` elements.
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    fn line(&mut self, element: &str) {
        let pad = indent(self.groups.len());
        // writing to a String cannot fail
        let _ = writeln!(self.buffer, "{pad}{element}");
    }

    /// Write an opening or self-closing element, preceded by any gradients
    /// defined since the last one.
    fn open(&mut self, element: &str) {
        let pending = std::mem::take(&mut self.pending_defs);
        write_defs(&mut self.buffer, self.groups.len(), &pending);
        self.line(element);
    }

    /// `fill`, `stroke` and `stroke-width` attributes for the current state.
    fn paint_attributes(&self) -> String {
        format!(
            r#"{} {} stroke-width="{}""#,
            paint_attribute("fill", self.fill, self.fill_gradient.as_ref()),
            paint_attribute("stroke", self.stroke, self.stroke_gradient.as_ref()),
            self.stroke_width
        )
    }

    fn stroke_attributes(&self) -> String {
        format!(
            r#"{} stroke-width="{}""#,
            paint_attribute("stroke", self.stroke, self.stroke_gradient.as_ref()),
            self.stroke_width
        )
    }

    fn pop_group(&mut self, expected: OpenGroup) {
        match self.groups.last() {
            Some(&top) if top == expected => {
                self.groups.pop();
                self.line("</g>");
            }
            Some(&top) => {
                warn!(?expected, found = ?top, "Mismatched group close, ignoring");
            }
            None => warn!(?expected, "Group close without open group, ignoring"),
        }
    }
}

impl DrawingSurface for SvgWriter {
    fn initialize(&mut self, width: u32, height: u32) {
        *self = Self::default();
        self.initialized = true;
        self.buffer
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            self.buffer,
            r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">"#
        );
    }

    fn set_fill_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.fill = Color::from_rgba(r, g, b, a);
        self.fill_gradient = None;
    }

    fn set_stroke_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.stroke = Color::from_rgba(r, g, b, a);
        self.stroke_gradient = None;
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let element = format!(
            r#"<ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}" {}/>"#,
            self.paint_attributes()
        );
        self.open(&element);
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let element = format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" {}/>"#,
            self.paint_attributes()
        );
        self.open(&element);
    }

    fn draw_line(&mut self, p1: Point, p2: Point) {
        let element = format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            p1.x,
            p1.y,
            p2.x,
            p2.y,
            self.stroke_attributes()
        );
        self.open(&element);
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        let element = format!(
            r#"<polyline points="{}" fill="none" {}/>"#,
            points_attribute(points),
            self.stroke_attributes()
        );
        self.open(&element);
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        let element = format!(
            r#"<polygon points="{}" {}/>"#,
            points_attribute(points),
            self.paint_attributes()
        );
        self.open(&element);
    }

    fn draw_text(&mut self, x: f32, y: f32, content: &str, font_size: f32, typeface: &str) {
        let element = format!(
            r#"<text x="{x}" y="{y}" font-family="{}" font-size="{font_size}" {}>{}</text>"#,
            escape_xml(typeface),
            self.paint_attributes(),
            escape_xml(content)
        );
        self.open(&element);
    }

    fn draw_path(&mut self, commands: &[PathCommand], paint: &PathPaint) {
        let fill = match &self.fill_gradient {
            Some((id, _)) => gradient_url(id),
            None => paint_value(paint.fill),
        };
        let stroke = match &self.stroke_gradient {
            Some((id, _)) => gradient_url(id),
            None => paint_value(paint.stroke),
        };
        let element = format!(
            r#"<path d="{}" fill="{fill}" stroke="{stroke}" fill-opacity="{}" stroke-opacity="{}" stroke-width="{}"/>"#,
            serialize(commands),
            paint.fill_opacity,
            paint.stroke_opacity,
            paint.stroke_width
        );
        self.open(&element);
    }

    fn push_transform(&mut self, transform: &str) {
        let element = format!(r#"<g transform="{}">"#, escape_xml(transform));
        self.open(&element);
        self.groups.push(OpenGroup::Transform);
    }

    fn pop_transform(&mut self) {
        self.pop_group(OpenGroup::Transform);
    }

    fn begin_group(&mut self) {
        self.open("<g>");
        self.groups.push(OpenGroup::Plain);
    }

    fn end_group(&mut self) {
        self.pop_group(OpenGroup::Plain);
    }

    fn define_gradient(&mut self, gradient: &Gradient) {
        self.pending_defs.push(gradient.clone());
    }

    fn set_fill_gradient(&mut self, id: &str, opacity: f32) {
        self.fill_gradient = Some((id.to_string(), opacity));
    }

    fn set_stroke_gradient(&mut self, id: &str, opacity: f32) {
        self.stroke_gradient = Some((id.to_string(), opacity));
    }

    fn save_to_file(&mut self, path: &Path) -> Result<(), SurfaceError> {
        if !self.initialized {
            return Err(SurfaceError::NotInitialized);
        }
        let markup = self.markup();
        std::fs::write(path, &markup)?;
        debug!(path = %path.display(), bytes = markup.len(), "Wrote SVG markup");
        Ok(())
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}

/// Exact color text: `none` for fully transparent black, hex otherwise.
fn paint_value(color: Color) -> String {
    if color == Color::TRANSPARENT {
        "none".to_string()
    } else {
        color.to_hex()
    }
}

fn gradient_url(id: &str) -> String {
    format!("url(#{})", escape_xml(id))
}

/// `name="..."` for a flat color, or a gradient reference with its
/// opacity when not fully opaque.
fn paint_attribute(name: &str, color: Color, gradient: Option<&(String, f32)>) -> String {
    match gradient {
        Some((id, opacity)) if *opacity < 1.0 => {
            format!(r#"{name}="{}" {name}-opacity="{opacity}""#, gradient_url(id))
        }
        Some((id, _)) => format!(r#"{name}="{}""#, gradient_url(id)),
        None => format!(r#"{name}="{}""#, paint_value(color)),
    }
}

/// Append a `<defs>` block for `gradients` at nesting `depth`.
fn write_defs(out: &mut String, depth: usize, gradients: &[Gradient]) {
    if gradients.is_empty() {
        return;
    }
    let pad = indent(depth);
    let _ = writeln!(out, "{pad}<defs>");
    for gradient in gradients {
        let id = escape_xml(&gradient.id);
        let (tag, geometry) = match gradient.kind {
            GradientKind::Linear { start, end } => (
                "linearGradient",
                format!(
                    r#"x1="{}%" y1="{}%" x2="{}%" y2="{}%""#,
                    start.x * 100.0,
                    start.y * 100.0,
                    end.x * 100.0,
                    end.y * 100.0
                ),
            ),
            GradientKind::Radial { center, radius } => (
                "radialGradient",
                format!(
                    r#"cx="{}%" cy="{}%" r="{}%""#,
                    center.x * 100.0,
                    center.y * 100.0,
                    radius * 100.0
                ),
            ),
        };
        let _ = writeln!(out, "{pad}  <{tag} id=\"{id}\" {geometry}>");
        for stop in &gradient.stops {
            let _ = writeln!(
                out,
                r#"{pad}    <stop offset="{}%" stop-color="{}"/>"#,
                stop.offset * 100.0,
                stop.color.to_hex()
            );
        }
        let _ = writeln!(out, "{pad}  </{tag}>");
    }
    let _ = writeln!(out, "{pad}</defs>");
}

fn points_attribute(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for use in element content or a quoted attribute.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
