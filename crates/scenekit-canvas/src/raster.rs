//! Raster drawing surface backed by tiny-skia.

use std::collections::HashMap;
use std::path::Path;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use scenekit_svg::{
    AffineTransform, Color, DrawingSurface, Gradient, GradientKind, PathCommand, PathPaint, Point,
    SurfaceError,
};
use tiny_skia::{
    ColorU8, FillRule, LinearGradient, Paint, PathBuilder, Pixmap, PixmapPaint, RadialGradient,
    Rect, Shader, SpreadMode, Stroke, Transform,
};
use tracing::{debug, trace, warn};

use crate::outline::{resolve, Segment};
use crate::{CanvasError, CanvasResult};

/// A [`DrawingSurface`] that paints into a pixmap and saves PNG files.
pub struct RasterCanvas {
    pixmap: Option<Pixmap>,
    /// Size requested by the last `initialize`.
    size: Option<(u32, u32)>,
    background: Color,
    fill: Color,
    stroke: Color,
    stroke_width: f32,
    gradients: HashMap<String, Gradient>,
    /// Gradient id and opacity overriding the flat fill or stroke.
    fill_gradient: Option<(String, f32)>,
    stroke_gradient: Option<(String, f32)>,
    /// Composed transforms; the last entry is current.
    transforms: Vec<AffineTransform>,
    font: Option<fontdue::Font>,
    font_warned: bool,
}

impl Default for RasterCanvas {
    fn default() -> Self {
        Self {
            pixmap: None,
            size: None,
            background: Color::WHITE,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            gradients: HashMap::new(),
            fill_gradient: None,
            stroke_gradient: None,
            transforms: Vec::new(),
            font: None,
            font_warned: false,
        }
    }
}

impl std::fmt::Debug for RasterCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterCanvas")
            .field("size", &self.size)
            .field("background", &self.background)
            .field("depth", &self.transforms.len())
            .field("gradients", &self.gradients.len())
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl RasterCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color `initialize` clears to.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Use a TrueType/OpenType font for text.
    pub fn with_font(mut self, bytes: &[u8]) -> CanvasResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(CanvasError::font)?;
        self.font = Some(font);
        Ok(self)
    }

    /// Load the text font from a file.
    pub fn with_font_file(self, path: impl AsRef<Path>) -> CanvasResult<Self> {
        let bytes = std::fs::read(path)?;
        self.with_font(&bytes)
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color::from_rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Current composed transform.
    pub fn current_transform(&self) -> AffineTransform {
        self.transforms.last().copied().unwrap_or_default()
    }

    fn skia_transform(&self) -> Transform {
        let [a, b, c, d, e, f, ..] = self.current_transform().matrix();
        Transform::from_row(a, d, b, e, c, f)
    }

    /// Fill then stroke `path` with the current colors or gradients.
    fn paint_path(&mut self, path: &tiny_skia::Path, fill: Option<Color>, stroke: Color, stroke_width: f32) {
        let transform = self.skia_transform();
        let fill = fill.and_then(|color| self.brush(path, color, self.fill_gradient.as_ref()));
        let stroke = if stroke_width > 0.0 {
            self.brush(path, stroke, self.stroke_gradient.as_ref())
        } else {
            None
        };
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        if let Some(paint) = fill {
            pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
        }
        if let Some(paint) = stroke {
            let style = Stroke {
                width: stroke_width,
                ..Stroke::default()
            };
            pixmap.stroke_path(path, &paint, &style, transform, None);
        }
    }

    /// The referenced gradient spread over the path's bounds, or the flat
    /// color when there is no usable gradient. `None` if nothing would show.
    fn brush(&self, path: &tiny_skia::Path, color: Color, gradient: Option<&(String, f32)>) -> Option<Paint<'static>> {
        if let Some((id, opacity)) = gradient {
            match self.gradients.get(id).and_then(|g| gradient_shader(g, *opacity, path.bounds())) {
                Some(shader) => {
                    return Some(Paint {
                        shader,
                        anti_alias: true,
                        ..Paint::default()
                    })
                }
                None => warn!(id = id.as_str(), "Unknown or unusable gradient, using flat color"),
            }
        }
        (color.alpha() > 0).then(|| solid_paint(color))
    }

    fn paint_shape(&mut self, path: Option<tiny_skia::Path>) {
        if let Some(path) = path {
            self.paint_path(&path, Some(self.fill), self.stroke, self.stroke_width);
        }
    }

    fn stroke_only(&mut self, path: Option<tiny_skia::Path>) {
        if let Some(path) = path {
            self.paint_path(&path, None, self.stroke, self.stroke_width);
        }
    }
}

impl DrawingSurface for RasterCanvas {
    fn initialize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
        self.transforms.clear();
        self.gradients.clear();
        self.fill_gradient = None;
        self.stroke_gradient = None;
        self.pixmap = Pixmap::new(width, height);

        match self.pixmap.as_mut() {
            Some(pixmap) => {
                let bg = self.background.channels();
                pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
                debug!(width, height, "Initialized raster canvas");
            }
            None => warn!(width, height, "Cannot allocate raster canvas"),
        }
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
        let path = Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0).and_then(PathBuilder::from_oval);
        self.paint_shape(path);
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let path = Rect::from_xywh(x, y, width, height).map(PathBuilder::from_rect);
        self.paint_shape(path);
    }

    fn draw_line(&mut self, p1: Point, p2: Point) {
        let mut pb = PathBuilder::new();
        pb.move_to(p1.x, p1.y);
        pb.line_to(p2.x, p2.y);
        self.stroke_only(pb.finish());
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        self.stroke_only(polyline_path(points, false));
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        self.paint_shape(polyline_path(points, true));
    }

    fn draw_text(&mut self, x: f32, y: f32, content: &str, font_size: f32, _typeface: &str) {
        let Some(font) = self.font.as_ref() else {
            if !self.font_warned {
                warn!("No font loaded, raster text is skipped");
                self.font_warned = true;
            }
            return;
        };
        let fill = self.fill;
        if fill.alpha() == 0 {
            return;
        }
        let transform = self.skia_transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        // y is the baseline; the layout wants the top of the line box
        let px = font_size.max(1.0);
        let ascent = font.horizontal_line_metrics(px).map_or(px, |m| m.ascent);
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x,
            y: y - ascent,
            ..LayoutSettings::default()
        });
        layout.append(&[font], &TextStyle::new(content, px, 0));

        let rgba = fill.channels();
        for glyph in layout.glyphs() {
            let (metrics, coverage) = font.rasterize_indexed(glyph.key.glyph_index, glyph.key.px);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            let Some(mut mask) = Pixmap::new(metrics.width as u32, metrics.height as u32) else {
                continue;
            };
            for (dst, &cov) in mask.pixels_mut().iter_mut().zip(coverage.iter()) {
                let a = (u16::from(cov) * u16::from(rgba.a) / 255) as u8;
                *dst = ColorU8::from_rgba(rgba.r, rgba.g, rgba.b, a).premultiply();
            }
            pixmap.draw_pixmap(
                glyph.x.round() as i32,
                glyph.y.round() as i32,
                mask.as_ref(),
                &PixmapPaint::default(),
                transform,
                None,
            );
        }
        trace!(content, font_size, "Drew raster text");
    }

    fn draw_path(&mut self, commands: &[PathCommand], paint: &PathPaint) {
        let mut pb = PathBuilder::new();
        for segment in resolve(commands) {
            match segment {
                Segment::MoveTo(p) => pb.move_to(p.x, p.y),
                Segment::LineTo(p) => pb.line_to(p.x, p.y),
                Segment::QuadTo(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
                Segment::CubicTo(c1, c2, p) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                Segment::Close => pb.close(),
            }
        }
        let Some(path) = pb.finish() else {
            trace!(commands = commands.len(), "Path has no drawable outline");
            return;
        };
        let fill = paint.fill.with_opacity(paint.fill_opacity);
        let stroke = paint.stroke.with_opacity(paint.stroke_opacity);
        self.paint_path(&path, Some(fill), stroke, paint.stroke_width);
    }

    fn push_transform(&mut self, transform: &str) {
        self.push_parsed_transform(transform, AffineTransform::parse(transform));
    }

    fn push_parsed_transform(&mut self, _source: &str, matrix: AffineTransform) {
        let next = self.current_transform() * matrix;
        self.transforms.push(next);
    }

    fn pop_transform(&mut self) {
        if self.transforms.pop().is_none() {
            warn!("pop_transform without matching push_transform, ignoring");
        }
    }

    fn define_gradient(&mut self, gradient: &Gradient) {
        if self.gradients.insert(gradient.id.clone(), gradient.clone()).is_some() {
            debug!(id = gradient.id.as_str(), "Gradient redefined");
        }
    }

    fn set_fill_gradient(&mut self, id: &str, opacity: f32) {
        self.fill_gradient = Some((id.to_string(), opacity));
    }

    fn set_stroke_gradient(&mut self, id: &str, opacity: f32) {
        self.stroke_gradient = Some((id.to_string(), opacity));
    }

    fn save_to_file(&mut self, path: &Path) -> Result<(), SurfaceError> {
        let pixmap = match (&self.pixmap, self.size) {
            (Some(pixmap), _) => pixmap,
            (None, Some((width, height))) => return Err(SurfaceError::InvalidSize { width, height }),
            (None, None) => return Err(SurfaceError::NotInitialized),
        };
        let png = pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        std::fs::write(path, &png)?;
        debug!(path = %path.display(), bytes = png.len(), "Wrote PNG");
        Ok(())
    }
}

fn solid_paint(color: Color) -> Paint<'static> {
    let c = color.channels();
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = true;
    paint
}

/// A pad-spread shader whose unit square maps onto `bounds`, with stop
/// alpha scaled by `opacity`.
fn gradient_shader(gradient: &Gradient, opacity: f32, bounds: Rect) -> Option<Shader<'static>> {
    let stops = gradient
        .stops
        .iter()
        .map(|stop| {
            let c = stop.color.with_opacity(opacity).channels();
            tiny_skia::GradientStop::new(stop.offset, tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a))
        })
        .collect();
    let unit = Transform::from_row(bounds.width(), 0.0, 0.0, bounds.height(), bounds.left(), bounds.top());
    let point = |p: Point| tiny_skia::Point::from_xy(p.x, p.y);
    match gradient.kind {
        GradientKind::Linear { start, end } => {
            LinearGradient::new(point(start), point(end), stops, SpreadMode::Pad, unit)
        }
        GradientKind::Radial { center, radius } => RadialGradient::new(
            point(center),
            point(center),
            radius,
            stops,
            SpreadMode::Pad,
            unit,
        ),
    }
}

fn polyline_path(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}
