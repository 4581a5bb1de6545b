//! The drawing surface contract implemented by rendering backends.

use std::path::Path;

use thiserror::Error;

use crate::color::Color;
use crate::gradient::Gradient;
use crate::path::PathCommand;
use crate::transform::AffineTransform;
use crate::Point;

/// Errors reported by a backend when persisting its output.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Surface was not initialized")]
    NotInitialized,

    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Resolved style handed to [`DrawingSurface::draw_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPaint {
    pub fill: Color,
    pub stroke: Color,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    pub stroke_width: f32,
}

/// Capabilities a rendering backend provides to the scene graph.
///
/// One surface value serves one render pass: the transform and group
/// stacks behind `push_transform`/`begin_group` belong to the surface
/// instance, never to shared state.
pub trait DrawingSurface {
    /// Reset the surface to an empty canvas of the given size.
    fn initialize(&mut self, width: u32, height: u32);

    fn set_fill_color(&mut self, r: u8, g: u8, b: u8, a: u8);

    fn set_stroke_color(&mut self, r: u8, g: u8, b: u8, a: u8);

    fn set_stroke_width(&mut self, width: f32);

    fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32);

    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn draw_line(&mut self, p1: Point, p2: Point);

    fn draw_polyline(&mut self, points: &[Point]);

    fn draw_polygon(&mut self, points: &[Point]);

    fn draw_text(&mut self, x: f32, y: f32, content: &str, font_size: f32, typeface: &str);

    /// Draw a parsed path. Relative commands are still relative; the
    /// surface resolves them against its own cursor.
    fn draw_path(&mut self, commands: &[PathCommand], paint: &PathPaint);

    /// Apply an SVG transform string on top of the current transform.
    fn push_transform(&mut self, transform: &str);

    /// Like [`push_transform`](Self::push_transform), with the matrix the
    /// scene already parsed from `source`. Backends that work on matrices
    /// override this; the default forwards the string.
    fn push_parsed_transform(&mut self, source: &str, _matrix: AffineTransform) {
        self.push_transform(source);
    }

    fn pop_transform(&mut self);

    /// Logical grouping hooks. Backends without grouping may ignore them.
    fn begin_group(&mut self) {}

    fn end_group(&mut self) {}

    /// Register a gradient that later paints may reference by id.
    fn define_gradient(&mut self, _gradient: &Gradient) {}

    /// Paint fills with a registered gradient until the next
    /// `set_fill_color`. `opacity` scales the gradient's stops.
    fn set_fill_gradient(&mut self, _id: &str, _opacity: f32) {}

    /// Stroke counterpart of [`set_fill_gradient`](Self::set_fill_gradient).
    fn set_stroke_gradient(&mut self, _id: &str, _opacity: f32) {}

    /// Persist accumulated output.
    fn save_to_file(&mut self, path: &Path) -> Result<(), SurfaceError>;
}
