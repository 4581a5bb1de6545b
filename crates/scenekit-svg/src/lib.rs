//! # SceneKit SVG
//!
//! SVG ingestion, scene graph and render dispatch for SceneKit.
//!
//! ## Features
//!
//! - **Document loading**: parse an `<svg>` document into a scene graph
//! - **Basic Shapes**: rect, circle, ellipse, line, polyline, polygon, text
//! - **Paths**: SVG path commands (M, L, H, V, C, Q, Z), absolute and relative
//! - **Transforms**: `translate`, `scale`, `rotate` parsed into affine matrices
//! - **Styling**: fill, stroke, opacities, stroke width
//! - **Gradients**: linear and radial gradients referenced as `url(#id)` paints
//! - **Rendering**: replay the scene against any [`DrawingSurface`]
//!
//! ## Architecture
//!
//! ```text
//! SVG Document
//!    ├── Gradients (<linearGradient>, <radialGradient>)
//!    └── Scene Nodes
//!           ├── Shapes (rect, circle, path, ...)
//!           ├── Text
//!           └── Groups (<g>)
//!                 └── push/pop transform on the surface
//! ```

use thiserror::Error;

pub mod attributes;
pub mod color;
pub mod document;
pub mod gradient;
pub mod node;
pub mod path;
mod render;
pub mod surface;
pub mod transform;

pub use attributes::AttributeBag;
pub use color::{Color, Rgba};
pub use document::SvgDocument;
pub use gradient::{Gradient, GradientKind, GradientStop};
pub use node::{
    Circle, Ellipse, Group, Line, NodeTransform, PathShape, Polygon, Polyline, Rectangle, SceneNode,
    Style, Text,
};
pub use path::{PathCommand, PathCommandKind};
pub use surface::{DrawingSurface, PathPaint, SurfaceError};
pub use transform::AffineTransform;

// ==================== Errors ====================

/// Errors that abort loading a whole document.
///
/// Per-element problems (unknown tags, bad numbers, malformed points) are
/// logged and skipped instead; they never surface here.
#[derive(Error, Debug)]
pub enum SvgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Missing root <svg> element, found <{0}>")]
    MissingRoot(String),
}

/// Result type for document loading.
pub type SvgResult<T> = Result<T, SvgError>;

// ==================== Geometry ====================

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
