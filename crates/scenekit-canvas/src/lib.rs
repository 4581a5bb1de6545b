//! # SceneKit Canvas
//!
//! Drawing surfaces for the SceneKit scene graph.
//!
//! ## Features
//!
//! - **SvgWriter**: re-emits the scene as SVG markup
//! - **RasterCanvas**: paints the scene into a pixmap and saves PNG files
//! - **Outlines**: resolves relative path commands to absolute segments
//!
//! Both surfaces implement [`scenekit_svg::DrawingSurface`]; one surface
//! value serves one render pass.

use thiserror::Error;

pub mod markup;
pub mod outline;
pub mod raster;

pub use markup::SvgWriter;
pub use outline::{resolve, Segment};
pub use raster::RasterCanvas;

/// Errors raised while configuring a surface.
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font error: {0}")]
    Font(String),
}

impl CanvasError {
    /// Create a new font error
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }
}

/// Result type for surface configuration.
pub type CanvasResult<T> = Result<T, CanvasError>;
