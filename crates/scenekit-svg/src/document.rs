//! SVG document loading and whole-scene rendering.

use std::path::Path;

use tracing::{debug, warn};

use crate::attributes::AttributeBag;
use crate::gradient::Gradient;
use crate::node::{Group, SceneNode};
use crate::surface::DrawingSurface;
use crate::{SvgError, SvgResult};

/// Fallback size when neither `width`/`height` nor `viewBox` is given.
const DEFAULT_WIDTH: f32 = 300.0;
const DEFAULT_HEIGHT: f32 = 150.0;

/// A loaded SVG document: its size, gradient definitions and top-level
/// scene nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgDocument {
    /// Document width.
    pub width: Option<f32>,
    /// Document height.
    pub height: Option<f32>,
    /// Gradients found anywhere in the document, in document order.
    pub gradients: Vec<Gradient>,
    /// Top-level nodes in document order.
    pub nodes: Vec<SceneNode>,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from SVG text.
    pub fn parse_str(xml: &str) -> SvgResult<Self> {
        let xml_doc = roxmltree::Document::parse(xml)?;
        let root = xml_doc.root_element();
        let root_name = root.tag_name().name();
        if root_name != "svg" {
            return Err(SvgError::MissingRoot(root_name.to_string()));
        }

        let view_box = root.attribute("viewBox").and_then(parse_view_box);
        let width = root
            .attribute("width")
            .and_then(parse_length)
            .or(view_box.map(|(w, _)| w));
        let height = root
            .attribute("height")
            .and_then(parse_length)
            .or(view_box.map(|(_, h)| h));

        let doc = Self {
            width,
            height,
            gradients: root.descendants().filter_map(Gradient::from_element).collect(),
            nodes: load_children(root),
        };

        debug!(
            ?width,
            ?height,
            gradients = doc.gradients.len(),
            top_level = doc.nodes.len(),
            total = doc.node_count(),
            "Loaded SVG document"
        );
        Ok(doc)
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> SvgResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading SVG document");
        let xml = std::fs::read_to_string(path)?;
        Self::parse_str(&xml)
    }

    /// Document size rounded to whole pixels.
    pub fn size(&self) -> (u32, u32) {
        let w = self.width.unwrap_or(DEFAULT_WIDTH);
        let h = self.height.unwrap_or(DEFAULT_HEIGHT);
        (w.max(0.0).round() as u32, h.max(0.0).round() as u32)
    }

    /// Number of nodes in the scene, groups included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(SceneNode::node_count).sum()
    }

    /// Initialize `surface` to the document size, define the gradients and
    /// draw every node.
    pub fn render<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        let (width, height) = self.size();
        self.render_with_size(surface, width, height);
    }

    /// Like [`render`](Self::render), with an explicit surface size.
    pub fn render_with_size<S: DrawingSurface + ?Sized>(&self, surface: &mut S, width: u32, height: u32) {
        debug!(width, height, nodes = self.nodes.len(), "Rendering SVG document");
        surface.initialize(width, height);
        for gradient in &self.gradients {
            surface.define_gradient(gradient);
        }
        for node in &self.nodes {
            node.render(surface);
        }
    }

    /// Drop the scene graph and gradient definitions.
    pub fn clear(&mut self) {
        self.gradients.clear();
        self.nodes.clear();
    }
}

/// Build nodes for the element children of `parent`, recursing into groups.
fn load_children(parent: roxmltree::Node<'_, '_>) -> Vec<SceneNode> {
    parent
        .children()
        .filter(roxmltree::Node::is_element)
        .filter_map(load_element)
        .collect()
}

fn load_element(element: roxmltree::Node<'_, '_>) -> Option<SceneNode> {
    let tag = element.tag_name().name();
    let attrs = AttributeBag::from_element(element);

    match tag {
        "g" => {
            let mut group = Group::from_attributes(&attrs);
            group.children = load_children(element);
            Some(SceneNode::Group(group))
        }
        // collected separately by `parse_str`
        "defs" | "linearGradient" | "radialGradient" => None,
        _ => SceneNode::from_element(tag, &attrs),
    }
}

/// A plain number, optionally with a `px` suffix.
fn parse_length(s: &str) -> Option<f32> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s);
    match s.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            warn!(value = s, "Unsupported document length, ignoring");
            None
        }
    }
}

/// Width and height from a `viewBox` attribute.
fn parse_view_box(s: &str) -> Option<(f32, f32)> {
    let parts: Vec<f32> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|p| p.trim().parse().ok())
        .collect();

    match parts.as_slice() {
        &[_, _, width, height] => Some((width, height)),
        _ => {
            warn!(view_box = s, "Malformed viewBox, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("100"), Some(100.0));
        assert_eq!(parse_length(" 64px "), Some(64.0));
        assert_eq!(parse_length("50%"), None);
        assert_eq!(parse_length("-3"), None);
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!(parse_view_box("0 0 24 48"), Some((24.0, 48.0)));
        assert_eq!(parse_view_box("0,0,10,20"), Some((10.0, 20.0)));
        assert_eq!(parse_view_box("0 0 10"), None);
    }

    #[test]
    fn test_size_falls_back_to_view_box() {
        let doc = SvgDocument::parse_str(r#"<svg viewBox="0 0 64 32" height="40"/>"#).unwrap();
        assert_eq!(doc.width, Some(64.0));
        assert_eq!(doc.height, Some(40.0));
        assert_eq!(doc.size(), (64, 40));

        assert_eq!(SvgDocument::new().size(), (300, 150));
    }
}
