//! Scene graph node types and their construction from element attributes.

use tracing::warn;

use crate::attributes::AttributeBag;
use crate::color::Color;
use crate::gradient::paint_reference;
use crate::path::{self, PathCommand};
use crate::transform::AffineTransform;
use crate::Point;

// ==================== Style ====================

/// A `transform` attribute, parsed once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransform {
    source: String,
    matrix: AffineTransform,
}

impl NodeTransform {
    /// Parse a transform attribute. Blank input yields `None`.
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        if source.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            matrix: AffineTransform::parse(source),
        })
    }

    /// Attribute text, as handed to [`DrawingSurface::push_transform`](crate::DrawingSurface::push_transform).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matrix(&self) -> AffineTransform {
        self.matrix
    }
}

/// Presentation attributes shared by every node.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Fill opacity.
    pub fill_opacity: f32,
    /// Stroke opacity.
    pub stroke_opacity: f32,
    /// Stroke width.
    pub stroke_width: f32,
    /// Gradient id from a `fill="url(#id)"` paint.
    pub fill_gradient: Option<String>,
    /// Gradient id from a `stroke="url(#id)"` paint.
    pub stroke_gradient: Option<String>,
    pub transform: Option<NodeTransform>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::TRANSPARENT,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
            fill_gradient: None,
            stroke_gradient: None,
            transform: None,
        }
    }
}

impl Style {
    /// Read the common presentation attributes.
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        let defaults = Self::default();
        let (fill, fill_gradient) = paint(attrs, "fill", defaults.fill);
        let (stroke, stroke_gradient) = paint(attrs, "stroke", defaults.stroke);

        Self {
            fill,
            stroke,
            fill_opacity: attrs.float("fill-opacity", defaults.fill_opacity),
            stroke_opacity: attrs.float("stroke-opacity", defaults.stroke_opacity),
            stroke_width: attrs.float("stroke-width", defaults.stroke_width),
            fill_gradient,
            stroke_gradient,
            transform: attrs.get("transform").and_then(NodeTransform::parse),
        }
    }

    /// The parsed transform, identity when there is none.
    pub fn transform_matrix(&self) -> AffineTransform {
        self.transform
            .as_ref()
            .map_or_else(AffineTransform::identity, NodeTransform::matrix)
    }

    /// Fill color with `fill_opacity` folded into its alpha.
    pub fn effective_fill(&self) -> Color {
        self.fill.with_opacity(self.fill_opacity)
    }

    /// Stroke color with `stroke_opacity` folded into its alpha.
    pub fn effective_stroke(&self) -> Color {
        self.stroke.with_opacity(self.stroke_opacity)
    }
}

/// A fill or stroke value: a gradient reference paints with a transparent
/// flat color, anything else is parsed as a color.
fn paint(attrs: &AttributeBag, name: &str, default: Color) -> (Color, Option<String>) {
    match attrs.get(name).and_then(paint_reference) {
        Some(id) => (Color::TRANSPARENT, Some(id.to_string())),
        None => (attrs.color(name, default), None),
    }
}

// ==================== Shapes ====================

/// `<ellipse>`
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f32,
    pub ry: f32,
    pub style: Style,
}

impl Ellipse {
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            center: Point::new(attrs.float("cx", 0.0), attrs.float("cy", 0.0)),
            rx: attrs.float("rx", 0.0),
            ry: attrs.float("ry", 0.0),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<circle>`
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub r: f32,
    pub style: Style,
}

impl Circle {
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            center: Point::new(attrs.float("cx", 0.0), attrs.float("cy", 0.0)),
            r: attrs.float("r", 0.0),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<rect>`
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// Top-left corner.
    pub origin: Point,
    pub width: f32,
    pub height: f32,
    pub style: Style,
}

impl Rectangle {
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            origin: Point::new(attrs.float("x", 0.0), attrs.float("y", 0.0)),
            width: attrs.float("width", 0.0),
            height: attrs.float("height", 0.0),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<line>`
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub style: Style,
}

impl Line {
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            start: Point::new(attrs.float("x1", 0.0), attrs.float("y1", 0.0)),
            end: Point::new(attrs.float("x2", 0.0), attrs.float("y2", 0.0)),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<polyline>`
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub style: Style,
}

impl Polyline {
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            points: parse_points(attrs.get("points").unwrap_or_default()),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<polygon>`
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices; the closing edge is implicit.
    pub points: Vec<Point>,
    pub style: Style,
}

impl Polygon {
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            points: parse_points(attrs.get("points").unwrap_or_default()),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<text>`
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub position: Point,
    pub content: String,
    pub font_size: f32,
    pub typeface: String,
    pub style: Style,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f32 = 16.0;
    pub const DEFAULT_TYPEFACE: &'static str = "Arial";

    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            position: Point::new(attrs.float("x", 0.0), attrs.float("y", 0.0)),
            content: attrs.text().to_string(),
            font_size: attrs.float("font-size", Self::DEFAULT_FONT_SIZE),
            typeface: attrs.string("font-family", Self::DEFAULT_TYPEFACE),
            style: Style::from_attributes(attrs),
        }
    }
}

/// `<path>`; the `d` attribute is parsed once, on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    d: String,
    commands: Vec<PathCommand>,
    pub style: Style,
}

impl PathShape {
    pub fn new(d: &str) -> Self {
        Self {
            d: d.to_string(),
            commands: path::parse(d),
            style: Style::default(),
        }
    }

    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            style: Style::from_attributes(attrs),
            ..Self::new(attrs.get("d").unwrap_or_default())
        }
    }

    /// Source path data.
    pub fn path_data(&self) -> &str {
        &self.d
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Replace the path data and re-parse it.
    pub fn set_path_data(&mut self, d: &str) {
        self.d = d.to_string();
        self.commands = path::parse(d);
    }
}

/// `<g>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub children: Vec<SceneNode>,
    pub style: Style,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty group carrying the element's style; children are added by
    /// the document loader.
    pub fn from_attributes(attrs: &AttributeBag) -> Self {
        Self {
            children: Vec::new(),
            style: Style::from_attributes(attrs),
        }
    }

    pub fn push(&mut self, child: SceneNode) {
        self.children.push(child);
    }
}

// ==================== Scene node ====================

/// A node of the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Ellipse(Ellipse),
    Circle(Circle),
    Rectangle(Rectangle),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Text(Text),
    Path(PathShape),
    Group(Group),
}

impl SceneNode {
    /// Build a leaf node for a shape element.
    ///
    /// Returns `None` for tags that are not drawable shapes, including `g`,
    /// which the document loader handles itself.
    pub fn from_element(tag: &str, attrs: &AttributeBag) -> Option<Self> {
        let node = match tag {
            "rect" => Self::Rectangle(Rectangle::from_attributes(attrs)),
            "circle" => Self::Circle(Circle::from_attributes(attrs)),
            "ellipse" => Self::Ellipse(Ellipse::from_attributes(attrs)),
            "line" => Self::Line(Line::from_attributes(attrs)),
            "polyline" => Self::Polyline(Polyline::from_attributes(attrs)),
            "polygon" => Self::Polygon(Polygon::from_attributes(attrs)),
            "text" => Self::Text(Text::from_attributes(attrs)),
            "path" => Self::Path(PathShape::from_attributes(attrs)),
            _ => {
                warn!(tag, "Unsupported element, skipping");
                return None;
            }
        };
        Some(node)
    }

    pub fn style(&self) -> &Style {
        match self {
            Self::Ellipse(n) => &n.style,
            Self::Circle(n) => &n.style,
            Self::Rectangle(n) => &n.style,
            Self::Line(n) => &n.style,
            Self::Polyline(n) => &n.style,
            Self::Polygon(n) => &n.style,
            Self::Text(n) => &n.style,
            Self::Path(n) => &n.style,
            Self::Group(n) => &n.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut Style {
        match self {
            Self::Ellipse(n) => &mut n.style,
            Self::Circle(n) => &mut n.style,
            Self::Rectangle(n) => &mut n.style,
            Self::Line(n) => &mut n.style,
            Self::Polyline(n) => &mut n.style,
            Self::Polygon(n) => &mut n.style,
            Self::Text(n) => &mut n.style,
            Self::Path(n) => &mut n.style,
            Self::Group(n) => &mut n.style,
        }
    }

    pub fn set_fill(&mut self, color: Color) {
        self.style_mut().fill = color;
    }

    pub fn set_stroke(&mut self, color: Color) {
        self.style_mut().stroke = color;
    }

    pub fn set_fill_opacity(&mut self, opacity: f32) {
        self.style_mut().fill_opacity = opacity;
    }

    pub fn set_stroke_opacity(&mut self, opacity: f32) {
        self.style_mut().stroke_opacity = opacity;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.style_mut().stroke_width = width;
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Group(g) => 1 + g.children.iter().map(Self::node_count).sum::<usize>(),
            _ => 1,
        }
    }
}

/// Parse a `points` attribute (`"x1,y1 x2,y2 ..."`).
///
/// Tokens are separated by whitespace; a token that is not exactly two
/// comma-separated numbers is skipped.
pub fn parse_points(s: &str) -> Vec<Point> {
    s.split_whitespace()
        .filter_map(|token| {
            let point = token
                .split_once(',')
                .and_then(|(x, y)| Some(Point::new(parse_coord(x)?, parse_coord(y)?)));
            if point.is_none() {
                warn!(token, "Invalid point in points list, skipping");
            }
            point
        })
        .collect()
}

fn parse_coord(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
