//! Linear and radial gradient definitions and `url(#id)` paint references.
//!
//! Gradient geometry is kept in bounding-box units: `0.0..=1.0` spans the
//! painted shape's bounds, so `50%` and `0.5` are the same coordinate.

use tracing::warn;

use crate::attributes::AttributeBag;
use crate::color::Color;
use crate::Point;

/// One color stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, `0.0..=1.0`.
    pub offset: f32,
    /// Stop color with `stop-opacity` folded into its alpha.
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    Linear { start: Point, end: Point },
    Radial { center: Point, radius: f32 },
}

/// A named gradient, referenced from paints as `url(#id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn linear(id: impl Into<String>, start: Point, end: Point, stops: Vec<GradientStop>) -> Self {
        Self {
            id: id.into(),
            kind: GradientKind::Linear { start, end },
            stops,
        }
    }

    pub fn radial(id: impl Into<String>, center: Point, radius: f32, stops: Vec<GradientStop>) -> Self {
        Self {
            id: id.into(),
            kind: GradientKind::Radial { center, radius },
            stops,
        }
    }

    /// Build a gradient from a `<linearGradient>` or `<radialGradient>`
    /// element and its `<stop>` children.
    ///
    /// Returns `None` for other elements and for gradients without an `id`,
    /// which nothing could reference.
    pub fn from_element(element: roxmltree::Node<'_, '_>) -> Option<Self> {
        let tag = element.tag_name().name();
        if !matches!(tag, "linearGradient" | "radialGradient") {
            return None;
        }
        let attrs = AttributeBag::from_element(element);

        let kind = match tag {
            "linearGradient" => GradientKind::Linear {
                start: Point::new(fraction(&attrs, "x1", 0.0), fraction(&attrs, "y1", 0.0)),
                end: Point::new(fraction(&attrs, "x2", 1.0), fraction(&attrs, "y2", 0.0)),
            },
            "radialGradient" => GradientKind::Radial {
                center: Point::new(fraction(&attrs, "cx", 0.5), fraction(&attrs, "cy", 0.5)),
                radius: fraction(&attrs, "r", 0.5),
            },
            _ => return None,
        };

        let Some(id) = attrs.get("id").map(str::trim).filter(|id| !id.is_empty()) else {
            warn!(tag, "Gradient without id, skipping");
            return None;
        };

        if let Some(units) = attrs.get("gradientUnits").filter(|u| *u != "objectBoundingBox") {
            warn!(id, units, "Unsupported gradientUnits, using objectBoundingBox");
        }

        Some(Self {
            id: id.to_string(),
            kind,
            stops: parse_stops(element),
        })
    }
}

/// Stops in document order. Offsets are clamped to `0..=1` and never
/// decrease.
fn parse_stops(element: roxmltree::Node<'_, '_>) -> Vec<GradientStop> {
    let mut last = 0.0f32;
    element
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "stop")
        .map(|stop| {
            let attrs = AttributeBag::from_element(stop);
            let offset = fraction(&attrs, "offset", 0.0).clamp(0.0, 1.0).max(last);
            last = offset;
            let color = attrs
                .color("stop-color", Color::BLACK)
                .with_opacity(attrs.float("stop-opacity", 1.0));
            GradientStop::new(offset, color)
        })
        .collect()
}

/// A number or percentage, as a fraction.
fn fraction(attrs: &AttributeBag, name: &str, default: f32) -> f32 {
    let Some(raw) = attrs.get(name) else {
        return default;
    };
    parse_fraction(raw).unwrap_or_else(|| {
        warn!(attribute = name, value = raw, "Invalid gradient coordinate, using default");
        default
    })
}

fn parse_fraction(s: &str) -> Option<f32> {
    let s = s.trim();
    let value = match s.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// The id named by a `url(#id)` paint value.
///
/// Anything after the closing parenthesis, such as a fallback color, is
/// ignored.
pub fn paint_reference(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("url(")?;
    let (target, _) = inner.split_once(')')?;
    target
        .trim()
        .strip_prefix('#')
        .map(str::trim)
        .filter(|id| !id.is_empty())
}
