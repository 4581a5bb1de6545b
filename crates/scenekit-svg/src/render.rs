//! Replays scene nodes against a [`DrawingSurface`].

use tracing::trace;

use crate::node::{Group, SceneNode, Style};
use crate::surface::{DrawingSurface, PathPaint};
use crate::Point;

impl SceneNode {
    /// Issue the drawing calls for this node and its descendants.
    ///
    /// Leaf nodes set fill, stroke and stroke width and then make exactly one
    /// shape call. Degenerate geometry makes no calls at all.
    pub fn render<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        match self {
            Self::Ellipse(e) => {
                with_transform(surface, &e.style, |s| {
                    draw_ellipse_shape(s, &e.style, e.center, e.rx, e.ry);
                });
            }
            Self::Circle(c) => {
                with_transform(surface, &c.style, |s| {
                    draw_ellipse_shape(s, &c.style, c.center, c.r, c.r);
                });
            }
            Self::Rectangle(r) => {
                with_transform(surface, &r.style, |s| {
                    apply_style(s, &r.style);
                    s.draw_rectangle(r.origin.x, r.origin.y, r.width, r.height);
                });
            }
            Self::Line(l) => {
                with_transform(surface, &l.style, |s| {
                    apply_style(s, &l.style);
                    s.draw_line(l.start, l.end);
                });
            }
            Self::Polyline(p) => {
                if p.points.len() < 2 {
                    trace!(points = p.points.len(), "Skipping degenerate polyline");
                    return;
                }
                with_transform(surface, &p.style, |s| {
                    apply_style(s, &p.style);
                    s.draw_polyline(&p.points);
                });
            }
            Self::Polygon(p) => {
                if p.points.len() < 3 {
                    trace!(points = p.points.len(), "Skipping degenerate polygon");
                    return;
                }
                with_transform(surface, &p.style, |s| {
                    apply_style(s, &p.style);
                    s.draw_polygon(&p.points);
                });
            }
            Self::Text(t) => {
                if t.content.is_empty() {
                    trace!("Skipping empty text");
                    return;
                }
                with_transform(surface, &t.style, |s| {
                    apply_style(s, &t.style);
                    s.draw_text(t.position.x, t.position.y, &t.content, t.font_size, &t.typeface);
                });
            }
            Self::Path(p) => {
                if p.commands().is_empty() {
                    trace!(d = p.path_data(), "Skipping empty path");
                    return;
                }
                let paint = PathPaint {
                    fill: p.style.fill,
                    stroke: p.style.stroke,
                    fill_opacity: p.style.fill_opacity,
                    stroke_opacity: p.style.stroke_opacity,
                    stroke_width: p.style.stroke_width,
                };
                with_transform(surface, &p.style, |s| {
                    apply_style(s, &p.style);
                    s.draw_path(p.commands(), &paint);
                });
            }
            Self::Group(g) => render_group(surface, g),
        }
    }
}

/// `begin_group`, optional transform bracket, children, `end_group`.
fn render_group<S: DrawingSurface + ?Sized>(surface: &mut S, group: &Group) {
    surface.begin_group();
    with_transform(surface, &group.style, |s| {
        for child in &group.children {
            child.render(s);
        }
    });
    surface.end_group();
}

/// Run `draw` between `push_transform`/`pop_transform` when the style
/// carries a transform.
fn with_transform<S, F>(surface: &mut S, style: &Style, draw: F)
where
    S: DrawingSurface + ?Sized,
    F: FnOnce(&mut S),
{
    match &style.transform {
        Some(transform) => {
            surface.push_parsed_transform(transform.source(), transform.matrix());
            draw(surface);
            surface.pop_transform();
        }
        None => draw(surface),
    }
}

fn apply_style<S: DrawingSurface + ?Sized>(surface: &mut S, style: &Style) {
    let fill = style.effective_fill().channels();
    let stroke = style.effective_stroke().channels();
    surface.set_fill_color(fill.r, fill.g, fill.b, fill.a);
    surface.set_stroke_color(stroke.r, stroke.g, stroke.b, stroke.a);
    surface.set_stroke_width(style.stroke_width);
    if let Some(id) = &style.fill_gradient {
        surface.set_fill_gradient(id, style.fill_opacity);
    }
    if let Some(id) = &style.stroke_gradient {
        surface.set_stroke_gradient(id, style.stroke_opacity);
    }
}

/// Shared by ellipses and circles.
fn draw_ellipse_shape<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    style: &Style,
    center: Point,
    rx: f32,
    ry: f32,
) {
    apply_style(surface, style);
    surface.draw_ellipse(center.x, center.y, rx, ry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::node::{NodeTransform, Rectangle};

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl DrawingSurface for Calls {
        fn initialize(&mut self, width: u32, height: u32) {
            self.0.push(format!("init {width}x{height}"));
        }
        fn set_fill_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
            self.0.push(format!("fill {}", Color::from_rgba(r, g, b, a)));
        }
        fn set_stroke_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
            self.0.push(format!("stroke {}", Color::from_rgba(r, g, b, a)));
        }
        fn set_stroke_width(&mut self, width: f32) {
            self.0.push(format!("width {width}"));
        }
        fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
            self.0.push(format!("ellipse {cx} {cy} {rx} {ry}"));
        }
        fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.0.push(format!("rect {x} {y} {width} {height}"));
        }
        fn draw_line(&mut self, _p1: Point, _p2: Point) {
            self.0.push("line".into());
        }
        fn draw_polyline(&mut self, _points: &[Point]) {
            self.0.push("polyline".into());
        }
        fn draw_polygon(&mut self, _points: &[Point]) {
            self.0.push("polygon".into());
        }
        fn draw_text(&mut self, _x: f32, _y: f32, content: &str, _size: f32, _typeface: &str) {
            self.0.push(format!("text {content}"));
        }
        fn draw_path(&mut self, _commands: &[crate::PathCommand], _paint: &PathPaint) {
            self.0.push("path".into());
        }
        fn push_transform(&mut self, transform: &str) {
            self.0.push(format!("push {transform}"));
        }
        fn pop_transform(&mut self) {
            self.0.push("pop".into());
        }
        fn set_fill_gradient(&mut self, id: &str, opacity: f32) {
            self.0.push(format!("fill-gradient {id} {opacity}"));
        }
        fn set_stroke_gradient(&mut self, id: &str, opacity: f32) {
            self.0.push(format!("stroke-gradient {id} {opacity}"));
        }
        fn save_to_file(&mut self, _path: &std::path::Path) -> Result<(), crate::SurfaceError> {
            Ok(())
        }
    }

    #[test]
    fn test_rectangle_call_sequence() {
        let node = SceneNode::Rectangle(Rectangle {
            origin: Point::new(1.0, 2.0),
            width: 3.0,
            height: 4.0,
            style: Style {
                fill_opacity: 0.5,
                ..Style::default()
            },
        });
        let mut calls = Calls::default();
        node.render(&mut calls);

        assert_eq!(
            calls.0,
            vec!["fill #00000080", "stroke #00000000", "width 1", "rect 1 2 3 4"]
        );
    }

    #[test]
    fn test_leaf_transform_is_bracketed() {
        let node = SceneNode::Rectangle(Rectangle {
            origin: Point::new(0.0, 0.0),
            width: 1.0,
            height: 1.0,
            style: Style {
                transform: NodeTransform::parse("scale(2)"),
                ..Style::default()
            },
        });
        let mut calls = Calls::default();
        node.render(&mut calls);

        assert_eq!(calls.0.first().map(String::as_str), Some("push scale(2)"));
        assert_eq!(calls.0.last().map(String::as_str), Some("pop"));
    }

    #[test]
    fn test_gradient_paints_follow_colors() {
        let node = SceneNode::Rectangle(Rectangle {
            origin: Point::new(0.0, 0.0),
            width: 1.0,
            height: 1.0,
            style: Style {
                fill: Color::TRANSPARENT,
                fill_opacity: 0.5,
                fill_gradient: Some("sky".into()),
                stroke_gradient: Some("glow".into()),
                ..Style::default()
            },
        });
        let mut calls = Calls::default();
        node.render(&mut calls);

        assert_eq!(
            calls.0,
            vec![
                "fill #00000000",
                "stroke #00000000",
                "width 1",
                "fill-gradient sky 0.5",
                "stroke-gradient glow 1",
                "rect 0 0 1 1",
            ]
        );
    }
}
