//! Render dispatch tests against a recording surface

use std::path::Path;

use scenekit_svg::{
    AttributeBag, Circle, Color, DrawingSurface, Gradient, GradientKind, Group, NodeTransform,
    PathCommand, PathPaint, PathShape, Point, Polygon, Polyline, SceneNode, Style, SurfaceError,
    SvgDocument, Text,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Init(u32, u32),
    Fill(Color),
    Stroke(Color),
    Width(f32),
    Ellipse(f32, f32, f32, f32),
    Rect(f32, f32, f32, f32),
    Line(Point, Point),
    Polyline(Vec<Point>),
    Polygon(Vec<Point>),
    Text(String, f32, String),
    Path(Vec<PathCommand>, PathPaint),
    Push(String),
    Pop,
    DefineGradient(Gradient),
    FillGradient(String, f32),
    StrokeGradient(String, f32),
    BeginGroup,
    EndGroup,
}

#[derive(Debug, Default)]
struct RecordingSurface {
    calls: Vec<Call>,
}

impl RecordingSurface {
    /// Calls with the style setters filtered out.
    fn shape_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::Fill(_)
                        | Call::Stroke(_)
                        | Call::Width(_)
                        | Call::FillGradient(..)
                        | Call::StrokeGradient(..)
                )
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn initialize(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Init(width, height));
    }

    fn set_fill_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.calls.push(Call::Fill(Color::from_rgba(r, g, b, a)));
    }

    fn set_stroke_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.calls.push(Call::Stroke(Color::from_rgba(r, g, b, a)));
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.calls.push(Call::Width(width));
    }

    fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.calls.push(Call::Ellipse(cx, cy, rx, ry));
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.calls.push(Call::Rect(x, y, width, height));
    }

    fn draw_line(&mut self, p1: Point, p2: Point) {
        self.calls.push(Call::Line(p1, p2));
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        self.calls.push(Call::Polyline(points.to_vec()));
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        self.calls.push(Call::Polygon(points.to_vec()));
    }

    fn draw_text(&mut self, _x: f32, _y: f32, content: &str, font_size: f32, typeface: &str) {
        self.calls
            .push(Call::Text(content.to_string(), font_size, typeface.to_string()));
    }

    fn draw_path(&mut self, commands: &[PathCommand], paint: &PathPaint) {
        self.calls.push(Call::Path(commands.to_vec(), *paint));
    }

    fn push_transform(&mut self, transform: &str) {
        self.calls.push(Call::Push(transform.to_string()));
    }

    fn pop_transform(&mut self) {
        self.calls.push(Call::Pop);
    }

    fn begin_group(&mut self) {
        self.calls.push(Call::BeginGroup);
    }

    fn end_group(&mut self) {
        self.calls.push(Call::EndGroup);
    }

    fn define_gradient(&mut self, gradient: &Gradient) {
        self.calls.push(Call::DefineGradient(gradient.clone()));
    }

    fn set_fill_gradient(&mut self, id: &str, opacity: f32) {
        self.calls.push(Call::FillGradient(id.to_string(), opacity));
    }

    fn set_stroke_gradient(&mut self, id: &str, opacity: f32) {
        self.calls.push(Call::StrokeGradient(id.to_string(), opacity));
    }

    fn save_to_file(&mut self, _path: &Path) -> Result<(), SurfaceError> {
        Ok(())
    }
}

fn points(n: usize) -> Vec<Point> {
    (0..n).map(|i| Point::new(i as f32, (i * 2) as f32)).collect()
}

fn render(node: &SceneNode) -> RecordingSurface {
    let mut surface = RecordingSurface::default();
    node.render(&mut surface);
    surface
}

#[test]
fn test_polygon_needs_three_points() {
    for n in 0..3 {
        let node = SceneNode::Polygon(Polygon {
            points: points(n),
            style: Style::default(),
        });
        assert!(render(&node).calls.is_empty(), "{n} points");
    }

    for n in [3, 4, 9] {
        let node = SceneNode::Polygon(Polygon {
            points: points(n),
            style: Style::default(),
        });
        let surface = render(&node);
        // unmodified list, no closing point appended
        assert_eq!(surface.shape_calls(), vec![&Call::Polygon(points(n))]);
    }
}

#[test]
fn test_polyline_needs_two_points() {
    let node = SceneNode::Polyline(Polyline {
        points: points(1),
        style: Style::default(),
    });
    assert!(render(&node).calls.is_empty());

    let node = SceneNode::Polyline(Polyline {
        points: points(2),
        style: Style::default(),
    });
    assert_eq!(render(&node).shape_calls(), vec![&Call::Polyline(points(2))]);
}

#[test]
fn test_empty_text_and_path_emit_nothing() {
    let text = SceneNode::from_element("text", &AttributeBag::new().with_text("   ")).unwrap();
    assert!(render(&text).calls.is_empty());

    let path = SceneNode::Path(PathShape::new("Q 1 2"));
    assert!(render(&path).calls.is_empty());
}

#[test]
fn test_style_set_before_single_shape_call() {
    let node = SceneNode::Circle(Circle {
        center: Point::new(5.0, 6.0),
        r: 2.0,
        style: Style {
            fill: Color(0x1020_30FF),
            stroke: Color(0x4050_60FF),
            stroke_opacity: 0.0,
            stroke_width: 2.5,
            ..Style::default()
        },
    });

    assert_eq!(
        render(&node).calls,
        vec![
            Call::Fill(Color(0x1020_30FF)),
            Call::Stroke(Color(0x4050_6000)),
            Call::Width(2.5),
            Call::Ellipse(5.0, 6.0, 2.0, 2.0),
        ]
    );
}

#[test]
fn test_default_fill_is_opaque_black() {
    let node = SceneNode::from_element("rect", &AttributeBag::new().with("width", "3")).unwrap();
    let surface = render(&node);
    assert_eq!(surface.calls[0], Call::Fill(Color(0x0000_00FF)));
    assert_eq!(surface.calls[1], Call::Stroke(Color(0x0000_0000)));
}

#[test]
fn test_text_call() {
    let node = SceneNode::Text(Text {
        position: Point::new(1.0, 2.0),
        content: "hello".into(),
        font_size: 12.0,
        typeface: "Mono".into(),
        style: Style::default(),
    });
    assert_eq!(
        render(&node).shape_calls(),
        vec![&Call::Text("hello".into(), 12.0, "Mono".into())]
    );
}

#[test]
fn test_path_paint_carries_raw_style() {
    let attrs = AttributeBag::new()
        .with("d", "M 0 0 l 5 5 Z")
        .with("fill", "#ff0000")
        .with("fill-opacity", "0.5")
        .with("stroke", "blue")
        .with("stroke-width", "2");
    let node = SceneNode::from_element("path", &attrs).unwrap();
    let surface = render(&node);

    let shapes = surface.shape_calls();
    let [Call::Path(commands, paint)] = shapes[..] else {
        panic!("expected a single path call, got {:?}", surface.calls);
    };
    assert_eq!(commands.len(), 3);
    assert!(commands[1].relative);
    assert_eq!(
        *paint,
        PathPaint {
            fill: Color(0xFF00_00FF),
            stroke: Color(0x0000_FFFF),
            fill_opacity: 0.5,
            stroke_opacity: 1.0,
            stroke_width: 2.0,
        }
    );
}

#[test]
fn test_group_with_transform_brackets() {
    let group = SceneNode::Group(Group {
        children: Vec::new(),
        style: Style {
            transform: NodeTransform::parse("translate(10, 20)"),
            ..Style::default()
        },
    });
    assert_eq!(
        render(&group).calls,
        vec![
            Call::BeginGroup,
            Call::Push("translate(10, 20)".into()),
            Call::Pop,
            Call::EndGroup,
        ]
    );
}

#[test]
fn test_group_without_transform() {
    let mut group = Group::new();
    group.push(SceneNode::Polygon(Polygon {
        points: points(3),
        style: Style::default(),
    }));
    let surface = render(&SceneNode::Group(group));
    assert_eq!(
        surface.shape_calls(),
        vec![&Call::BeginGroup, &Call::Polygon(points(3)), &Call::EndGroup]
    );
}

#[test]
fn test_nested_groups_balance() {
    let doc = SvgDocument::parse_str(
        r#"<svg width="10" height="10">
            <g transform="scale(2)">
                <g transform="rotate(45)">
                    <circle r="1"/>
                </g>
                <g><rect width="1" height="1"/></g>
            </g>
        </svg>"#,
    )
    .unwrap();

    let mut surface = RecordingSurface::default();
    doc.render(&mut surface);

    assert_eq!(
        surface.shape_calls(),
        vec![
            &Call::Init(10, 10),
            &Call::BeginGroup,
            &Call::Push("scale(2)".into()),
            &Call::BeginGroup,
            &Call::Push("rotate(45)".into()),
            &Call::Ellipse(0.0, 0.0, 1.0, 1.0),
            &Call::Pop,
            &Call::EndGroup,
            &Call::BeginGroup,
            &Call::Rect(0.0, 0.0, 1.0, 1.0),
            &Call::EndGroup,
            &Call::Pop,
            &Call::EndGroup,
        ]
    );
}

#[test]
fn test_leaf_transform_brackets_only_its_shape() {
    let node = SceneNode::from_element(
        "line",
        &AttributeBag::new().with("x2", "4").with("transform", "rotate(90)"),
    )
    .unwrap();
    assert_eq!(
        render(&node).shape_calls(),
        vec![
            &Call::Push("rotate(90)".into()),
            &Call::Line(Point::new(0.0, 0.0), Point::new(4.0, 0.0)),
            &Call::Pop,
        ]
    );
}

#[test]
fn test_gradients_defined_before_nodes() {
    let doc = SvgDocument::parse_str(
        r##"<svg width="10" height="10">
            <rect width="4" height="4" fill="url(#sky)" fill-opacity="0.5"/>
            <defs>
                <linearGradient id="sky"><stop offset="0" stop-color="blue"/></linearGradient>
            </defs>
            <g><radialGradient id="glow"/></g>
            <line x2="4" stroke="url(#glow)"/>
        </svg>"##,
    )
    .unwrap();

    let mut surface = RecordingSurface::default();
    doc.render(&mut surface);

    let defined: Vec<&str> = surface
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::DefineGradient(g) => Some(g.id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(defined, vec!["sky", "glow"]);
    assert_eq!(surface.calls[0], Call::Init(10, 10));
    assert!(matches!(
        &surface.calls[1],
        Call::DefineGradient(Gradient { kind: GradientKind::Linear { .. }, .. })
    ));

    let paints: Vec<&Call> = surface
        .calls
        .iter()
        .filter(|c| matches!(c, Call::FillGradient(..) | Call::StrokeGradient(..)))
        .collect();
    assert_eq!(
        paints,
        vec![
            &Call::FillGradient("sky".into(), 0.5),
            &Call::StrokeGradient("glow".into(), 1.0),
        ]
    );

    // the gradient paint follows the flat colors and precedes the shape
    let rect = surface
        .calls
        .iter()
        .position(|c| matches!(c, Call::Rect(..)))
        .unwrap();
    assert_eq!(surface.calls[rect - 1], Call::FillGradient("sky".into(), 0.5));
    assert_eq!(surface.calls[rect - 4], Call::Fill(Color::TRANSPARENT));
}
