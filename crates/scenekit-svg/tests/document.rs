//! Document loading tests

use std::io::Write;

use scenekit_svg::{
    Color, GradientKind, GradientStop, NodeTransform, PathCommandKind, Point, SceneNode,
    SvgDocument, SvgError,
};

const SAMPLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
    <title>ignored</title>
    <rect x="10" y="10" width="50" height="30" fill="#ff0000" stroke="black" stroke-width="2"/>
    <circle cx="100" cy="50" r="20" fill="none" stroke="#00ff00"/>
    <ellipse cx="150" cy="50" rx="30" ry="10" fill-opacity="0.5"/>
    <line x1="0" y1="0" x2="200" y2="100" stroke="blue"/>
    <polyline points="0,0 10,10 20,0 oops"/>
    <polygon points="5,5 15,5 10,15"/>
    <text x="20" y="90" font-size="14">Hello</text>
    <path d="M 0 0 L 10 0 L 10 10 Z"/>
    <g transform="translate(5, 5)">
        <rect width="1" height="1"/>
        <unknown/>
    </g>
</svg>"##;

#[test]
fn test_loads_every_supported_element() {
    let doc = SvgDocument::parse_str(SAMPLE).unwrap();

    assert_eq!(doc.width, Some(200.0));
    assert_eq!(doc.height, Some(100.0));
    // <title> is skipped
    assert_eq!(doc.nodes.len(), 9);
    assert_eq!(doc.node_count(), 10);

    let kinds: Vec<&str> = doc
        .nodes
        .iter()
        .map(|n| match n {
            SceneNode::Rectangle(_) => "rect",
            SceneNode::Circle(_) => "circle",
            SceneNode::Ellipse(_) => "ellipse",
            SceneNode::Line(_) => "line",
            SceneNode::Polyline(_) => "polyline",
            SceneNode::Polygon(_) => "polygon",
            SceneNode::Text(_) => "text",
            SceneNode::Path(_) => "path",
            SceneNode::Group(_) => "g",
        })
        .collect();
    assert_eq!(
        kinds,
        ["rect", "circle", "ellipse", "line", "polyline", "polygon", "text", "path", "g"]
    );
}

#[test]
fn test_element_attributes() {
    let doc = SvgDocument::parse_str(SAMPLE).unwrap();

    let SceneNode::Rectangle(rect) = &doc.nodes[0] else {
        panic!("expected rect");
    };
    assert_eq!(rect.origin, Point::new(10.0, 10.0));
    assert_eq!(rect.style.fill, Color(0xFF00_00FF));
    assert_eq!(rect.style.stroke, Color(0x0000_00FF));
    assert_eq!(rect.style.stroke_width, 2.0);

    let SceneNode::Circle(circle) = &doc.nodes[1] else {
        panic!("expected circle");
    };
    assert_eq!(circle.style.fill, Color::TRANSPARENT);

    let SceneNode::Polyline(polyline) = &doc.nodes[4] else {
        panic!("expected polyline");
    };
    assert_eq!(polyline.points.len(), 3);

    let SceneNode::Text(text) = &doc.nodes[6] else {
        panic!("expected text");
    };
    assert_eq!(text.content, "Hello");
    assert_eq!(text.font_size, 14.0);
    assert_eq!(text.typeface, "Arial");

    let SceneNode::Path(path) = &doc.nodes[7] else {
        panic!("expected path");
    };
    let kinds: Vec<_> = path.commands().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        [
            PathCommandKind::MoveTo,
            PathCommandKind::LineTo,
            PathCommandKind::LineTo,
            PathCommandKind::ClosePath,
        ]
    );

    let SceneNode::Group(group) = &doc.nodes[8] else {
        panic!("expected group");
    };
    assert_eq!(
        group.style.transform.as_ref().map(NodeTransform::source),
        Some("translate(5, 5)")
    );
    assert_eq!(group.children.len(), 1);
}

#[test]
fn test_missing_svg_root() {
    let err = SvgDocument::parse_str("<html><rect/></html>").unwrap_err();
    assert!(matches!(err, SvgError::MissingRoot(ref name) if name == "html"));
}

#[test]
fn test_malformed_xml() {
    let err = SvgDocument::parse_str("<svg><rect></svg>").unwrap_err();
    assert!(matches!(err, SvgError::Xml(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let doc = SvgDocument::from_file(file.path()).unwrap();
    assert_eq!(doc.nodes.len(), 9);

    let missing = SvgDocument::from_file(file.path().with_extension("does-not-exist"));
    assert!(matches!(missing, Err(SvgError::Io(_))));
}

#[test]
fn test_clear() {
    let mut doc = SvgDocument::parse_str(SAMPLE).unwrap();
    doc.clear();
    assert!(doc.nodes.is_empty());
    assert_eq!(doc.node_count(), 0);
    assert_eq!(doc.width, Some(200.0));
}

#[test]
fn test_gradients_are_definitions_not_nodes() {
    let doc = SvgDocument::parse_str(
        r##"<svg width="20" height="20">
            <defs>
                <linearGradient id="fade" x2="100%">
                    <stop offset="0%" stop-color="red"/>
                    <stop offset="100%" stop-color="red" stop-opacity="0"/>
                </linearGradient>
                <radialGradient id="spot" r="25%"/>
                <linearGradient/>
            </defs>
            <circle r="5" fill="url(#spot)"/>
        </svg>"##,
    )
    .unwrap();

    // the id-less gradient is dropped
    assert_eq!(doc.gradients.len(), 2);
    assert_eq!(doc.nodes.len(), 1);

    let fade = &doc.gradients[0];
    assert_eq!(fade.id, "fade");
    assert_eq!(
        fade.kind,
        GradientKind::Linear {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 0.0)
        }
    );
    assert_eq!(
        fade.stops,
        vec![
            GradientStop::new(0.0, Color(0xFF00_00FF)),
            GradientStop::new(1.0, Color(0xFF00_0000)),
        ]
    );
    assert!(matches!(doc.gradients[1].kind, GradientKind::Radial { radius, .. } if radius == 0.25));

    let SceneNode::Circle(circle) = &doc.nodes[0] else {
        panic!("expected circle");
    };
    assert_eq!(circle.style.fill_gradient.as_deref(), Some("spot"));

    let mut doc = doc;
    doc.clear();
    assert!(doc.gradients.is_empty());
}
