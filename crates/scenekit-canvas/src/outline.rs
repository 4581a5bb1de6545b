//! Resolution of parsed path commands into absolute outline segments.

use scenekit_svg::{PathCommand, PathCommandKind, Point};

/// An absolute outline segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Resolve relative coordinates and H/V shorthands against a running
/// cursor. The cursor starts at the origin; `Z` returns it to the start of
/// the current subpath.
pub fn resolve(commands: &[PathCommand]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(commands.len());
    let mut current = Point::default();
    let mut start = Point::default();

    for cmd in commands {
        let offset = |p: Point| {
            if cmd.relative {
                Point::new(current.x + p.x, current.y + p.y)
            } else {
                p
            }
        };

        let segment = match (cmd.kind, cmd.points.as_slice()) {
            (PathCommandKind::MoveTo, &[p]) => {
                let p = offset(p);
                start = p;
                Segment::MoveTo(p)
            }
            (PathCommandKind::LineTo, &[p]) => Segment::LineTo(offset(p)),
            (PathCommandKind::HorizontalLineTo, &[p]) => {
                let x = if cmd.relative { current.x + p.x } else { p.x };
                Segment::LineTo(Point::new(x, current.y))
            }
            (PathCommandKind::VerticalLineTo, &[p]) => {
                let y = if cmd.relative { current.y + p.y } else { p.y };
                Segment::LineTo(Point::new(current.x, y))
            }
            (PathCommandKind::QuadraticBezier, &[c, p]) => Segment::QuadTo(offset(c), offset(p)),
            (PathCommandKind::CubicBezier, &[c1, c2, p]) => {
                Segment::CubicTo(offset(c1), offset(c2), offset(p))
            }
            (PathCommandKind::ClosePath, _) => Segment::Close,
            // hand-built command with the wrong number of points
            _ => continue,
        };

        current = match segment {
            Segment::MoveTo(p) | Segment::LineTo(p) | Segment::QuadTo(_, p) | Segment::CubicTo(_, _, p) => p,
            Segment::Close => start,
        };
        segments.push(segment);
    }

    segments
}
