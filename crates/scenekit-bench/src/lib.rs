//! # SceneKit Bench
//!
//! Input generators shared by the SceneKit benchmarks.
//!
//! ## Usage
//!
//! ```text
//! cargo bench -p scenekit-bench
//! ```

use std::fmt::Write as _;

/// A document with `shapes` elements, cycling through every supported tag
/// and nesting every tenth shape inside a transformed group.
pub fn generate_scene(shapes: usize) -> String {
    let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600">"#);
    svg.push('\n');
    for i in 0..shapes {
        let x = (i * 7 % 780) as f32;
        let y = (i * 13 % 580) as f32;
        let element = match i % 8 {
            0 => format!(r##"<rect x="{x}" y="{y}" width="12" height="8" fill="#8cafc8"/>"##),
            1 => format!(r#"<circle cx="{x}" cy="{y}" r="6" fill="red" stroke="black"/>"#),
            2 => format!(r#"<ellipse cx="{x}" cy="{y}" rx="9" ry="4" fill-opacity="0.5"/>"#),
            3 => format!(r#"<line x1="{x}" y1="{y}" x2="{}" y2="{}" stroke="navy"/>"#, x + 20.0, y + 5.0),
            4 => format!(r#"<polyline points="{x},{y} {},{} {},{y}" fill="none" stroke="teal"/>"#, x + 5.0, y + 9.0, x + 10.0),
            5 => format!(r#"<polygon points="{x},{y} {},{y} {},{}" fill="orange"/>"#, x + 10.0, x + 5.0, y + 8.0),
            6 => format!(r#"<text x="{x}" y="{y}" font-size="10">item {i}</text>"#),
            _ => format!(r#"<path d="M {x} {y} l 10 0 q 5 5 0 10 c -3 0 -6 -3 -10 -10 z" fill="purple"/>"#),
        };
        if i % 10 == 9 {
            let _ = writeln!(svg, r#"<g transform="translate(2, 3) rotate(15)">{element}</g>"#);
        } else {
            let _ = writeln!(svg, "{element}");
        }
    }
    svg.push_str("</svg>\n");
    svg
}

/// Path data with `segments` mixed absolute and relative commands.
pub fn generate_path_data(segments: usize) -> String {
    let mut d = String::from("M 0 0");
    for i in 0..segments {
        let v = (i % 50) as f32 * 0.5;
        let _ = match i % 6 {
            0 => write!(d, " L {v} {}", v + 1.0),
            1 => write!(d, " h {v}"),
            2 => write!(d, " V {}", v * 2.0),
            3 => write!(d, " c 1 2 3 4 {v} -{v}"),
            4 => write!(d, " Q{v},1 2,{v}"),
            _ => write!(d, " l-{v}-1e-1"),
        };
    }
    d.push_str(" Z");
    d
}
