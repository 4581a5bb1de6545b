//! 2D affine transforms and the SVG `transform` attribute parser.

use std::ops::Mul;

use tracing::warn;

use crate::Point;

/// 2D affine transform stored as a row-major 3x3 matrix.
///
/// ```text
/// [a b c]     x' = a*x + b*y + c
/// [d e f]     y' = d*x + e*y + f
/// [0 0 1]
/// ```
///
/// The bottom row is always `(0, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    m: [f32; 9],
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Create identity transform.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create translation transform.
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0],
        }
    }

    /// Create scale transform.
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Create rotation transform about the origin (degrees).
    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            m: [cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Create rotation transform about a pivot point (degrees).
    pub fn rotate_about(degrees: f32, cx: f32, cy: f32) -> Self {
        Self::translate(cx, cy) * Self::rotate(degrees) * Self::translate(-cx, -cy)
    }

    /// Multiply two transforms (`a * b`, so `b` is applied to points first).
    pub fn compose(a: &Self, b: &Self) -> Self {
        let mut m = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                m[row * 3 + col] = (0..3)
                    .map(|k| a.m[row * 3 + k] * b.m[k * 3 + col])
                    .sum();
            }
        }
        Self { m }
    }

    /// Raw row-major coefficients.
    pub fn matrix(&self) -> [f32; 9] {
        self.m
    }

    /// Transform a point.
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.m[0] * p.x + self.m[1] * p.y + self.m[2],
            y: self.m[3] * p.x + self.m[4] * p.y + self.m[5],
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Coefficient-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Parse an SVG transform attribute.
    ///
    /// Functions compose left to right in document order. Unknown or
    /// malformed functions are skipped with a warning; the rest of the
    /// string is still applied. An empty string yields the identity.
    pub fn parse(s: &str) -> Self {
        let mut result = Self::identity();
        let mut rest = s;

        while let Some(open) = rest.find('(') {
            let name = function_name(&rest[..open]);
            let Some(len) = rest[open + 1..].find(')') else {
                warn!(transform = s, "Unterminated transform function, ignoring remainder");
                break;
            };
            let args = parse_arguments(name, &rest[open + 1..open + 1 + len]);
            rest = &rest[open + len + 2..];

            if let Some(func) = transform_function(name, &args) {
                result = result * func;
            }
        }

        result
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for AffineTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::compose(&self, &rhs)
    }
}

/// The identifier directly preceding a `(`.
fn function_name(prefix: &str) -> &str {
    let prefix = prefix.trim_end();
    let start = prefix
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map_or(prefix.len(), |(i, _)| i);
    &prefix[start..]
}

/// Split on commas and whitespace; non-numeric tokens are dropped.
fn parse_arguments(name: &str, args: &str) -> Vec<f32> {
    args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| match tok.parse::<f32>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(function = name, token = tok, "Ignoring non-numeric transform argument");
                None
            }
        })
        .collect()
}

/// Build a single transform function, or `None` if it cannot be applied.
fn transform_function(name: &str, args: &[f32]) -> Option<AffineTransform> {
    let func = match (name, args) {
        ("translate", &[tx]) => AffineTransform::translate(tx, 0.0),
        ("translate", &[tx, ty]) => AffineTransform::translate(tx, ty),
        ("scale", &[s]) => AffineTransform::scale(s, s),
        ("scale", &[sx, sy]) => AffineTransform::scale(sx, sy),
        ("rotate", &[angle]) => AffineTransform::rotate(angle),
        ("rotate", &[angle, cx, cy]) => AffineTransform::rotate_about(angle, cx, cy),
        ("translate" | "scale" | "rotate", _) => {
            warn!(function = name, arguments = args.len(), "Wrong argument count for transform, skipping");
            return None;
        }
        _ => {
            warn!(function = name, "Unknown transform function, skipping");
            return None;
        }
    };
    Some(func)
}
