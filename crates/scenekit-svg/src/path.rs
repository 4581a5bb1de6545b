//! SVG path data (`d` attribute) interpreter.
//!
//! Supports `M L H V C Q Z` in absolute (upper-case) and relative
//! (lower-case) form. Relative coordinates are kept as parsed; resolving
//! them against a running cursor is left to whoever consumes the commands.

use std::fmt;

use tracing::warn;

use crate::Point;

/// Path command type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathCommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicBezier,
    QuadraticBezier,
    ClosePath,
}

impl PathCommandKind {
    /// Map a command letter (either case) to its kind.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'm' => Some(Self::MoveTo),
            'l' => Some(Self::LineTo),
            'h' => Some(Self::HorizontalLineTo),
            'v' => Some(Self::VerticalLineTo),
            'c' => Some(Self::CubicBezier),
            'q' => Some(Self::QuadraticBezier),
            'z' => Some(Self::ClosePath),
            _ => None,
        }
    }

    /// Command letter, lower-case when relative.
    pub fn letter(self, relative: bool) -> char {
        let c = match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::HorizontalLineTo => 'H',
            Self::VerticalLineTo => 'V',
            Self::CubicBezier => 'C',
            Self::QuadraticBezier => 'Q',
            Self::ClosePath => 'Z',
        };
        if relative {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }

    /// Number of points a command of this kind carries.
    pub fn point_count(self) -> usize {
        match self {
            Self::MoveTo | Self::LineTo | Self::HorizontalLineTo | Self::VerticalLineTo => 1,
            Self::QuadraticBezier => 2,
            Self::CubicBezier => 3,
            Self::ClosePath => 0,
        }
    }

    /// Number of numeric operands consumed from path data.
    fn operand_count(self) -> usize {
        match self {
            Self::HorizontalLineTo | Self::VerticalLineTo => 1,
            other => other.point_count() * 2,
        }
    }
}

/// A single parsed path command.
///
/// `HorizontalLineTo` keeps its value in `points[0].x` and `VerticalLineTo`
/// in `points[0].y`; the other axis is unused and always `0.0`, the
/// consumer supplies it from its current point.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub kind: PathCommandKind,
    pub relative: bool,
    pub points: Vec<Point>,
}

impl PathCommand {
    pub fn move_to(x: f32, y: f32) -> Self {
        Self::absolute(PathCommandKind::MoveTo, vec![Point::new(x, y)])
    }

    pub fn line_to(x: f32, y: f32) -> Self {
        Self::absolute(PathCommandKind::LineTo, vec![Point::new(x, y)])
    }

    pub fn horizontal_to(x: f32) -> Self {
        Self::absolute(PathCommandKind::HorizontalLineTo, vec![Point::new(x, 0.0)])
    }

    pub fn vertical_to(y: f32) -> Self {
        Self::absolute(PathCommandKind::VerticalLineTo, vec![Point::new(0.0, y)])
    }

    pub fn cubic_to(c1: Point, c2: Point, end: Point) -> Self {
        Self::absolute(PathCommandKind::CubicBezier, vec![c1, c2, end])
    }

    pub fn quad_to(control: Point, end: Point) -> Self {
        Self::absolute(PathCommandKind::QuadraticBezier, vec![control, end])
    }

    pub fn close() -> Self {
        Self::absolute(PathCommandKind::ClosePath, Vec::new())
    }

    /// Same command, flagged as relative to the current point.
    pub fn into_relative(mut self) -> Self {
        self.relative = true;
        self
    }

    fn absolute(kind: PathCommandKind, points: Vec<Point>) -> Self {
        Self {
            kind,
            relative: false,
            points,
        }
    }

    /// The x value of a horizontal line.
    pub fn horizontal_value(&self) -> Option<f32> {
        match self.kind {
            PathCommandKind::HorizontalLineTo => self.points.first().map(|p| p.x),
            _ => None,
        }
    }

    /// The y value of a vertical line.
    pub fn vertical_value(&self) -> Option<f32> {
        match self.kind {
            PathCommandKind::VerticalLineTo => self.points.first().map(|p| p.y),
            _ => None,
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.letter(self.relative))?;
        match self.kind {
            PathCommandKind::HorizontalLineTo => {
                for p in &self.points {
                    write!(f, " {}", p.x)?;
                }
            }
            PathCommandKind::VerticalLineTo => {
                for p in &self.points {
                    write!(f, " {}", p.y)?;
                }
            }
            _ => {
                for p in &self.points {
                    write!(f, " {},{}", p.x, p.y)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize commands back into path data.
pub fn serialize(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ==================== Parser ====================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Command(char),
    Operand(&'a str),
}

/// Parse path data into commands.
///
/// One command is produced per command letter. Bad input never aborts the
/// parse: unsupported letters, commands with invalid or missing operands,
/// and stray operands are skipped with a warning.
pub fn parse(d: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut current: Option<(char, Vec<&str>)> = None;

    for token in tokenize(d) {
        match token {
            Token::Command(letter) => {
                if let Some((prev, operands)) = current.take() {
                    commands.extend(interpret(prev, &operands));
                }
                current = Some((letter, Vec::new()));
            }
            Token::Operand(op) => match current.as_mut() {
                Some((_, operands)) => operands.push(op),
                None => warn!(token = op, "Path data operand before any command, ignoring"),
            },
        }
    }
    if let Some((letter, operands)) = current {
        commands.extend(interpret(letter, &operands));
    }

    commands
}

/// Build one command from its letter and operand tokens.
fn interpret(letter: char, operands: &[&str]) -> Option<PathCommand> {
    let Some(kind) = PathCommandKind::from_letter(letter) else {
        warn!(command = %letter, "Unsupported path command, skipping");
        return None;
    };

    let needed = kind.operand_count();
    if operands.len() < needed {
        warn!(
            command = %letter,
            expected = needed,
            found = operands.len(),
            "Too few operands for path command, skipping"
        );
        return None;
    }

    let mut values = Vec::with_capacity(needed);
    for token in &operands[..needed] {
        match token.parse::<f32>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                warn!(command = %letter, token, "Invalid number in path data, skipping command");
                return None;
            }
        }
    }

    if operands.len() > needed {
        warn!(
            command = %letter,
            surplus = operands.len() - needed,
            "Implicit command repetition is not supported, ignoring surplus operands"
        );
    }

    let points = match kind {
        PathCommandKind::HorizontalLineTo => vec![Point::new(values[0], 0.0)],
        PathCommandKind::VerticalLineTo => vec![Point::new(0.0, values[0])],
        _ => values
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect(),
    };

    Some(PathCommand {
        kind,
        relative: letter.is_ascii_lowercase(),
        points,
    })
}

/// Split path data into command letters and operand text.
///
/// Whitespace and commas separate operands. A sign starts a new operand
/// unless it follows an exponent marker, so `10-5` is two numbers.
fn tokenize(d: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev: Option<char> = None;

    for (i, c) in d.char_indices() {
        let in_operand = start.is_some();

        if c.is_whitespace() || c == ',' {
            flush(d, &mut start, i, &mut tokens);
        } else if c.is_alphabetic() {
            let exponent = matches!(c, 'e' | 'E')
                && in_operand
                && prev.is_some_and(|p| p.is_ascii_digit() || p == '.');
            if !exponent {
                flush(d, &mut start, i, &mut tokens);
                tokens.push(Token::Command(c));
            }
        } else if matches!(c, '-' | '+') && in_operand && !matches!(prev, Some('e' | 'E')) {
            flush(d, &mut start, i, &mut tokens);
            start = Some(i);
        } else if !in_operand {
            start = Some(i);
        }

        prev = Some(c);
    }
    flush(d, &mut start, d.len(), &mut tokens);

    tokens
}

fn flush<'a>(d: &'a str, start: &mut Option<usize>, end: usize, tokens: &mut Vec<Token<'a>>) {
    if let Some(s) = start.take() {
        tokens.push(Token::Operand(&d[s..end]));
    }
}
