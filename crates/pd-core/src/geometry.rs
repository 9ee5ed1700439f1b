use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A point (or offset) in user space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point reflection of `self` through `center`.
    #[must_use]
    pub fn reflect_through(self, center: Self) -> Self {
        center + center - self
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A drawing command in absolute coordinates.
///
/// Within one subpath each command's `start` is the previous command's `end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Command {
    Line {
        start: Point,
        end: Point,
    },
    QuadraticBezier {
        start: Point,
        control: Point,
        end: Point,
    },
    CubicBezier {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    Arc {
        start: Point,
        radii: Point,
        /// Rotation of the ellipse's x-axis, in degrees.
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
}

impl Command {
    #[must_use]
    pub const fn line(start: Point, end: Point) -> Self {
        Self::Line { start, end }
    }

    #[must_use]
    pub const fn quadratic(start: Point, control: Point, end: Point) -> Self {
        Self::QuadraticBezier {
            start,
            control,
            end,
        }
    }

    #[must_use]
    pub const fn cubic(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self::CubicBezier {
            start,
            control1,
            control2,
            end,
        }
    }

    #[must_use]
    pub const fn start(&self) -> Point {
        match self {
            Self::Line { start, .. }
            | Self::QuadraticBezier { start, .. }
            | Self::CubicBezier { start, .. }
            | Self::Arc { start, .. } => *start,
        }
    }

    #[must_use]
    pub const fn end(&self) -> Point {
        match self {
            Self::Line { end, .. }
            | Self::QuadraticBezier { end, .. }
            | Self::CubicBezier { end, .. }
            | Self::Arc { end, .. } => *end,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Line { .. } => CommandKind::Line,
            Self::QuadraticBezier { .. } => CommandKind::QuadraticBezier,
            Self::CubicBezier { .. } => CommandKind::CubicBezier,
            Self::Arc { .. } => CommandKind::Arc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Line,
    QuadraticBezier,
    CubicBezier,
    Arc,
}

impl CommandKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::QuadraticBezier => "quadratic_bezier",
            Self::CubicBezier => "cubic_bezier",
            Self::Arc => "arc",
        }
    }
}
