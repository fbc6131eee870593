use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Sub};

/// A single 2D coordinate as it appears in the graph and path files.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between `self` and `other`
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Writes the on-disk `x,y` form.
///
/// Negative zero is written as `0`, a leading `-` would read as a separator.
impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x + 0.0, self.y + 0.0)
    }
}

/// One drawn line segment.
///
/// `head` and `tail` are purely positional: `head` is whatever came first in the source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub head: Point,
    pub tail: Point,
}

/// The parsed output of both file formats.
///
/// `heads[i]` and `tails[i]` always belong to the `i`-th edge, the only way to add to either is [Segments::push].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segments {
    heads: Vec<Point>,
    tails: Vec<Point>,
}

impl Segments {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heads: Vec::with_capacity(capacity),
            tails: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, head: Point, tail: Point) {
        self.heads.push(head);
        self.tails.push(tail);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn heads(&self) -> &[Point] {
        &self.heads
    }

    pub fn tails(&self) -> &[Point] {
        &self.tails
    }

    pub fn get(&self, index: usize) -> Option<Edge> {
        Some(Edge {
            head: *self.heads.get(index)?,
            tail: *self.tails.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.heads
            .iter()
            .zip(self.tails.iter())
            .map(|(&head, &tail)| Edge { head, tail })
    }

    pub fn into_parts(self) -> (Vec<Point>, Vec<Point>) {
        (self.heads, self.tails)
    }
}
