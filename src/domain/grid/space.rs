use std::cmp::Ordering;
use std::ops::{Div, Index};

#[cfg(feature = "json_export")]
use json::JsonValue;

#[derive(Clone, Copy, Debug, PartialEq)]
/// 2D vector in Parametric or Real Space
pub struct V2D {
    inner: [f64; 2],
}

impl V2D {
    pub const fn from([x, y]: [f64; 2]) -> Self {
        Self { inner: [x, y] }
    }

    pub fn x(&self) -> f64 {
        self.inner[0]
    }

    pub fn y(&self) -> f64 {
        self.inner[1]
    }
}

impl Index<usize> for V2D {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[index]
    }
}

impl Div<f64> for V2D {
    type Output = Self;
    fn div(self, divisor: f64) -> Self {
        Self {
            inner: [self[0] / divisor, self[1] / divisor],
        }
    }
}

/*
    | [x1, y1] |
    | [x2, y2] |
*/

#[derive(Clone, Copy, Debug, PartialEq)]
/// 2 by 2 Matrix. Used to represent transformations between Parametric and Real space
pub struct M2D {
    pub u: V2D,
    pub v: V2D,
}

impl M2D {
    pub const fn from(r0: [f64; 2], r1: [f64; 2]) -> Self {
        Self {
            u: V2D::from(r0),
            v: V2D::from(r1),
        }
    }

    #[inline]
    pub fn det(&self) -> f64 {
        self.u[0] * self.v[1] - self.u[1] * self.v[0]
    }

    /// The adjugate matrix (the inverse without division by the determinant)
    pub fn adjugate(&self) -> Self {
        Self {
            u: V2D::from([self.v[1], -1.0 * self.u[1]]),
            v: V2D::from([-1.0 * self.v[0], self.u[0]]),
        }
    }
}

impl Div<f64> for M2D {
    type Output = Self;
    fn div(self, divisor: f64) -> Self {
        Self {
            u: self.u / divisor,
            v: self.v / divisor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Point in 2D Real Space
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist(&self, other: &Self) -> f64 {
        let dx = (other.x - self.x).abs();
        let dy = (other.y - self.y).abs();

        (dx.powi(2) + dy.powi(2)).sqrt()
    }

    /// Lexicographic ordering: x first, then y
    pub fn xy_order(&self, other: &Self) -> Ordering {
        self.x.total_cmp(&other.x).then(self.y.total_cmp(&other.y))
    }

    /// Lexicographic ordering: x first, then descending y
    pub fn x_neg_y_order(&self, other: &Self) -> Ordering {
        self.x.total_cmp(&other.x).then(other.y.total_cmp(&self.y))
    }
}

#[cfg(feature = "json_export")]
impl From<Point> for JsonValue {
    fn from(p: Point) -> Self {
        json::object! {
            "x": p.x,
            "y": p.y,
        }
    }
}
