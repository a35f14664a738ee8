//! Static 2-d tree.
//! # Contracts:
//! - The tree is built once and is read-only afterwards
//! - Distances are compared squared, never rooted
//!
pub mod error;
pub mod kdtree;

pub use error::KdTreeError;
pub use kdtree::{Axis, BuildConfig, KdTree};

use std::ops::Deref;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point(pub [f64; 2]);

impl Deref for Point {
    type Target = [f64; 2];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self(p)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self([x, y])
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    pub fn x(&self) -> f64 {
        self[0]
    }

    pub fn y(&self) -> f64 {
        self[1]
    }

    /// Coordinate of this point on the given splitting axis
    pub fn coord(&self, axis: Axis) -> f64 {
        self[axis.index()]
    }

    pub fn dist_sq(&self, rhs: &Self) -> f64 {
        let x = self[0] - rhs[0];
        let y = self[1] - rhs[1];
        x * x + y * y
    }
}

/// Squared euclidean distance between `a` and `b`.
pub fn squared_distance(a: &Point, b: &Point) -> f64 {
    a.dist_sq(b)
}
