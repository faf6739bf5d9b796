//! Discrete orientation polytopes.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// The fixed direction set shared by all k-DOP sizes. A `Kdop<HALF>`
/// uses the first `HALF` entries: the three coordinate axes, then the
/// edge diagonals, then the corner diagonals.
const DIRECTIONS: [[Real; 3]; 12] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, -1.0, 0.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// A discrete orientation polytope with `2 * HALF` half-space bounds.
///
/// `HALF` is 8, 9 or 12, giving the 16-, 18- and 24-DOPs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Kdop<const HALF: usize> {
    /// The lower support offsets, one per direction.
    pub low: [Real; HALF],
    /// The upper support offsets, one per direction.
    pub high: [Real; HALF],
}

/// A 16-DOP.
pub type Kdop16 = Kdop<8>;
/// An 18-DOP.
pub type Kdop18 = Kdop<9>;
/// A 24-DOP.
pub type Kdop24 = Kdop<12>;

impl<const HALF: usize> Kdop<HALF> {
    /// The `i`-th support direction (unnormalized).
    #[inline]
    pub fn direction(i: usize) -> Vector {
        let d = &DIRECTIONS[i];
        Vector::new(d[0], d[1], d[2])
    }

    /// Creates an empty k-DOP suitable as the seed of a merge.
    pub fn new_invalid() -> Self {
        Kdop {
            low: [Real::MAX; HALF],
            high: [-Real::MAX; HALF],
        }
    }

    /// Builds the k-DOP of a set of points.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(*pt);
        }
        result
    }

    /// Enlarges this k-DOP so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point) {
        for i in 0..HALF {
            let d = Self::direction(i).dot(&pt.coords);
            self.low[i] = self.low[i].min(d);
            self.high[i] = self.high[i].max(d);
        }
    }

    /// Do the two k-DOPs overlap? Exact on the polytopes: any disjoint
    /// support interval separates them.
    pub fn overlaps(&self, other: &Self) -> bool {
        for i in 0..HALF {
            if self.low[i] > other.high[i] || other.low[i] > self.high[i] {
                return false;
            }
        }

        true
    }

    /// A lower bound of the distance between the two polytopes: the
    /// widest support-interval gap, rescaled to metric units.
    pub fn distance(&self, other: &Self) -> Real {
        let mut best: Real = 0.0;

        for i in 0..HALF {
            let gap = (self.low[i] - other.high[i]).max(other.low[i] - self.high[i]);
            if gap > 0.0 {
                best = best.max(gap / Self::direction(i).norm());
            }
        }

        best
    }

    /// Does this k-DOP contain the given point?
    pub fn contains_point(&self, point: &Point) -> bool {
        for i in 0..HALF {
            let d = Self::direction(i).dot(&point.coords);
            if d < self.low[i] || d > self.high[i] {
                return false;
            }
        }

        true
    }

    /// Merges this k-DOP with `other` in-place.
    pub fn merge(&mut self, other: &Self) {
        for i in 0..HALF {
            self.low[i] = self.low[i].min(other.low[i]);
            self.high[i] = self.high[i].max(other.high[i]);
        }
    }

    /// The smallest k-DOP containing both `self` and `other`.
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = *self;
        result.merge(other);
        result
    }

    /// The AABB described by the first three support intervals.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            Point::new(self.low[0], self.low[1], self.low[2]),
            Point::new(self.high[0], self.high[1], self.high[2]),
        )
    }

    /// The size surrogate of this k-DOP.
    #[inline]
    pub fn size(&self) -> Real {
        self.aabb().size()
    }
}
