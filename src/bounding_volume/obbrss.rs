//! Composite OBB + RSS bound.

use crate::bounding_volume::{Aabb, Obb, Rss};
use crate::math::{Isometry, Point, Real};

/// An OBB and an RSS enclosing the same content.
///
/// Overlap tests delegate to the OBB (tighter for overlap), distance
/// tests to the RSS (cheap rectangle distance).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct ObbRss {
    /// The OBB part, used for overlap tests.
    pub obb: Obb,
    /// The RSS part, used for distance tests.
    pub rss: Rss,
}

impl ObbRss {
    /// Builds the composite bound covering `aabb`.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        ObbRss {
            obb: Obb::from_aabb(aabb),
            rss: Rss::from_aabb(aabb),
        }
    }

    /// Transforms both parts by the rigid motion `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        ObbRss {
            obb: self.obb.transform_by(m),
            rss: self.rss.transform_by(m),
        }
    }

    /// Do the two bounds overlap?
    #[inline]
    pub fn overlaps(&self, other: &ObbRss) -> bool {
        self.obb.overlaps(&other.obb)
    }

    /// The distance between the two bounds, 0.0 if they overlap.
    #[inline]
    pub fn distance(&self, other: &ObbRss) -> Real {
        self.rss.distance(&other.rss)
    }

    /// Does this bound contain the given point?
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.obb.contains_point(point)
    }

    /// The size surrogate of this bound.
    #[inline]
    pub fn size(&self) -> Real {
        self.obb.size()
    }

    /// The smallest AABB containing this bound.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.obb.aabb()
    }

    /// Enlarges this bound so it also contains `point`.
    pub fn take_point(&mut self, point: Point) {
        self.obb.take_point(point);
        self.rss.take_point(point);
    }

    /// A bound enclosing both `self` and `other`.
    pub fn merged(&self, other: &ObbRss) -> ObbRss {
        ObbRss {
            obb: self.obb.merged(&other.obb),
            rss: self.rss.merged(&other.rss),
        }
    }
}
