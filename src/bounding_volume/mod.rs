//! Bounding volumes: coarse, cheap-to-test approximations of shapes.

pub use self::aabb::Aabb;
pub use self::bounding_sphere::BoundingSphere;
pub use self::bv::{Bv, BvKind};
pub use self::convert::convert_bv;
pub use self::kdop::{Kdop, Kdop16, Kdop18, Kdop24};
pub use self::kios::Kios;
pub use self::obb::Obb;
pub use self::obbrss::ObbRss;
pub use self::rss::Rss;

mod aabb;
mod bounding_sphere;
mod bv;
mod convert;
mod kdop;
mod kios;
mod obb;
mod obbrss;
mod rss;
