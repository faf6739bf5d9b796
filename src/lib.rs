/*!
prox3d
======

**prox3d** is a 3-dimensional collision-detection and proximity-query
kernel. Given two rigid objects in arbitrary poses it decides whether
they intersect — reporting contact points, penetration depth and an
outward normal — or computes the minimum distance between them
together with witness points.

Objects are triangle meshes decomposed into a bounding-volume
hierarchy, occupancy octrees, or primitive convex shapes. The narrow
phase combines closed-form solvers for the common shape pairs with
GJK/EPA over support mappings for everything else.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]

#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod bvh;
pub mod math;
pub mod octree;
pub mod query;
pub mod shape;
pub mod traversal;
pub mod utils;

pub use crate::bounding_volume::convert_bv;
pub use crate::query::QueryError;
pub use crate::traversal::{collide, compute_world_aabb, distance};
