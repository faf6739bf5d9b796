//! Mass properties of the primitive shapes, at unit density.

use crate::math::{Matrix, Point, Real, Vector};
use crate::shape::{Capsule, Cone, ConvexPolyhedron, Cuboid, Cylinder, Sphere};
use std::f64::consts::PI;

/// The mass properties of a shape, assuming unit density.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MassProperties {
    /// The volume (equivalently, the mass at unit density).
    pub volume: Real,
    /// The center of mass, in the shape's local frame.
    pub com: Point,
    /// The inertia tensor about the local frame origin.
    pub inertia: Matrix,
}

impl MassProperties {
    /// A zero-volume mass properties record.
    pub fn zero() -> Self {
        MassProperties {
            volume: 0.0,
            com: Point::origin(),
            inertia: Matrix::zeros(),
        }
    }

    /// The inertia tensor about the center of mass, obtained by the
    /// parallel-axis theorem.
    pub fn inertia_about_com(&self) -> Matrix {
        let c = self.com.coords;
        let shift = Matrix::identity() * c.norm_squared() - c * c.transpose();
        self.inertia - shift * self.volume
    }
}

impl Sphere {
    /// The mass properties of this sphere at unit density.
    pub fn mass_properties(&self) -> MassProperties {
        let volume = 4.0 * PI * self.radius.powi(3) / 3.0;
        let i = 0.4 * self.radius * self.radius * volume;
        MassProperties {
            volume,
            com: Point::origin(),
            inertia: Matrix::identity() * i,
        }
    }
}

impl Cuboid {
    /// The mass properties of this box at unit density.
    pub fn mass_properties(&self) -> MassProperties {
        let volume = self.volume();
        let s = self.half_extents.component_mul(&self.half_extents) * volume;
        MassProperties {
            volume,
            com: Point::origin(),
            inertia: Matrix::from_diagonal(&Vector::new(
                (s.y + s.z) / 3.0,
                (s.x + s.z) / 3.0,
                (s.x + s.y) / 3.0,
            )),
        }
    }
}

impl Capsule {
    /// The mass properties of this capsule at unit density.
    pub fn mass_properties(&self) -> MassProperties {
        let r = self.radius;
        let lz = self.half_height * 2.0;
        let v_cyl = PI * r * r * lz;
        let v_sph = PI * r * r * r * 4.0 / 3.0;

        let ix = v_cyl * (lz * lz / 12.0 + r * r * 0.25)
            + v_sph * (0.4 * r * r + 0.25 * lz * lz + 0.375 * r * lz);
        let iz = (0.5 * v_cyl + 0.4 * v_sph) * r * r;

        MassProperties {
            volume: v_cyl + v_sph,
            com: Point::origin(),
            inertia: Matrix::from_diagonal(&Vector::new(ix, ix, iz)),
        }
    }
}

impl Cone {
    /// The mass properties of this cone at unit density.
    ///
    /// The center of mass sits a quarter height below the frame
    /// origin; the inertia is about the origin.
    pub fn mass_properties(&self) -> MassProperties {
        let r = self.radius;
        let lz = self.half_height * 2.0;
        let volume = PI * r * r * lz / 3.0;
        let ix = volume * (0.1 * lz * lz + 3.0 * r * r / 20.0);
        let iz = 0.3 * volume * r * r;

        MassProperties {
            volume,
            com: Point::new(0.0, 0.0, -0.25 * lz),
            inertia: Matrix::from_diagonal(&Vector::new(ix, ix, iz)),
        }
    }
}

impl Cylinder {
    /// The mass properties of this cylinder at unit density.
    pub fn mass_properties(&self) -> MassProperties {
        let r = self.radius;
        let lz = self.half_height * 2.0;
        let volume = PI * r * r * lz;
        let ix = volume * (3.0 * r * r + lz * lz) / 12.0;
        let iz = volume * r * r / 2.0;

        MassProperties {
            volume,
            com: Point::origin(),
            inertia: Matrix::from_diagonal(&Vector::new(ix, ix, iz)),
        }
    }
}

impl ConvexPolyhedron {
    /// The mass properties of this polytope at unit density.
    ///
    /// Each face is fanned from its centroid into signed tetrahedra
    /// against the frame origin; volume, center of mass and the
    /// covariance-style inertia accumulate over the fan.
    pub fn mass_properties(&self) -> MassProperties {
        #[rustfmt::skip]
        let c_canonical = Matrix::new(
            1.0 / 60.0, 1.0 / 120.0, 1.0 / 120.0,
            1.0 / 120.0, 1.0 / 60.0, 1.0 / 120.0,
            1.0 / 120.0, 1.0 / 120.0, 1.0 / 60.0,
        );

        let points = self.points();
        let mut c = Matrix::zeros();
        let mut six_vol_total = 0.0;
        let mut com_accum = Vector::zeros();

        for (_, vertices) in self.faces() {
            let centroid = vertices
                .iter()
                .fold(Vector::zeros(), |acc, &i| acc + points[i as usize].coords)
                / vertices.len() as Real;

            let v3 = centroid;
            for k in 0..vertices.len() {
                let v1 = points[vertices[k] as usize].coords;
                let v2 = points[vertices[(k + 1) % vertices.len()] as usize].coords;

                let d_six_vol = v1.cross(&v2).dot(&v3);
                six_vol_total += d_six_vol;
                com_accum += (v1 + v2 + v3) * d_six_vol;

                let a = Matrix::from_rows(&[v1.transpose(), v2.transpose(), v3.transpose()]);
                c += a.transpose() * c_canonical * a * d_six_vol;
            }
        }

        MassProperties {
            volume: six_vol_total / 6.0,
            com: Point::from(com_accum / (six_vol_total * 4.0)),
            inertia: Matrix::identity() * c.trace() - c,
        }
    }
}
