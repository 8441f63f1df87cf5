//! Plane representation for palm and thumb plane fitting.

use nalgebra::{Point3, Vector3};

/// A plane in 3D space defined by a point and unit normal.
///
/// The plane equation is: `normal · (p - point) = 0`.
///
/// Palm and thumb planes are refit from tracked points every tick; a
/// `Plane` has no persistent identity, it's a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// The plane normal (unit length).
    pub normal: Vector3<f64>,
}

/// Vectors shorter than this are treated as zero-length.
const DEGENERATE_EPSILON: f64 = 1e-10;

impl Plane {
    /// Create a new plane from a point and normal.
    ///
    /// The normal is normalized. Returns `None` for a zero-length normal.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let norm = normal.norm();
        if norm < DEGENERATE_EPSILON {
            return None;
        }
        Some(Self {
            point,
            normal: normal / norm,
        })
    }

    /// Fit a plane through `origin` spanned by the directions toward `a`
    /// and `b`.
    ///
    /// Each spanning edge is normalized before the cross product, so the
    /// two edges contribute equally regardless of tracked-point spacing.
    /// Returns `None` when either edge is zero-length or the three points
    /// are collinear.
    #[must_use]
    pub fn from_spanning(origin: Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> Option<Self> {
        let ea = a - origin;
        let eb = b - origin;
        if ea.norm() < DEGENERATE_EPSILON || eb.norm() < DEGENERATE_EPSILON {
            return None;
        }
        let normal = ea.normalize().cross(&eb.normalize());
        Self::new(origin, normal)
    }

    /// Signed distance from a point to the plane.
    ///
    /// Positive on the side the normal points to.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    /// Project a point onto the plane.
    #[must_use]
    pub fn project_point(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.signed_distance(point) * self.normal
    }

    /// Project a vector onto the plane (drop the normal component).
    #[must_use]
    pub fn project_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        v - self.normal.dot(v) * self.normal
    }

    /// Angle in degrees between a vector and its projection onto the plane.
    ///
    /// This is the out-of-plane elevation of the vector, always ≥ 0.
    /// Returns 0 for a zero-length vector or one parallel to the normal
    /// (whose projection is zero-length).
    #[must_use]
    pub fn elevation_degrees(&self, v: &Vector3<f64>) -> f64 {
        let projected = self.project_vector(v);
        crate::angle::between_degrees(v, &projected)
    }
}
