//! Finger polylines and closest-point queries.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_types::{Result, TeleopError};

/// Result of a closest-point query against a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineHit {
    /// Index of the winning segment.
    pub segment: usize,
    /// Parametric position within that segment, in `[0, 1]`.
    pub t: f64,
    /// The closest point itself.
    pub point: Point3<f64>,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// One finger's controllable chain as an ordered point sequence.
///
/// The topology (vertex count) is fixed at construction; positions are
/// refreshed every tick from the tracked joint poses via
/// [`FingerPolyline::refresh`].
///
/// # Example
///
/// ```
/// use teleop_geometry::FingerPolyline;
/// use nalgebra::Point3;
///
/// let chain = FingerPolyline::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ]);
///
/// let hit = chain.closest_point(&Point3::new(0.25, -1.0, 0.0));
/// assert_eq!(hit.segment, 0);
/// assert!((hit.distance - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerPolyline {
    vertices: Vec<Point3<f64>>,
}

impl FingerPolyline {
    /// Create a polyline from ordered vertices.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 2 vertices are provided.
    #[must_use]
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        assert!(
            vertices.len() >= 2,
            "FingerPolyline requires at least 2 vertices"
        );
        Self { vertices }
    }

    /// Try to create a polyline, returning an error if invalid.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::InsufficientPoints`] if fewer than 2 vertices.
    pub fn try_new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(TeleopError::InsufficientPoints {
                required: 2,
                actual: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    /// Refresh vertex positions from this tick's tracked joints.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::PointCountMismatch`] if the position count
    /// doesn't match the fixed topology.
    pub fn refresh(&mut self, positions: &[Point3<f64>]) -> Result<()> {
        if positions.len() != self.vertices.len() {
            return Err(TeleopError::PointCountMismatch {
                expected: self.vertices.len(),
                actual: positions.len(),
            });
        }
        self.vertices.copy_from_slice(positions);
        Ok(())
    }

    /// Get the vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the polyline is empty (never true for a valid polyline).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of segments (edges).
    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Get a segment as a pair of points.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<(&Point3<f64>, &Point3<f64>)> {
        if index < self.num_segments() {
            Some((&self.vertices[index], &self.vertices[index + 1]))
        } else {
            None
        }
    }

    /// Find the closest point on the polyline to a query point.
    ///
    /// Scans segments left to right; the first segment achieving the
    /// minimum distance wins, so ties resolve deterministically to the
    /// lower index.
    #[must_use]
    pub fn closest_point(&self, query: &Point3<f64>) -> PolylineHit {
        let mut best = PolylineHit {
            segment: 0,
            t: 0.0,
            point: self.vertices[0],
            distance: f64::INFINITY,
        };

        for i in 0..self.num_segments() {
            let a = self.vertices[i];
            let b = self.vertices[i + 1];
            let edge = b - a;
            let len_sq = edge.norm_squared();

            // Degenerate segment collapses to its start vertex
            let t = if len_sq > 1e-20 {
                ((query - a).dot(&edge) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let candidate = a + edge * t;
            let distance = (query - candidate).norm();

            // Strict inequality keeps the first minimum on ties
            if distance < best.distance {
                best = PolylineHit {
                    segment: i,
                    t,
                    point: candidate,
                    distance,
                };
            }
        }

        best
    }
}
