//! Fingertip-to-surface proximity retargeting.
//!
//! Primary mode: map the distance between a tracked contact point and a
//! target finger chain into a normalized actuation intensity.
//!
//! Offset mode: re-anchor a tracking reference point through positions
//! recorded at touch time, so a driver fingertip steers a target fingertip
//! with per-axis scaling.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_geometry::{angle, FingerPolyline, PolylineHit};

/// Tuning for proximity-to-intensity mapping and offset retargeting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProximityConfig {
    /// Distance at which intensity reads 0 (tracking units).
    pub max_distance: f64,
    /// Distance at which intensity reads 1 (tracking units).
    pub min_distance: f64,
    /// Exponential smoothing factor per tick for the offset-mode output,
    /// in `(0, 1]`; 1 disables smoothing.
    pub smoothing: f64,
    /// Per-axis scale denominators below this magnitude fall back to a
    /// scale of 1.
    pub scale_guard: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            max_distance: 0.04,
            min_distance: 0.005,
            smoothing: 0.35,
            scale_guard: 1e-4,
        }
    }
}

impl ProximityConfig {
    /// Create a config with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intensity distance bounds.
    #[must_use]
    pub fn with_distance_bounds(mut self, max_distance: f64, min_distance: f64) -> Self {
        self.max_distance = max_distance;
        self.min_distance = min_distance;
        self
    }

    /// Set the offset-mode smoothing factor.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }
}

/// Result of one proximity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityReading {
    /// The closest point on the target chain.
    pub hit: PolylineHit,
    /// Normalized actuation intensity in `[0, 1]`.
    pub intensity: f64,
}

/// Positions recorded at touch time for the offset mode.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OffsetAnchor {
    target: Point3<f64>,
    reference: Point3<f64>,
    scale: Vector3<f64>,
}

/// Maps contact proximity to actuation intensity, with an optional offset
/// mode that re-anchors a tracking reference point.
///
/// # Example
///
/// ```
/// use teleop_retarget::{ProximityConfig, ProximityRetargeter};
/// use teleop_geometry::FingerPolyline;
/// use nalgebra::Point3;
///
/// let retargeter = ProximityRetargeter::new(ProximityConfig::default());
/// let chain = FingerPolyline::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.1, 0.0, 0.0),
/// ]);
///
/// // A contact right on the chain reads full intensity
/// let reading = retargeter.read(&Point3::new(0.05, 0.0, 0.0), &chain);
/// assert_eq!(reading.intensity, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct ProximityRetargeter {
    config: ProximityConfig,
    anchor: Option<OffsetAnchor>,
    smoothed: Option<Point3<f64>>,
}

impl ProximityRetargeter {
    /// Create a retargeter.
    #[must_use]
    pub fn new(config: ProximityConfig) -> Self {
        Self {
            config,
            anchor: None,
            smoothed: None,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Query intensity for a tracked contact point against a finger chain.
    #[must_use]
    pub fn read(&self, contact: &Point3<f64>, chain: &FingerPolyline) -> ProximityReading {
        let hit = chain.closest_point(contact);
        let intensity = angle::distance_to_intensity(
            hit.distance,
            self.config.max_distance,
            self.config.min_distance,
        );
        ProximityReading { hit, intensity }
    }

    /// Whether the offset mode currently holds a recording.
    #[must_use]
    pub const fn is_retargeting(&self) -> bool {
        self.anchor.is_some()
    }

    /// Record touch-time positions and enter offset mode.
    ///
    /// Only the first contact records; further calls while a recording is
    /// held are ignored until [`ProximityRetargeter::end_retarget`].
    pub fn begin_retarget(
        &mut self,
        driver: Point3<f64>,
        target: Point3<f64>,
        reference: Point3<f64>,
    ) {
        if self.anchor.is_some() {
            return;
        }
        let scale = Vector3::new(
            axis_scale(target.x - reference.x, driver.x - reference.x, self.config.scale_guard),
            axis_scale(target.y - reference.y, driver.y - reference.y, self.config.scale_guard),
            axis_scale(target.z - reference.z, driver.z - reference.z, self.config.scale_guard),
        );
        self.anchor = Some(OffsetAnchor {
            target,
            reference,
            scale,
        });
        self.smoothed = None;
    }

    /// Re-project the live reference position through the recorded offset
    /// and scale, blended toward the previous output.
    ///
    /// Returns `None` when no recording is held.
    pub fn retarget(&mut self, reference_live: &Point3<f64>) -> Option<Point3<f64>> {
        let anchor = self.anchor.as_ref()?;
        let delta = reference_live - anchor.reference;
        let projected = anchor.target + anchor.scale.component_mul(&delta);

        let output = match self.smoothed {
            Some(previous) => previous + (projected - previous) * self.config.smoothing,
            None => projected,
        };
        self.smoothed = Some(output);
        Some(output)
    }

    /// Leave offset mode on contact loss.
    ///
    /// The anchor snaps straight back to its base-follow position; no
    /// smoothing applies on the way out.
    pub fn end_retarget(&mut self, base_follow: Point3<f64>) -> Point3<f64> {
        self.anchor = None;
        self.smoothed = None;
        base_follow
    }
}

/// Per-axis scale with a degenerate-denominator guard.
fn axis_scale(numerator: f64, denominator: f64, guard: f64) -> f64 {
    if denominator.abs() < guard {
        1.0
    } else {
        numerator / denominator
    }
}
