//! The per-tick teleoperation pipeline.
//!
//! [`TeleopRig`] composes the whole stack and executes it once per
//! simulation step, in dependency order:
//!
//! 1. Drain the force-feed mailbox (touch-snap cancellation)
//! 2. Extract joint angles from the tracked frame
//! 3. Run the abduction blend for index and middle; drive the thumb and
//!    all distal joints straight from extracted flexion
//! 4. Let applied snap pairs override the affected joint angles
//! 5. Apply the tick's buffered contact events to the arbiter
//! 6. Step the mode machine
//! 7. On the Select branch only, run proximity intensity and the offset
//!    retargeter
//!
//! Everything runs on the single simulation thread; the mailbox is the
//! only cross-thread handoff.

use std::sync::Arc;

use hashbrown::HashMap;
use nalgebra::{Point3, UnitQuaternion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_geometry::FingerPolyline;
use teleop_kinematics::AngleExtractor;
use teleop_retarget::{
    AbductionConfig, AbductionController, AbductionInput, FingerJointTargets, ProximityConfig,
    ProximityRetargeter, SnapEngine, SnapPair, SnapPairConfig,
};
use teleop_select::{ArbiterConfig, ModeConfig, ModeMachine, TouchArbiter};
use teleop_types::{
    ContactEvent, Finger, HandFrame, HandJoint, JointRotation, Mode, Result, TouchFlags, ZoneId,
};

use crate::feed::ForceFeed;

/// One snap pair bound to the two joints whose angles it observes.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnapBinding {
    /// Joint supplying the first observed angle.
    pub joint_a: HandJoint,
    /// Joint supplying the second observed angle.
    pub joint_b: HandJoint,
    /// The authored pair configuration.
    pub config: SnapPairConfig,
}

/// Full pipeline configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    /// Abduction blend tuning (shared by index and middle).
    pub abduction: AbductionConfig,
    /// Proximity/intensity tuning.
    pub proximity: ProximityConfig,
    /// Arbitration tuning.
    pub arbiter: ArbiterConfig,
    /// Mode machine tuning.
    pub mode: ModeConfig,
    /// Authored snap pairs with their joint bindings.
    pub snaps: Vec<SnapBinding>,
    /// Force-feed readings above this magnitude cancel applied snaps.
    pub force_cancel_threshold: f64,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            abduction: AbductionConfig::default(),
            proximity: ProximityConfig::default(),
            arbiter: ArbiterConfig::default(),
            mode: ModeConfig::default(),
            snaps: Vec::new(),
            force_cancel_threshold: 1.0,
        }
    }
}

/// Per-tick input assembled by the hosting collaborators.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// This tick's tracked joint poses.
    pub frame: &'a HandFrame,
    /// Per-fingertip contact flags.
    pub touch: TouchFlags,
    /// Buffered contact events, in arrival order.
    pub events: &'a [ContactEvent],
    /// Measured index–middle spread distance.
    pub spread_distance: f64,
    /// Measured hand-proximity distance.
    pub proximity_distance: f64,
    /// Live position of the offset-mode reference anchor, when tracked.
    pub anchor_live: Option<Point3<f64>>,
    /// Tick delta in seconds.
    pub dt: f64,
}

/// Target rotations for the gripper's controllable joints.
///
/// Each entry is a complete [`JointRotation`]: writes are all-or-nothing
/// per joint per tick.
#[derive(Debug, Clone, Default)]
pub struct GripperTargets {
    rotations: HashMap<HandJoint, JointRotation>,
}

impl GripperTargets {
    /// Create an empty target set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a joint's complete rotation.
    pub fn set(&mut self, joint: HandJoint, rotation: JointRotation) {
        self.rotations.insert(joint, rotation);
    }

    /// Read a joint's rotation, identity if unwritten.
    #[must_use]
    pub fn get(&self, joint: HandJoint) -> JointRotation {
        self.rotations
            .get(&joint)
            .copied()
            .unwrap_or_else(JointRotation::identity)
    }

    /// Whether a joint was written this tick.
    #[must_use]
    pub fn contains(&self, joint: HandJoint) -> bool {
        self.rotations.contains_key(&joint)
    }

    /// Iterate over written joints.
    pub fn iter(&self) -> impl Iterator<Item = (&HandJoint, &JointRotation)> {
        self.rotations.iter()
    }

    /// Number of written joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    /// Check if no joint was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

/// Everything a tick produces for the downstream collaborators.
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Per-joint target rotations.
    pub targets: GripperTargets,
    /// The arbiter's active zone (0 = none).
    pub active_zone: ZoneId,
    /// The interaction mode after this tick.
    pub mode: Mode,
    /// Actuation intensity from the Select-branch proximity path, 0
    /// elsewhere.
    pub intensity: f64,
    /// Offset-mode anchor target, when retargeting ran this tick.
    pub anchor_target: Option<Point3<f64>>,
    /// Per-pair snap applied flags, in configuration order.
    pub snap_applied: Vec<bool>,
}

/// The composed teleoperation core.
///
/// # Example
///
/// ```
/// use teleop_hand::{RigConfig, TeleopRig, TickInput};
/// use teleop_types::{HandFrame, HandJoint, TouchFlags};
/// use nalgebra::UnitQuaternion;
///
/// let mut rig = TeleopRig::new(
///     RigConfig::default(),
///     UnitQuaternion::identity(),
///     UnitQuaternion::identity(),
/// ).unwrap();
///
/// let frame = HandFrame::new();
/// let output = rig.tick(&TickInput {
///     frame: &frame,
///     touch: TouchFlags::none(),
///     events: &[],
///     spread_distance: 5.0,
///     proximity_distance: 0.05,
///     anchor_live: None,
///     dt: 1.0 / 90.0,
/// });
///
/// // An empty frame still produces a full, neutral target set
/// assert!(output.targets.contains(HandJoint::Index0));
/// ```
#[derive(Debug)]
pub struct TeleopRig {
    extractor: AngleExtractor,
    index_ctrl: AbductionController,
    middle_ctrl: AbductionController,
    retargeter: ProximityRetargeter,
    arbiter: TouchArbiter,
    mode: ModeMachine,
    snaps: SnapEngine,
    bindings: Vec<(HandJoint, HandJoint)>,
    force_feed: Arc<ForceFeed>,
    force_cancel_threshold: f64,
}

impl TeleopRig {
    /// Build the pipeline from its configuration and the two controllable
    /// fingers' initial orientations.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid zone count. Malformed snap pairs
    /// don't fail construction; they warn and stay disabled.
    pub fn new(
        config: RigConfig,
        initial_index: UnitQuaternion<f64>,
        initial_middle: UnitQuaternion<f64>,
    ) -> Result<Self> {
        let bindings = config
            .snaps
            .iter()
            .map(|b| (b.joint_a, b.joint_b))
            .collect();
        let mut snaps = SnapEngine::new();
        for binding in &config.snaps {
            snaps.push(SnapPair::new(binding.config));
        }

        Ok(Self {
            extractor: AngleExtractor::new(),
            index_ctrl: AbductionController::new(Finger::Index, initial_index, config.abduction),
            middle_ctrl: AbductionController::new(
                Finger::Middle,
                initial_middle,
                config.abduction,
            ),
            retargeter: ProximityRetargeter::new(config.proximity),
            arbiter: TouchArbiter::new(config.arbiter)?,
            mode: ModeMachine::new(config.mode),
            snaps,
            bindings,
            force_feed: Arc::new(ForceFeed::new()),
            force_cancel_threshold: config.force_cancel_threshold,
        })
    }

    /// Handle for the background force-sensor thread to publish into.
    #[must_use]
    pub fn force_feed(&self) -> Arc<ForceFeed> {
        Arc::clone(&self.force_feed)
    }

    /// The arbitration state.
    #[must_use]
    pub const fn arbiter(&self) -> &TouchArbiter {
        &self.arbiter
    }

    /// The current interaction mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode.mode()
    }

    /// Toggle mapped/direct interpolation on both finger controllers.
    pub fn set_mapped(&mut self, mapped: bool) {
        self.index_ctrl.set_mapped(mapped);
        self.middle_ctrl.set_mapped(mapped);
    }

    /// Reset both finger controllers to their recorded baselines.
    ///
    /// Idempotent; the next tick reapplies baseline-plus-extractor angles
    /// to every joint.
    pub fn reset_fingers(&mut self) {
        self.index_ctrl.reset();
        self.middle_ctrl.reset();
    }

    /// Record offset-mode touch positions (first contact only).
    pub fn begin_anchor(
        &mut self,
        driver: Point3<f64>,
        target: Point3<f64>,
        reference: Point3<f64>,
    ) {
        self.retargeter.begin_retarget(driver, target, reference);
    }

    /// Leave offset mode; the anchor snaps to its base-follow position.
    pub fn end_anchor(&mut self, base_follow: Point3<f64>) -> Point3<f64> {
        self.retargeter.end_retarget(base_follow)
    }

    /// Execute one simulation step.
    #[must_use]
    pub fn tick(&mut self, input: &TickInput<'_>) -> TickOutput {
        // 1. Cross-thread force feed, read once per tick. A reading over
        //    the threshold cancels any applied snap.
        if let Some(force) = self.force_feed.take() {
            if force.abs() > self.force_cancel_threshold {
                tracing::debug!("force reading {force:.3} cancels applied snap pairs");
                self.snaps.cancel_all();
            }
        }

        // 2. Angle extraction (degrades per joint, never fails).
        let angles = self.extractor.extract(input.frame);

        // 3. Blend and assemble the full target set.
        let mut targets = GripperTargets::new();

        targets.set(
            HandJoint::Thumb0,
            JointRotation::new(angles.thumb.flexion[0], 0.0, 0.0),
        );
        targets.set(
            HandJoint::Thumb1,
            JointRotation::new(angles.thumb.flexion[1], 0.0, 0.0),
        );

        let index_targets = self.index_ctrl.update(
            &AbductionInput {
                fingertip_contact: input.touch.index,
                spread_distance: input.spread_distance,
                dt: input.dt,
            },
            &angles.index,
        );
        apply_finger(&mut targets, Finger::Index, &index_targets);

        let middle_targets = self.middle_ctrl.update(
            &AbductionInput {
                fingertip_contact: input.touch.middle,
                spread_distance: input.spread_distance,
                dt: input.dt,
            },
            &angles.middle,
        );
        apply_finger(&mut targets, Finger::Middle, &middle_targets);

        // 4. Snap pairs observe the blended output and may override it,
        //    suppressing this tick's controller writes for those joints.
        for (pair, &(joint_a, joint_b)) in
            self.snaps.pairs_mut().iter_mut().zip(&self.bindings)
        {
            let axis = pair.config().axis;
            let a = targets.get(joint_a).axis(axis);
            let b = targets.get(joint_b).axis(axis);
            if let Some((snap_a, snap_b)) = pair.update(a, b, input.dt) {
                let mut rot_a = targets.get(joint_a);
                rot_a.set_axis(axis, snap_a);
                targets.set(joint_a, rot_a);

                let mut rot_b = targets.get(joint_b);
                rot_b.set_axis(axis, snap_b);
                targets.set(joint_b, rot_b);
            }
        }

        // 5. Arbitration over this tick's buffered events.
        self.arbiter.step(input.events, input.dt);
        let active_zone = self.arbiter.active();

        // 6. Mode transition.
        let mode = self.mode.update(active_zone, input.proximity_distance);

        // 7. Select-branch proximity paths.
        let mut intensity = 0.0;
        let mut anchor_target = None;
        if mode.is_select() {
            if let (Some(zone), Some(chain)) =
                (self.arbiter.zone(active_zone), index_chain(input.frame))
            {
                intensity = self.retargeter.read(&zone.last_position, &chain).intensity;
            }
            if let Some(live) = input.anchor_live {
                anchor_target = self.retargeter.retarget(&live);
            }
        }

        TickOutput {
            targets,
            active_zone,
            mode,
            intensity,
            anchor_target,
            snap_applied: self.snaps.applied_flags(),
        }
    }
}

/// Write one finger's three chain-joint targets.
fn apply_finger(targets: &mut GripperTargets, finger: Finger, rotations: &FingerJointTargets) {
    let chain = finger.chain();
    targets.set(chain[0], rotations.proximal);
    targets.set(chain[1], rotations.middle);
    targets.set(chain[2], rotations.distal);
}

/// The index finger's tracked chain as a polyline, when fully resolved.
fn index_chain(frame: &HandFrame) -> Option<FingerPolyline> {
    let positions: Option<Vec<_>> = Finger::Index
        .chain()
        .iter()
        .map(|&joint| frame.position(joint))
        .collect();
    positions.and_then(|p| FingerPolyline::try_new(p).ok())
}
