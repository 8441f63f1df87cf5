//! Single-active arbitration over touch-sensitive zones.
//!
//! One logical zone may be backed by several physical sub-volumes, so a
//! per-zone contact **count** — not a boolean — gates activation and
//! release: a zone releases only when its last sub-collider leaves.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_types::{ContactEvent, ContactPhase, Result, TeleopError, ZoneId};

/// Arbitration configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArbiterConfig {
    /// Number of zones, 1 to [`ZoneId::MAX_ZONES`].
    pub zone_count: u8,
    /// Minimum seconds between active-zone switches. A takeover attempted
    /// inside the window is ignored (counters still update). Default 0.
    pub cooldown: f64,
    /// Fresh-enter count per motor cycle step for the grouped variant.
    pub cycle_length: u32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            zone_count: ZoneId::MAX_ZONES,
            cooldown: 0.0,
            cycle_length: 4,
        }
    }
}

impl ArbiterConfig {
    /// Create a config for the full 12-zone layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for the grouped 3-zone layout.
    #[must_use]
    pub fn grouped() -> Self {
        Self {
            zone_count: 3,
            ..Self::default()
        }
    }

    /// Set the switch cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, seconds: f64) -> Self {
        self.cooldown = seconds;
        self
    }
}

/// Per-zone detector state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneState {
    /// Live sub-collider contacts (re-entrant-safe).
    pub contacts: u32,
    /// Fresh enters since the zone last became active (grouped cycling).
    pub entries: u32,
    /// Whether this zone holds the selection.
    pub active: bool,
    /// Last reported contact position.
    pub last_position: Point3<f64>,
}

impl ZoneState {
    fn new() -> Self {
        Self {
            contacts: 0,
            entries: 0,
            active: false,
            last_position: Point3::origin(),
        }
    }
}

/// Resolves overlapping contact events to exactly one active zone.
///
/// Events are applied in arrival order, which is the deterministic
/// tie-break for simultaneous enters: the first processed wins, and the
/// later one flows through the normal cooldown/force-release path.
///
/// # Example
///
/// ```
/// use teleop_select::{ArbiterConfig, TouchArbiter};
/// use teleop_types::{ContactEvent, ZoneId};
/// use nalgebra::Point3;
///
/// let mut arbiter = TouchArbiter::new(ArbiterConfig::default()).unwrap();
/// arbiter.apply(&ContactEvent::enter(ZoneId::new(2), Point3::origin()));
/// assert_eq!(arbiter.active(), ZoneId::new(2));
///
/// // A second zone takes over (cooldown 0): zone 2 is force-released
/// arbiter.apply(&ContactEvent::enter(ZoneId::new(5), Point3::origin()));
/// assert_eq!(arbiter.active(), ZoneId::new(5));
/// ```
#[derive(Debug, Clone)]
pub struct TouchArbiter {
    config: ArbiterConfig,
    zones: Vec<ZoneState>,
    active: ZoneId,
    since_switch: f64,
}

impl TouchArbiter {
    /// Create an arbiter.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::InvalidZoneCount`] when the zone count is 0
    /// or above [`ZoneId::MAX_ZONES`].
    pub fn new(config: ArbiterConfig) -> Result<Self> {
        if config.zone_count == 0 || config.zone_count > ZoneId::MAX_ZONES {
            return Err(TeleopError::InvalidZoneCount(config.zone_count));
        }
        Ok(Self {
            zones: vec![ZoneState::new(); config.zone_count as usize],
            config,
            active: ZoneId::NONE,
            since_switch: f64::INFINITY,
        })
    }

    /// The currently active zone, [`ZoneId::NONE`] when none.
    #[must_use]
    pub const fn active(&self) -> ZoneId {
        self.active
    }

    /// Read one zone's detector state.
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&ZoneState> {
        self.zone_index(id).map(|i| &self.zones[i])
    }

    /// Motor cycle step for a zone in the grouped variant:
    /// `⌊(entries − 1) / cycle_length⌋`, or 0 before any fresh enter.
    #[must_use]
    pub fn motor_cycle(&self, id: ZoneId) -> u32 {
        self.zone(id)
            .map_or(0, |z| z.entries.saturating_sub(1) / self.config.cycle_length)
    }

    /// Accumulate tick time toward the cooldown window.
    ///
    /// Per-tick deltas, not wall-clock snapshots: pausing and resuming
    /// the tick loop never lets the cooldown elapse for free.
    pub fn advance(&mut self, dt: f64) {
        self.since_switch += dt;
    }

    /// Advance the cooldown clock, then apply a tick's buffered events in
    /// arrival order.
    pub fn step(&mut self, events: &[ContactEvent], dt: f64) {
        self.advance(dt);
        for event in events {
            self.apply(event);
        }
    }

    /// Apply a single contact event.
    ///
    /// Events for unknown zones are ignored.
    pub fn apply(&mut self, event: &ContactEvent) {
        let Some(index) = self.zone_index(event.zone) else {
            return;
        };

        match event.phase {
            ContactPhase::Enter => self.on_enter(index, event),
            ContactPhase::Stay => self.on_stay(index, event),
            ContactPhase::Exit => self.on_exit(index),
        }
    }

    /// Clear all detector state and the selection.
    pub fn reset(&mut self) {
        for zone in &mut self.zones {
            *zone = ZoneState::new();
        }
        self.active = ZoneId::NONE;
        self.since_switch = f64::INFINITY;
    }

    fn on_enter(&mut self, index: usize, event: &ContactEvent) {
        // Contact bookkeeping happens regardless of whether the activation
        // attempt below is honored: the zone is physically touched.
        let fresh = self.zones[index].contacts == 0;
        self.zones[index].contacts += 1;
        if fresh {
            self.zones[index].entries += 1;
        }
        self.zones[index].last_position = event.point;

        if self.active.is_none() {
            // No holder: activate immediately, unconditionally.
            self.activate(index, event.zone);
        } else if self.active != event.zone {
            if self.since_switch < self.config.cooldown {
                // Inside the cooldown window: the takeover is ignored.
                return;
            }
            self.force_release_active();
            self.activate(index, event.zone);
            self.reset_entry_counters(index);
        }
    }

    fn on_stay(&mut self, index: usize, event: &ContactEvent) {
        // Only the active zone's detector tracks position on stay.
        if self.active == event.zone {
            self.zones[index].last_position = event.point;
        }
    }

    fn on_exit(&mut self, index: usize) {
        let zone = &mut self.zones[index];
        zone.contacts = zone.contacts.saturating_sub(1);

        // Only the active zone's own full release clears the selection;
        // while any sub-collider still touches, the selection holds.
        if zone.active && zone.contacts == 0 {
            zone.active = false;
            self.active = ZoneId::NONE;
        }
    }

    fn activate(&mut self, index: usize, id: ZoneId) {
        self.zones[index].active = true;
        self.active = id;
        self.since_switch = 0.0;
    }

    /// Release the previous holder's detector flag without touching its
    /// contact count: it may still be physically touched.
    fn force_release_active(&mut self) {
        if let Some(index) = self.zone_index(self.active) {
            self.zones[index].active = false;
        }
        self.active = ZoneId::NONE;
    }

    /// On a switch, the new holder restarts its cycle at 1 and everyone
    /// else goes back to zero.
    fn reset_entry_counters(&mut self, winner: usize) {
        for (i, zone) in self.zones.iter_mut().enumerate() {
            zone.entries = u32::from(i == winner);
        }
    }

    fn zone_index(&self, id: ZoneId) -> Option<usize> {
        if id.is_none() || id.raw() > self.config.zone_count {
            return None;
        }
        Some(usize::from(id.raw()) - 1)
    }
}
