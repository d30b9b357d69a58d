//! The spin simulator: one rotation angle, one angular velocity, advanced
//! once per rendered frame by the host.
//!
//! Nothing here owns a timer. The host calls [`WheelState::step_frame`] once
//! per display refresh while [`WheelState::is_spinning`] is true; tests drive
//! it by hand.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::{
    crossing::SegmentCrossingDetector,
    error::SpinError,
    item::{Item, MIN_ITEMS},
    resolver::resolve,
};

#[cfg(test)]
mod tests;

pub const MIN_VELOCITY: f64 = 0.0015;
pub const INITIAL_VELOCITY_MIN: f64 = 0.45;
pub const INITIAL_VELOCITY_MAX: f64 = 0.90;
pub const COAST_THRESHOLD: f64 = 0.08;
pub const BRAKE_THRESHOLD: f64 = 0.03;
pub const COAST_DECELERATION: f64 = 0.993;
pub const BRAKE_DECELERATION: f64 = 0.97;
pub const SNAP_DECELERATION: f64 = 0.92;

/// Highest decay factor accepted from settings. Anything closer to 1 would
/// let a spin run for minutes.
const MAX_DECELERATION: f64 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum DecelerationTier {
    Coast,
    Brake,
    Snap,
}

/// Tuning of the spin. Velocities are in radians per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinPhysics {
    pub min_velocity: f64,
    pub initial_velocity_min: f64,
    pub initial_velocity_max: f64,
    pub coast_threshold: f64,
    pub brake_threshold: f64,
    pub coast_factor: f64,
    pub brake_factor: f64,
    pub snap_factor: f64,
}

impl Default for SpinPhysics {
    fn default() -> Self {
        Self {
            min_velocity: MIN_VELOCITY,
            initial_velocity_min: INITIAL_VELOCITY_MIN,
            initial_velocity_max: INITIAL_VELOCITY_MAX,
            coast_threshold: COAST_THRESHOLD,
            brake_threshold: BRAKE_THRESHOLD,
            coast_factor: COAST_DECELERATION,
            brake_factor: BRAKE_DECELERATION,
            snap_factor: SNAP_DECELERATION,
        }
    }
}

impl SpinPhysics {
    /// Tightest tier wins: below the brake threshold always snaps.
    pub fn tier(&self, velocity: f64) -> DecelerationTier {
        if velocity < self.brake_threshold {
            DecelerationTier::Snap
        } else if velocity < self.coast_threshold {
            DecelerationTier::Brake
        } else {
            DecelerationTier::Coast
        }
    }

    pub fn factor(&self, tier: DecelerationTier) -> f64 {
        match tier {
            DecelerationTier::Coast => self.coast_factor,
            DecelerationTier::Brake => self.brake_factor,
            DecelerationTier::Snap => self.snap_factor,
        }
    }

    pub fn decay(&self, velocity: f64) -> f64 {
        velocity * self.factor(self.tier(velocity))
    }

    /// Copy with every value forced into a range where a spin still ends.
    pub fn sanitized(&self) -> SpinPhysics {
        let clamp_factor = |f: f64| {
            if f.is_finite() {
                f.clamp(0.0, MAX_DECELERATION)
            } else {
                MAX_DECELERATION
            }
        };
        let min_velocity = if self.min_velocity.is_finite() && self.min_velocity > 1e-6 {
            self.min_velocity
        } else {
            MIN_VELOCITY
        };
        let (low, high) = if self.initial_velocity_min <= self.initial_velocity_max {
            (self.initial_velocity_min, self.initial_velocity_max)
        } else {
            (self.initial_velocity_max, self.initial_velocity_min)
        };
        let low = if low.is_finite() { low.max(min_velocity) } else { INITIAL_VELOCITY_MIN };
        let high = if high.is_finite() { high.max(low) } else { low.max(INITIAL_VELOCITY_MAX) };
        SpinPhysics {
            min_velocity,
            initial_velocity_min: low,
            initial_velocity_max: high,
            coast_threshold: self.coast_threshold.max(self.brake_threshold),
            brake_threshold: self.brake_threshold.min(self.coast_threshold),
            coast_factor: clamp_factor(self.coast_factor),
            brake_factor: clamp_factor(self.brake_factor),
            snap_factor: clamp_factor(self.snap_factor),
        }
    }

    pub fn random_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.initial_velocity_min..=self.initial_velocity_max)
    }
}

/// Fired each frame the pointer enters a new segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    pub velocity: f64,
    pub segment: i64,
}

impl TickEvent {
    pub fn pitch_hz(&self) -> f64 {
        150.0 + self.velocity * 200.0
    }

    /// Feedback strength in `[0, 1]`.
    pub fn intensity(&self) -> f64 {
        (self.velocity * 5.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinResult {
    pub winning_item: Item,
    pub index: usize,
    pub final_rotation: f64,
    pub frames: u32,
}

/// Lifecycle hooks for side effects tied to a spin.
pub trait SpinObserver {
    fn on_spin_start(&mut self) {}
    fn on_tick(&mut self, _tick: &TickEvent) {}
    fn on_spin_end(&mut self, _result: &SpinResult) {}
}

impl SpinObserver for () {}

/// Read-only view handed to the render surface each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSnapshot {
    pub rotation: f64,
    pub velocity: f64,
    pub spinning: bool,
    pub segment_count: usize,
}

#[derive(Debug, Clone)]
pub struct WheelState {
    items: Vec<Item>,
    rotation: f64,
    velocity: f64,
    crossing: SegmentCrossingDetector,
    spinning: bool,
    frames: u32,
    physics: SpinPhysics,
}

impl Default for WheelState {
    fn default() -> Self {
        let items = crate::item::default_items();
        Self {
            crossing: SegmentCrossingDetector::at(0.0, items.len()),
            items,
            rotation: 0.0,
            velocity: 0.0,
            spinning: false,
            frames: 0,
            physics: SpinPhysics::default(),
        }
    }
}

impl WheelState {
    pub fn new(items: Vec<Item>, physics: SpinPhysics) -> Result<Self, SpinError> {
        check_item_count(items.len())?;
        let crossing = SegmentCrossingDetector::at(0.0, items.len());
        Ok(Self {
            items,
            rotation: 0.0,
            velocity: 0.0,
            crossing,
            spinning: false,
            frames: 0,
            physics: physics.sanitized(),
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn physics(&self) -> &SpinPhysics {
        &self.physics
    }

    pub fn last_crossed_segment(&self) -> Option<i64> {
        self.crossing.last_segment()
    }

    pub fn snapshot(&self) -> WheelSnapshot {
        WheelSnapshot {
            rotation: self.rotation,
            velocity: self.velocity,
            spinning: self.spinning,
            segment_count: self.items.len(),
        }
    }

    /// Replaces the candidates. Refused mid-spin.
    pub fn set_items(&mut self, items: Vec<Item>) -> Result<(), SpinError> {
        if self.spinning {
            return Err(SpinError::ItemsLocked);
        }
        check_item_count(items.len())?;
        if items != self.items {
            self.crossing = SegmentCrossingDetector::at(self.rotation, items.len());
            self.items = items;
        }
        Ok(())
    }

    pub fn set_physics(&mut self, physics: SpinPhysics) -> Result<(), SpinError> {
        if self.spinning {
            return Err(SpinError::AlreadySpinning);
        }
        self.physics = physics.sanitized();
        Ok(())
    }

    /// Starts a spin with a velocity drawn from `rng`.
    pub fn begin_spin<R, O>(&mut self, rng: &mut R, observer: &mut O) -> Result<(), SpinError>
    where
        R: Rng + ?Sized,
        O: SpinObserver + ?Sized,
    {
        if self.spinning {
            return Err(SpinError::AlreadySpinning);
        }
        let velocity = self.physics.random_velocity(rng);
        self.begin_spin_with_velocity(velocity, observer)
    }

    /// Starts a spin with a known velocity, clamped to the physics range.
    pub fn begin_spin_with_velocity<O>(
        &mut self,
        velocity: f64,
        observer: &mut O,
    ) -> Result<(), SpinError>
    where
        O: SpinObserver + ?Sized,
    {
        if self.spinning {
            return Err(SpinError::AlreadySpinning);
        }
        check_item_count(self.items.len())?;
        let velocity = if velocity.is_finite() {
            velocity.clamp(
                self.physics.initial_velocity_min,
                self.physics.initial_velocity_max,
            )
        } else {
            self.physics.initial_velocity_min
        };
        self.velocity = velocity;
        self.frames = 0;
        self.spinning = true;
        log::debug!(
            "Spin started at rotation {:.4} with velocity {:.4}",
            self.rotation,
            velocity
        );
        observer.on_spin_start();
        Ok(())
    }

    /// Advances one frame. Returns the result on the frame the wheel stops,
    /// and `None` on every other call, including calls while idle.
    pub fn step_frame<O>(&mut self, observer: &mut O) -> Option<SpinResult>
    where
        O: SpinObserver + ?Sized,
    {
        #[cfg(feature = "puffin")]
        puffin::profile_function!();
        if !self.spinning {
            return None;
        }

        self.rotation += self.velocity;
        self.velocity = self.physics.decay(self.velocity);
        self.frames += 1;

        if self.velocity < self.physics.min_velocity {
            self.spinning = false;
            // no tick on the stopping frame, but the next spin starts in sync
            self.crossing = SegmentCrossingDetector::at(self.rotation, self.items.len());
            let index = resolve(self.rotation, self.items.len());
            let result = SpinResult {
                winning_item: self.items[index].clone(),
                index,
                final_rotation: self.rotation,
                frames: self.frames,
            };
            log::debug!(
                "Spin stopped after {} frames at rotation {:.4}: {} (#{})",
                result.frames,
                result.final_rotation,
                result.winning_item,
                result.index
            );
            observer.on_spin_end(&result);
            return Some(result);
        }

        if let Some(segment) = self.crossing.observe(self.rotation, self.items.len()) {
            let tick = TickEvent {
                velocity: self.velocity,
                segment,
            };
            log::trace!("Tick into segment {} at {:.4}", segment, tick.velocity);
            observer.on_tick(&tick);
        }
        None
    }
}

fn check_item_count(count: usize) -> Result<(), SpinError> {
    if count < MIN_ITEMS {
        return Err(SpinError::TooFewItems {
            count,
            required: MIN_ITEMS,
        });
    }
    Ok(())
}
