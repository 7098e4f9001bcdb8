//! Opening camera flight from deep space down to the planet.

use glam::Vec3;
use renderer::{Camera, CameraPose};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPhase {
    Initial,
    Moving,
    Complete,
}

/// Fixed start and end positions of the flight; the camera always faces `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPlan {
    pub start: Vec3,
    pub end: Vec3,
    pub target: Vec3,
    pub duration: Duration,
}

impl FlightPlan {
    /// Camera pose at eased progress `t` in [0, 1].
    pub fn pose_at(&self, t: f32) -> CameraPose {
        let t = t.clamp(0.0, 1.0);
        // Weighted form is exact at both ends.
        let position = self.start * (1.0 - t) + self.end * t;
        CameraPose::new(position, self.target)
    }
}

/// Cubic ease-in-out.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Drives the camera along a [`FlightPlan`]. The caller passes the session clock's
/// elapsed time in; the controller keeps no clock of its own.
#[derive(Debug, Clone)]
pub struct CameraFlight {
    plan: FlightPlan,
    phase: CameraPhase,
    started_at: Duration,
    progress: f32,
}

impl CameraFlight {
    pub fn new(plan: FlightPlan) -> Self {
        Self {
            plan,
            phase: CameraPhase::Initial,
            started_at: Duration::ZERO,
            progress: 0.0,
        }
    }

    pub fn phase(&self) -> CameraPhase {
        self.phase
    }

    pub fn plan(&self) -> &FlightPlan {
        &self.plan
    }

    /// Linear progress in [0, 1] (before easing).
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Start moving at `now`. The camera snaps to the start pose. Ignored unless initial.
    pub fn begin(&mut self, now: Duration, camera: &mut Camera) -> bool {
        if self.phase != CameraPhase::Initial {
            return false;
        }
        self.phase = CameraPhase::Moving;
        self.started_at = now;
        self.progress = 0.0;
        camera.set_pose(self.plan.pose_at(0.0));
        log::info!("Camera flight started");
        true
    }

    /// Sample the flight at `now`. Returns true on the one tick that completes it.
    pub fn tick(&mut self, now: Duration, camera: &mut Camera) -> bool {
        if self.phase != CameraPhase::Moving {
            return false;
        }
        let elapsed = now.saturating_sub(self.started_at);
        self.progress = if self.plan.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.plan.duration.as_secs_f32()).min(1.0)
        };
        camera.set_pose(self.plan.pose_at(ease_in_out_cubic(self.progress)));

        if elapsed >= self.plan.duration {
            self.phase = CameraPhase::Complete;
            log::info!("Camera flight complete");
            return true;
        }
        false
    }
}
