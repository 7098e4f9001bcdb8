//! Planet auto-rotation. Runs every frame regardless of camera or interaction state.

use engine_core::{Transform, TransformRaw};

#[derive(Debug, Clone)]
pub struct PlanetSpin {
    pub transform: Transform,
    /// Radians per second about the world Y axis.
    pub rate: f32,
    angle: f32,
}

impl PlanetSpin {
    pub fn new(rate: f32) -> Self {
        Self {
            transform: Transform::default(),
            rate,
            angle: 0.0,
        }
    }

    /// Advance by one frame delta (seconds).
    pub fn update(&mut self, dt: f32) {
        let step = self.rate * dt;
        self.transform.rotate_y(step);
        self.angle = (self.angle + step).rem_euclid(std::f32::consts::TAU);
    }

    /// Accumulated rotation in [0, 2π).
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn model(&self) -> TransformRaw {
        TransformRaw::from(&self.transform)
    }
}
