//! Seam between the session and whatever draws it.

use engine_core::TransformRaw;
use glam::Vec2;
use renderer::{CameraPose, CameraUniform, PointCloud};

use crate::flight::CameraPhase;
use crate::interaction::AnimationPhase;

/// UI-facing state for the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOverlay {
    pub camera_phase: CameraPhase,
    pub animation_phase: AnimationPhase,
    /// Where the newly placed star glows, in screen percent.
    pub glow_position: Option<Vec2>,
    /// Whether the interaction control is shown.
    pub interaction_visible: bool,
    pub total_clicks: u64,
}

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame<'a> {
    pub camera: CameraPose,
    pub camera_uniform: CameraUniform,
    pub planet: TransformRaw,
    /// `None` while no stars are visible: draw nothing for the field.
    pub stars: Option<&'a PointCloud>,
    /// The star buffer changed since the last frame and must be re-uploaded.
    pub stars_changed: bool,
    pub overlay: SceneOverlay,
}

/// Consumes frames. Owns its GPU resources; the session never touches them.
pub trait RenderSurface {
    fn present(&mut self, frame: &SceneFrame<'_>);
}

/// Headless surface that logs what it would draw.
#[derive(Debug, Default)]
pub struct LogSurface {
    frames: u64,
    uploads: u64,
    last_overlay: Option<SceneOverlay>,
}

impl LogSurface {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

impl RenderSurface for LogSurface {
    fn present(&mut self, frame: &SceneFrame<'_>) {
        self.frames += 1;
        if frame.stars_changed {
            self.uploads += 1;
            match frame.stars {
                Some(cloud) => log::trace!(
                    "Uploading {} stars ({} bytes of positions)",
                    cloud.len(),
                    cloud.position_bytes().len()
                ),
                None => log::trace!("Star field cleared"),
            }
        }
        let overlay = frame.overlay;
        if self.last_overlay.map(|o| o.animation_phase) != Some(overlay.animation_phase) {
            log::debug!(
                "Frame {}: phase {} (camera at {:.1?})",
                self.frames,
                overlay.animation_phase.label(),
                frame.camera.position
            );
        }
        self.last_overlay = Some(overlay);
    }
}
