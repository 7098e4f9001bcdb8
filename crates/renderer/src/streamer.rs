//! Progressive streaming of a generated star field into the live point cloud.
//!
//! Each tick exposes at most `batch_size` more stars and copies only those, so the
//! per-frame cost is bounded no matter how large the field is. Replacing the source
//! restarts the fill from zero; the old partial buffer is not merged.

use crate::point_cloud::PointCloud;
use procgen::StarField;

/// Stars exposed per tick by default.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

pub struct PointCloudStreamer {
    batch_size: usize,
    source: StarField,
    visible: usize,
    live: PointCloud,
    /// `live` holds exactly `source[..live.len()]`, so ticks can append.
    in_sync: bool,
    dirty: bool,
}

impl Default for PointCloudStreamer {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl PointCloudStreamer {
    /// A batch size of 0 is treated as 1.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            source: StarField::default(),
            visible: 0,
            live: PointCloud::new(),
            in_sync: true,
            dirty: false,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn target_count(&self) -> usize {
        self.source.len()
    }

    pub fn is_filled(&self) -> bool {
        self.visible >= self.source.len()
    }

    /// Swap in a newly generated field and restart the fill from zero.
    pub fn replace(&mut self, field: StarField) {
        log::debug!(
            "Star stream restarting: {} -> {} stars",
            self.source.len(),
            field.len()
        );
        self.source = field;
        self.visible = 0;
        self.in_sync = false;
        self.dirty = true;
    }

    /// Expose the next batch. Returns true when the live buffer was written.
    pub fn tick(&mut self) -> bool {
        let target = self.source.len();
        if self.visible >= target {
            return false;
        }
        self.visible = (self.visible + self.batch_size).min(target);
        let n = self.visible;
        if self.in_sync {
            let start = self.live.len();
            self.live.append(
                &self.source.positions[start..n],
                &self.source.colors[start..n],
                &self.source.sizes[start..n],
            );
        } else {
            // First batch of a new source overwrites whatever the old one left behind.
            self.live.write(
                &self.source.positions[..n],
                &self.source.colors[..n],
                &self.source.sizes[..n],
            );
            self.in_sync = true;
        }
        self.dirty = true;
        if n == target {
            log::debug!("Star stream filled: {} stars", n);
        }
        true
    }

    /// The buffer to draw, or `None` while nothing is visible.
    pub fn live(&self) -> Option<&PointCloud> {
        if self.visible == 0 {
            None
        } else {
            Some(&self.live)
        }
    }

    /// Read and clear the changed flag that tells the surface to re-upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
