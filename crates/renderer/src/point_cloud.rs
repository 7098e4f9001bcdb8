//! Live point-cloud storage read by the render surface.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved per-star vertex for point-sprite rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StarVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
}

impl StarVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32];

    /// One vertex per star, stepped per instance so a surface can expand sprites.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// The buffer a surface draws from: attribute arrays of equal length plus a
/// version that bumps on every write.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    sizes: Vec<f32>,
    version: u64,
    reallocations: u64,
    last_copied: usize,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Bumped on every write; surfaces compare it to decide on re-upload.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// How many writes changed the element count (and so resized storage).
    pub fn reallocations(&self) -> u64 {
        self.reallocations
    }

    /// Elements copied by the most recent write or append.
    pub fn last_copied(&self) -> usize {
        self.last_copied
    }

    /// Write the given prefix into storage. Storage is only resized when the
    /// element count changes; same-size writes overwrite in place.
    pub fn write(&mut self, positions: &[Vec3], colors: &[Vec3], sizes: &[f32]) {
        debug_assert!(positions.len() == colors.len() && colors.len() == sizes.len());
        if positions.len() != self.positions.len() {
            self.positions.clear();
            self.colors.clear();
            self.sizes.clear();
            self.positions.extend_from_slice(positions);
            self.colors.extend_from_slice(colors);
            self.sizes.extend_from_slice(sizes);
            self.reallocations += 1;
        } else {
            self.positions.copy_from_slice(positions);
            self.colors.copy_from_slice(colors);
            self.sizes.copy_from_slice(sizes);
        }
        self.last_copied = positions.len();
        self.version += 1;
    }

    /// Grow storage by the given elements, leaving the existing ones untouched.
    pub fn append(&mut self, positions: &[Vec3], colors: &[Vec3], sizes: &[f32]) {
        debug_assert!(positions.len() == colors.len() && colors.len() == sizes.len());
        if positions.is_empty() {
            return;
        }
        self.positions.extend_from_slice(positions);
        self.colors.extend_from_slice(colors);
        self.sizes.extend_from_slice(sizes);
        self.reallocations += 1;
        self.last_copied = positions.len();
        self.version += 1;
    }

    /// Interleave the attributes for a single vertex buffer upload.
    pub fn vertices(&self) -> Vec<StarVertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .zip(&self.sizes)
            .map(|((p, c), &size)| StarVertex {
                position: p.to_array(),
                color: c.to_array(),
                size,
            })
            .collect()
    }

    /// Raw bytes of the position attribute.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}
