use alloc::vec::Vec;

use crate::mesh::weld::WeldPool;

/// Reusable temporary storage for [`MeshBuilder::build_geometry`](crate::MeshBuilder::build_geometry).
///
/// Nothing in here outlives a single call, but keeping it around between calls
/// avoids reallocating on every build.
/// One `Scratch` can serve any number of [`MeshBuilder`](crate::MeshBuilder)s,
/// one call at a time.
#[derive(Debug, Default)]
pub struct Scratch {
    pub(crate) weld: WeldPool,
    /// Output vertex of every face corner, in face order.
    pub(crate) corners: Vec<u32>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scratch arena sized for meshes of up to `faces` faces over
    /// `positions` positions.
    pub fn with_capacity(faces: usize, positions: usize) -> Self {
        let mut scratch = Self::default();
        // Failing to preallocate is not an error; building will retry.
        let _ = scratch.weld.reset(positions, faces * 3);
        let _ = scratch.corners.try_reserve_exact(faces * 3);
        scratch
    }

    /// Releases all memory held by this arena.
    pub fn release(&mut self) {
        self.weld.release();
        self.corners = Vec::new();
    }
}
