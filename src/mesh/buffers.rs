use alloc::{collections::TryReserveError, vec::Vec};

use bytemuck::{Pod, Zeroable};

use crate::{FrameEncoding, TangentFrame, mesh::AssemblyPath};

/// Number of floats per output vertex.
pub const VERTEX_STRIDE: usize = 13;

/// Number of vertices the vertex buffer grows by at least, enough for two
/// triangles.
const MIN_GROWTH: usize = 6;

/// One interleaved record of the output vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
pub struct OutputVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    /// The vertex's tangent-space frame, as produced by a [`FrameEncoding`].
    pub tangent_frame: [f32; 4],
    pub color: [f32; 4],
}

const _: () = assert!(size_of::<OutputVertex>() == VERTEX_STRIDE * size_of::<f32>());

/// Index format for indexed drawing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers, for up to 65 536 vertices.
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Largest vertex count addressable with [`Uint16`](IndexFormat::Uint16).
    pub const MAX_UINT16_VERTICES: usize = 0x10000;

    /// Picks the narrowest format able to address `vertex_count` vertices.
    pub const fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count > Self::MAX_UINT16_VERTICES {
            Self::Uint32
        } else {
            Self::Uint16
        }
    }

    /// Size in bytes of each index.
    pub const fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Borrowed index data in either width.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IndexSlice<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl IndexSlice<'_> {
    pub const fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::Uint16,
            Self::U32(_) => IndexFormat::Uint32,
        }
    }

    pub const fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns index number `i`, widened to `u32`.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U16(indices) => indices.get(i).map(|&index| u32::from(index)),
            Self::U32(indices) => indices.get(i).copied(),
        }
    }

    /// Iterates all indices, widened to `u32`.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        let indices = *self;
        (0..self.len()).map(move |i| match indices {
            Self::U16(indices) => u32::from(indices[i]),
            Self::U32(indices) => indices[i],
        })
    }
}

#[derive(Clone, Debug)]
pub(crate) enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    pub(crate) fn as_slice(&self) -> IndexSlice<'_> {
        match self {
            Self::U16(indices) => IndexSlice::U16(indices),
            Self::U32(indices) => IndexSlice::U32(indices),
        }
    }
}

/// The persistent output of a build: the vertex and index buffers, plus the
/// per-vertex state incremental updates need.
#[derive(Debug)]
pub(crate) struct GeometryBuffers {
    pub(crate) path: AssemblyPath,
    pub(crate) vertices: Vec<OutputVertex>,
    /// Unencoded frame of each vertex.
    /// Only kept for [`AssemblyPath::ExplicitNormals`].
    pub(crate) frames: Vec<TangentFrame>,
    /// Vertices touched by the current incremental update.
    pub(crate) dirty: Vec<bool>,
    pub(crate) indices: IndexBuffer,
}

impl GeometryBuffers {
    /// Allocates empty buffers with room for `vertices` vertices.
    pub(crate) fn with_capacity(
        path: AssemblyPath,
        vertices: usize,
    ) -> Result<Self, TryReserveError> {
        let mut buffers = Self {
            path,
            vertices: Vec::new(),
            frames: Vec::new(),
            dirty: Vec::new(),
            indices: IndexBuffer::U16(Vec::new()),
        };
        buffers.vertices.try_reserve_exact(vertices)?;
        if path == AssemblyPath::ExplicitNormals {
            buffers.frames.try_reserve_exact(vertices)?;
        }
        Ok(buffers)
    }

    #[inline]
    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn vertex_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Appends `vertex` and its unencoded `frame`, returning its slot.
    ///
    /// When full, the buffers grow by an eighth of their size or by two
    /// triangles' worth of vertices, whichever is larger.
    pub(crate) fn push_vertex(
        &mut self,
        vertex: OutputVertex,
        frame: TangentFrame,
    ) -> Result<u32, TryReserveError> {
        let slot = self.vertices.len();
        if slot == self.vertices.capacity() {
            let growth = (slot >> 3).max(MIN_GROWTH);
            self.vertices.try_reserve_exact(growth)?;
            if self.path == AssemblyPath::ExplicitNormals {
                self.frames.try_reserve_exact(growth)?;
            }
        }

        self.vertices.push(vertex);
        if self.path == AssemblyPath::ExplicitNormals {
            self.frames.push(frame);
        }

        Ok(slot as u32)
    }

    /// Encodes the cached frame of vertex `slot` into its tangent floats.
    pub(crate) fn encode_frame<E: FrameEncoding>(&mut self, slot: usize) {
        let frame = self.frames[slot].orthonormalized();
        self.vertices[slot].tangent_frame = E::encode(&frame);

        #[cfg(mesh_weld_more_assertions)]
        {
            let decoded = E::decode(self.vertices[slot].tangent_frame);
            assert!(decoded.normal.dot(frame.normal) > 0.999);
            assert!(decoded.tangent.dot(frame.tangent) > 0.999);
            assert!(decoded.bitangent.dot(frame.bitangent) > 0.999);
        }
    }

    /// Replaces the index buffer with `corners`, narrowed to 16 bits when the
    /// vertex count allows it.
    pub(crate) fn write_indices(&mut self, corners: &[u32]) -> Result<(), TryReserveError> {
        self.indices = match IndexFormat::for_vertex_count(self.vertex_count()) {
            IndexFormat::Uint16 => {
                let mut indices = Vec::new();
                indices.try_reserve_exact(corners.len())?;
                // Every index is below the vertex count, which fits.
                indices.extend(corners.iter().map(|&index| index as u16));
                IndexBuffer::U16(indices)
            }
            IndexFormat::Uint32 => {
                let mut indices = Vec::new();
                indices.try_reserve_exact(corners.len())?;
                indices.extend_from_slice(corners);
                IndexBuffer::U32(indices)
            }
        };

        Ok(())
    }

    /// Clears the dirty flags, sizing them to the vertex count.
    pub(crate) fn reset_dirty(&mut self) -> Result<(), TryReserveError> {
        self.dirty.clear();
        self.dirty.try_reserve_exact(self.vertex_count())?;
        self.dirty.resize(self.vertex_count(), false);
        Ok(())
    }
}
