//! Assembles externally authored, index-based triangle meshes into render-ready
//! buffers: one interleaved vertex buffer and one compact index buffer.
//!
//! Each output vertex stores its full tangent-space frame (normal, tangent and
//! bitangent) packed into a single quaternion, alongside position, texture
//! coordinate and color.
//! Vertices which can legally share an output slot are welded together, and
//! meshes which only change attribute _values_ between calls are patched in
//! place rather than rebuilt.
//!
//! # Usage
//!
//! Describe your mesh with [`MeshData`]: flat attribute arrays, a face index
//! array laid out according to a [`VertexFormat`], and optionally one smoothing
//! group per face.
//! Then implement [`GeometrySink`] for whatever receives the finished buffers.
//!
//! ```ignore
//! impl GeometrySink for MyGpuMesh { /* ... */ }
//! ```
//!
//! Finally, keep a [`MeshBuilder`] and a [`Scratch`] arena around for as long
//! as the mesh lives, and call [`MeshBuilder::build_geometry`] whenever the
//! source data changes, describing _what_ changed with a [`ChangeSet`].
//!
//! ```
//! # use mesh_weld::{ChangeSet, IndexSlice, MeshBuilder, MeshData, Scratch, VertexFormat};
//! let positions = [0., 0., 0., 1., 0., 0., 1., 1., 0., 0., 1., 0.];
//! let tex_coords = [0., 0., 1., 0., 1., 1., 0., 1.];
//! let faces = [0, 0, 1, 1, 2, 2, 0, 0, 2, 2, 3, 3];
//! let mesh = MeshData {
//!     format: VertexFormat::POINT_TEXCOORD,
//!     positions: &positions,
//!     tex_coords: &tex_coords,
//!     normals: &[],
//!     colors: None,
//!     faces: &faces,
//!     smoothing_groups: &[],
//! };
//!
//! let mut builder = MeshBuilder::new();
//! let mut scratch = Scratch::new();
//! let mut submit = |vertices: &[f32], indices: IndexSlice<'_>| {
//!     assert_eq!(vertices.len(), 4 * mesh_weld::VERTEX_STRIDE);
//!     assert_eq!(indices, IndexSlice::U16(&[0, 1, 2, 0, 2, 3]));
//!     true
//! };
//! let submitted = builder
//!     .build_geometry(&mesh, &ChangeSet::default(), &mut scratch, &mut submit)
//!     .unwrap();
//! assert!(submitted);
//! ```
//!
//! # Description
//!
//! Two kinds of input are supported, selected by the [`VertexFormat`]:
//!
//! - **Explicit normals**: each face corner carries its own normal index.
//!   Every corner becomes its own output vertex (nothing is welded), the
//!   supplied normal is kept and the tangent and bitangent are solved per
//!   triangle from positions and texture coordinates.
//!   These meshes support incremental updates: the builder remembers which
//!   output vertices were sourced from which attribute elements and only
//!   rewrites those, re-solving the tangent frames of the triangles touching
//!   them.
//! - **Implicit normals**: normals are derived from the topology.
//!   Each face solves its own frame, then corners sharing a position are
//!   welded according to their faces' smoothing groups and the frames of
//!   welded corners are averaged.
//!
//! The vertex layout is fixed at [`VERTEX_STRIDE`] floats, see [`OutputVertex`].
//! Index width is picked once per full build: 16-bit while the vertex count is
//! at most 65 536, 32-bit otherwise.
//!
//! Degenerate input never aborts a build.
//! Triangles whose corners share a position are reported through [`log`] at
//! `debug` level and still emit geometry.
//! Misuse of the interface (attribute arrays whose length is not a multiple of
//! their stride, changed ranges naming elements no face references) panics.
//!
//! # Features
//!
//! ## `std` (default)
//!
//! Uses the standard library as the math backend.
//!
//! ## `libm`
//!
//! Uses [`libm`] as the math backend, for `no_std` targets.
//! One of `std` or `libm` must be enabled.
//!
//! ## `exact-smoothing-groups`
//!
//! By default smoothing groups are 32-bit masks and faces whose masks overlap
//! are smoothed together, matching the convention of most authoring tools.
//! With this feature enabled smoothing groups are opaque identifiers instead,
//! and only faces with the _same_ nonzero group are smoothed together.
//!
//! [`libm`]: https://docs.rs/libm

#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("mesh_weld requires either the `std` or the `libm` feature to be enabled");

mod attributes;
mod encoding;
mod math;
mod mesh;
mod scratch;
mod smoothing;
mod tangent_space;

#[cfg(test)]
mod tests;

use alloc::collections::TryReserveError;

pub use attributes::{
    AttributeArray, AttributeKind, ChangeSet, ChangedRange, MeshData, VertexFormat,
};
pub use encoding::{FrameEncoding, SignedQuaternion};
pub use mesh::{BuildKind, IndexFormat, IndexSlice, MeshBuilder, OutputVertex, VERTEX_STRIDE};
pub use scratch::Scratch;
pub use smoothing::SmoothingMode;
pub use tangent_space::TangentFrame;

/// Receives finished geometry, typically to submit it to a graphics backend.
///
/// The buffers handed to [`build_geometry`](GeometrySink::build_geometry) are
/// owned by the [`MeshBuilder`] and only borrowed for the duration of the call.
pub trait GeometrySink {
    /// Consumes one build's worth of geometry.
    ///
    /// `vertices` holds `vertex_count * VERTEX_STRIDE` floats laid out as
    /// [`OutputVertex`] records.
    /// `indices` holds exactly three indices per face, in the original corner
    /// order, in whichever width was selected for this geometry.
    ///
    /// Returns `true` if the geometry was accepted.
    fn build_geometry(&mut self, vertices: &[f32], indices: IndexSlice<'_>) -> bool;
}

impl<F> GeometrySink for F
where
    F: FnMut(&[f32], IndexSlice<'_>) -> bool,
{
    fn build_geometry(&mut self, vertices: &[f32], indices: IndexSlice<'_>) -> bool {
        self(vertices, indices)
    }
}

/// Error returned when failing to assemble geometry.
#[derive(Debug, thiserror::Error)]
// Reserving the right to introduce new error variants in the future.
#[non_exhaustive]
pub enum BuildError {
    /// Growing one of the geometry buffers failed.
    #[error("failed to grow geometry buffers: {0}")]
    Allocation(#[from] TryReserveError),
}
