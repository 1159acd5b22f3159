//! The stateful part of mesh assembly: [`MeshBuilder`] and the buffers it
//! keeps between calls.

mod buffers;
mod explicit;
mod implicit;
pub(crate) mod locations;
pub(crate) mod weld;

use core::marker::PhantomData;

pub use self::buffers::{IndexFormat, IndexSlice, OutputVertex, VERTEX_STRIDE};
pub(crate) use self::buffers::GeometryBuffers;
use self::locations::ComponentLocations;
use crate::{
    BuildError, ChangeSet, FrameEncoding, GeometrySink, MeshData, Scratch, SignedQuaternion,
    SmoothingMode,
};

/// How the frames of a mesh's vertices are obtained.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum AssemblyPath {
    /// Normals are derived per face and welded by smoothing group.
    ImplicitNormals,
    /// Every face corner supplies its own normal and becomes its own vertex.
    ExplicitNormals,
}

impl AssemblyPath {
    fn of(mesh: &MeshData<'_>) -> Self {
        if mesh.format.has_normals() {
            AssemblyPath::ExplicitNormals
        } else {
            AssemblyPath::ImplicitNormals
        }
    }
}

/// The kind of work performed by a call to [`MeshBuilder::build_geometry`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BuildKind {
    /// All buffers were rebuilt from the source data.
    Full,
    /// Only the vertices fed by changed attribute elements were rewritten.
    Incremental,
}

/// Assembles one mesh into render-ready buffers, and keeps those buffers up to
/// date as the mesh changes.
///
/// The frame of each vertex is packed with `E`, [`SignedQuaternion`] by
/// default.
pub struct MeshBuilder<E: FrameEncoding = SignedQuaternion> {
    buffers: Option<GeometryBuffers>,
    locations: ComponentLocations,
    last_build: Option<BuildKind>,
    smoothing: Option<SmoothingMode>,
    _encoding: PhantomData<fn() -> E>,
}

impl MeshBuilder<SignedQuaternion> {
    /// Creates a builder with no geometry, using the default frame encoding.
    pub fn new() -> Self {
        Self::with_encoding()
    }
}

impl<E: FrameEncoding> Default for MeshBuilder<E> {
    fn default() -> Self {
        Self::with_encoding()
    }
}

impl<E: FrameEncoding> core::fmt::Debug for MeshBuilder<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeshBuilder")
            .field("vertex_count", &self.vertex_count())
            .field("index_count", &self.index_count())
            .field("last_build", &self.last_build)
            .field("smoothing", &self.smoothing)
            .finish_non_exhaustive()
    }
}

impl<E: FrameEncoding> MeshBuilder<E> {
    /// Creates a builder with no geometry, packing frames with `E`.
    pub fn with_encoding() -> Self {
        Self {
            buffers: None,
            locations: ComponentLocations::default(),
            last_build: None,
            smoothing: None,
            _encoding: PhantomData,
        }
    }

    /// Brings the geometry up to date with `mesh` and hands it to `sink`,
    /// returning whether `sink` accepted it.
    ///
    /// `changes` describes what changed since the previous call.
    /// Only attribute values changing on a mesh with explicit normals allows an
    /// incremental update; anything else (including the first call, an empty
    /// `changes`, or a change to `faces`) rebuilds the geometry entirely.
    ///
    /// # Errors
    ///
    /// Fails if the geometry buffers could not grow. The builder is left
    /// without geometry in that case.
    ///
    /// # Panics
    ///
    /// Panics if an attribute array's length is not a multiple of its stride,
    /// if a face references an element past the end of its attribute array,
    /// or if `changes` names an element no vertex was built from.
    pub fn build_geometry<S>(
        &mut self,
        mesh: &MeshData<'_>,
        changes: &ChangeSet,
        scratch: &mut Scratch,
        sink: &mut S,
    ) -> Result<bool, BuildError>
    where
        S: GeometrySink + ?Sized,
    {
        let incremental = !changes.is_empty()
            && !changes.topology_changed()
            && AssemblyPath::of(mesh) == AssemblyPath::ExplicitNormals
            && self
                .buffers
                .as_ref()
                .is_some_and(|buffers| buffers.path == AssemblyPath::ExplicitNormals);

        let result = match self.buffers.as_mut() {
            Some(buffers) if incremental => {
                explicit::update::<E>(buffers, &self.locations, mesh, changes)
                    .map(|()| BuildKind::Incremental)
            }
            _ => self.rebuild(mesh, scratch).map(|()| BuildKind::Full),
        };

        let kind = match result {
            Ok(kind) => kind,
            Err(error) => {
                self.dispose();
                return Err(error.into());
            }
        };
        self.last_build = Some(kind);

        let Some(buffers) = &self.buffers else {
            return Ok(false);
        };

        log::debug!(
            "{kind:?} build ({:?}): {} vertices, {} indices as {:?}",
            buffers.path,
            buffers.vertex_count(),
            buffers.indices.as_slice().len(),
            buffers.indices.as_slice().format(),
        );

        Ok(sink.build_geometry(buffers.vertex_buffer(), buffers.indices.as_slice()))
    }

    fn rebuild(
        &mut self,
        mesh: &MeshData<'_>,
        scratch: &mut Scratch,
    ) -> Result<(), alloc::collections::TryReserveError> {
        self.buffers = None;
        self.locations.clear();

        let buffers = match mesh.format.normal_offset() {
            Some(normal_offset) => {
                self.smoothing = None;
                explicit::build::<E>(mesh, normal_offset, &mut self.locations, scratch)?
            }
            None => {
                let (buffers, smoothing) = implicit::build::<E>(mesh, scratch)?;
                self.smoothing = Some(smoothing);
                buffers
            }
        };

        self.buffers = Some(buffers);
        Ok(())
    }

    /// Number of vertices in the vertex buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffers.as_ref().map_or(0, GeometryBuffers::vertex_count)
    }

    /// Number of indices in the index buffer.
    pub fn index_count(&self) -> usize {
        self.index_buffer().len()
    }

    /// Width of the index buffer, if there is any geometry.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.buffers
            .as_ref()
            .map(|buffers| buffers.indices.as_slice().format())
    }

    /// The vertex buffer as flat floats, [`VERTEX_STRIDE`] per vertex.
    pub fn vertex_buffer(&self) -> &[f32] {
        self.buffers
            .as_ref()
            .map(GeometryBuffers::vertex_buffer)
            .unwrap_or_default()
    }

    /// The vertex buffer as records.
    pub fn vertices(&self) -> &[OutputVertex] {
        self.buffers
            .as_ref()
            .map(|buffers| buffers.vertices.as_slice())
            .unwrap_or_default()
    }

    pub fn index_buffer(&self) -> IndexSlice<'_> {
        match &self.buffers {
            Some(buffers) => buffers.indices.as_slice(),
            None => IndexSlice::U16(&[]),
        }
    }

    /// What the most recent successful call to
    /// [`build_geometry`](MeshBuilder::build_geometry) did.
    pub fn last_build(&self) -> Option<BuildKind> {
        self.last_build
    }

    /// How the current geometry was welded.
    /// `None` for meshes with explicit normals, which are never welded.
    pub fn smoothing_mode(&self) -> Option<SmoothingMode> {
        self.smoothing
    }

    /// Discards all geometry, so the next call rebuilds from scratch.
    pub fn dispose(&mut self) {
        self.buffers = None;
        self.locations = ComponentLocations::default();
        self.last_build = None;
        self.smoothing = None;
    }
}

/// Logs a face whose corners share a position.
fn report_degenerate_face(face: usize, positions: [u32; 3], degenerate_faces: &mut usize) {
    *degenerate_faces += 1;
    log::debug!(
        "face {face} is degenerate, positions {positions:?} are not distinct ({degenerate_faces} so far)"
    );
}
