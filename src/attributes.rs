//! Typed, borrowed views over the caller's flat attribute and face arrays.

use core::ops::Range;

use glam::{Vec2, Vec3};

/// Number of corners of every face.
pub(crate) const VERTICES_PER_FACE: usize = 3;

/// The kinds of per-vertex attribute a mesh is assembled from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AttributeKind {
    /// `[x, y, z]` positions.
    Position,
    /// `[u, v]` texture coordinates.
    TexCoord,
    /// `[x, y, z]` normals.
    Normal,
    /// `[r, g, b, a]` colors.
    Color,
}

impl AttributeKind {
    /// All attribute kinds.
    #[cfg(any(test, mesh_weld_more_assertions))]
    pub(crate) const ALL: [AttributeKind; 4] = [
        AttributeKind::Position,
        AttributeKind::TexCoord,
        AttributeKind::Normal,
        AttributeKind::Color,
    ];

    /// Number of floats making up one element of this kind.
    #[inline]
    pub const fn stride(self) -> usize {
        match self {
            AttributeKind::Position => 3,
            AttributeKind::TexCoord => 2,
            AttributeKind::Normal => 3,
            AttributeKind::Color => 4,
        }
    }
}

/// A flat array of floats interpreted as elements of one [`AttributeKind`].
///
/// Elements are addressed by element index, not by float offset.
#[derive(Clone, Copy, Debug)]
pub struct AttributeArray<'a> {
    kind: AttributeKind,
    data: &'a [f32],
}

impl<'a> AttributeArray<'a> {
    /// Wraps `data` as an array of `kind` elements.
    ///
    /// # Panics
    ///
    /// Panics if the length of `data` is not a multiple of the stride of `kind`.
    pub fn new(kind: AttributeKind, data: &'a [f32]) -> Self {
        assert!(
            data.len() % kind.stride() == 0,
            "{kind:?} data holds {} floats, which is not a multiple of its stride {}",
            data.len(),
            kind.stride(),
        );
        Self { kind, data }
    }

    #[inline]
    pub const fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len() / self.kind.stride()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the floats of element `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&'a [f32]> {
        let stride = self.kind.stride();
        self.data.get(index * stride..(index + 1) * stride)
    }

    pub(crate) fn vec3(&self, index: u32) -> Vec3 {
        debug_assert!(self.kind.stride() == 3);
        Vec3::from_slice(&self.data[index as usize * 3..][..3])
    }

    pub(crate) fn vec2(&self, index: u32) -> Vec2 {
        debug_assert!(self.kind == AttributeKind::TexCoord);
        Vec2::from_slice(&self.data[index as usize * 2..][..2])
    }

    /// Returns the element indices covered by `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` reaches past the end of this array.
    pub(crate) fn changed(&self, range: ChangedRange) -> Range<usize> {
        let indices = range.indices();
        assert!(
            indices.end <= self.len(),
            "changed {:?} range {indices:?} reaches past the {} available elements",
            self.kind,
            self.len(),
        );
        indices
    }
}

/// Opaque white, used for vertices without usable color data.
pub(crate) const WHITE: [f32; 4] = [1.0; 4];

/// Returns the color of element `index`, or [`WHITE`] when there is no color
/// data or the element is out of range.
pub(crate) fn color_or_white(colors: Option<&AttributeArray<'_>>, index: Option<u32>) -> [f32; 4] {
    colors
        .zip(index)
        .and_then(|(colors, index)| colors.get(index as usize))
        .and_then(|color| <[f32; 4]>::try_from(color).ok())
        .unwrap_or(WHITE)
}

/// Describes how the per-corner indices of a face are laid out in the face
/// index array.
///
/// Each corner of a face occupies [`vertex_index_size`](VertexFormat::vertex_index_size)
/// consecutive indices, and each face occupies three corners.
/// The offsets locate the individual attribute indices within one corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VertexFormat {
    vertex_index_size: usize,
    point_offset: usize,
    normal_offset: Option<usize>,
    tex_coord_offset: usize,
    color_offset: Option<usize>,
}

impl VertexFormat {
    /// `[point, texcoord]` per corner; normals are derived from smoothing groups.
    pub const POINT_TEXCOORD: Self = Self::new(2, 0, None, 1, None);

    /// `[point, normal, texcoord]` per corner.
    pub const POINT_NORMAL_TEXCOORD: Self = Self::new(3, 0, Some(1), 2, None);

    /// `[point, texcoord, color]` per corner; normals are derived from smoothing groups.
    pub const POINT_TEXCOORD_COLOR: Self = Self::new(3, 0, None, 1, Some(2));

    /// `[point, normal, texcoord, color]` per corner.
    pub const POINT_NORMAL_TEXCOORD_COLOR: Self = Self::new(4, 0, Some(1), 2, Some(3));

    /// Creates a custom layout.
    ///
    /// # Panics
    ///
    /// Panics if any offset does not fit within `vertex_index_size`.
    pub const fn new(
        vertex_index_size: usize,
        point_offset: usize,
        normal_offset: Option<usize>,
        tex_coord_offset: usize,
        color_offset: Option<usize>,
    ) -> Self {
        assert!(point_offset < vertex_index_size);
        assert!(tex_coord_offset < vertex_index_size);
        if let Some(offset) = normal_offset {
            assert!(offset < vertex_index_size);
        }
        if let Some(offset) = color_offset {
            assert!(offset < vertex_index_size);
        }

        Self {
            vertex_index_size,
            point_offset,
            normal_offset,
            tex_coord_offset,
            color_offset,
        }
    }

    /// Number of indices making up one face corner.
    #[inline]
    pub const fn vertex_index_size(&self) -> usize {
        self.vertex_index_size
    }

    /// Number of indices making up one face.
    #[inline]
    pub const fn face_index_size(&self) -> usize {
        self.vertex_index_size * VERTICES_PER_FACE
    }

    #[inline]
    pub const fn normal_offset(&self) -> Option<usize> {
        self.normal_offset
    }

    /// Indicates faces carry an explicit normal index per corner.
    #[inline]
    pub const fn has_normals(&self) -> bool {
        self.normal_offset.is_some()
    }

    /// Indicates faces carry a color index per corner.
    #[inline]
    pub const fn has_colors(&self) -> bool {
        self.color_offset.is_some()
    }

    /// Returns the index stored at `offset` within `corner` of `face`.
    #[inline]
    pub(crate) fn index_at(&self, faces: &[u32], face: usize, corner: usize, offset: usize) -> u32 {
        faces[face * self.face_index_size() + corner * self.vertex_index_size + offset]
    }

    /// Reads the attribute indices of one face corner.
    pub(crate) fn corner(&self, faces: &[u32], face: usize, corner: usize) -> FaceCorner {
        FaceCorner {
            position: self.index_at(faces, face, corner, self.point_offset),
            tex_coord: self.index_at(faces, face, corner, self.tex_coord_offset),
            color: self
                .color_offset
                .map(|offset| self.index_at(faces, face, corner, offset)),
        }
    }

    /// Reads the attribute indices of all corners of `face`.
    pub(crate) fn face(&self, faces: &[u32], face: usize) -> [FaceCorner; 3] {
        [0, 1, 2].map(|corner| self.corner(faces, face, corner))
    }
}

/// Attribute indices of one face corner, excluding the normal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct FaceCorner {
    pub(crate) position: u32,
    pub(crate) tex_coord: u32,
    pub(crate) color: Option<u32>,
}

/// Borrowed inputs for one call to
/// [`MeshBuilder::build_geometry`](crate::MeshBuilder::build_geometry).
///
/// None of this data is copied; it only needs to live for the duration of the
/// call.
#[derive(Clone, Copy, Debug)]
pub struct MeshData<'a> {
    /// Layout of `faces`.
    pub format: VertexFormat,
    /// Flat `[x, y, z]` positions.
    pub positions: &'a [f32],
    /// Flat `[u, v]` texture coordinates.
    pub tex_coords: &'a [f32],
    /// Flat `[x, y, z]` normals.
    /// Ignored unless `format` has a normal offset.
    pub normals: &'a [f32],
    /// Flat `[r, g, b, a]` colors, if any.
    pub colors: Option<&'a [f32]>,
    /// Per-corner attribute indices, three corners per face.
    pub faces: &'a [u32],
    /// One smoothing group per face.
    /// Ignored unless `format` lacks a normal offset, and treated as absent
    /// when its length differs from the face count.
    pub smoothing_groups: &'a [u32],
}

impl<'a> MeshData<'a> {
    /// Number of faces described by `faces`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `faces` is not a multiple of the face size of `format`.
    pub fn face_count(&self) -> usize {
        let face_size = self.format.face_index_size();
        assert!(
            self.faces.len() % face_size == 0,
            "face array holds {} indices, which is not a multiple of the face size {face_size}",
            self.faces.len(),
        );
        self.faces.len() / face_size
    }

    /// Validates the attribute arrays and wraps them in typed views.
    pub(crate) fn attributes(&self) -> Attributes<'a> {
        Attributes {
            positions: AttributeArray::new(AttributeKind::Position, self.positions),
            tex_coords: AttributeArray::new(AttributeKind::TexCoord, self.tex_coords),
            normals: AttributeArray::new(
                AttributeKind::Normal,
                if self.format.has_normals() { self.normals } else { &[] },
            ),
            colors: self
                .colors
                .map(|colors| AttributeArray::new(AttributeKind::Color, colors)),
        }
    }
}

/// Typed views over all attribute arrays of a [`MeshData`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Attributes<'a> {
    pub(crate) positions: AttributeArray<'a>,
    pub(crate) tex_coords: AttributeArray<'a>,
    pub(crate) normals: AttributeArray<'a>,
    pub(crate) colors: Option<AttributeArray<'a>>,
}

/// A contiguous range of elements which changed since the previous call.
///
/// `start` and `len` count elements (or faces), not floats.
/// A `len` of zero means unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ChangedRange {
    pub start: usize,
    pub len: usize,
}

impl ChangedRange {
    pub const UNCHANGED: Self = Self { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    #[inline]
    pub const fn is_changed(&self) -> bool {
        self.len > 0
    }

    #[inline]
    pub const fn indices(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Describes which parts of a mesh changed since the previous call.
///
/// An entirely unchanged [`ChangeSet`] (the [`Default`]) requests a full
/// build, as does any change to `faces`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ChangeSet {
    pub positions: ChangedRange,
    pub normals: ChangedRange,
    pub tex_coords: ChangedRange,
    pub colors: ChangedRange,
    pub faces: ChangedRange,
}

impl ChangeSet {
    /// Indicates nothing is flagged as changed.
    pub const fn is_empty(&self) -> bool {
        !(self.positions.is_changed()
            || self.normals.is_changed()
            || self.tex_coords.is_changed()
            || self.colors.is_changed()
            || self.faces.is_changed())
    }

    /// Indicates the face topology (or any of its index arrays) changed.
    pub const fn topology_changed(&self) -> bool {
        self.faces.is_changed()
    }

    /// Returns the changed range for attributes of `kind`.
    pub const fn range(&self, kind: AttributeKind) -> ChangedRange {
        match kind {
            AttributeKind::Position => self.positions,
            AttributeKind::TexCoord => self.tex_coords,
            AttributeKind::Normal => self.normals,
            AttributeKind::Color => self.colors,
        }
    }
}
