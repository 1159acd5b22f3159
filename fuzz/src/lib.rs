use arbitrary::{Arbitrary, Unstructured};
use mesh_weld::{
    BuildKind, ChangeSet, ChangedRange, IndexFormat, IndexSlice, MeshBuilder, MeshData, Scratch,
    SmoothingMode, VERTEX_STRIDE, VertexFormat,
};

#[derive(Debug, Clone, Copy, PartialEq, Arbitrary)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[usize; 3]>,
    pub smoothing_groups: Vec<u32>,
}

/// Flat attribute arrays, with one normal, texture coordinate and color per
/// position.
struct Flattened {
    positions: Vec<f32>,
    tex_coords: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
    faces: Vec<u32>,
    faces_without_normals: Vec<u32>,
}

impl Geometry {
    pub fn validate(&mut self) -> Result<(), arbitrary::Error> {
        let Self { vertices, faces, .. } = self;

        // Known failure: no vertices
        if vertices.is_empty() {
            return Err(arbitrary::Error::IncorrectFormat);
        }

        // Known failure: face vertex indices out of range
        for face in faces.iter_mut() {
            for vertex in face.iter_mut() {
                *vertex %= vertices.len();
            }
        }

        Ok(())
    }

    fn flatten(&self) -> Flattened {
        let mut flattened = Flattened {
            positions: self.vertices.iter().flat_map(|v| v.position).collect(),
            tex_coords: self.vertices.iter().flat_map(|v| v.tex_coord).collect(),
            normals: self.vertices.iter().flat_map(|v| v.normal).collect(),
            colors: self.vertices.iter().flat_map(|v| v.color).collect(),
            faces: Vec::new(),
            faces_without_normals: Vec::new(),
        };

        for &index in self.faces.iter().flatten() {
            flattened.faces.extend([index as u32; 4]);
            flattened.faces_without_normals.extend([index as u32; 3]);
        }

        flattened
    }

    fn distinct_positions(&self) -> usize {
        let mut positions: Vec<usize> = self.faces.iter().flatten().copied().collect();
        positions.sort_unstable();
        positions.dedup();
        positions.len()
    }

    /// Builds both kinds of mesh and checks the invariants every build upholds.
    pub fn check(&self) {
        let flattened = self.flatten();
        let corners = 3 * self.faces.len();
        let mut scratch = Scratch::new();

        let mut explicit = MeshBuilder::new();
        let mesh = MeshData {
            format: VertexFormat::POINT_NORMAL_TEXCOORD_COLOR,
            positions: &flattened.positions,
            tex_coords: &flattened.tex_coords,
            normals: &flattened.normals,
            colors: Some(&flattened.colors),
            faces: &flattened.faces,
            smoothing_groups: &self.smoothing_groups,
        };
        build(&mut explicit, &mesh, &ChangeSet::default(), &mut scratch);
        assert_eq!(explicit.vertex_count(), corners);
        check_indices(&explicit, corners);

        // Rewriting every vertex in place must reproduce the full build.
        if self.distinct_positions() == self.vertices.len() {
            let everything = ChangedRange::new(0, self.vertices.len());
            let changes = ChangeSet {
                positions: everything,
                normals: everything,
                tex_coords: everything,
                colors: everything,
                faces: ChangedRange::UNCHANGED,
            };
            let full: Vec<u32> = explicit.vertex_buffer().iter().map(|f| f.to_bits()).collect();
            build(&mut explicit, &mesh, &changes, &mut scratch);
            assert_eq!(explicit.last_build(), Some(BuildKind::Incremental));
            let incremental: Vec<u32> =
                explicit.vertex_buffer().iter().map(|f| f.to_bits()).collect();
            assert_eq!(full, incremental);
        }

        let mut implicit = MeshBuilder::new();
        let mesh = MeshData {
            format: VertexFormat::POINT_TEXCOORD_COLOR,
            faces: &flattened.faces_without_normals,
            ..mesh
        };
        build(&mut implicit, &mesh, &ChangeSet::default(), &mut scratch);
        check_indices(&implicit, corners);

        let welded = implicit.vertex_count();
        match implicit.smoothing_mode() {
            Some(SmoothingMode::AllSmooth) => assert_eq!(welded, self.distinct_positions()),
            Some(SmoothingMode::AllHard) => assert_eq!(welded, corners),
            Some(SmoothingMode::Mixed) => {
                assert!(welded >= self.distinct_positions());
                assert!(welded <= corners);
            }
            None => panic!("meshes without normals are always classified"),
        }
    }
}

fn build(builder: &mut MeshBuilder, mesh: &MeshData<'_>, changes: &ChangeSet, scratch: &mut Scratch) {
    let mut sink = |vertices: &[f32], indices: IndexSlice<'_>| {
        vertices.len() % VERTEX_STRIDE == 0 && indices.len() % 3 == 0
    };
    let accepted = builder
        .build_geometry(mesh, changes, scratch, &mut sink)
        .expect("fuzz inputs are small enough to allocate");
    assert!(accepted);
}

fn check_indices(builder: &MeshBuilder, corners: usize) {
    assert_eq!(builder.index_count(), corners);
    assert_eq!(
        builder.index_format(),
        Some(IndexFormat::for_vertex_count(builder.vertex_count()))
    );
    assert!(
        builder
            .index_buffer()
            .iter()
            .all(|index| (index as usize) < builder.vertex_count())
    );
}

impl Arbitrary<'_> for Geometry {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, arbitrary::Error> {
        let mut value = Self {
            vertices: Vec::<Vertex>::arbitrary(u)?,
            faces: Vec::<[usize; 3]>::arbitrary(u)?,
            smoothing_groups: Vec::new(),
        };

        value.validate()?;

        Ok(value)
    }
}
