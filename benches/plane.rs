use criterion::{Criterion, criterion_group, criterion_main};
use mesh_weld::{ChangeSet, ChangedRange, IndexSlice, MeshBuilder, MeshData, Scratch, VertexFormat};
use std::hint::black_box;

/// A unit plane with corners at `(0, 0)` and `(1, 1)` in the XY plane.
/// `N` is the number of quads used to subdivide this plane.
struct SubdividedPlane<const N: usize> {
    positions: Vec<f32>,
    tex_coords: Vec<f32>,
    normals: Vec<f32>,
    faces: Vec<u32>,
    faces_without_normals: Vec<u32>,
}

impl<const N: usize> SubdividedPlane<N> {
    fn new() -> Self {
        let mut plane = Self {
            positions: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            faces_without_normals: Vec::new(),
        };

        for v_y in 0..=N {
            for v_x in 0..=N {
                let (x, y) = (v_x as f32 / N as f32, v_y as f32 / N as f32);
                plane.positions.extend([x, y, 0.]);
                plane.tex_coords.extend([x, y]);
                plane.normals.extend([0., 0., 1.]);
            }
        }

        for f_y in 0..N {
            for f_x in 0..N {
                let a = (f_y * (N + 1) + f_x) as u32;
                let [b, c, d] = [a + 1, a + N as u32 + 2, a + N as u32 + 1];
                for corner in [a, b, c, a, c, d] {
                    plane.faces.extend([corner; 3]);
                    plane.faces_without_normals.extend([corner; 2]);
                }
            }
        }

        plane
    }

    fn mesh(&self, format: VertexFormat) -> MeshData<'_> {
        MeshData {
            format,
            positions: &self.positions,
            tex_coords: &self.tex_coords,
            normals: &self.normals,
            colors: None,
            faces: if format.has_normals() {
                &self.faces
            } else {
                &self.faces_without_normals
            },
            smoothing_groups: &[],
        }
    }
}

fn submit(vertices: &[f32], indices: IndexSlice<'_>) -> bool {
    black_box((vertices, indices));
    true
}

fn criterion_benchmark(c: &mut Criterion) {
    let plane = SubdividedPlane::<32>::new();
    let mut scratch = Scratch::new();

    for (name, format) in [
        ("welded", VertexFormat::POINT_TEXCOORD),
        ("explicit", VertexFormat::POINT_NORMAL_TEXCOORD),
    ] {
        let mesh = plane.mesh(format);
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut builder = MeshBuilder::new();
                let _ = black_box(builder.build_geometry(
                    black_box(&mesh),
                    &ChangeSet::default(),
                    &mut scratch,
                    &mut submit,
                ));
            })
        });
    }

    // Moving a tenth of the positions of an existing mesh
    let mesh = plane.mesh(VertexFormat::POINT_NORMAL_TEXCOORD);
    let changes = ChangeSet {
        positions: ChangedRange::new(0, plane.positions.len() / 30),
        ..ChangeSet::default()
    };
    let mut builder = MeshBuilder::new();
    let _ = builder.build_geometry(&mesh, &ChangeSet::default(), &mut scratch, &mut submit);
    c.bench_function("incremental", |b| {
        b.iter(|| {
            let _ = black_box(builder.build_geometry(
                black_box(&mesh),
                &changes,
                &mut scratch,
                &mut submit,
            ));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
