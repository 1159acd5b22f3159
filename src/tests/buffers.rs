use crate::{
    IndexFormat, IndexSlice, OutputVertex, SignedQuaternion, TangentFrame, VERTEX_STRIDE,
    mesh::{AssemblyPath, GeometryBuffers},
};

fn vertex(i: u32) -> OutputVertex {
    OutputVertex {
        position: [i as f32, 1., 2.],
        tex_coord: [3., 4.],
        tangent_frame: [5., 6., 7., 8.],
        color: [9., 10., 11., 12.],
    }
}

#[test]
fn vertex_buffer_is_interleaved() {
    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ImplicitNormals, 2).unwrap();
    buffers.push_vertex(vertex(0), TangentFrame::ZERO).unwrap();
    buffers.push_vertex(vertex(13), TangentFrame::ZERO).unwrap();

    let floats = buffers.vertex_buffer();
    assert_eq!(floats.len(), 2 * VERTEX_STRIDE);
    assert_eq!(floats[..VERTEX_STRIDE], [
        0., 1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12.
    ]);
    assert_eq!(floats[VERTEX_STRIDE], 13.);
}

#[test]
fn growth_covers_two_triangles() {
    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ExplicitNormals, 0).unwrap();
    assert_eq!(buffers.push_vertex(vertex(0), TangentFrame::ZERO).unwrap(), 0);
    assert!(buffers.vertices.capacity() >= 6);
    assert!(buffers.frames.capacity() >= 6);

    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ExplicitNormals, 80).unwrap();
    for i in 0..81 {
        assert_eq!(buffers.push_vertex(vertex(i), TangentFrame::ZERO).unwrap(), i);
    }
    assert!(buffers.vertices.capacity() >= 90);
    assert_eq!(buffers.frames.len(), 81);
}

#[test]
fn frames_are_only_kept_for_explicit_normals() {
    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ImplicitNormals, 1).unwrap();
    buffers.push_vertex(vertex(0), TangentFrame::ZERO).unwrap();
    assert!(buffers.frames.is_empty());
}

#[test]
fn indices_are_narrowed_when_possible() {
    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ImplicitNormals, 3).unwrap();
    for i in 0..3 {
        buffers.push_vertex(vertex(i), TangentFrame::ZERO).unwrap();
    }
    buffers.write_indices(&[2, 1, 0]).unwrap();
    assert_eq!(buffers.indices.as_slice(), IndexSlice::U16(&[2, 1, 0]));

    let count = IndexFormat::MAX_UINT16_VERTICES + 1;
    let mut buffers =
        GeometryBuffers::with_capacity(AssemblyPath::ImplicitNormals, count).unwrap();
    for _ in 0..count {
        buffers.push_vertex(OutputVertex::default(), TangentFrame::ZERO).unwrap();
    }
    let last = count as u32 - 1;
    buffers.write_indices(&[0, last, 1]).unwrap();
    assert_eq!(buffers.indices.as_slice(), IndexSlice::U32(&[0, last, 1]));
    assert_eq!(buffers.indices.as_slice().get(1), Some(last));
}

#[test]
fn index_slices_widen() {
    let indices = IndexSlice::U16(&[1, 65535, 3]);
    assert_eq!(indices.format(), IndexFormat::Uint16);
    assert_eq!(indices.format().size(), 2);
    assert_eq!(indices.len(), 3);
    assert_eq!(indices.get(1), Some(65535));
    assert_eq!(indices.get(3), None);
    assert!(indices.iter().eq([1, 65535, 3]));
    assert_eq!(IndexSlice::U32(&[]).format().size(), 4);
}

#[test]
fn encoding_uses_cached_frames() {
    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ExplicitNormals, 1).unwrap();
    let frame = TangentFrame::new([0., 0., 2.], [1., 0., 0.5], [0., 1., 0.]);
    buffers.push_vertex(vertex(0), frame).unwrap();
    buffers.encode_frame::<SignedQuaternion>(0);

    let [x, y, z, w] = buffers.vertices[0].tangent_frame;
    assert_eq!([x, y, z], [-0.5, -0.5, -0.5]);
    assert_eq!(w, 0.5);

    buffers.reset_dirty().unwrap();
    assert_eq!(buffers.dirty, [false]);
}
