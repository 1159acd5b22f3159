//! Full builds of meshes whose normals are derived from their faces.

use alloc::collections::TryReserveError;

use super::{AssemblyPath, GeometryBuffers, OutputVertex, report_degenerate_face};
use crate::{
    FrameEncoding, MeshData, Scratch, SmoothingMode, TangentFrame,
    attributes::{VERTICES_PER_FACE, color_or_white},
    smoothing::face_group,
    tangent_space::is_degenerate_face,
};

/// Solves a frame per face, welds the face corners by smoothing group, and
/// emits one vertex per welded class.
pub(super) fn build<E: FrameEncoding>(
    mesh: &MeshData<'_>,
    scratch: &mut Scratch,
) -> Result<(GeometryBuffers, SmoothingMode), TryReserveError> {
    let Scratch { weld, corners } = scratch;

    let attributes = mesh.attributes();
    let face_count = mesh.face_count();
    let smoothing = SmoothingMode::for_faces(mesh.smoothing_groups, face_count);

    weld.reset(attributes.positions.len(), face_count * VERTICES_PER_FACE)?;

    let mut degenerate_faces = 0;
    for face in 0..face_count {
        let face_corners = mesh.format.face(mesh.faces, face);
        let positions = face_corners.map(|corner| corner.position);
        if is_degenerate_face(positions) {
            report_degenerate_face(face, positions, &mut degenerate_faces);
        }

        let frame = TangentFrame::solve(
            positions.map(|position| attributes.positions.vec3(position)),
            face_corners.map(|corner| attributes.tex_coords.vec2(corner.tex_coord)),
        );
        let group = face_group(mesh.smoothing_groups, face_count, face);

        for corner in face_corners {
            weld.attach(face as u32, corner, frame, group)?;
        }
    }

    for (index, node) in weld.nodes().iter().enumerate() {
        debug_assert_eq!(node.face as usize, index / VERTICES_PER_FACE);
    }

    let vertex_count = weld.weld(smoothing)?;

    let mut buffers = GeometryBuffers::with_capacity(AssemblyPath::ImplicitNormals, vertex_count)?;
    for class in weld.classes() {
        let corner = weld.nodes()[class.representative as usize].corner;
        let vertex = OutputVertex {
            position: attributes.positions.vec3(corner.position).to_array(),
            tex_coord: attributes.tex_coords.vec2(corner.tex_coord).to_array(),
            tangent_frame: E::encode(&class.frame.orthonormalized()),
            color: color_or_white(attributes.colors.as_ref(), corner.color),
        };
        buffers.push_vertex(vertex, class.frame)?;
    }

    // Nodes were attached in face corner order.
    corners.clear();
    corners.try_reserve(weld.nodes().len())?;
    corners.extend(weld.nodes().iter().map(|node| node.class));
    buffers.write_indices(corners)?;

    Ok((buffers, smoothing))
}
