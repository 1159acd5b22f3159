//! Full builds and incremental updates of meshes whose faces supply their own
//! normals.
//!
//! These meshes are never welded: face corner `i` becomes vertex `i`, so the
//! vertices of triangle `t` are always `3t..3t + 3`.

use alloc::collections::TryReserveError;

use glam::{Vec2, Vec3};

use super::{
    AssemblyPath, GeometryBuffers, OutputVertex, locations::ComponentLocations,
    report_degenerate_face,
};
use crate::{
    AttributeKind, ChangeSet, FrameEncoding, MeshData, Scratch, TangentFrame,
    attributes::{VERTICES_PER_FACE, color_or_white},
    tangent_space::is_degenerate_face,
};

pub(super) fn build<E: FrameEncoding>(
    mesh: &MeshData<'_>,
    normal_offset: usize,
    locations: &mut ComponentLocations,
    scratch: &mut Scratch,
) -> Result<GeometryBuffers, TryReserveError> {
    let attributes = mesh.attributes();
    let face_count = mesh.face_count();

    // Start with one vertex per position and grow as needed.
    let mut buffers =
        GeometryBuffers::with_capacity(AssemblyPath::ExplicitNormals, attributes.positions.len())?;

    let mut degenerate_faces = 0;
    for face in 0..face_count {
        let corners = mesh.format.face(mesh.faces, face);
        let positions = corners.map(|corner| corner.position);
        if is_degenerate_face(positions) {
            report_degenerate_face(face, positions, &mut degenerate_faces);
        }

        let p = positions.map(|position| attributes.positions.vec3(position));
        let uv = corners.map(|corner| attributes.tex_coords.vec2(corner.tex_coord));
        let solved = TangentFrame::solve(p, uv);

        for (i, corner) in corners.into_iter().enumerate() {
            let normal = mesh.format.index_at(mesh.faces, face, i, normal_offset);
            let vertex = OutputVertex {
                position: p[i].to_array(),
                tex_coord: uv[i].to_array(),
                tangent_frame: [0.0; 4],
                color: color_or_white(attributes.colors.as_ref(), corner.color),
            };
            let slot =
                buffers.push_vertex(vertex, solved.with_normal(attributes.normals.vec3(normal)))?;

            locations.register(AttributeKind::Position, corner.position, slot)?;
            locations.register(AttributeKind::TexCoord, corner.tex_coord, slot)?;
            locations.register(AttributeKind::Normal, normal, slot)?;
            if let Some(color) = corner.color {
                locations.register(AttributeKind::Color, color, slot)?;
            }
        }
    }

    for slot in 0..buffers.vertex_count() {
        buffers.encode_frame::<E>(slot);
    }

    let corners = &mut scratch.corners;
    corners.clear();
    corners.try_reserve(buffers.vertex_count())?;
    corners.extend(0..buffers.vertex_count() as u32);
    buffers.write_indices(corners)?;

    #[cfg(mesh_weld_more_assertions)]
    for kind in AttributeKind::ALL {
        assert!(locations.get(kind).registered_elements() <= buffers.vertex_count());
    }

    Ok(buffers)
}

/// Rewrites the vertices fed by the elements `changes` names, then re-solves
/// and re-encodes the frames of every triangle with a rewritten vertex.
///
/// Color changes are ignored when the mesh has no colors.
pub(super) fn update<E: FrameEncoding>(
    buffers: &mut GeometryBuffers,
    locations: &ComponentLocations,
    mesh: &MeshData<'_>,
    changes: &ChangeSet,
) -> Result<(), TryReserveError> {
    let attributes = mesh.attributes();
    buffers.reset_dirty()?;

    for element in attributes.positions.changed(changes.positions) {
        let position = attributes.positions.vec3(element as u32).to_array();
        for &slot in locations.slots(AttributeKind::Position, element) {
            buffers.vertices[slot as usize].position = position;
            buffers.dirty[slot as usize] = true;
        }
    }

    for element in attributes.tex_coords.changed(changes.tex_coords) {
        let tex_coord = attributes.tex_coords.vec2(element as u32).to_array();
        for &slot in locations.slots(AttributeKind::TexCoord, element) {
            buffers.vertices[slot as usize].tex_coord = tex_coord;
            buffers.dirty[slot as usize] = true;
        }
    }

    for element in attributes.normals.changed(changes.normals) {
        let normal = attributes.normals.vec3(element as u32);
        for &slot in locations.slots(AttributeKind::Normal, element) {
            buffers.frames[slot as usize].normal = normal;
            buffers.dirty[slot as usize] = true;
        }
    }

    if let Some(colors) = attributes.colors.filter(|_| mesh.format.has_colors()) {
        for element in colors.changed(changes.colors) {
            let color = color_or_white(Some(&colors), Some(element as u32));
            for &slot in locations.slots(AttributeKind::Color, element) {
                buffers.vertices[slot as usize].color = color;
            }
        }
    }

    let mut dirty_vertices = 0;
    let mut solved_triangles = 0;
    for triangle in 0..buffers.vertex_count() / VERTICES_PER_FACE {
        let slots = [0, 1, 2].map(|corner| triangle * VERTICES_PER_FACE + corner);
        let dirty = slots.iter().filter(|&&slot| buffers.dirty[slot]).count();
        if dirty == 0 {
            continue;
        }
        dirty_vertices += dirty;
        solved_triangles += 1;

        let solved = TangentFrame::solve(
            slots.map(|slot| Vec3::from(buffers.vertices[slot].position)),
            slots.map(|slot| Vec2::from(buffers.vertices[slot].tex_coord)),
        );
        for slot in slots {
            buffers.frames[slot] = solved.with_normal(buffers.frames[slot].normal);
            buffers.encode_frame::<E>(slot);
        }
    }

    log::trace!(
        "updated {dirty_vertices} vertices, re-solved {solved_triangles} of {} triangles",
        buffers.vertex_count() / VERTICES_PER_FACE,
    );

    Ok(())
}
