//! Turning loaded shapes into GPU-ready vertex and index data.

use glam::{Vec2, Vec3};

use crate::model::{AttributeBuffer, Shape};

/// A vertex as uploaded to the GPU: position at location 0, texture
/// coordinate at location 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct MeshVertex {
    pub position: Vec3,
    pub texcoord: Vec2,
}

/// Returns the position index of every corner of `shape`, in corner order.
///
/// Indices are neither deduplicated nor range checked.
pub fn extract_indices(shape: &Shape) -> Vec<u32> {
    shape.corners.iter().map(|corner| corner.position).collect()
}

/// Number of indices that form whole triangles.
#[inline]
pub fn drawable_index_count(index_count: usize) -> usize {
    index_count / 3 * 3
}

/// Builds one vertex per position of the attribute buffer, so that the output
/// of [`extract_indices`] can be used as an index buffer as-is.
///
/// A vertex takes its texture coordinate from the first corner that references
/// it with one. Vertices never referenced that way keep `(0, 0)`.
pub fn assemble_vertices(attributes: &AttributeBuffer, shapes: &[Shape]) -> Vec<MeshVertex> {
    let mut vertices: Vec<MeshVertex> = attributes
        .positions
        .chunks_exact(3)
        .map(|p| MeshVertex {
            position: Vec3::new(p[0], p[1], p[2]),
            texcoord: Vec2::ZERO,
        })
        .collect();
    let mut assigned = vec![false; vertices.len()];

    for corner in shapes.iter().flat_map(|shape| &shape.corners) {
        let Some(texcoord) = corner.texcoord else {
            continue;
        };
        let position = corner.position as usize;
        if position >= vertices.len() || assigned[position] {
            continue;
        }

        let offset = texcoord as usize * 2;
        if let Some(uv) = attributes.texcoords.get(offset..offset + 2) {
            vertices[position].texcoord = Vec2::new(uv[0], uv[1]);
            assigned[position] = true;
        }
    }

    vertices
}
