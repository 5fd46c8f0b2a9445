//! Silhouette extraction and vertex extrusion.

use glam::Vec4;

use crate::buffer::{HardwareIndexBuffer, HardwareVertexBuffer, IndexFormat, LockMode};
use crate::mesh::EdgeData;
use crate::scene::LightType;

use super::ShadowRenderable;

/// Default distance extruded vertices travel, far enough to stand in for
/// infinity without destabilizing downstream depth math. Tunable per call.
pub const EXTRUSION_DISTANCE: f32 = 1.0e7;

/// Reclassify the edge list's triangles against a light.
///
/// Thin forwarder kept so the call site reads as the per-light sequence:
/// classify, then extract, then extrude.
pub fn update_edge_list_light_facing(edge_data: &mut EdgeData, light: Vec4) {
    edge_data.update_triangle_light_facing(light);
}

/// Sequential writer over a locked index buffer, dispatching on its format.
enum IndexWriter<'a> {
    U16 { data: &'a mut [u16], cursor: usize },
    U32 { data: &'a mut [u32], cursor: usize },
}

impl IndexWriter<'_> {
    #[inline]
    fn push(&mut self, index: u32) {
        match self {
            Self::U16 { data, cursor } => {
                data[*cursor] = index as u16;
                *cursor += 1;
            }
            Self::U32 { data, cursor } => {
                data[*cursor] = index;
                *cursor += 1;
            }
        }
    }
}

/// Extract the silhouette of an up-to-date edge list into the shared shadow
/// index buffer.
///
/// Walks every edge of every group: an edge whose two triangles disagree on
/// light-facing (or whose second triangle cannot be trusted) is a silhouette
/// edge and emits one triangle spanning the near edge and one extruded
/// vertex, plus the mirrored far triangle completing the quad when the light
/// is not directional. Far indices are near indices offset by the group's
/// original vertex count, matching the two-half layout the extruded vertex
/// buffer uses.
///
/// Each renderable receives its group's `(index_start, index_count)` range;
/// groups are laid out consecutively in the buffer. The buffer must be
/// pre-sized via [`EdgeData::max_silhouette_indices`]; writes are only
/// checked by the slice bound.
///
/// # Panics
///
/// Panics if `renderables` does not pair one-to-one with the edge groups:
/// that mismatch is a caller bug, not a recoverable condition.
pub fn generate_shadow_volume(
    edge_data: &EdgeData,
    index_buffer: &mut HardwareIndexBuffer,
    light_type: LightType,
    renderables: &mut [ShadowRenderable],
) {
    assert_eq!(
        edge_data.edge_groups.len(),
        renderables.len(),
        "edge groups must pair one-to-one with shadow renderables"
    );

    let directional = light_type == LightType::Directional;
    let format = index_buffer.format();
    let mut lock = index_buffer.lock(LockMode::Discard);
    let mut writer = match format {
        IndexFormat::Uint16 => IndexWriter::U16 {
            data: lock.as_u16_mut(),
            cursor: 0,
        },
        IndexFormat::Uint32 => IndexWriter::U32 {
            data: lock.as_u32_mut(),
            cursor: 0,
        },
    };

    let mut index_start = 0;
    for (group, renderable) in edge_data.edge_groups.iter().zip(renderables.iter_mut()) {
        renderable.begin_update(index_start);
        let original_vertex_count = group.vertex_count;

        for edge in &group.edges {
            let t1 = &edge_data.triangles[edge.tri_index[0]];
            let t2 = &edge_data.triangles[edge.tri_index[1]];
            let [v0, v1] = edge.vert_index;

            if t1.light_facing && (edge.degenerate || !t2.light_facing) {
                // First triangle is lit. The edge verts run counter-clockwise
                // as seen from it, so the near-to-far triangle is wound
                // backwards to face out of the volume.
                writer.push(v1);
                writer.push(v0);
                writer.push(v0 + original_vertex_count);
                renderable.grow(3);

                if !directional {
                    // Far triangle completing the quad. A directional light
                    // collapses all far verts to one point at infinity, so it
                    // is skipped there.
                    writer.push(v0 + original_vertex_count);
                    writer.push(v1 + original_vertex_count);
                    writer.push(v1);
                    renderable.grow(3);
                }
            } else if !t1.light_facing && (edge.degenerate || t2.light_facing) {
                // Second triangle is lit: same emission with the winding
                // reversed.
                writer.push(v0);
                writer.push(v1);
                writer.push(v1 + original_vertex_count);
                renderable.grow(3);

                if !directional {
                    writer.push(v1 + original_vertex_count);
                    writer.push(v0 + original_vertex_count);
                    writer.push(v0);
                    renderable.grow(3);
                }
            }
        }

        index_start += renderable.index_count();
    }

    log::trace!(
        "shadow volume: {} groups, {} indices",
        edge_data.edge_groups.len(),
        index_start
    );
}

/// Extrude the first half of a shadow vertex buffer into its second half,
/// away from the light.
///
/// For a directional light (`w == 0`) one extrusion vector serves every
/// vertex; for a point or spot light the direction is recomputed per vertex
/// from its position. Runs once per light per frame per caster; both the
/// caster and the light can move, so nothing is cached.
///
/// The buffer is locked in [`LockMode::Normal`] for the whole pass: only the
/// far half is rewritten, and a buffer supports one lock at a time.
pub fn extrude_vertices(
    vertex_buffer: &mut HardwareVertexBuffer,
    original_vertex_count: usize,
    light: Vec4,
    extrusion_distance: f32,
) {
    let mut lock = vertex_buffer.lock(LockMode::Normal);
    let positions = lock.positions_mut();
    debug_assert!(
        positions.len() >= 2 * original_vertex_count,
        "shadow vertex buffer must hold two copies of the original vertices"
    );

    let (near, far) = positions.split_at_mut(original_vertex_count);
    let far = &mut far[..original_vertex_count];

    if light.w == 0.0 {
        let extrusion = light.truncate().normalize() * extrusion_distance;
        for (src, dst) in near.iter().zip(far.iter_mut()) {
            *dst = *src + extrusion;
        }
    } else {
        let light_position = light.truncate();
        for (src, dst) in near.iter().zip(far.iter_mut()) {
            *dst = *src + (*src - light_position).normalize() * extrusion_distance;
        }
    }
}
