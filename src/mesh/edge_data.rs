//! Edge/triangle adjacency data.

use glam::Vec4;

use crate::scene::LightType;

/// A triangle in the edge topology.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Indices of the three corner vertices, counter-clockwise.
    pub vertex_index: [u32; 3],
    /// Vertex set the corners index into.
    pub vertex_set: usize,
    /// Unit plane equation `(nx, ny, nz, -d)`. Zero for zero-area triangles,
    /// which therefore never classify as light-facing.
    pub normal: Vec4,
    /// Whether the triangle currently faces the light. Rewritten by
    /// [`EdgeData::update_triangle_light_facing`] once per light per frame.
    pub light_facing: bool,
}

/// An edge shared by up to two triangles.
///
/// `vert_index` runs counter-clockwise along the edge as seen from
/// `tri_index[0]`; silhouette winding depends on this, so it is fixed at
/// build time and never reordered.
#[derive(Debug, Clone)]
pub struct Edge {
    /// The two bordering triangles. Both entries are equal for an unpaired
    /// (boundary) edge.
    pub tri_index: [usize; 2],
    /// The two shared vertex indices.
    pub vert_index: [u32; 2],
    /// Only `tri_index[0]` is trustworthy: the edge is unpaired or borders a
    /// zero-area triangle.
    pub degenerate: bool,
}

/// A partition of edges over one vertex set.
///
/// Groups pair one-to-one with shadow renderables at extraction time, so a
/// mesh whose submeshes share vertex data still produces one renderable per
/// group.
#[derive(Debug, Clone)]
pub struct EdgeGroup {
    /// Which vertex set this group's edges index into.
    pub vertex_set: usize,
    /// Original (un-extruded) vertex count of that set. Extraction offsets
    /// far-cap indices by this amount.
    pub vertex_count: u32,
    pub edges: Vec<Edge>,
}

/// Edge topology of one mesh: flat triangle storage plus per-vertex-set edge
/// groups.
#[derive(Debug, Clone, Default)]
pub struct EdgeData {
    pub triangles: Vec<Triangle>,
    pub edge_groups: Vec<EdgeGroup>,
}

impl EdgeData {
    /// Reclassify every triangle against a light 4-vector
    /// (see [`crate::scene::Light::shadow_volume_vector`] for the packing).
    ///
    /// A single dot product against the stored plane equation covers both
    /// point lights (`w != 0`) and directional lights (`w == 0`).
    pub fn update_triangle_light_facing(&mut self, light: Vec4) {
        for tri in &mut self.triangles {
            tri.light_facing = tri.normal.dot(light) > 0.0;
        }
    }

    /// Total edge count across all groups.
    pub fn edge_count(&self) -> usize {
        self.edge_groups.iter().map(|g| g.edges.len()).sum()
    }

    /// Worst-case number of indices silhouette extraction can emit for one
    /// light of the given type.
    ///
    /// Each silhouette edge yields one triangle for a directional light and a
    /// two-triangle quad otherwise. Callers that bind the light late should
    /// size for [`LightType::Point`].
    pub fn max_silhouette_indices(&self, light_type: LightType) -> usize {
        match light_type {
            LightType::Directional => 3 * self.edge_count(),
            LightType::Point | LightType::Spot => 6 * self.edge_count(),
        }
    }
}
