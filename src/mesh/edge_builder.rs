//! Builds [`EdgeData`] from raw vertex positions and triangle lists.

use std::collections::HashMap;

use glam::{Vec3, Vec4};

use crate::error::{EngineError, EngineResult};

use super::{Edge, EdgeData, EdgeGroup, Triangle};

/// Cross products with squared length at or below this are treated as
/// zero-area.
const ZERO_AREA_EPSILON: f32 = 1e-12;

/// Accumulates vertex sets and triangle lists, then pairs shared edges into
/// an immutable [`EdgeData`].
///
/// Triangles are expected counter-clockwise; the first triangle to declare a
/// directed edge becomes that edge's `tri_index[0]`, which fixes the winding
/// the silhouette extractor relies on. Edges only pair within one vertex set.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use umbra_engine::mesh::EdgeListBuilder;
///
/// let mut builder = EdgeListBuilder::new();
/// let set = builder.add_vertex_set(vec![
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 0.0),
///     Vec3::new(0.0, 0.0, -1.0),
/// ]);
/// builder.add_triangles(set, &[0, 1, 2]).unwrap();
/// let edge_data = builder.build();
/// assert_eq!(edge_data.edge_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct EdgeListBuilder {
    vertex_sets: Vec<Vec<Vec3>>,
    triangles: Vec<Triangle>,
    zero_area: Vec<bool>,
}

impl EdgeListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contiguous range of vertex positions and return its set
    /// index.
    pub fn add_vertex_set(&mut self, positions: Vec<Vec3>) -> usize {
        self.vertex_sets.push(positions);
        self.vertex_sets.len() - 1
    }

    /// Append a triangle list (three indices per triangle, counter-clockwise)
    /// indexing into the given vertex set.
    ///
    /// Computes each triangle's plane equation up front; zero-area triangles
    /// get a zero plane and are remembered so their edges can be flagged
    /// degenerate.
    pub fn add_triangles(&mut self, vertex_set: usize, indices: &[u32]) -> EngineResult<()> {
        let positions = self
            .vertex_sets
            .get(vertex_set)
            .ok_or(EngineError::UnknownVertexSet(vertex_set))?;
        if indices.len() % 3 != 0 {
            return Err(EngineError::PartialTriangle(indices.len()));
        }

        for corner in indices.chunks_exact(3) {
            for &index in corner {
                if index as usize >= positions.len() {
                    return Err(EngineError::VertexIndexOutOfRange {
                        vertex_set,
                        index,
                        vertex_count: positions.len() as u32,
                    });
                }
            }

            let a = positions[corner[0] as usize];
            let b = positions[corner[1] as usize];
            let c = positions[corner[2] as usize];
            let cross = (b - a).cross(c - a);

            let (normal, zero) = if cross.length_squared() > ZERO_AREA_EPSILON {
                let n = cross.normalize();
                (n.extend(-n.dot(a)), false)
            } else {
                (Vec4::ZERO, true)
            };

            self.triangles.push(Triangle {
                vertex_index: [corner[0], corner[1], corner[2]],
                vertex_set,
                normal,
                light_facing: false,
            });
            self.zero_area.push(zero);
        }
        Ok(())
    }

    /// Pair shared edges and produce the final topology, one edge group per
    /// vertex set.
    pub fn build(self) -> EdgeData {
        let mut groups: Vec<EdgeGroup> = self
            .vertex_sets
            .iter()
            .enumerate()
            .map(|(vertex_set, positions)| EdgeGroup {
                vertex_set,
                vertex_count: positions.len() as u32,
                edges: Vec::new(),
            })
            .collect();

        // Undirected vertex pair (within one set) -> index of the most recent
        // still-unpaired edge in that set's group.
        let mut edge_lookup: HashMap<(usize, u32, u32), usize> = HashMap::new();
        let mut non_manifold = 0usize;

        for (tri_index, tri) in self.triangles.iter().enumerate() {
            let set = tri.vertex_set;
            for corner in 0..3 {
                let a = tri.vertex_index[corner];
                let b = tri.vertex_index[(corner + 1) % 3];
                let key = (set, a.min(b), a.max(b));

                match edge_lookup.get(&key).copied() {
                    Some(existing)
                        if groups[set].edges[existing].tri_index[0]
                            == groups[set].edges[existing].tri_index[1] =>
                    {
                        let edge = &mut groups[set].edges[existing];
                        edge.tri_index[1] = tri_index;
                        edge.degenerate = false;
                    }
                    occupied => {
                        if occupied.is_some() {
                            // More than two triangles share this edge; the
                            // extras pair among themselves in arrival order.
                            non_manifold += 1;
                        }
                        edge_lookup.insert(key, groups[set].edges.len());
                        groups[set].edges.push(Edge {
                            tri_index: [tri_index, tri_index],
                            vert_index: [a, b],
                            degenerate: true,
                        });
                    }
                }
            }
        }

        // A paired edge bordering a zero-area triangle still cannot trust its
        // second classification.
        for group in &mut groups {
            for edge in &mut group.edges {
                if self.zero_area[edge.tri_index[0]] || self.zero_area[edge.tri_index[1]] {
                    edge.degenerate = true;
                }
            }
        }

        let zero_area_count = self.zero_area.iter().filter(|&&z| z).count();
        if zero_area_count > 0 {
            log::warn!(
                "edge build: {} zero-area triangles, their edges are degenerate",
                zero_area_count
            );
        }
        if non_manifold > 0 {
            log::warn!("edge build: {} non-manifold edge declarations", non_manifold);
        }
        log::debug!(
            "built edge data: {} vertex sets, {} triangles, {} edges",
            groups.len(),
            self.triangles.len(),
            groups.iter().map(|g| g.edges.len()).sum::<usize>()
        );

        EdgeData {
            triangles: self.triangles,
            edge_groups: groups,
        }
    }
}
