//! Per-edge-group shadow volume output ranges.

/// One edge group's slice of the shared shadow index buffer.
///
/// Renderables are created by the caller, one per edge group and in the same
/// order; silhouette extraction rewrites the range every pass. The range is
/// what the render backend later submits as a draw call.
#[derive(Debug, Clone)]
pub struct ShadowRenderable {
    vertex_set: usize,
    index_start: usize,
    index_count: usize,
}

impl ShadowRenderable {
    pub fn new(vertex_set: usize) -> Self {
        Self {
            vertex_set,
            index_start: 0,
            index_count: 0,
        }
    }

    /// Which vertex set (and therefore which shadow vertex buffer) this
    /// renderable draws from.
    pub fn vertex_set(&self) -> usize {
        self.vertex_set
    }

    /// First index of this renderable's range in the shared buffer.
    pub fn index_start(&self) -> usize {
        self.index_start
    }

    /// Number of indices in the range.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub(crate) fn begin_update(&mut self, index_start: usize) {
        self.index_start = index_start;
        self.index_count = 0;
    }

    pub(crate) fn grow(&mut self, indices: usize) {
        self.index_count += indices;
    }
}
