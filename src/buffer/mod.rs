//! Lockable vertex and index buffers.
//!
//! These are the CPU-side stand-ins for GPU buffer objects: a fixed-size
//! allocation that must be locked before any access. Locking borrows the
//! buffer mutably and returns an RAII guard, so a second concurrent lock is
//! rejected at compile time and the unlock runs on every exit path, panics
//! included. Each extraction or extrusion pass holds exactly one lock for its
//! duration.
//!
//! The shadow subsystem's sizing conventions:
//!
//! - shadow vertex buffers hold `2 × original_vertex_count` position slots,
//!   first half original, second half extruded;
//! - shadow index buffers are sized from
//!   [`EdgeData::max_silhouette_indices`](crate::mesh::EdgeData::max_silhouette_indices);
//!   writes are only checked by the slice bound, so under-sizing is a caller
//!   bug.

use bitflags::bitflags;
use glam::Vec3;

bitflags! {
    /// Usage flags for buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be used as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be used as an index buffer.
        const INDEX = 1 << 1;
        /// Buffer can be copied from.
        const COPY_SRC = 1 << 2;
        /// Buffer can be copied to.
        const COPY_DST = 1 << 3;
        /// Buffer is mappable for CPU reads.
        const MAP_READ = 1 << 4;
        /// Buffer is mappable for CPU writes.
        const MAP_WRITE = 1 << 5;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// CPU access mode for a buffer lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Previous contents may be discarded; the locked region counts as
    /// uninitialized and must be fully rewritten.
    Discard,
    /// Contents are preserved for read-modify-write access.
    Normal,
    /// Read-only access; the mutable views panic in debug builds.
    ReadOnly,
}

/// Index data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// A lockable index buffer.
///
/// The backing store is word-aligned so both 16- and 32-bit views cast
/// safely.
#[derive(Debug)]
pub struct HardwareIndexBuffer {
    format: IndexFormat,
    index_count: usize,
    usage: BufferUsage,
    data: Vec<u32>,
}

impl HardwareIndexBuffer {
    /// Create a zero-filled buffer with `index_count` slots of `format`.
    pub fn new(format: IndexFormat, index_count: usize, usage: BufferUsage) -> Self {
        let words = (index_count * format.size() + 3) / 4;
        Self {
            format,
            index_count,
            usage,
            data: vec![0; words],
        }
    }

    pub fn format(&self) -> IndexFormat {
        self.format
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Size of the addressable region in bytes.
    pub fn size_bytes(&self) -> usize {
        self.index_count * self.format.size()
    }

    /// Lock the whole buffer. The guard unlocks on drop.
    pub fn lock(&mut self, mode: LockMode) -> IndexBufferLock<'_> {
        IndexBufferLock {
            data: &mut self.data,
            format: self.format,
            index_count: self.index_count,
            mode,
        }
    }
}

/// Exclusive access to a locked [`HardwareIndexBuffer`].
#[derive(Debug)]
pub struct IndexBufferLock<'a> {
    data: &'a mut [u32],
    format: IndexFormat,
    index_count: usize,
    mode: LockMode,
}

impl IndexBufferLock<'_> {
    pub fn format(&self) -> IndexFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.data[..])[..self.index_count * self.format.size()]
    }

    /// View the indices as `u16`. The buffer format must be
    /// [`IndexFormat::Uint16`].
    pub fn as_u16(&self) -> &[u16] {
        debug_assert_eq!(self.format, IndexFormat::Uint16);
        &bytemuck::cast_slice(&self.data[..])[..self.index_count]
    }

    /// Mutable `u16` view. The lock must not be [`LockMode::ReadOnly`].
    pub fn as_u16_mut(&mut self) -> &mut [u16] {
        debug_assert_eq!(self.format, IndexFormat::Uint16);
        debug_assert_ne!(self.mode, LockMode::ReadOnly);
        &mut bytemuck::cast_slice_mut(&mut self.data[..])[..self.index_count]
    }

    /// View the indices as `u32`. The buffer format must be
    /// [`IndexFormat::Uint32`].
    pub fn as_u32(&self) -> &[u32] {
        debug_assert_eq!(self.format, IndexFormat::Uint32);
        &self.data[..self.index_count]
    }

    /// Mutable `u32` view. The lock must not be [`LockMode::ReadOnly`].
    pub fn as_u32_mut(&mut self) -> &mut [u32] {
        debug_assert_eq!(self.format, IndexFormat::Uint32);
        debug_assert_ne!(self.mode, LockMode::ReadOnly);
        &mut self.data[..self.index_count]
    }
}

/// A lockable buffer of tightly packed `f32 × 3` vertex positions.
#[derive(Debug)]
pub struct HardwareVertexBuffer {
    vertex_count: usize,
    usage: BufferUsage,
    data: Vec<f32>,
}

impl HardwareVertexBuffer {
    /// Create a zero-filled buffer with `vertex_count` position slots.
    pub fn new(vertex_count: usize, usage: BufferUsage) -> Self {
        Self {
            vertex_count,
            usage,
            data: vec![0.0; vertex_count * 3],
        }
    }

    /// Create a buffer initialized from existing positions.
    pub fn from_positions(positions: &[Vec3], usage: BufferUsage) -> Self {
        Self {
            vertex_count: positions.len(),
            usage,
            data: positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Lock the whole buffer. The guard unlocks on drop.
    pub fn lock(&mut self, mode: LockMode) -> VertexBufferLock<'_> {
        VertexBufferLock {
            data: &mut self.data,
            mode,
        }
    }
}

/// Exclusive access to a locked [`HardwareVertexBuffer`].
#[derive(Debug)]
pub struct VertexBufferLock<'a> {
    data: &'a mut [f32],
    mode: LockMode,
}

impl VertexBufferLock<'_> {
    pub fn positions(&self) -> &[Vec3] {
        bytemuck::cast_slice(&self.data[..])
    }

    /// Mutable position view. The lock must not be [`LockMode::ReadOnly`].
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        debug_assert_ne!(self.mode, LockMode::ReadOnly);
        bytemuck::cast_slice_mut(&mut self.data[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_index_buffer_sizes() {
        let buffer = HardwareIndexBuffer::new(IndexFormat::Uint16, 9, BufferUsage::INDEX);
        assert_eq!(buffer.index_count(), 9);
        assert_eq!(buffer.size_bytes(), 18);

        let buffer = HardwareIndexBuffer::new(IndexFormat::Uint32, 9, BufferUsage::INDEX);
        assert_eq!(buffer.size_bytes(), 36);
    }

    #[test]
    fn test_index_writes_persist_after_unlock() {
        let mut buffer = HardwareIndexBuffer::new(IndexFormat::Uint16, 4, BufferUsage::INDEX);
        {
            let mut lock = buffer.lock(LockMode::Discard);
            lock.as_u16_mut().copy_from_slice(&[1, 2, 3, 4]);
        }
        // Relock in read-modify-write mode: contents preserved.
        let lock = buffer.lock(LockMode::Normal);
        assert_eq!(lock.as_u16(), &[1, 2, 3, 4]);
        assert_eq!(lock.bytes().len(), 8);
    }

    #[test]
    fn test_u32_index_views() {
        let mut buffer = HardwareIndexBuffer::new(IndexFormat::Uint32, 3, BufferUsage::INDEX);
        {
            let mut lock = buffer.lock(LockMode::Discard);
            lock.as_u32_mut().copy_from_slice(&[10, 20, 30]);
        }
        let lock = buffer.lock(LockMode::ReadOnly);
        assert_eq!(lock.as_u32(), &[10, 20, 30]);
    }

    #[test]
    fn test_odd_u16_count_keeps_byte_length() {
        let mut buffer = HardwareIndexBuffer::new(IndexFormat::Uint16, 3, BufferUsage::INDEX);
        let mut lock = buffer.lock(LockMode::Discard);
        assert_eq!(lock.as_u16_mut().len(), 3);
        assert_eq!(lock.bytes().len(), 6);
    }

    #[test]
    fn test_vertex_buffer_roundtrip() {
        let positions = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
        ];
        let mut buffer = HardwareVertexBuffer::from_positions(&positions, BufferUsage::VERTEX);
        assert_eq!(buffer.vertex_count(), 2);

        {
            let mut lock = buffer.lock(LockMode::Normal);
            assert_eq!(lock.positions(), &positions);
            lock.positions_mut()[1] = Vec3::ZERO;
        }
        let lock = buffer.lock(LockMode::ReadOnly);
        assert_eq!(lock.positions()[1], Vec3::ZERO);
    }

    #[test]
    fn test_zeroed_vertex_buffer() {
        let mut buffer = HardwareVertexBuffer::new(4, BufferUsage::VERTEX);
        let lock = buffer.lock(LockMode::ReadOnly);
        assert_eq!(lock.positions().len(), 4);
        assert!(lock.positions().iter().all(|p| *p == Vec3::ZERO));
    }
}
