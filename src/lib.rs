//! # Umbra Engine
//!
//! CPU-side core subsystems for real-time 3D rendering:
//!
//! - **Shadow volumes**: mesh edge topology, per-light silhouette extraction
//!   and vertex extrusion into lockable vertex/index buffers, ready for a
//!   stencil shadow pass.
//! - **Animation states**: per-animation playback cursors grouped into owning
//!   sets with dirty-frame tracking, so skeleton/pose evaluation can cheaply
//!   detect when cached results are stale.
//!
//! The render backend itself (buffer upload, stencil passes, windowing) is an
//! external collaborator: this crate stops at filled buffers and index ranges.

pub mod animation;
pub mod buffer;
pub mod error;
pub mod mesh;
pub mod scene;
pub mod shadow;

pub use error::{EngineError, EngineResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library banner. Optional; nothing else depends on it.
pub fn init() {
    log::info!("Umbra Engine v{} initialized", VERSION);
}
