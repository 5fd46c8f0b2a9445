//! Animation playback state tracking.
//!
//! Each animated entity owns one [`AnimationStateSet`] holding an
//! [`AnimationState`] per animation. Mutating an enabled state bumps the
//! set's dirty frame number; skeleton/pose evaluation compares that number
//! against the last one it observed and skips recomputation when nothing
//! changed. That counter is the only outward signal: consumers poll, nothing
//! pushes.

mod state;
mod state_set;

pub use state::*;
pub use state_set::*;
