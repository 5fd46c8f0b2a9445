//! Owning collections of animation states.

use std::collections::HashMap;
use std::fmt;

use parking_lot::{Mutex, MutexGuard};

use crate::error::{EngineError, EngineResult};

use super::AnimationState;

struct AnimationStateSetInner {
    states: HashMap<String, AnimationState>,
    /// Names of enabled states, in enable order, no duplicates. Every entry
    /// is a key in `states`.
    enabled: Vec<String>,
    dirty_frame_number: u64,
}

impl AnimationStateSetInner {
    fn mark_dirty(&mut self) {
        self.dirty_frame_number += 1;
    }

    /// Maintain the enabled list for a state whose flag just changed: remove
    /// unconditionally, re-append when enabling. Idempotent, and always
    /// dirties, since enabling changes list membership even when the flag did not
    /// change.
    fn notify_state_enabled(&mut self, name: &str, enabled: bool) {
        self.enabled.retain(|n| n != name);
        if enabled {
            self.enabled.push(name.to_string());
        }
        self.mark_dirty();
    }
}

/// The animation states of one animated entity.
///
/// Owns every [`AnimationState`] it holds and guards them with one mutex, so
/// a loader thread can populate states while the render thread reads them.
/// Mutations on enabled states advance the dirty frame number; a pose
/// consumer that remembers the last number it saw can skip re-evaluation
/// whenever it has not moved.
///
/// Lookup hands out an [`AnimationStateEntry`] that holds the lock, which
/// keeps a burst of mutations on one state in a single critical section.
/// Iteration-style accessors return snapshot copies instead of iterators:
/// they never dangle, at the cost of observing a point in time.
pub struct AnimationStateSet {
    inner: Mutex<AnimationStateSetInner>,
}

impl AnimationStateSet {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(AnimationStateSetInner {
                states: HashMap::new(),
                enabled: Vec::new(),
                dirty_frame_number: 0,
            }),
        }
    }

    /// Create a new state under `name` and return its entry.
    ///
    /// Fails with [`EngineError::DuplicateAnimationState`] when the name is
    /// taken, leaving the existing state untouched. A state created enabled
    /// joins the enabled list immediately. Creation dirties the set.
    pub fn create_animation_state(
        &self,
        name: &str,
        time_position: f32,
        length: f32,
        weight: f32,
        enabled: bool,
    ) -> EngineResult<AnimationStateEntry<'_>> {
        let mut guard = self.inner.lock();
        if guard.states.contains_key(name) {
            return Err(EngineError::DuplicateAnimationState(name.to_string()));
        }

        let state = AnimationState::new(name, time_position, length, weight, enabled);
        guard.states.insert(name.to_string(), state);
        if enabled {
            guard.enabled.push(name.to_string());
        }
        guard.mark_dirty();

        Ok(AnimationStateEntry {
            guard,
            name: name.to_string(),
        })
    }

    /// Look up a state for reading or mutation.
    ///
    /// The returned entry holds the set's lock: drop it before any other
    /// operation on the same set, including taking a second entry.
    pub fn animation_state(&self, name: &str) -> EngineResult<AnimationStateEntry<'_>> {
        let guard = self.inner.lock();
        if !guard.states.contains_key(name) {
            return Err(EngineError::AnimationStateNotFound(name.to_string()));
        }
        Ok(AnimationStateEntry {
            guard,
            name: name.to_string(),
        })
    }

    /// Snapshot copy of a state, for inspection without holding the lock.
    pub fn get_animation_state(&self, name: &str) -> EngineResult<AnimationState> {
        self.inner
            .lock()
            .states
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::AnimationStateNotFound(name.to_string()))
    }

    pub fn has_animation_state(&self, name: &str) -> bool {
        self.inner.lock().states.contains_key(name)
    }

    /// Remove a state from the map and the enabled list. No-op when absent.
    pub fn remove_animation_state(&self, name: &str) {
        let mut guard = self.inner.lock();
        if guard.states.remove(name).is_some() {
            guard.enabled.retain(|n| n != name);
        }
    }

    /// Remove every state.
    pub fn remove_all_animation_states(&self) {
        let mut guard = self.inner.lock();
        guard.states.clear();
        guard.enabled.clear();
    }

    /// Number of states in the set.
    pub fn len(&self) -> usize {
        self.inner.lock().states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().states.is_empty()
    }

    /// Snapshot of all state names, sorted.
    pub fn state_names(&self) -> Vec<String> {
        let guard = self.inner.lock();
        let mut names: Vec<String> = guard.states.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of the enabled state names, in enable order.
    pub fn enabled_states(&self) -> Vec<String> {
        self.inner.lock().enabled.clone()
    }

    /// Current dirty frame number. Any increase since a consumer's last
    /// observation means cached pose results are stale.
    pub fn dirty_frame_number(&self) -> u64 {
        self.inner.lock().dirty_frame_number
    }

    /// Advance the dirty frame number directly, for mutations made outside
    /// this set's own API (e.g. a manually blended pose).
    pub fn notify_dirty(&self) {
        self.inner.lock().mark_dirty();
    }

    /// Copy playback state onto every same-named state in `target` and make
    /// `target`'s enabled list mirror this set's (filtered to names `target`
    /// has). The dirty frame number is carried over verbatim so a freshly
    /// synced instance agrees with its prototype.
    ///
    /// Fails with [`EngineError::AnimationStateNotFound`] if `target` holds a
    /// state this set does not hold. The check runs up front, before anything is copied,
    /// so a failure leaves `target` unmodified.
    ///
    /// Lock order is target first, then source; every caller going through
    /// this method agrees on that order.
    pub fn copy_matching_state(&self, target: &AnimationStateSet) -> EngineResult<()> {
        if std::ptr::eq(self, target) {
            return Ok(());
        }
        let mut target_inner = target.inner.lock();
        let source_inner = self.inner.lock();

        for name in target_inner.states.keys() {
            if !source_inner.states.contains_key(name) {
                return Err(EngineError::AnimationStateNotFound(name.clone()));
            }
        }

        for (name, state) in target_inner.states.iter_mut() {
            if let Some(source) = source_inner.states.get(name) {
                state.copy_from(source);
            }
        }

        let enabled: Vec<String> = source_inner
            .enabled
            .iter()
            .filter(|name| target_inner.states.contains_key(name.as_str()))
            .cloned()
            .collect();
        target_inner.enabled = enabled;
        target_inner.dirty_frame_number = source_inner.dirty_frame_number;
        Ok(())
    }
}

impl Default for AnimationStateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AnimationStateSet {
    /// Deep clone: every state is duplicated and the enabled list is rebuilt
    /// in the source's enable order. The clone advances independently from
    /// then on.
    fn clone(&self) -> Self {
        let guard = self.inner.lock();
        Self {
            inner: Mutex::new(AnimationStateSetInner {
                states: guard.states.clone(),
                enabled: guard.enabled.clone(),
                dirty_frame_number: guard.dirty_frame_number,
            }),
        }
    }
}

impl fmt::Debug for AnimationStateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(guard) => f
                .debug_struct("AnimationStateSet")
                .field("states", &guard.states.len())
                .field("enabled", &guard.enabled)
                .field("dirty_frame_number", &guard.dirty_frame_number)
                .finish(),
            None => f
                .debug_struct("AnimationStateSet")
                .field("states", &"<locked>")
                .finish(),
        }
    }
}

/// A locked view of one state inside an [`AnimationStateSet`].
///
/// Holds the set's mutex for its whole lifetime, so every mutation made
/// through it lands in one critical section and dirty tracking stays
/// consistent with the change that caused it.
pub struct AnimationStateEntry<'a> {
    guard: MutexGuard<'a, AnimationStateSetInner>,
    name: String,
}

impl AnimationStateEntry<'_> {
    fn state(&self) -> &AnimationState {
        self.guard
            .states
            .get(&self.name)
            .expect("entry state present while its set is locked")
    }

    fn state_mut(&mut self) -> &mut AnimationState {
        self.guard
            .states
            .get_mut(&self.name)
            .expect("entry state present while its set is locked")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_position(&self) -> f32 {
        self.state().time_position()
    }

    /// Move the playback cursor; wraps when looping, clamps otherwise.
    /// Dirties the set only when the state is enabled and the time changed.
    pub fn set_time_position(&mut self, time: f32) {
        let state = self.state_mut();
        let changed = state.update_time_position(time);
        let notify = changed && state.enabled();
        if notify {
            self.guard.mark_dirty();
        }
    }

    /// Advance the cursor by an offset (may be negative).
    pub fn add_time(&mut self, offset: f32) {
        let current = self.state().time_position();
        self.set_time_position(current + offset);
    }

    pub fn length(&self) -> f32 {
        self.state().length()
    }

    /// Change the animation length. The cursor is not re-normalized.
    pub fn set_length(&mut self, length: f32) {
        self.state_mut().set_length(length);
    }

    pub fn weight(&self) -> f32 {
        self.state().weight()
    }

    /// Change the blend weight. Dirties the set when the state is enabled.
    pub fn set_weight(&mut self, weight: f32) {
        let state = self.state_mut();
        state.set_weight(weight);
        let notify = state.enabled();
        if notify {
            self.guard.mark_dirty();
        }
    }

    pub fn enabled(&self) -> bool {
        self.state().enabled()
    }

    /// Enable or disable the state, maintaining the set's enabled list.
    /// Always dirties the set, even when the flag did not change.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state_mut().set_enabled_flag(enabled);
        let name = self.name.clone();
        self.guard.notify_state_enabled(&name, enabled);
    }

    pub fn loop_enabled(&self) -> bool {
        self.state().loop_enabled()
    }

    pub fn set_loop(&mut self, loop_enabled: bool) {
        self.state_mut().set_loop(loop_enabled);
    }

    pub fn has_ended(&self) -> bool {
        self.state().has_ended()
    }

    pub fn progress(&self) -> f32 {
        self.state().progress()
    }

    /// Set the cursor from a normalized position.
    pub fn set_progress(&mut self, progress: f32) {
        let length = self.state().length();
        self.set_time_position(progress * length);
    }

    /// Copy playback state (not the blend mask) from a snapshot of another
    /// state, dirtying the set unconditionally. The enabled list is not
    /// touched; [`AnimationStateSet::copy_matching_state`] rebuilds it when
    /// syncing whole sets.
    pub fn copy_state_from(&mut self, source: &AnimationState) {
        self.state_mut().copy_from(source);
        self.guard.mark_dirty();
    }

    /// Snapshot copy of the state.
    pub fn snapshot(&self) -> AnimationState {
        self.state().clone()
    }

    pub fn has_blend_mask(&self) -> bool {
        self.state().has_blend_mask()
    }

    pub fn blend_mask(&self) -> Option<&[f32]> {
        self.state().blend_mask()
    }

    /// Create the per-bone blend mask, filled with `initial_weight`. Keeps an
    /// existing mask untouched.
    pub fn create_blend_mask(&mut self, bone_count: usize, initial_weight: f32) {
        self.state_mut().create_blend_mask(bone_count, initial_weight);
    }

    pub fn destroy_blend_mask(&mut self) {
        self.state_mut().destroy_blend_mask();
    }

    /// Read one mask entry.
    ///
    /// # Panics
    ///
    /// Panics when no mask exists or the bone index is out of range.
    pub fn blend_mask_entry(&self, bone: usize) -> f32 {
        let mask = self
            .state()
            .blend_mask()
            .expect("blend_mask_entry called without a blend mask");
        mask[bone]
    }

    /// Write one mask entry. Dirties the set when the state is enabled.
    ///
    /// # Panics
    ///
    /// Panics when no mask exists or the bone index is out of range; both are
    /// caller bugs.
    pub fn set_blend_mask_entry(&mut self, bone: usize, weight: f32) {
        let state = self.state_mut();
        state.set_blend_mask_entry(bone, weight);
        let notify = state.enabled();
        if notify {
            self.guard.mark_dirty();
        }
    }

    /// Bulk-replace the mask. The mask must already exist; a length mismatch
    /// fails with [`EngineError::BlendMaskSizeMismatch`] and leaves it
    /// untouched. Dirties the set when the state is enabled.
    pub fn set_blend_mask_data(&mut self, data: &[f32]) -> EngineResult<()> {
        let state = self.state_mut();
        state.set_blend_mask_data(data)?;
        let notify = state.enabled();
        if notify {
            self.guard.mark_dirty();
        }
        Ok(())
    }

    /// Replace the mask, creating it first when absent.
    pub fn set_blend_mask(&mut self, data: &[f32]) -> EngineResult<()> {
        if !self.state().has_blend_mask() {
            self.state_mut().create_blend_mask(data.len(), 0.0);
        }
        self.set_blend_mask_data(data)
    }
}

impl fmt::Debug for AnimationStateEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.state(), f)
    }
}
