//! Playback state for a single animation.

/// Playback cursor and blend parameters for one animation.
///
/// States live inside an [`AnimationStateSet`](super::AnimationStateSet) and
/// are mutated through the set so dirty tracking stays correct; the values
/// here are readable anywhere via snapshot copies.
///
/// Equality compares everything except the blend mask, which is a per-entity
/// tuning detail rather than part of the playback state proper.
#[derive(Debug, Clone)]
pub struct AnimationState {
    name: String,
    time_position: f32,
    length: f32,
    weight: f32,
    enabled: bool,
    loop_enabled: bool,
    blend_mask: Option<Vec<f32>>,
}

impl AnimationState {
    pub(crate) fn new(
        name: impl Into<String>,
        time_position: f32,
        length: f32,
        weight: f32,
        enabled: bool,
    ) -> Self {
        Self {
            name: name.into(),
            time_position,
            length,
            weight,
            enabled,
            loop_enabled: true,
            blend_mask: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position along the animation, in seconds.
    pub fn time_position(&self) -> f32 {
        self.time_position
    }

    /// Total length of the animation, in seconds.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Blend weight; this layer places no constraint on the range.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Whether a non-looping animation has played through.
    ///
    /// Exact comparison on purpose: the clamp in
    /// [`update_time_position`](Self::update_time_position) lands precisely
    /// on `length`.
    pub fn has_ended(&self) -> bool {
        !self.loop_enabled && self.time_position == self.length
    }

    /// Normalized position along the animation, `time_position / length`.
    pub fn progress(&self) -> f32 {
        self.time_position / self.length
    }

    /// Per-bone blend weights, if a mask has been created.
    pub fn blend_mask(&self) -> Option<&[f32]> {
        self.blend_mask.as_deref()
    }

    pub fn has_blend_mask(&self) -> bool {
        self.blend_mask.is_some()
    }

    /// Move the cursor, wrapping when looping and clamping to `[0, length]`
    /// otherwise. Returns whether the requested time differed from the
    /// current one, which is the signal the owning set uses for dirty
    /// tracking (a wrap landing back on the same value still counts as a
    /// change).
    pub(crate) fn update_time_position(&mut self, time: f32) -> bool {
        if time == self.time_position {
            return false;
        }
        if self.loop_enabled {
            // Zero-length animations pin the cursor at zero.
            self.time_position = if self.length != 0.0 {
                time.rem_euclid(self.length)
            } else {
                0.0
            };
        } else {
            self.time_position = time.clamp(0.0, self.length);
        }
        true
    }

    pub(crate) fn set_length(&mut self, length: f32) {
        self.length = length;
    }

    pub(crate) fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub(crate) fn set_enabled_flag(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_loop(&mut self, loop_enabled: bool) {
        self.loop_enabled = loop_enabled;
    }

    /// Copy playback state (not the blend mask, not the name) from another
    /// state of the same animation.
    pub(crate) fn copy_from(&mut self, other: &AnimationState) {
        self.time_position = other.time_position;
        self.length = other.length;
        self.weight = other.weight;
        self.enabled = other.enabled;
        self.loop_enabled = other.loop_enabled;
    }

    pub(crate) fn create_blend_mask(&mut self, bone_count: usize, initial_weight: f32) {
        if self.blend_mask.is_none() {
            self.blend_mask = Some(vec![initial_weight; bone_count]);
        }
    }

    pub(crate) fn destroy_blend_mask(&mut self) {
        self.blend_mask = None;
    }

    /// # Panics
    ///
    /// Panics when no mask exists or the bone index is out of range; both are
    /// caller bugs.
    pub(crate) fn set_blend_mask_entry(&mut self, bone: usize, weight: f32) {
        let mask = self
            .blend_mask
            .as_mut()
            .expect("set_blend_mask_entry called without a blend mask");
        assert!(
            bone < mask.len(),
            "bone index {} out of range for blend mask of {} entries",
            bone,
            mask.len()
        );
        mask[bone] = weight;
    }

    /// Bulk-replace the mask contents. The mask must already exist; a length
    /// mismatch is rejected without touching it.
    pub(crate) fn set_blend_mask_data(
        &mut self,
        data: &[f32],
    ) -> Result<(), crate::error::EngineError> {
        let mask = self
            .blend_mask
            .as_mut()
            .expect("set_blend_mask_data called without a blend mask");
        if data.len() != mask.len() {
            return Err(crate::error::EngineError::BlendMaskSizeMismatch {
                expected: mask.len(),
                actual: data.len(),
            });
        }
        mask.copy_from_slice(data);
        Ok(())
    }
}

impl PartialEq for AnimationState {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.time_position == other.time_position
            && self.length == other.length
            && self.weight == other.weight
            && self.enabled == other.enabled
            && self.loop_enabled == other.loop_enabled
    }
}
