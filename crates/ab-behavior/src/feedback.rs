//! Emotion feedback reported when a behavior stops.

/// Fixed mapping of named emotions to intensities, built once with the
/// definition and shared by every instance.
///
/// When `contagion` is set, each emotion is also offered to the agent's
/// party at `intensity × contagion`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmotionFeedback {
    pub emotions:  Vec<(String, f32)>,
    pub contagion: Option<f32>,
}

impl EmotionFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an emotion.  `intensity` is clamped to `[0, 1]`.
    pub fn emotion(mut self, name: impl Into<String>, intensity: f32) -> Self {
        self.emotions.push((name.into(), unit(intensity)));
        self
    }

    /// Spread each emotion to party members at `strength` (clamped to `[0, 1]`).
    pub fn contagion(mut self, strength: f32) -> Self {
        self.contagion = Some(unit(strength));
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
