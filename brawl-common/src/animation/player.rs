//! Cue playback and cross-fade state machine

use crate::error::AnimationError;
use crate::formats::AnimationCue;

use super::FighterAnimation;

/// Simulation tick rate that cue `fps` values are normalized against.
///
/// A cue authored at 80 fps advances one frame per unit of `update` delta.
pub const ANIMATION_BASE_RATE: f32 = 80.0;

/// Two frames to morph between and the blend weight of the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub frame_a: u32,
    pub frame_b: u32,
    /// 0.0 shows `frame_a`, 1.0 shows `frame_b`
    pub alpha: f32,
}

/// Per-fighter animation state.
///
/// Either plays the current cue in a loop or cross-fades into it from a
/// frozen snapshot of the previous one (`mix_time > 0`).
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    cues: Vec<AnimationCue>,
    current: Option<AnimationCue>,

    /// First frame of the playing window
    from: u32,
    /// Frames in the playing window, never zero
    length: u32,
    /// Position inside the window, in frames
    time: f32,
    /// Frames advanced per unit of delta
    speed: f32,

    /// Frame shown when the last cue switch happened
    mix_frame: u32,
    mix_time: f32,
    mix_length: f32,
}

impl AnimationPlayer {
    pub fn new(cues: Vec<AnimationCue>) -> Self {
        Self {
            cues,
            current: None,
            from: 0,
            length: 1,
            time: 0.0,
            speed: 0.0,
            mix_frame: 0,
            mix_time: 0.0,
            mix_length: 0.0,
        }
    }

    pub fn cues(&self) -> &[AnimationCue] {
        &self.cues
    }

    /// Cue that is playing (or being faded into)
    pub fn current(&self) -> Option<AnimationCue> {
        self.current
    }

    /// Whether a cross-fade is in progress
    pub fn is_mixing(&self) -> bool {
        self.mix_time > 0.0
    }

    /// Switch to cue `index` of the table, fading over `transition` time units.
    pub fn play(&mut self, index: usize, transition: f32) -> Result<(), AnimationError> {
        let cue = *self.cues.get(index).ok_or(AnimationError::UnknownCue {
            index,
            count: self.cues.len(),
        })?;
        self.play_cue(cue, transition);
        Ok(())
    }

    pub fn play_animation(
        &mut self,
        animation: FighterAnimation,
        transition: f32,
    ) -> Result<(), AnimationError> {
        self.play(animation.index(), transition)
    }

    /// Switch to an explicit cue.
    ///
    /// The frame on screen right now is frozen and blended out over
    /// `transition`; a zero transition cuts immediately.
    pub fn play_cue(&mut self, cue: AnimationCue, transition: f32) {
        self.mix_frame = self.from + self.shift();
        self.mix_time = transition.max(0.0);
        self.mix_length = self.mix_time;

        self.from = cue.start as u32;
        self.length = (cue.length as u32).max(1);
        self.time = 0.0;
        self.speed = cue.fps as f32 / ANIMATION_BASE_RATE;
        self.current = Some(cue);

        tracing::trace!(
            start = cue.start,
            length = cue.length,
            fps = cue.fps,
            transition,
            "animation cue switched"
        );
    }

    /// Advance by `delta` time units.
    ///
    /// While fading only the fade progresses; the incoming cue starts
    /// moving once the fade is over. Playback loops over the window.
    pub fn update(&mut self, delta: f32) {
        if self.is_mixing() {
            self.mix_time = (self.mix_time - delta).max(0.0);
        } else {
            self.time = (self.time + delta * self.speed).rem_euclid(self.length as f32);
        }
    }

    pub fn sample(&self) -> PoseSample {
        if self.is_mixing() {
            return PoseSample {
                frame_a: self.mix_frame,
                frame_b: self.from,
                alpha: 1.0 - self.mix_time / self.mix_length,
            };
        }

        let shift = self.shift();
        PoseSample {
            frame_a: self.from + shift,
            frame_b: self.from + (shift + 1) % self.length,
            alpha: self.time.fract(),
        }
    }

    /// Whole frames into the window
    fn shift(&self) -> u32 {
        // rem_euclid may round up to exactly `length`
        (self.time.floor() as u32).min(self.length - 1)
    }
}
