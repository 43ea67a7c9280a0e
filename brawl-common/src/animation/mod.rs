//! Fighter animation playback
//!
//! [`AnimationPlayer`] walks a fighter's cue table and produces the pair of
//! frames the renderer morphs between. Switching cues cross-fades from the
//! frame that was on screen into the new cue's first frame.
//!
//! The player is owned by one fighter instance and driven from its tick; it
//! never touches frame data, only indices into it.

mod player;


pub use player::{ANIMATION_BASE_RATE, AnimationPlayer, PoseSample};

/// Named fighter cues, in cue-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FighterAnimation {
    HighJabL = 0,
    MiddleJabL = 1,
    HighJabR = 2,
    MiddleJabR = 3,
    KickL = 4,
    KickR = 5,
    Hit = 6,
    Idle = 7,
    MoveForward = 8,
    MoveBack = 9,
    Block = 10,
    LoseStance = 11,
    WinStance = 12,
}

impl FighterAnimation {
    /// Number of named cues a complete fighter carries
    pub const COUNT: usize = 13;

    pub const ALL: [FighterAnimation; Self::COUNT] = [
        FighterAnimation::HighJabL,
        FighterAnimation::MiddleJabL,
        FighterAnimation::HighJabR,
        FighterAnimation::MiddleJabR,
        FighterAnimation::KickL,
        FighterAnimation::KickR,
        FighterAnimation::Hit,
        FighterAnimation::Idle,
        FighterAnimation::MoveForward,
        FighterAnimation::MoveBack,
        FighterAnimation::Block,
        FighterAnimation::LoseStance,
        FighterAnimation::WinStance,
    ];

    /// Position in the cue table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
