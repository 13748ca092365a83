//! Live volume setting
//!
//! Fades never carry a fixed destination for long: every tick the scheduler
//! re-reads [`Volume::target`], so a slider move or a mute during a fade-in
//! bends the ramp instead of being overwritten when it completes.

use std::time::Duration;

use crate::fade::FadeOperation;

/// Floor of the slider curve, reached just above 0%
const FLOOR_DB: f32 = -60.0;

/// Slider level plus mute flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    level: u8,
    muted: bool,
}

impl Volume {
    /// Unmuted at `level`, clamped to 100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    /// Slider level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Move the slider; returns whether the target changed
    pub fn set_level(&mut self, level: u8) -> bool {
        let before = self.target();
        self.level = level.min(100);
        self.target() != before
    }

    /// Returns whether the target changed
    pub fn mute(&mut self) -> bool {
        self.set_muted(true)
    }

    /// Returns whether the target changed
    pub fn unmute(&mut self) -> bool {
        self.set_muted(false)
    }

    /// Returns whether the target changed
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted)
    }

    /// Output volume fades converge to: the slider curve, or 0 when muted
    pub fn target(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            Self::curve(self.level)
        }
    }

    /// Fade-in from `from` towards the live target
    pub fn fade_in(&self, now: Duration, duration: Duration, from: f32) -> FadeOperation {
        FadeOperation::fade_in(now, duration, from, self.target())
    }

    /// Slider position to output volume
    ///
    /// Linear in dB across `FLOOR_DB..0`, with 0% as true silence:
    /// 50% → -30 dB (0.0316), 80% → -12 dB (0.251), 100% → 1.0.
    pub fn curve(level: u8) -> f32 {
        if level == 0 {
            return 0.0;
        }

        let db = f32::from(100 - level.min(100)) * FLOOR_DB / 100.0;
        10.0_f32.powf(db / 20.0)
    }

    fn set_muted(&mut self, muted: bool) -> bool {
        let before = self.target();
        self.muted = muted;
        self.target() != before
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80)
    }
}
