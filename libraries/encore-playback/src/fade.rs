//! Volume fade scheduler
//!
//! Linear volume ramps sampled once per engine tick:
//!
//! ```text
//! t      = clamp((now - started_at) / duration, 0, 1)
//! volume = (1 - t) * start_volume + t * end_volume
//! ```
//!
//! Only one fade exists at a time. Starting a fade replaces the one in flight
//! (last writer wins, ramps are never blended). A fade-in's end volume is
//! re-read from the live volume setting on every tick, so a slider change
//! during the ramp is honoured; a fade-out always lands on silence.

use std::time::Duration;

/// Which way a fade ramps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Towards the live volume (start/resume)
    In,

    /// Towards silence (pause)
    Out,
}

/// A single linear ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOperation {
    started_at: Duration,
    duration: Duration,
    start_volume: f32,
    end_volume: f32,
    direction: FadeDirection,
}

impl FadeOperation {
    /// Ramp from `from` up to `target` (retargeted every tick)
    pub fn fade_in(now: Duration, duration: Duration, from: f32, target: f32) -> Self {
        Self {
            started_at: now,
            duration,
            start_volume: from,
            end_volume: target,
            direction: FadeDirection::In,
        }
    }

    /// Ramp from `from` down to silence
    pub fn fade_out(now: Duration, duration: Duration, from: f32) -> Self {
        Self {
            started_at: now,
            duration,
            start_volume: from,
            end_volume: 0.0,
            direction: FadeDirection::Out,
        }
    }

    /// Engine time at which the ramp started
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Ramp length
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Volume at the start of the ramp
    pub fn start_volume(&self) -> f32 {
        self.start_volume
    }

    /// Volume the ramp converges to
    pub fn end_volume(&self) -> f32 {
        self.end_volume
    }

    /// Ramp direction
    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Elapsed ratio in `[0, 1]`; a zero-length ramp is complete immediately
    pub fn ratio(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Interpolated volume at `now`
    pub fn volume_at(&self, now: Duration) -> f32 {
        let t = self.ratio(now);
        (1.0 - t) * self.start_volume + t * self.end_volume
    }

    /// Re-clamp the end volume against the live setting
    fn retarget(&mut self, live_volume: f32) {
        self.end_volume = match self.direction {
            FadeDirection::In => live_volume,
            FadeDirection::Out => self.end_volume.clamp(0.0, live_volume.max(0.0)),
        };
    }
}

/// Result of advancing the scheduler by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    /// No fade in flight
    Idle,

    /// Fade still running; apply `volume`
    Ramping {
        /// Volume to apply to output
        volume: f32,
    },

    /// Fade reached its end this tick and was dropped
    Completed {
        /// Final volume to apply to output
        volume: f32,
        /// Direction of the finished ramp
        direction: FadeDirection,
    },
}

/// Holds the single active fade and advances it
#[derive(Debug, Default)]
pub struct FadeScheduler {
    active: Option<FadeOperation>,
}

impl FadeScheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fade, returning the one it replaced (if any)
    pub fn start(&mut self, fade: FadeOperation) -> Option<FadeOperation> {
        self.active.replace(fade)
    }

    /// Drop the active fade without completing it
    pub fn cancel(&mut self) -> Option<FadeOperation> {
        self.active.take()
    }

    /// The fade currently in flight
    pub fn active(&self) -> Option<&FadeOperation> {
        self.active.as_ref()
    }

    /// Check if a fade is in flight
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Advance the active fade to `now` against the live target volume
    pub fn tick(&mut self, now: Duration, live_volume: f32) -> FadeStep {
        let Some(fade) = self.active.as_mut() else {
            return FadeStep::Idle;
        };

        fade.retarget(live_volume);

        if fade.ratio(now) >= 1.0 {
            let finished = *fade;
            self.active = None;
            return FadeStep::Completed {
                volume: finished.end_volume,
                direction: finished.direction,
            };
        }

        FadeStep::Ramping {
            volume: fade.volume_at(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn fade_in_interpolates_linearly() {
        let fade = FadeOperation::fade_in(ms(1000), ms(400), 0.0, 0.8);

        assert_eq!(fade.volume_at(ms(1000)), 0.0);
        assert!((fade.volume_at(ms(1100)) - 0.2).abs() < 1e-6);
        assert!((fade.volume_at(ms(1200)) - 0.4).abs() < 1e-6);
        assert_eq!(fade.volume_at(ms(1400)), 0.8);
        // Clamped past the end
        assert_eq!(fade.volume_at(ms(5000)), 0.8);
    }

    #[test]
    fn ratio_before_start_is_zero() {
        let fade = FadeOperation::fade_out(ms(500), ms(200), 1.0);
        assert_eq!(fade.ratio(ms(100)), 0.0);
        assert_eq!(fade.volume_at(ms(100)), 1.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut scheduler = FadeScheduler::new();
        scheduler.start(FadeOperation::fade_out(ms(0), Duration::ZERO, 0.5));

        assert_eq!(
            scheduler.tick(ms(0), 0.5),
            FadeStep::Completed {
                volume: 0.0,
                direction: FadeDirection::Out
            }
        );
        assert!(!scheduler.is_active());
    }

    #[test]
    fn fade_in_follows_live_volume() {
        let mut scheduler = FadeScheduler::new();
        scheduler.start(FadeOperation::fade_in(ms(0), ms(100), 0.0, 1.0));

        // Slider dropped to 0.5 mid-ramp: halfway now means 0.25
        match scheduler.tick(ms(50), 0.5) {
            FadeStep::Ramping { volume } => assert!((volume - 0.25).abs() < 1e-6),
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(scheduler.active().unwrap().end_volume(), 0.5);

        assert_eq!(
            scheduler.tick(ms(100), 0.6),
            FadeStep::Completed {
                volume: 0.6,
                direction: FadeDirection::In
            }
        );
    }

    #[test]
    fn fade_out_always_lands_on_silence() {
        let mut scheduler = FadeScheduler::new();
        scheduler.start(FadeOperation::fade_out(ms(0), ms(200), 0.7));

        scheduler.tick(ms(100), 1.0);
        assert_eq!(scheduler.active().unwrap().end_volume(), 0.0);

        assert_eq!(
            scheduler.tick(ms(200), 1.0),
            FadeStep::Completed {
                volume: 0.0,
                direction: FadeDirection::Out
            }
        );
    }

    #[test]
    fn starting_a_fade_replaces_the_active_one() {
        let mut scheduler = FadeScheduler::new();
        scheduler.start(FadeOperation::fade_out(ms(0), ms(200), 0.8));

        let replaced = scheduler.start(FadeOperation::fade_in(ms(50), ms(400), 0.6, 0.8));
        assert_eq!(replaced.map(|f| f.direction()), Some(FadeDirection::Out));

        let active = scheduler.active().unwrap();
        assert_eq!(active.direction(), FadeDirection::In);
        assert_eq!(active.start_volume(), 0.6);
    }

    #[test]
    fn idle_scheduler_reports_idle() {
        let mut scheduler = FadeScheduler::new();
        assert_eq!(scheduler.tick(ms(10), 1.0), FadeStep::Idle);
        assert!(scheduler.cancel().is_none());
    }
}
