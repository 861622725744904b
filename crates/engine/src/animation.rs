use crate::math::Vec2;
use crate::sprite::{SpriteSheet, Visual};
use crate::stage::SoundId;
use crate::timer::Timer;
use crate::EngineError;

/// One entry of an animation sequence. A `None` duration falls back to the
/// owning sprite's default frame duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub sheet_index: usize,
    pub duration: Option<f32>,
    pub effect: Option<SoundId>,
}

/// Duration-weighted frame sequencer. The current frame index together with
/// the driving timer is the whole of its state; advancing can cross several
/// frames in a single update when the elapsed time demands it, carrying the
/// timer excess forward so no time is lost.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedSprite {
    sheet: SpriteSheet,
    frames: Vec<AnimationFrame>,
    default_frame_duration: f32,
    timer: Timer,
    current: usize,
    repeat: bool,
    pending_effects: Vec<SoundId>,
    pub scale: Vec2,
    pub alpha: f32,
}

impl AnimatedSprite {
    pub fn new(
        sheet: SpriteSheet,
        first_frame: usize,
        frame_duration: f32,
    ) -> Result<Self, EngineError> {
        if frame_duration <= 0.0 {
            return Err(EngineError::MissingParameter("frame duration"));
        }
        sheet.frame(first_frame)?;
        Ok(Self {
            sheet,
            frames: vec![AnimationFrame {
                sheet_index: first_frame,
                duration: None,
                effect: None,
            }],
            default_frame_duration: frame_duration,
            timer: Timer::new(frame_duration),
            current: 0,
            repeat: false,
            pending_effects: Vec::new(),
            scale: Vec2::ONE,
            alpha: 1.0,
        })
    }

    pub fn add_frame(self, sheet_index: usize) -> Result<Self, EngineError> {
        self.push_frame(sheet_index, None, None)
    }

    pub fn add_frame_timed(self, sheet_index: usize, duration: f32) -> Result<Self, EngineError> {
        self.push_frame(sheet_index, Some(duration), None)
    }

    pub fn add_frame_with_effect(
        self,
        sheet_index: usize,
        duration: f32,
        effect: SoundId,
    ) -> Result<Self, EngineError> {
        self.push_frame(sheet_index, Some(duration), Some(effect))
    }

    fn push_frame(
        mut self,
        sheet_index: usize,
        duration: Option<f32>,
        effect: Option<SoundId>,
    ) -> Result<Self, EngineError> {
        self.sheet.frame(sheet_index)?;
        self.frames.push(AnimationFrame {
            sheet_index,
            duration,
            effect,
        });
        Ok(self)
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn frame_duration(&self, index: usize) -> Result<f32, EngineError> {
        let frame = self.frames.get(index).ok_or(EngineError::OutOfRange {
            index,
            count: self.frames.len(),
        })?;
        Ok(frame.duration.unwrap_or(self.default_frame_duration))
    }

    fn frame_duration_unchecked(&self, index: usize) -> f32 {
        self.frames[index]
            .duration
            .unwrap_or(self.default_frame_duration)
    }

    /// Rewinds to the first frame without firing any frame effects; effects
    /// belong to frame advancement only.
    pub fn reset(&mut self) {
        let first_duration = self.frame_duration_unchecked(0);
        self.timer.reset_carrying(first_duration, 0.0);
        self.current = 0;
    }

    pub fn update(&mut self, dt: f32) {
        self.timer.update(dt);
        while self.timer.is_done() {
            let next = self.current + 1;
            if next >= self.frames.len() {
                if self.repeat {
                    self.current = 0;
                } else {
                    self.current = self.frames.len() - 1;
                    break;
                }
            } else {
                self.current = next;
            }
            if let Some(effect) = self.frames[self.current].effect {
                self.pending_effects.push(effect);
            }
            let duration = self.frame_duration_unchecked(self.current);
            self.timer.reset_carrying(duration, self.timer.excess());
        }
    }

    /// Drains the sounds queued by frames that became current since the last
    /// drain. Each frame entry queues its effect exactly once.
    pub fn take_effects(&mut self) -> Vec<SoundId> {
        std::mem::take(&mut self.pending_effects)
    }

    pub fn is_done(&self) -> bool {
        !self.repeat && self.current == self.frames.len() - 1 && self.timer.is_done()
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut SpriteSheet {
        &mut self.sheet
    }

    pub fn visual(&self) -> Visual<'_> {
        Visual {
            sheet: &self.sheet,
            frame: self.frames[self.current].sheet_index,
            scale: self.scale,
            alpha: self.alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_frame_sprite(repeat: bool) -> AnimatedSprite {
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        AnimatedSprite::new(sheet, 0, 1.0)
            .expect("sprite")
            .add_frame(1)
            .expect("frame 1")
            .add_frame(2)
            .expect("frame 2")
            .with_repeat(repeat)
    }

    #[test]
    fn constructor_rejects_frame_missing_from_sheet() {
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        let err = AnimatedSprite::new(sheet, 9, 1.0).expect_err("must fail");
        assert!(matches!(err, EngineError::InvalidReference { frame: 9, .. }));
    }

    #[test]
    fn constructor_rejects_non_positive_frame_duration() {
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        let err = AnimatedSprite::new(sheet, 0, 0.0).expect_err("must fail");
        assert!(matches!(err, EngineError::MissingParameter("frame duration")));
    }

    #[test]
    fn frame_duration_out_of_range_is_an_error() {
        let sprite = three_frame_sprite(false);
        let err = sprite.frame_duration(3).expect_err("must fail");
        assert!(matches!(err, EngineError::OutOfRange { index: 3, count: 3 }));
    }

    #[test]
    fn large_update_advances_multiple_frames_and_carries_excess() {
        // 3 frames of 1.0s each; 2.5s from frame 0 lands on frame 2 with
        // 0.5s already consumed of its duration.
        let mut sprite = three_frame_sprite(false);
        sprite.update(2.5);
        assert_eq!(sprite.current_index(), 2);
        sprite.update(0.5);
        assert!(sprite.is_done());
    }

    #[test]
    fn no_time_is_lost_across_uneven_updates() {
        let mut sprite = three_frame_sprite(false);
        for _ in 0..10 {
            sprite.update(0.3);
        }
        // 3.0s total against 3.0s of frames: done exactly now.
        assert_eq!(sprite.current_index(), 2);
        assert!(sprite.is_done());
    }

    #[test]
    fn non_repeating_clamps_on_last_frame() {
        let mut sprite = three_frame_sprite(false);
        sprite.update(10.0);
        assert_eq!(sprite.current_index(), 2);
        assert!(sprite.is_done());
    }

    #[test]
    fn repeating_wraps_and_is_never_done() {
        let mut sprite = three_frame_sprite(true);
        sprite.update(3.5);
        assert_eq!(sprite.current_index(), 0);
        assert!(!sprite.is_done());
    }

    #[test]
    fn effect_fires_once_when_frame_becomes_current() {
        let sound = SoundId("headshot.mp3");
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        let mut sprite = AnimatedSprite::new(sheet, 0, 1.0)
            .expect("sprite")
            .add_frame_with_effect(1, 1.0, sound)
            .expect("frame");
        sprite.update(1.0);
        assert_eq!(sprite.take_effects(), vec![sound]);
        // Frame 1 is already current; lingering there fires nothing more.
        sprite.update(5.0);
        assert!(sprite.take_effects().is_empty());
    }

    #[test]
    fn reset_does_not_fire_effects() {
        let sound = SoundId("headshot.mp3");
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        let mut sprite = AnimatedSprite::new(sheet, 0, 1.0)
            .expect("sprite")
            .add_frame_with_effect(1, 1.0, sound)
            .expect("frame");
        sprite.update(1.0);
        let _ = sprite.take_effects();
        sprite.reset();
        assert_eq!(sprite.current_index(), 0);
        assert!(sprite.take_effects().is_empty());
    }

    #[test]
    fn per_frame_duration_overrides_default() {
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        let mut sprite = AnimatedSprite::new(sheet, 0, 1.0)
            .expect("sprite")
            .add_frame_timed(1, 0.25)
            .expect("frame 1")
            .add_frame(2)
            .expect("frame 2");
        sprite.update(1.0);
        assert_eq!(sprite.current_index(), 1);
        sprite.update(0.25);
        assert_eq!(sprite.current_index(), 2);
    }
}
