use crate::math::Vec2;
use crate::sprite::Visual;
use crate::EngineError;

/// Render target layer. The lights surface is composited additively by a
/// real backend so overlapping glows brighten instead of occluding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Surface {
    #[default]
    Default,
    Lights,
}

/// Identifier of a sound asset. Playback is entirely the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundId(pub &'static str);

/// Draw sink. The simulation describes what to draw each frame by stamping
/// visuals at world positions; a backend renders them, a test records them.
pub trait Stage {
    fn stamp(&mut self, visual: &Visual<'_>, position: Vec2, angle: f32)
        -> Result<(), EngineError>;

    /// Selects the surface that subsequent stamps land on.
    fn activate_surface(&mut self, surface: Surface);
}

/// Sound sink, same shape as [`Stage`] for drawing.
pub trait Audio {
    fn play(&mut self, sound: SoundId);
}

/// Stage that validates stamps and discards them. Used by headless runs.
#[derive(Debug, Default)]
pub struct NullStage;

impl Stage for NullStage {
    fn stamp(
        &mut self,
        visual: &Visual<'_>,
        _position: Vec2,
        _angle: f32,
    ) -> Result<(), EngineError> {
        if !visual.sheet.is_loaded() {
            tracing::debug!(sheet = visual.sheet.name(), "skipping stamp of unloaded sheet");
            return Ok(());
        }
        visual.sheet.frame(visual.frame)?;
        Ok(())
    }

    fn activate_surface(&mut self, _surface: Surface) {}
}

#[derive(Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play(&mut self, _sound: SoundId) {}
}

/// One recorded stamp, for asserting on draw output in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct StampRecord {
    pub sheet: String,
    pub frame: usize,
    pub position: Vec2,
    pub surface: Surface,
    pub alpha: f32,
}

/// Stage that keeps every stamp it receives.
#[derive(Debug, Default)]
pub struct RecordingStage {
    pub stamps: Vec<StampRecord>,
    surface: Surface,
}

impl RecordingStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamps_of(&self, sheet: &str) -> Vec<&StampRecord> {
        self.stamps
            .iter()
            .filter(|stamp| stamp.sheet == sheet)
            .collect()
    }
}

impl Stage for RecordingStage {
    fn stamp(
        &mut self,
        visual: &Visual<'_>,
        position: Vec2,
        _angle: f32,
    ) -> Result<(), EngineError> {
        visual.sheet.frame(visual.frame)?;
        self.stamps.push(StampRecord {
            sheet: visual.sheet.name().to_string(),
            frame: visual.frame,
            position,
            surface: self.surface,
            alpha: visual.alpha,
        });
        Ok(())
    }

    fn activate_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundId>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: SoundId) {
        self.played.push(sound);
    }
}
