//! Simulation engine: timers, 2D math, sprite sheets, animation, input
//! snapshots, and the stage/audio sinks that decouple the simulation from any
//! particular rendering or playback backend.

use thiserror::Error;

pub mod animation;
pub mod input;
pub mod math;
pub mod sprite;
pub mod stage;
pub mod timer;

pub use animation::{AnimatedSprite, AnimationFrame};
pub use input::{InputAction, InputSnapshot, ACTION_COUNT};
pub use math::{lerp, remap, GridPos, Vec2};
pub use sprite::{FrameRegion, Sprite, SpriteSheet, Visual};
pub use stage::{
    Audio, NullAudio, NullStage, RecordingAudio, RecordingStage, SoundId, Stage, StampRecord,
    Surface,
};
pub use timer::Timer;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing or invalid parameter: {0}")]
    MissingParameter(&'static str),
    #[error("index {index} out of range for {count} entries")]
    OutOfRange { index: usize, count: usize },
    #[error("sheet {sheet} has no frame {frame}")]
    InvalidReference { sheet: String, frame: usize },
}
