use std::collections::HashSet;

use engine::{
    AnimatedSprite, EngineError, GridPos, InputAction, InputSnapshot, Sprite, SpriteSheet, Stage,
    SoundId, Surface, Timer, Vec2,
};

use crate::coords::{cell_to_world, BODY_SCALE, TURN_DURATION_SECONDS};
use crate::floodlight::Floodlights;
use crate::sounds;
use crate::walls::WallGrid;

const WALK_FRAME_SECONDS: f32 = 0.15;
const FADE_FRAME_SECONDS: f32 = 0.25;
const DEATH_FRAME_SECONDS: f32 = 0.25;

#[derive(Debug, Clone, PartialEq)]
enum PlayerState {
    Ready,
    Moving { from: GridPos, timer: Timer },
    HazardDeath,
    Disappearing,
}

/// Which state the player is in, without the per-state payload. Cheap to
/// copy out for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Ready,
    Moving,
    HazardDeath,
    Disappearing,
}

/// Things the player announces during an update, drained by the level in
/// order of occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A new turn begins. Emitted when a move starts, not when it lands.
    TurnStarted,
    Sound(SoundId),
}

/// Read-only view of the level the player consults while moving. Borrows
/// stay disjoint from the player itself.
pub struct MoveContext<'a> {
    pub walls: &'a WallGrid,
    pub hazards: &'a HashSet<GridPos>,
    pub lights: &'a Floodlights,
    pub goal_cell: GridPos,
}

impl MoveContext<'_> {
    fn is_passable(&self, cell: GridPos) -> bool {
        self.walls.is_passable(cell) && cell != self.goal_cell
    }
}

pub struct Player {
    grid_pos: GridPos,
    state: PlayerState,
    body: AnimatedSprite,
    fade: AnimatedSprite,
    death: AnimatedSprite,
    glow: Sprite,
}

impl Player {
    pub fn new(start: GridPos) -> Result<Self, EngineError> {
        let body_sheet = SpriteSheet::from_grid("runner.png", 16, 16, 64, 16)?;
        let mut body = AnimatedSprite::new(body_sheet, 0, WALK_FRAME_SECONDS)?
            .add_frame(1)?
            .with_repeat(true);
        body.scale = BODY_SCALE;

        let fade_sheet = SpriteSheet::from_grid("runnerfade.png", 16, 16, 64, 16)?;
        let mut fade = AnimatedSprite::new(fade_sheet, 0, FADE_FRAME_SECONDS)?
            .add_frame(1)?
            .add_frame(2)?
            .add_frame(3)?;
        fade.scale = BODY_SCALE;

        let death_sheet = SpriteSheet::from_grid("runnerdeath.png", 16, 16, 64, 16)?;
        let mut death = AnimatedSprite::new(death_sheet, 0, DEATH_FRAME_SECONDS)?
            .add_frame(1)?
            .add_frame(2)?
            .add_frame(3)?;
        death.scale = BODY_SCALE;

        let glow_sheet = SpriteSheet::from_grid("runnerglow.png", 16, 16, 16, 16)?;
        let mut glow = Sprite::new(glow_sheet, 0)?;
        glow.scale = BODY_SCALE;

        Ok(Self {
            grid_pos: start,
            state: PlayerState::Ready,
            body,
            fade,
            death,
            glow,
        })
    }

    pub fn grid_pos(&self) -> GridPos {
        self.grid_pos
    }

    pub fn phase(&self) -> PlayerPhase {
        match self.state {
            PlayerState::Ready => PlayerPhase::Ready,
            PlayerState::Moving { .. } => PlayerPhase::Moving,
            PlayerState::HazardDeath => PlayerPhase::HazardDeath,
            PlayerState::Disappearing => PlayerPhase::Disappearing,
        }
    }

    /// Continuous position: the committed cell, except mid-move where it is
    /// interpolated from the departed cell.
    pub fn world_pos(&self) -> Vec2 {
        match &self.state {
            PlayerState::Moving { from, timer } => {
                let t = timer.percent_done().clamp(0.0, 1.0);
                cell_to_world(*from).lerp(t, cell_to_world(self.grid_pos))
            }
            _ => cell_to_world(self.grid_pos),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        input: InputSnapshot,
        ctx: &MoveContext<'_>,
        events: &mut Vec<PlayerEvent>,
    ) {
        match &mut self.state {
            PlayerState::Ready => {
                if ctx.hazards.contains(&self.grid_pos) {
                    self.die(events);
                    return;
                }
                if let Some(step) = requested_step(input) {
                    let dest = self.grid_pos + step;
                    if dest == self.grid_pos {
                        self.begin_move(dest, events);
                    } else if ctx.is_passable(dest) {
                        self.begin_move(dest, events);
                    }
                }
            }
            PlayerState::Moving { timer, .. } => {
                timer.update(dt);
                self.body.update(dt);
                if timer.is_done() {
                    self.state = PlayerState::Ready;
                    self.body.reset();
                }
            }
            PlayerState::HazardDeath => {
                self.death.update(dt);
            }
            PlayerState::Disappearing => {
                self.fade.update(dt);
            }
        }

        if matches!(self.state, PlayerState::Ready | PlayerState::Moving { .. })
            && ctx.lights.any_light_on(self.world_pos())
        {
            self.die(events);
        }
    }

    fn die(&mut self, events: &mut Vec<PlayerEvent>) {
        self.state = PlayerState::HazardDeath;
        self.death.reset();
        events.push(PlayerEvent::Sound(sounds::SILENCED));
    }

    /// The destination cell is committed before the animation plays, so turn
    /// order is decided the moment the move starts.
    fn begin_move(&mut self, dest: GridPos, events: &mut Vec<PlayerEvent>) {
        let from = self.grid_pos;
        self.grid_pos = dest;
        self.state = PlayerState::Moving {
            from,
            timer: Timer::new(TURN_DURATION_SECONDS),
        };
        events.push(PlayerEvent::TurnStarted);
        if from != dest {
            events.push(PlayerEvent::Sound(sounds::FOOTSTEP));
        }
    }

    /// Begins the exit fade. Only a live player can disappear; deaths keep
    /// their state.
    pub fn start_disappearing(&mut self) {
        if matches!(self.state, PlayerState::Ready | PlayerState::Moving { .. }) {
            self.state = PlayerState::Disappearing;
            self.fade.reset();
        }
    }

    pub fn is_disappeared(&self) -> bool {
        matches!(self.state, PlayerState::Disappearing) && self.fade.is_done()
    }

    pub fn draw(&self, stage: &mut dyn Stage) -> Result<(), EngineError> {
        let pos = self.world_pos();
        match self.state {
            PlayerState::Disappearing => {
                if self.fade.is_done() {
                    return Ok(());
                }
                stage.stamp(&self.fade.visual(), pos, 0.0)?;
                // The body's own glow dies out halfway through the fade.
                if self.fade.current_index() < 2 {
                    stage.activate_surface(Surface::Lights);
                    stage.stamp(&self.glow.visual(), pos, 0.0)?;
                    stage.activate_surface(Surface::Default);
                }
                Ok(())
            }
            PlayerState::HazardDeath => stage.stamp(&self.death.visual(), pos, 0.0),
            _ => stage.stamp(&self.body.visual(), pos, 0.0),
        }
    }
}

fn requested_step(input: InputSnapshot) -> Option<GridPos> {
    if input.is_down(InputAction::MoveUp) {
        Some(GridPos::new(0, -1))
    } else if input.is_down(InputAction::MoveDown) {
        Some(GridPos::new(0, 1))
    } else if input.is_down(InputAction::MoveLeft) {
        Some(GridPos::new(-1, 0))
    } else if input.is_down(InputAction::MoveRight) {
        Some(GridPos::new(1, 0))
    } else if input.is_down(InputAction::Wait) {
        Some(GridPos::new(0, 0))
    } else {
        None
    }
}
