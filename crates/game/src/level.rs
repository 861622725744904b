use std::collections::HashSet;

use tracing::{info, warn};

use engine::{
    Audio, EngineError, GridPos, InputAction, InputSnapshot, Stage, Timer,
};

use crate::coords::TURN_DURATION_SECONDS;
use crate::data::{LevelData, LevelDataError};
use crate::floodlight::Floodlights;
use crate::goal::Goal;
use crate::player::{MoveContext, Player, PlayerEvent, PlayerPhase};
use crate::steam::{Steam, SteamStatus};
use crate::walls::WallGrid;

#[derive(Debug, Clone, PartialEq)]
enum TurnPhase {
    Idle,
    InTurn { timer: Timer },
}

/// One loaded level: the grid, every actor on it, and the turn clock that
/// keeps them in step. Turns begin the moment the player commits a move and
/// everything else reacts on the same frame.
pub struct Level {
    data: LevelData,
    walls: WallGrid,
    hazards: HashSet<GridPos>,
    player: Player,
    floodlights: Floodlights,
    steams: Vec<Steam>,
    goal: Goal,
    help_texts: Vec<(GridPos, String)>,
    turn_phase: TurnPhase,
    turn_count: u32,
    reset_was_down: bool,
}

impl Level {
    pub fn new(data: LevelData) -> Result<Self, LevelDataError> {
        let start = data.player_start()?;
        let goal_cell = data.goal_cell()?;
        let walls = WallGrid::from_tiles(data.width, data.height, &data.wall_tiles);
        let hazards: HashSet<GridPos> = data.truck_cells().collect();
        let floodlights = Floodlights::from_paths(data.light_paths()?)?;
        let help_texts = data
            .help_texts()
            .map(|(cell, text)| (cell, text.to_string()))
            .collect();
        let player = Player::new(start)?;
        let goal = Goal::new(goal_cell)?;

        info!(
            level = %data.name,
            width = data.width,
            height = data.height,
            lights = floodlights.len(),
            hazards = hazards.len(),
            "level loaded"
        );

        Ok(Self {
            data,
            walls,
            hazards,
            player,
            floodlights,
            steams: Vec::new(),
            goal,
            help_texts,
            turn_phase: TurnPhase::Idle,
            turn_count: 0,
            reset_was_down: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn steam_count(&self) -> usize {
        self.steams.len()
    }

    pub fn help_texts(&self) -> &[(GridPos, String)] {
        &self.help_texts
    }

    /// The run is over and won once the door is open and the player has
    /// fully faded through it.
    pub fn is_complete(&self) -> bool {
        self.goal.is_open() && self.player.is_disappeared()
    }

    pub fn is_failed(&self) -> bool {
        self.player.phase() == PlayerPhase::HazardDeath
    }

    pub fn remove_hazard(&mut self, cell: GridPos) -> bool {
        self.hazards.remove(&cell)
    }

    /// Rebuilds the level from its authored data, discarding every actor.
    pub fn reset(&mut self) {
        match Level::new(self.data.clone()) {
            Ok(fresh) => {
                *self = fresh;
                // Keep the key latched so a held reset fires once.
                self.reset_was_down = true;
                info!(level = %self.data.name, "level reset");
            }
            Err(err) => warn!(level = %self.data.name, error = %err, "level reset failed"),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        input: InputSnapshot,
        audio: &mut dyn Audio,
    ) -> Result<(), EngineError> {
        let reset_down = input.is_down(InputAction::Reset);
        if reset_down && !self.reset_was_down {
            self.reset();
            return Ok(());
        }
        self.reset_was_down = reset_down;

        if let TurnPhase::InTurn { timer } = &mut self.turn_phase {
            timer.update(dt);
            if timer.is_done() {
                self.turn_phase = TurnPhase::Idle;
            }
        }

        let was_failed = self.is_failed();
        let mut events = Vec::new();
        let ctx = MoveContext {
            walls: &self.walls,
            hazards: &self.hazards,
            lights: &self.floodlights,
            goal_cell: self.goal.cell(),
        };
        self.player.update(dt, input, &ctx, &mut events);

        for event in events {
            match event {
                PlayerEvent::TurnStarted => self.broadcast_turn()?,
                PlayerEvent::Sound(sound) => audio.play(sound),
            }
        }
        if !was_failed && self.is_failed() {
            info!(
                level = %self.data.name,
                turn = self.turn_count,
                cell = ?self.player.grid_pos(),
                "player caught"
            );
        }

        self.steams
            .retain_mut(|steam| steam.update(dt) == SteamStatus::Active);
        self.floodlights.update(dt);

        let mut scene_sounds = Vec::new();
        self.goal.update(dt, &mut scene_sounds);
        for sound in scene_sounds {
            audio.play(sound);
        }

        if !self.goal.is_open()
            && self.player.grid_pos() == self.goal.entry_cell()
            && matches!(
                self.player.phase(),
                PlayerPhase::Ready | PlayerPhase::Moving
            )
        {
            self.player.start_disappearing();
            self.goal.open()?;
            info!(level = %self.data.name, turns = self.turn_count, "level complete");
        }

        Ok(())
    }

    /// Advances the whole level by one turn. Gated on the turn clock so one
    /// player move produces exactly one turn.
    fn broadcast_turn(&mut self) -> Result<(), EngineError> {
        if matches!(self.turn_phase, TurnPhase::InTurn { .. }) {
            return Ok(());
        }
        self.turn_phase = TurnPhase::InTurn {
            timer: Timer::new(TURN_DURATION_SECONDS),
        };
        self.turn_count += 1;
        for steam in &mut self.steams {
            steam.turn();
        }
        self.floodlights.turn();
        // The body vents a fresh cloud at the cell it just committed to.
        self.steams.push(Steam::new(self.player.grid_pos())?);
        Ok(())
    }

    /// Stamps every actor. Presentation failures are logged and swallowed;
    /// they never feed back into simulation state.
    pub fn draw(&self, stage: &mut dyn Stage) {
        if let Err(err) = self.try_draw(stage) {
            warn!(level = %self.data.name, error = %err, "draw failed");
        }
    }

    fn try_draw(&self, stage: &mut dyn Stage) -> Result<(), EngineError> {
        self.goal.draw(stage)?;
        self.player.draw(stage)?;
        for steam in &self.steams {
            steam.draw(stage)?;
        }
        self.floodlights.draw(stage)?;
        Ok(())
    }
}
