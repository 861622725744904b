use engine::{
    AnimatedSprite, EngineError, GridPos, SoundId, Sprite, SpriteSheet, Stage, Surface, Vec2,
};

use crate::coords::{cell_to_world, BODY_SCALE, CELL_WORLD};
use crate::sounds;

/// The exit door and the occupant behind it. Opening is one-way; once open,
/// the occupant's scene plays out exactly once.
pub struct Goal {
    cell: GridPos,
    open: bool,
    door: Sprite,
    glow: Sprite,
    capo: AnimatedSprite,
}

impl Goal {
    pub fn new(cell: GridPos) -> Result<Self, EngineError> {
        let door_sheet = SpriteSheet::from_grid("goal.png", 16, 16, 32, 16)?;
        let door = Sprite::new(door_sheet, 0)?;

        let glow_sheet = SpriteSheet::from_grid("goallight.png", 16, 16, 16, 16)?;
        let mut glow = Sprite::new(glow_sheet, 0)?;
        glow.alpha = 0.6;

        let capo_sheet = SpriteSheet::from_grid("capo.png", 32, 32, 512, 32)?;
        let mut capo = AnimatedSprite::new(capo_sheet, 0, 1.5)?
            .add_frame_timed(1, 1.0)?
            .add_frame_timed(2, 0.3)?
            .add_frame_timed(1, 1.0)?
            .add_frame_timed(2, 0.3)?
            .add_frame_timed(3, 0.5)?
            .add_frame_timed(4, 1.0)?
            .add_frame_timed(5, 0.3)?
            .add_frame_timed(4, 1.0)?
            .add_frame_timed(6, 0.5)?
            .add_frame_timed(7, 0.5)?
            .add_frame_timed(8, 1.0)?
            .add_frame_timed(9, 0.3)?
            .add_frame_timed(8, 0.5)?
            .add_frame_timed(10, 0.5)?
            .add_frame_with_effect(11, 0.3, sounds::HEADSHOT)?
            .add_frame_timed(12, 0.3)?
            .add_frame_timed(13, 0.8)?
            .add_frame_timed(14, 0.15)?
            .add_frame_timed(15, 0.3)?;
        capo.scale = BODY_SCALE;

        Ok(Self {
            cell,
            open: false,
            door,
            glow,
            capo,
        })
    }

    pub fn cell(&self) -> GridPos {
        self.cell
    }

    /// The cell a player must reach to open the door: directly below it.
    pub fn entry_cell(&self) -> GridPos {
        self.cell + GridPos::new(0, 1)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) -> Result<(), EngineError> {
        if self.open {
            return Ok(());
        }
        self.open = true;
        self.door.set_frame(1)?;
        self.capo.reset();
        Ok(())
    }

    pub fn update(&mut self, dt: f32, out_sounds: &mut Vec<SoundId>) {
        if !self.open {
            return;
        }
        self.capo.update(dt);
        out_sounds.extend(self.capo.take_effects());
    }

    pub fn draw(&self, stage: &mut dyn Stage) -> Result<(), EngineError> {
        let pos = cell_to_world(self.cell);
        stage.stamp(&self.door.visual(), pos, 0.0)?;
        if self.open {
            stage.stamp(&self.capo.visual(), pos - Vec2::new(0.0, CELL_WORLD), 0.0)?;
            stage.activate_surface(Surface::Lights);
            stage.stamp(&self.glow.visual(), pos, 0.0)?;
            stage.activate_surface(Surface::Default);
        }
        Ok(())
    }
}
