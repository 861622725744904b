use std::collections::BTreeMap;

use engine::{EngineError, GridPos, Sprite, SpriteSheet, Stage, Surface, Timer, Vec2};

use crate::coords::{cell_to_world, LIGHT_RADIUS, TURN_DURATION_SECONDS};

#[derive(Debug, Clone, PartialEq)]
enum LightState {
    Resting,
    Sweeping { from: GridPos, timer: Timer },
}

/// One overhead search light sweeping a closed waypoint loop, one grid step
/// per turn. Lights ignore walls; they hang above the map.
#[derive(Debug, Clone)]
pub struct PatrolLight {
    grid_pos: GridPos,
    waypoints: Vec<GridPos>,
    target_index: usize,
    state: LightState,
    sprite: Sprite,
}

impl PatrolLight {
    pub fn new(waypoints: Vec<GridPos>) -> Result<Self, EngineError> {
        if waypoints.is_empty() {
            return Err(EngineError::MissingParameter("light waypoints"));
        }
        let sheet = SpriteSheet::from_grid("floodlight.png", 16, 16, 16, 16)?;
        let mut sprite = Sprite::new(sheet, 0)?;
        sprite.alpha = 0.5;
        sprite.scale = Vec2::new(3.0, 3.0);
        let grid_pos = waypoints[0];
        let target_index = if waypoints.len() > 1 { 1 } else { 0 };
        Ok(Self {
            grid_pos,
            waypoints,
            target_index,
            state: LightState::Resting,
            sprite,
        })
    }

    pub fn grid_pos(&self) -> GridPos {
        self.grid_pos
    }

    /// Continuous position, interpolated while mid-sweep.
    pub fn world_pos(&self) -> Vec2 {
        match &self.state {
            LightState::Resting => cell_to_world(self.grid_pos),
            LightState::Sweeping { from, timer } => {
                let t = timer.percent_done().clamp(0.0, 1.0);
                cell_to_world(*from).lerp(t, cell_to_world(self.grid_pos))
            }
        }
    }

    /// Takes one grid step toward the current waypoint. Only a resting light
    /// reacts; a light still sweeping from the previous turn skips this one.
    pub fn turn(&mut self) {
        if self.state != LightState::Resting {
            return;
        }
        if self.grid_pos == self.waypoints[self.target_index] {
            self.target_index = (self.target_index + 1) % self.waypoints.len();
        }
        let step = self.grid_pos.step_toward(self.waypoints[self.target_index]);
        if step == GridPos::new(0, 0) {
            return;
        }
        let from = self.grid_pos;
        self.grid_pos = self.grid_pos + step;
        self.state = LightState::Sweeping {
            from,
            timer: Timer::new(TURN_DURATION_SECONDS),
        };
    }

    pub fn update(&mut self, dt: f32) {
        if let LightState::Sweeping { timer, .. } = &mut self.state {
            timer.update(dt);
            if timer.is_done() {
                self.state = LightState::Resting;
            }
        }
    }

    pub fn is_in_light(&self, pos: Vec2) -> bool {
        (pos - self.world_pos()).length() < LIGHT_RADIUS
    }

    pub fn draw(&self, stage: &mut dyn Stage) -> Result<(), EngineError> {
        stage.stamp(&self.sprite.visual(), self.world_pos(), 0.0)
    }
}

/// All patrol lights of a level, built from authored waypoint paths.
#[derive(Debug, Clone, Default)]
pub struct Floodlights {
    lights: Vec<PatrolLight>,
}

impl Floodlights {
    pub fn from_paths(paths: BTreeMap<u32, Vec<GridPos>>) -> Result<Self, EngineError> {
        let mut lights = Vec::with_capacity(paths.len());
        for path in paths.into_values() {
            lights.push(PatrolLight::new(path)?);
        }
        Ok(Self { lights })
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn turn(&mut self) {
        for light in &mut self.lights {
            light.turn();
        }
    }

    pub fn update(&mut self, dt: f32) {
        for light in &mut self.lights {
            light.update(dt);
        }
    }

    pub fn any_light_on(&self, pos: Vec2) -> bool {
        self.lights.iter().any(|light| light.is_in_light(pos))
    }

    pub fn draw(&self, stage: &mut dyn Stage) -> Result<(), EngineError> {
        stage.activate_surface(Surface::Lights);
        for light in &self.lights {
            light.draw(stage)?;
        }
        stage.activate_surface(Surface::Default);
        Ok(())
    }
}
