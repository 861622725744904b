use engine::{lerp, AnimatedSprite, EngineError, GridPos, SpriteSheet, Stage, Timer, Vec2};

use crate::coords::cell_to_world;

const BILLOW_FRAME_SECONDS: f32 = 0.7;
const EXPAND_SECONDS: f32 = 4.0;
const FADE_SECONDS: f32 = 0.5;
const MAX_AGE_TURNS: u32 = 10;
const BASE_ALPHA: f32 = 0.2;
const LOW_ALPHA: f32 = 0.04;
const START_SCALE: Vec2 = Vec2::new(1.0, 1.0);
const FULL_SCALE: Vec2 = Vec2::new(8.0, 8.0);
const START_OFFSET: Vec2 = Vec2::new(-24.0, -48.0);

/// Whether a steam cloud still wants updates. A completed cloud is dropped
/// by its owner; there is no callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteamStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
enum SteamState {
    Anchored,
    Expanding { timer: Timer },
    Drifting,
    Fading { timer: Timer, from_alpha: f32 },
}

/// A vent cloud pinned to one cell. It stays small at its spawn point until
/// the first turn passes, then billows up to full size over a few seconds,
/// thins out one shade per turn, and finally fades away.
pub struct Steam {
    cell: GridPos,
    offset: Vec2,
    age_turns: u32,
    state: SteamState,
    sprite: AnimatedSprite,
}

impl Steam {
    pub fn new(cell: GridPos) -> Result<Self, EngineError> {
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8)?;
        let mut sprite = AnimatedSprite::new(sheet, 0, BILLOW_FRAME_SECONDS)?
            .add_frame(1)?
            .add_frame(2)?
            .with_repeat(true);
        sprite.scale = START_SCALE;
        sprite.alpha = BASE_ALPHA;
        Ok(Self {
            cell,
            offset: START_OFFSET,
            age_turns: 0,
            state: SteamState::Anchored,
            sprite,
        })
    }

    pub fn cell(&self) -> GridPos {
        self.cell
    }

    pub fn age_turns(&self) -> u32 {
        self.age_turns
    }

    pub fn world_pos(&self) -> Vec2 {
        cell_to_world(self.cell) + self.offset
    }

    pub fn alpha(&self) -> f32 {
        self.sprite.alpha
    }

    /// Ages the cloud by one turn. The first turn unpins it and starts the
    /// expansion; past its last turn it begins fading from whatever alpha it
    /// has thinned to.
    pub fn turn(&mut self) {
        if matches!(self.state, SteamState::Fading { .. }) {
            return;
        }
        self.age_turns += 1;
        if matches!(self.state, SteamState::Anchored) {
            self.state = SteamState::Expanding {
                timer: Timer::new(EXPAND_SECONDS),
            };
        }
        if self.age_turns > MAX_AGE_TURNS {
            self.state = SteamState::Fading {
                timer: Timer::new(FADE_SECONDS),
                from_alpha: self.sprite.alpha,
            };
        }
    }

    pub fn update(&mut self, dt: f32) -> SteamStatus {
        self.sprite.update(dt);
        match &mut self.state {
            SteamState::Anchored => {
                self.sprite.alpha = age_alpha(self.age_turns);
                SteamStatus::Active
            }
            SteamState::Expanding { timer } => {
                timer.update(dt);
                let t = timer.percent_done().clamp(0.0, 1.0);
                self.sprite.scale = START_SCALE.lerp(t, FULL_SCALE);
                self.offset = START_OFFSET.lerp(t, Vec2::ZERO);
                self.sprite.alpha = age_alpha(self.age_turns);
                if timer.is_done() {
                    self.state = SteamState::Drifting;
                }
                SteamStatus::Active
            }
            SteamState::Drifting => {
                self.sprite.alpha = age_alpha(self.age_turns);
                SteamStatus::Active
            }
            SteamState::Fading { timer, from_alpha } => {
                timer.update(dt);
                let t = timer.percent_done().clamp(0.0, 1.0);
                self.sprite.alpha = lerp(t, *from_alpha, 0.0);
                if timer.is_done() {
                    SteamStatus::Completed
                } else {
                    SteamStatus::Active
                }
            }
        }
    }

    pub fn draw(&self, stage: &mut dyn Stage) -> Result<(), EngineError> {
        stage.stamp(&self.sprite.visual(), self.world_pos(), 0.0)
    }
}

fn age_alpha(age_turns: u32) -> f32 {
    let t = (age_turns as f32 / MAX_AGE_TURNS as f32).clamp(0.0, 1.0);
    lerp(t, BASE_ALPHA, LOW_ALPHA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_cloud_stays_anchored_until_the_first_turn() {
        let mut steam = Steam::new(GridPos::new(3, 3)).expect("steam");
        let spawn_pos = steam.world_pos();

        // Plenty of wall-clock time, but no turn has passed.
        assert_eq!(steam.update(EXPAND_SECONDS), SteamStatus::Active);

        assert_eq!(steam.world_pos(), spawn_pos);
        assert_eq!(steam.sprite.scale, START_SCALE);
    }

    #[test]
    fn expansion_reaches_full_size_and_settles_on_the_cell() {
        let mut steam = Steam::new(GridPos::new(3, 3)).expect("steam");
        assert!((steam.world_pos() - cell_to_world(GridPos::new(3, 3))).length() > 1.0);

        steam.turn();
        assert_eq!(steam.update(EXPAND_SECONDS), SteamStatus::Active);

        assert_eq!(steam.world_pos(), cell_to_world(GridPos::new(3, 3)));
        assert_eq!(steam.sprite.scale, FULL_SCALE);
    }

    #[test]
    fn half_expanded_cloud_is_half_scaled() {
        let mut steam = Steam::new(GridPos::new(0, 0)).expect("steam");
        steam.turn();
        steam.update(EXPAND_SECONDS / 2.0);
        let expected = START_SCALE.lerp(0.5, FULL_SCALE);
        assert!((steam.sprite.scale.x - expected.x).abs() < 0.0001);
        assert!((steam.sprite.scale.y - expected.y).abs() < 0.0001);
    }

    #[test]
    fn clouds_thin_as_turns_pass() {
        let mut steam = Steam::new(GridPos::new(0, 0)).expect("steam");
        steam.update(0.0);
        let fresh = steam.alpha();
        steam.turn();
        steam.update(0.0);
        assert!(steam.alpha() < fresh);
    }

    #[test]
    fn a_cloud_survives_exactly_its_maximum_age() {
        let mut steam = Steam::new(GridPos::new(0, 0)).expect("steam");
        for _ in 0..MAX_AGE_TURNS {
            steam.turn();
        }
        // At the maximum age the cloud is still drifting, not fading.
        assert_eq!(steam.update(FADE_SECONDS), SteamStatus::Active);
        assert!(steam.alpha() > 0.0);
    }

    #[test]
    fn cloud_completes_after_its_age_exceeds_the_maximum() {
        let mut steam = Steam::new(GridPos::new(0, 0)).expect("steam");
        for _ in 0..MAX_AGE_TURNS + 1 {
            steam.turn();
        }
        assert_eq!(steam.update(FADE_SECONDS / 2.0), SteamStatus::Active);
        assert!(steam.alpha() > 0.0);
        assert_eq!(steam.update(FADE_SECONDS / 2.0), SteamStatus::Completed);
        assert!(steam.alpha() < 0.0001);
    }

    #[test]
    fn extra_turns_while_fading_change_nothing() {
        let mut steam = Steam::new(GridPos::new(0, 0)).expect("steam");
        for _ in 0..MAX_AGE_TURNS + 3 {
            steam.turn();
        }
        assert_eq!(steam.age_turns(), MAX_AGE_TURNS + 1);
        assert_eq!(steam.update(FADE_SECONDS), SteamStatus::Completed);
    }
}
