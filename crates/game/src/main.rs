use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use engine::{InputAction, InputSnapshot, NullAudio, NullStage};

mod coords;
mod data;
mod floodlight;
mod goal;
mod level;
mod player;
mod sounds;
mod steam;
mod walls;

use data::{LevelData, DEMO_LEVEL_JSON};
use level::Level;

const FRAME_DT_SECONDS: f32 = 1.0 / 60.0;
const FRAMES_PER_MOVE: u32 = 20;
const MAX_TRAILING_FRAMES: u32 = 600;

fn main() {
    init_tracing();
    info!("=== Curfew Startup ===");

    let data = match LevelData::from_json_str("block-one", DEMO_LEVEL_JSON) {
        Ok(data) => data,
        Err(err) => {
            error!(error = %err, "level_parse_failed");
            std::process::exit(1);
        }
    };
    let mut level = match Level::new(data) {
        Ok(level) => level,
        Err(err) => {
            error!(error = %err, "level_build_failed");
            std::process::exit(1);
        }
    };

    for (cell, text) in level.help_texts() {
        info!(cell = ?cell, text = %text, "help");
    }

    if let Err(err) = run_demo(&mut level) {
        error!(error = %err, "demo_failed");
        std::process::exit(1);
    }
}

/// Replays a fixed route through the bundled level at a 60 Hz tick: three
/// cells east along the bottom row, then straight north to the door.
fn run_demo(level: &mut Level) -> Result<(), engine::EngineError> {
    let route = [
        InputAction::MoveRight,
        InputAction::MoveRight,
        InputAction::MoveRight,
        InputAction::MoveUp,
        InputAction::MoveUp,
        InputAction::MoveUp,
        InputAction::MoveUp,
        InputAction::MoveUp,
    ];

    let mut stage = NullStage;
    let mut audio = NullAudio;

    for action in route {
        let pressed = InputSnapshot::empty().with_action_down(action, true);
        level.update(FRAME_DT_SECONDS, pressed, &mut audio)?;
        level.draw(&mut stage);
        for _ in 1..FRAMES_PER_MOVE {
            level.update(FRAME_DT_SECONDS, InputSnapshot::empty(), &mut audio)?;
            level.draw(&mut stage);
        }
        if level.is_failed() {
            info!(turns = level.turn_count(), "demo_caught");
            return Ok(());
        }
    }

    let mut trailing = 0;
    while !level.is_complete() && trailing < MAX_TRAILING_FRAMES {
        level.update(FRAME_DT_SECONDS, InputSnapshot::empty(), &mut audio)?;
        level.draw(&mut stage);
        trailing += 1;
    }

    info!(
        level = level.name(),
        turns = level.turn_count(),
        complete = level.is_complete(),
        "demo_finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_demo_route_reaches_the_door() {
        let data = LevelData::from_json_str("block-one", DEMO_LEVEL_JSON).expect("parse");
        let mut level = Level::new(data).expect("level");
        run_demo(&mut level).expect("demo");
        assert!(level.is_complete());
    }

    #[test]
    fn the_demo_route_never_crosses_a_light() {
        let data = LevelData::from_json_str("block-one", DEMO_LEVEL_JSON).expect("parse");
        let mut level = Level::new(data).expect("level");
        let mut audio = NullAudio;
        let route = [
            InputAction::MoveRight,
            InputAction::MoveRight,
            InputAction::MoveRight,
            InputAction::MoveUp,
            InputAction::MoveUp,
            InputAction::MoveUp,
            InputAction::MoveUp,
            InputAction::MoveUp,
        ];
        for action in route {
            let pressed = InputSnapshot::empty().with_action_down(action, true);
            level.update(FRAME_DT_SECONDS, pressed, &mut audio).expect("update");
            for _ in 1..FRAMES_PER_MOVE {
                level
                    .update(FRAME_DT_SECONDS, InputSnapshot::empty(), &mut audio)
                    .expect("update");
            }
            assert!(!level.is_failed());
        }
    }
}
