use engine::{GridPos, Vec2};

/// Side of one grid cell in source-image pixels.
pub const CELL_SIZE: f32 = 16.0;

/// Uniform source-pixel to world-pixel magnification.
pub const WORLD_SCALE: f32 = 4.0;

/// Side of one grid cell in world pixels.
pub const CELL_WORLD: f32 = CELL_SIZE * WORLD_SCALE;

/// Wall-clock length of one grid move.
pub const TURN_DURATION_SECONDS: f32 = 0.3;

/// World-pixel distance under which a patrol light catches the body.
pub const LIGHT_RADIUS: f32 = 80.0;

/// Character sprites render at double the tile magnification.
pub const BODY_SCALE: Vec2 = Vec2::new(2.0, 2.0);

/// World-pixel position of the center of `cell`.
pub fn cell_to_world(cell: GridPos) -> Vec2 {
    Vec2::new(
        cell.x as f32 * CELL_WORLD + CELL_WORLD / 2.0,
        cell.y as f32 * CELL_WORLD + CELL_WORLD / 2.0,
    )
}
