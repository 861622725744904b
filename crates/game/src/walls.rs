use engine::GridPos;

use crate::data::TileRecord;

/// Row-major occupancy grid. Anything outside the bounds counts as blocked,
/// so the map edge never needs an explicit wall ring to be safe.
#[derive(Debug, Clone)]
pub struct WallGrid {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
}

impl WallGrid {
    pub fn from_tiles(width: u32, height: u32, wall_tiles: &[TileRecord]) -> Self {
        let mut blocked = vec![false; (width * height) as usize];
        for tile in wall_tiles {
            if tile.cell.x < 0 || tile.cell.y < 0 {
                continue;
            }
            let (x, y) = (tile.cell.x as u32, tile.cell.y as u32);
            if x < width && y < height {
                blocked[(y * width + x) as usize] = true;
            }
        }
        Self {
            width,
            height,
            blocked,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_passable(&self, cell: GridPos) -> bool {
        if cell.x < 0 || cell.y < 0 {
            return false;
        }
        let (x, y) = (cell.x as u32, cell.y as u32);
        if x >= self.width || y >= self.height {
            return false;
        }
        !self.blocked[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_wall_at(cell: GridPos) -> WallGrid {
        WallGrid::from_tiles(4, 3, &[TileRecord { id: 1, cell }])
    }

    #[test]
    fn open_cells_are_passable() {
        let grid = grid_with_wall_at(GridPos::new(2, 1));
        assert!(grid.is_passable(GridPos::new(0, 0)));
        assert!(grid.is_passable(GridPos::new(3, 2)));
    }

    #[test]
    fn wall_cells_block() {
        let grid = grid_with_wall_at(GridPos::new(2, 1));
        assert!(!grid.is_passable(GridPos::new(2, 1)));
    }

    #[test]
    fn out_of_bounds_blocks() {
        let grid = grid_with_wall_at(GridPos::new(0, 0));
        assert!(!grid.is_passable(GridPos::new(-1, 0)));
        assert!(!grid.is_passable(GridPos::new(0, -1)));
        assert!(!grid.is_passable(GridPos::new(4, 0)));
        assert!(!grid.is_passable(GridPos::new(0, 3)));
    }

    #[test]
    fn wall_tiles_outside_bounds_are_ignored() {
        let grid = WallGrid::from_tiles(
            2,
            2,
            &[TileRecord {
                id: 1,
                cell: GridPos::new(9, 9),
            }],
        );
        assert!(grid.is_passable(GridPos::new(1, 1)));
    }
}
