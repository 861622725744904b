use crate::math::Vec2;
use crate::EngineError;

/// Pixel rectangle of one frame inside a sheet image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Metadata for a sheet image cut into a uniform grid of frames. The image
/// bytes themselves live with the presentation backend; the simulation only
/// needs frame geometry and the loaded flag.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    name: String,
    frames: Vec<FrameRegion>,
    loaded: bool,
}

impl SpriteSheet {
    /// Cuts a `sheet_width` x `sheet_height` image into `cell_width` x
    /// `cell_height` frames, row-major. Fails fast on an empty name or a
    /// degenerate grid rather than defaulting.
    pub fn from_grid(
        name: &str,
        cell_width: u32,
        cell_height: u32,
        sheet_width: u32,
        sheet_height: u32,
    ) -> Result<Self, EngineError> {
        if name.is_empty() {
            return Err(EngineError::MissingParameter("sheet name"));
        }
        if cell_width == 0 || cell_height == 0 {
            return Err(EngineError::MissingParameter("cell size"));
        }
        if sheet_width < cell_width || sheet_height < cell_height {
            return Err(EngineError::MissingParameter("sheet size"));
        }

        let columns = sheet_width / cell_width;
        let rows = sheet_height / cell_height;
        let mut frames = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                frames.push(FrameRegion {
                    x: column * cell_width,
                    y: row * cell_height,
                    width: cell_width,
                    height: cell_height,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            frames,
            loaded: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Result<FrameRegion, EngineError> {
        self.frames
            .get(index)
            .copied()
            .ok_or_else(|| EngineError::InvalidReference {
                sheet: self.name.clone(),
                frame: index,
            })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Called by the presentation backend once the image bytes are decoded.
    /// Stamping an unloaded sheet is a no-op, never an error.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}

/// One drawable frame of a sheet plus its stamp-time attributes. Borrowed
/// from the owning sprite for the duration of a stamp call.
#[derive(Debug, Clone, Copy)]
pub struct Visual<'a> {
    pub sheet: &'a SpriteSheet,
    pub frame: usize,
    pub scale: Vec2,
    pub alpha: f32,
}

/// Static single-frame drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    sheet: SpriteSheet,
    frame: usize,
    pub scale: Vec2,
    pub alpha: f32,
}

impl Sprite {
    pub fn new(sheet: SpriteSheet, frame: usize) -> Result<Self, EngineError> {
        sheet.frame(frame)?;
        Ok(Self {
            sheet,
            frame,
            scale: Vec2::ONE,
            alpha: 1.0,
        })
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Switches to another frame of the same sheet. Out-of-range indices are
    /// rejected, never wrapped or clamped.
    pub fn set_frame(&mut self, frame: usize) -> Result<(), EngineError> {
        if frame >= self.sheet.frame_count() {
            return Err(EngineError::OutOfRange {
                index: frame,
                count: self.sheet.frame_count(),
            });
        }
        self.frame = frame;
        Ok(())
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut SpriteSheet {
        &mut self.sheet
    }

    pub fn visual(&self) -> Visual<'_> {
        Visual {
            sheet: &self.sheet,
            frame: self.frame,
            scale: self.scale,
            alpha: self.alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_grid_cuts_row_major_frames() {
        let sheet = SpriteSheet::from_grid("goal.png", 16, 16, 32, 16).expect("sheet");
        assert_eq!(sheet.frame_count(), 2);
        let second = sheet.frame(1).expect("frame");
        assert_eq!(second.x, 16);
        assert_eq!(second.y, 0);
    }

    #[test]
    fn from_grid_rejects_empty_name() {
        let err = SpriteSheet::from_grid("", 8, 8, 24, 8).expect_err("must fail");
        assert!(matches!(err, EngineError::MissingParameter("sheet name")));
    }

    #[test]
    fn from_grid_rejects_zero_cell() {
        let err = SpriteSheet::from_grid("steam.png", 0, 8, 24, 8).expect_err("must fail");
        assert!(matches!(err, EngineError::MissingParameter("cell size")));
    }

    #[test]
    fn missing_frame_is_invalid_reference() {
        let sheet = SpriteSheet::from_grid("steam.png", 8, 8, 24, 8).expect("sheet");
        let err = sheet.frame(3).expect_err("must fail");
        assert!(matches!(
            err,
            EngineError::InvalidReference { frame: 3, .. }
        ));
    }

    #[test]
    fn sprite_rejects_out_of_range_frame_switch() {
        let sheet = SpriteSheet::from_grid("goal.png", 16, 16, 32, 16).expect("sheet");
        let mut sprite = Sprite::new(sheet, 0).expect("sprite");
        let err = sprite.set_frame(2).expect_err("must fail");
        assert!(matches!(err, EngineError::OutOfRange { index: 2, count: 2 }));
        assert_eq!(sprite.frame(), 0);
    }

    #[test]
    fn sheets_start_unloaded() {
        let mut sheet = SpriteSheet::from_grid("a.png", 8, 8, 8, 8).expect("sheet");
        assert!(!sheet.is_loaded());
        sheet.mark_loaded();
        assert!(sheet.is_loaded());
    }
}
