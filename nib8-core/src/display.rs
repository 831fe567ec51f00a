use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Monochrome pixel surface the display instructions draw onto.
pub trait Framebuffer {
    /// Turns every pixel off.
    fn clear(&mut self);

    /// XORs `rows` onto the surface with its top-left corner at `(x, y)`,
    /// one byte per row, most significant bit leftmost. Returns whether any
    /// pixel went from on to off.
    fn render_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool;
}

/// The console's 64x32 screen.
///
/// The sprite origin wraps around the screen, the rest of the sprite is
/// clipped at the right and bottom edges.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }
}

impl PixelGrid {
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel).count()
    }
}

impl Framebuffer for PixelGrid {
    fn clear(&mut self) {
        self.pixels = [false; SCREEN_WIDTH * SCREEN_HEIGHT];
    }

    fn render_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let origin_x = x as usize % SCREEN_WIDTH;
        let origin_y = y as usize % SCREEN_HEIGHT;

        let mut pixel_cleared = false;
        for (i, &to_draw) in rows.iter().enumerate() {
            let row = origin_y + i;
            if row >= SCREEN_HEIGHT {
                break;
            }
            for j in 0..8 {
                let col = origin_x + j;
                if col >= SCREEN_WIDTH {
                    break;
                }
                let flip = to_draw & (0x80 >> j) != 0;

                let display_index = row * SCREEN_WIDTH + col;
                if self.pixels[display_index] && flip {
                    pixel_cleared = true;
                }
                self.pixels[display_index] ^= flip;
            }
        }
        pixel_cleared
    }
}

impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pixels.chunks(SCREEN_WIDTH) {
            let line: String = row
                .iter()
                .map(|&pixel| if pixel { '█' } else { ' ' })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelGrid")
            .field("lit_pixels", &self.lit_pixels())
            .finish()
    }
}
