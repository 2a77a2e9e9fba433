//! Bitmap label font for row and column numbers.
//!
//! Uses the Spleen 12x24 font. Only the glyphs needed for numbering are
//! decoded, once, at construction.

use image::{Rgba, RgbaImage};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;

use super::raster::blend_pixel;
use crate::error::KnitError;

const LABEL_CHARS: &str = "0123456789-";

/// Pre-decoded glyph bitmaps.
pub struct LabelFont {
    pub char_width: u32,
    pub char_height: u32,
    glyphs: HashMap<char, Vec<bool>>,
}

impl LabelFont {
    pub fn new() -> Result<Self, KnitError> {
        let (w, h) = (12usize, 24usize);
        let mut font = PSF2Font::new(FONT_12X24)
            .map_err(|_| KnitError::Image("failed to load Spleen 12x24 font".to_string()))?;

        let mut glyphs = HashMap::new();
        for ch in LABEL_CHARS.chars() {
            let utf8 = ch.to_string();
            let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
                continue;
            };
            let mut bits = vec![false; w * h];
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < h && col_x < w {
                        bits[row_y * w + col_x] = on;
                    }
                }
            }
            glyphs.insert(ch, bits);
        }

        Ok(Self {
            char_width: w as u32,
            char_height: h as u32,
            glyphs,
        })
    }

    /// Width in pixels of `text` when drawn.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.char_width
    }

    /// Draw `text` with its top-left corner at (x, y). Unknown characters
    /// advance without drawing.
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i64, y: i64, color: Rgba<u8>) {
        let w = self.char_width as i64;
        for (i, ch) in text.chars().enumerate() {
            let Some(bits) = self.glyphs.get(&ch) else {
                continue;
            };
            let gx = x + i as i64 * w;
            for (idx, on) in bits.iter().enumerate() {
                if *on {
                    let idx = idx as i64;
                    blend_pixel(img, gx + idx % w, y + idx / w, color);
                }
            }
        }
    }
}
