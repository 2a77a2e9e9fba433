//! Clipped drawing primitives over `RgbaImage`.
//!
//! Coordinates are signed so callers can pass positions that fall partly or
//! wholly outside the image; anything outside is dropped.

use image::{Rgba, RgbaImage};

/// Source-over blend of `color` onto the pixel at (x, y).
pub fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let a = color.0[3] as u32;
    if a == 255 {
        *dst = color;
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        dst.0[c] = ((color.0[c] as u32 * a + dst.0[c] as u32 * inv + 127) / 255) as u8;
    }
    dst.0[3] = (a + (dst.0[3] as u32 * inv + 127) / 255).min(255) as u8;
}

/// Fill the `w × h` rectangle whose top-left pixel is (x, y).
pub fn fill_rect(img: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, color: Rgba<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(w).min(img.width() as i64);
    let y1 = y.saturating_add(h).min(img.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            blend_pixel(img, px, py, color);
        }
    }
}

/// 1px outline along the inside edge of the `w × h` rectangle at (x, y).
pub fn stroke_rect(img: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, color: Rgba<u8>) {
    if w <= 0 || h <= 0 {
        return;
    }
    fill_rect(img, x, y, w, 1, color);
    if h > 1 {
        fill_rect(img, x, y + h - 1, w, 1, color);
    }
    if h > 2 {
        fill_rect(img, x, y + 1, 1, h - 2, color);
        if w > 1 {
            fill_rect(img, x + w - 1, y + 1, 1, h - 2, color);
        }
    }
}

/// Full-height 1px vertical line.
pub fn vline(img: &mut RgbaImage, x: i64, color: Rgba<u8>) {
    let h = img.height() as i64;
    fill_rect(img, x, 0, 1, h, color);
}

/// Full-width 1px horizontal line.
pub fn hline(img: &mut RgbaImage, y: i64, color: Rgba<u8>) {
    let w = img.width() as i64;
    fill_rect(img, 0, y, w, 1, color);
}
