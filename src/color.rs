//! Cell color parsing.
//!
//! Colors are stored exactly as the client sent them. They are only parsed
//! when a raster is produced.

use image::Rgba;

/// Fallback for strings that are not a recognised hex color.
pub const FALLBACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// Parse a stored cell color, falling back to opaque black.
pub fn cell_rgba(value: &str) -> Rgba<u8> {
    parse_hex(value).unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_forms() {
        assert_eq!(parse_hex("#f00"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_hex("#00ff00"), Some(Rgba([0, 255, 0, 255])));
        assert_eq!(parse_hex("0000ff80"), Some(Rgba([0, 0, 255, 128])));
        assert_eq!(parse_hex("#fff8"), Some(Rgba([255, 255, 255, 136])));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(parse_hex("#ééé"), None);
        assert_eq!(cell_rgba("not a color"), FALLBACK);
    }

    #[test]
    fn test_parse_rejects_signs() {
        assert_eq!(parse_hex("#+f0000"), None);
        assert_eq!(parse_hex("#-f0"), None);
        assert_eq!(cell_rgba("#+f0000"), FALLBACK);
    }
}
