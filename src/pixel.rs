//! Packed-pixel helpers.
//!
//! The whole system speaks one pixel format: a 32-bit word with alpha in
//! bits 24–31, red in 16–23, green in 8–15, and blue in 0–7. A pixel buffer
//! is a flat `&[u32]` of length `width * height`; filters always produce a
//! new buffer of identical length.

/// Alpha lane of a packed ARGB word.
#[inline]
pub fn alpha(pixel: u32) -> u8 {
    (pixel >> 24) as u8
}

/// Red lane of a packed ARGB word.
#[inline]
pub fn red(pixel: u32) -> u8 {
    (pixel >> 16) as u8
}

/// Green lane of a packed ARGB word.
#[inline]
pub fn green(pixel: u32) -> u8 {
    (pixel >> 8) as u8
}

/// Blue lane of a packed ARGB word.
#[inline]
pub fn blue(pixel: u32) -> u8 {
    pixel as u8
}

/// Pack four 8-bit lanes into an ARGB word.
#[inline]
pub fn pack(alpha: u8, red: u8, green: u8, blue: u8) -> u32 {
    (alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32
}
