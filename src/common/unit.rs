//! Unit conversion utilities.
//!
//! Geometry in PresentationML is stored in EMUs (English Metric Units,
//! 914400 per inch) and font sizes in hundredths of a point. These helpers
//! convert between those native units and points, inches and pixels.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_PT: i64 = 12_700;
pub const POINTS_PER_INCH: f64 = 72.0;

/// Font sizes (`sz` attributes) are stored in hundredths of a point.
pub const FONT_HUNDREDTHS_PER_PT: u32 = 100;

#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_inch(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn inch_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_cm(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_CM as f64
}

/// Convert EMUs to device pixels at `dpi`, rounding to the nearest pixel.
///
/// Negative offsets (shapes hanging off the slide edge) stay negative.
#[inline]
pub fn emu_to_px(emu: i64, dpi: u32) -> i64 {
    ((emu as f64) * dpi as f64 / EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn px_to_emu(px: i64, dpi: u32) -> i64 {
    ((px as f64) * EMUS_PER_INCH as f64 / dpi as f64).round() as i64
}

#[inline]
pub fn emu_to_px_96(emu: i64) -> i64 {
    emu_to_px(emu, 96)
}

/// Font height in hundredths of a point to points (`1800` → `18.0`).
#[inline]
pub fn font_hundredths_to_pt(hundredths: u32) -> f64 {
    hundredths as f64 / FONT_HUNDREDTHS_PER_PT as f64
}

/// Points to font hundredths, rounding to the nearest representable size.
#[inline]
pub fn pt_to_font_hundredths(pt: f64) -> u32 {
    (pt * FONT_HUNDREDTHS_PER_PT as f64).round().max(0.0) as u32
}
