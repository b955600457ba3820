// File: src/color_utils.rs
use std::num::NonZeroUsize;

/// Maps an entity id to a palette slot. Pure function of `id`, so colors
/// stay stable across reloads without a stored color table.
///
/// The hash walks UTF-16 code units with `h = (h << 5) - h + unit`,
/// wrapping at 32 bits like a signed int.
pub fn color_bucket(id: &str, palette_size: NonZeroUsize) -> usize {
    let hash = id
        .encode_utf16()
        .fold(0i32, |h, unit| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32)
        });
    // i64 so that i32::MIN has an absolute value.
    let magnitude = (hash as i64).unsigned_abs();
    (magnitude % palette_size.get() as u64) as usize
}

/// `n` evenly spaced hues as (r, g, b) in [0.0, 1.0], one per bucket.
/// Saturation and lightness stay in a pastel band readable under dark text.
pub fn palette_rgb(palette_size: NonZeroUsize) -> Vec<(f32, f32, f32)> {
    let n = palette_size.get();
    (0..n)
        .map(|i| {
            let h = (i as f32 * 360.0 / n as f32) % 360.0;
            // Alternate lightness so neighbouring buckets don't blur together.
            let l = if i % 2 == 0 { 0.72 } else { 0.80 };
            hsl_to_rgb(h, 0.65, l)
        })
        .collect()
}

/// `#rrggbb` for a color tuple.
pub fn to_hex((r, g, b): (f32, f32, f32)) -> String {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", c(r), c(g), c(b))
}

/// HSL (hue in degrees, saturation and lightness in [0.0, 1.0]) to RGB.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    (r + m, g + m, b + m)
}

/// True when a label drawn on `color` needs light text.
pub fn is_dark((r, g, b): (f32, f32, f32)) -> bool {
    0.299 * r + 0.587 * g + 0.114 * b < 0.5
}
