use eframe::egui;
use image::{ImageBuffer, Pixel};

/// Hue in degrees, saturation in `0..=1`, value on the `0..=255` channel scale.
pub(super) fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max: f32 = r.max(g).max(b);
    let min: f32 = r.min(g).min(b);
    let delta: f32 = max - min;
    let v: f32 = max;
    let s: f32 = if max == 0.0 { 0.0 } else { delta / max };
    let h: f32 = if delta == 0.0 { 0.0 }
        else if max == r { 60.0 * (((g - b) / delta) % 6.0) }
        else if max == g { 60.0 * ((b - r) / delta + 2.0) }
        else { 60.0 * ((r - g) / delta + 4.0) };
    (if h < 0.0 { h + 360.0 } else { h }, s, v)
}

pub(super) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c: f32 = v * s;
    let x: f32 = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m: f32 = v - c;
    let (r, g, b) = match h as u32 {
        0..=59   => (c, x, 0.0), 60..=119 => (x, c, 0.0), 120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c), 240..=299 => (x, 0.0, c), _ => (c, 0.0, x),
    };
    let to_u8 = |ch: f32| (ch + m).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

/// Zoom that fits an image inside `canvas` without ever enlarging it.
pub(super) fn fit_scale(image_size: (u32, u32), canvas: egui::Vec2) -> f32 {
    if image_size.0 == 0 || image_size.1 == 0 { return 1.0; }
    let sx: f32 = canvas.x / image_size.0 as f32;
    let sy: f32 = canvas.y / image_size.1 as f32;
    sx.min(sy).min(1.0).max(0.01)
}

/// Maps `i` into `0..len` by mirroring about the edge pixels without
/// repeating them (`dcb|abcd|cba`).
pub(super) fn reflect_101(i: i64, len: u32) -> u32 {
    if len <= 1 { return 0; }
    let period: i64 = 2 * (i64::from(len) - 1);
    let m: i64 = i.rem_euclid(period);
    (if m >= i64::from(len) { period - m } else { m }) as u32
}

/// Copy of `img` grown by `pad` pixels on every side, filled by `reflect_101`.
pub(super) fn pad_reflect_101<P: Pixel>(img: &ImageBuffer<P, Vec<P::Subpixel>>, pad: u32) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let (w, h) = img.dimensions();
    ImageBuffer::from_fn(w + 2 * pad, h + 2 * pad, |x, y| {
        let sx: u32 = reflect_101(i64::from(x) - i64::from(pad), w);
        let sy: u32 = reflect_101(i64::from(y) - i64::from(pad), h);
        *img.get_pixel(sx, sy)
    })
}
