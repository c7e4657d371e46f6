//! Pixel transformations. Every function borrows the current image and
//! returns a fresh buffer; history bookkeeping happens in the session.

use image::{imageops, Rgb, Rgb32FImage, RgbImage};
use imageproc::kernel::Kernel;
use super::ie_helpers::{hsv_to_rgb, pad_reflect_101, rgb_to_hsv};
use super::ie_selection::CropRegion;

pub const BRIGHTNESS_STEP: i16 = 30;
pub const BLUR_KERNEL_SIZE: u32 = 15;
pub const SHARPEN_KERNEL: [f32; 9] = [
     0.0, -1.0,  0.0,
    -1.0,  5.0, -1.0,
     0.0, -1.0,  0.0,
];
/// ITU-R BT.601 luma weights for R, G and B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Gaussian sigma for a square kernel of `size` taps, using the usual
/// `0.3 * ((size - 1) / 2 - 1) + 0.8` rule.
pub(super) fn kernel_sigma(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Rounded luma copied into all three channels.
pub fn grayscale(img: &RgbImage) -> RgbImage {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    let mut out: RgbImage = img.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b] = pixel.0.map(f32::from);
        let luma: u8 = (wr * r + wg * g + wb * b).round().clamp(0.0, 255.0) as u8;
        pixel.0 = [luma; 3];
    }
    out
}

/// Shifts the HSV value channel by `delta`, saturating at 0 and 255.
pub fn adjust_brightness(img: &RgbImage, delta: i16) -> RgbImage {
    let mut out: RgbImage = img.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        let shifted: i16 = (v as i16 + delta).clamp(0, 255);
        let (nr, ng, nb) = hsv_to_rgb(h, s, f32::from(shifted));
        pixel.0 = [nr, ng, nb];
    }
    out
}

pub fn brighten(img: &RgbImage) -> RgbImage { adjust_brightness(img, BRIGHTNESS_STEP) }
pub fn darken(img: &RgbImage) -> RgbImage { adjust_brightness(img, -BRIGHTNESS_STEP) }

/// Normalised 1-D gaussian with `BLUR_KERNEL_SIZE` taps.
pub(super) fn blur_kernel() -> Vec<f32> {
    let sigma: f32 = kernel_sigma(BLUR_KERNEL_SIZE);
    let radius: f32 = (BLUR_KERNEL_SIZE / 2) as f32;
    let taps: Vec<f32> = (0..BLUR_KERNEL_SIZE)
        .map(|i| {
            let d: f32 = i as f32 - radius;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

/// Separable `BLUR_KERNEL_SIZE` x `BLUR_KERNEL_SIZE` gaussian, edges mirrored.
///
/// Both passes run on `f32` and round once at the end; blurring the `u8`
/// buffer directly would truncate after each pass.
pub fn blur(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 { return img.clone(); }
    let radius: u32 = BLUR_KERNEL_SIZE / 2;

    let padded: RgbImage = pad_reflect_101(img, radius);
    let wide: Rgb32FImage = Rgb32FImage::from_fn(padded.width(), padded.height(), |x, y| {
        Rgb(padded.get_pixel(x, y).0.map(f32::from))
    });
    let blurred: Rgb32FImage = imageproc::filter::separable_filter_equal(&wide, &blur_kernel());

    RgbImage::from_fn(w, h, |x, y| {
        Rgb(blurred.get_pixel(x + radius, y + radius).0.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

/// 3x3 sharpen with mirrored edges.
pub fn sharpen(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 { return img.clone(); }
    let kernel = Kernel::new(&SHARPEN_KERNEL, 3, 3);
    let sharpened: RgbImage = imageproc::filter::filter_clamped(&pad_reflect_101(img, 1), kernel);
    imageops::crop_imm(&sharpened, 1, 1, w, h).to_image()
}

pub fn invert(img: &RgbImage) -> RgbImage {
    let mut out: RgbImage = img.clone();
    imageops::invert(&mut out);
    out
}

/// 90 degrees counter-clockwise.
pub fn rotate_left(img: &RgbImage) -> RgbImage { imageops::rotate270(img) }

/// 90 degrees clockwise.
pub fn rotate_right(img: &RgbImage) -> RgbImage { imageops::rotate90(img) }

pub fn crop(img: &RgbImage, region: CropRegion) -> RgbImage {
    imageops::crop_imm(img, region.x, region.y, region.width, region.height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 17 % 256) as u8, (y * 31 % 256) as u8, ((x + y) * 7 % 256) as u8]))
    }

    #[test]
    fn blur_kernel_sigma_matches_fifteen_taps() {
        assert!((kernel_sigma(BLUR_KERNEL_SIZE) - 2.6).abs() < 1e-5);
    }

    #[test]
    fn rotate_left_then_right_is_identity() {
        let img = gradient(7, 4);
        let left = rotate_left(&img);
        assert_eq!(left.dimensions(), (4, 7));
        assert_eq!(rotate_right(&left), img);
    }

    #[test]
    fn rotate_left_moves_top_right_corner_to_top_left() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 0, Rgb([9, 9, 9]));
        let rotated = rotate_left(&img);
        assert_eq!(rotated.get_pixel(0, 0), &Rgb([9, 9, 9]));
    }

    #[test]
    fn rotate_right_moves_top_left_corner_to_top_right() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([9, 9, 9]));
        let rotated = rotate_right(&img);
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(rotated.get_pixel(1, 0), &Rgb([9, 9, 9]));
    }

    #[test]
    fn invert_twice_is_identity() {
        let img = gradient(9, 5);
        let once = invert(&img);
        assert_eq!(once.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(invert(&once), img);
    }

    #[test]
    fn brightening_saturated_value_stays_at_max() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 255, 255]),
            1 => Rgb([255, 0, 0]),
            _ => Rgb([40, 255, 90]),
        });
        let out = brighten(&img);
        assert_eq!(out, img);
    }

    #[test]
    fn brightness_steps_shift_gray_by_delta() {
        let img = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));
        assert_eq!(brighten(&img).get_pixel(0, 0), &Rgb([130, 130, 130]));
        assert_eq!(darken(&img).get_pixel(0, 0), &Rgb([70, 70, 70]));
    }

    #[test]
    fn darkening_near_black_clamps_at_zero() {
        let img = RgbImage::from_pixel(1, 1, Rgb([10, 20, 5]));
        assert_eq!(darken(&img).get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn grayscale_replicates_luminance_into_three_channels() {
        let out = grayscale(&gradient(6, 6));
        assert_eq!(out.dimensions(), (6, 6));
        for p in out.pixels() {
            assert_eq!(p.0[0], p.0[1]);
            assert_eq!(p.0[1], p.0[2]);
        }
    }

    #[test]
    fn grayscale_uses_bt601_weights() {
        let img = RgbImage::from_fn(4, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            2 => Rgb([0, 0, 255]),
            _ => Rgb([255, 255, 255]),
        });
        let out = grayscale(&img);
        assert_eq!(out.get_pixel(0, 0), &Rgb([76, 76, 76]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([150, 150, 150]));
        assert_eq!(out.get_pixel(2, 0), &Rgb([29, 29, 29]));
        assert_eq!(out.get_pixel(3, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn blur_kernel_has_fifteen_normalised_taps() {
        let kernel = blur_kernel();
        assert_eq!(kernel.len(), BLUR_KERNEL_SIZE as usize);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        for i in 0..kernel.len() / 2 {
            assert_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
            assert!(kernel[i] < kernel[i + 1]);
        }
    }

    #[test]
    fn blurred_impulse_reaches_seven_pixels() {
        let mut img = RgbImage::new(31, 1);
        img.put_pixel(15, 0, Rgb([255, 255, 255]));
        let out = blur(&img);
        let row: Vec<u8> = (0..31).map(|x| out.get_pixel(x, 0).0[0]).collect();

        assert_eq!(row[15], 39);
        assert!(row[8] > 0 && row[22] > 0, "{row:?}");
        assert_eq!(row[7], 0, "{row:?}");
        assert_eq!(row[23], 0, "{row:?}");
        for d in 1..=7 { assert_eq!(row[15 - d], row[15 + d]); }
    }

    #[test]
    fn blur_preserves_flat_images_and_dimensions() {
        let flat = RgbImage::from_pixel(20, 12, Rgb([80, 160, 240]));
        let out = blur(&flat);
        assert_eq!(out.dimensions(), (20, 12));
        for p in out.pixels() {
            for (got, want) in p.0.iter().zip([80u8, 160, 240]) {
                assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
            }
        }
    }

    #[test]
    fn blur_softens_a_hard_edge() {
        let img = RgbImage::from_fn(30, 5, |x, _| if x < 15 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let out = blur(&img);
        let left = out.get_pixel(14, 2).0[0];
        let right = out.get_pixel(15, 2).0[0];
        assert!(left > 0 && right < 255);
    }

    #[test]
    fn sharpen_leaves_flat_regions_alone() {
        let flat = RgbImage::from_pixel(5, 5, Rgb([50, 60, 70]));
        assert_eq!(sharpen(&flat), flat);
    }

    #[test]
    fn sharpen_boosts_isolated_peak_with_clamping() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([100, 100, 100]));
        img.put_pixel(2, 2, Rgb([200, 200, 200]));
        let out = sharpen(&img);
        // 5 * 200 - 4 * 100 = 600, clamped
        assert_eq!(out.get_pixel(2, 2), &Rgb([255, 255, 255]));
        // 5 * 100 - 200 - 3 * 100 = 0
        assert_eq!(out.get_pixel(2, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn sharpen_mirrors_across_the_border() {
        let img = RgbImage::from_fn(3, 1, |x, _| if x == 1 { Rgb([40, 40, 40]) } else { Rgb([100, 100, 100]) });
        let out = sharpen(&img);
        // left neighbour mirrors to x = 1: 5 * 100 - 40 - 40 - 100 - 100
        assert_eq!(out.get_pixel(0, 0), &Rgb([220, 220, 220]));
    }

    #[test]
    fn crop_slices_the_requested_window() {
        let img = gradient(10, 8);
        let region = CropRegion { x: 2, y: 3, width: 4, height: 2 };
        let out = crop(&img, region);
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(2, 3));
        assert_eq!(out.get_pixel(3, 1), img.get_pixel(5, 4));
    }
}
