//! Stylize filters: pixellate, vignette

use crate::core::error::KernelResult;
use crate::core::types::{NativeParameters, ParameterKind};
use crate::filters::builtin::{non_negative_or, scalar_or, PIXELLATE, VIGNETTE};
use crate::filters::descriptor::{Category, FilterDescriptor};
use crate::filters::registry::FilterRegistry;
use image::RgbaImage;
use rayon::prelude::*;

/// Register stylize filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterDescriptor::builder(PIXELLATE, "Pixellate")
            .description("Replace square blocks of pixels with their average color")
            .category(Category::Stylize)
            .accepts(ParameterKind::Scale)
            .build(),
    );
    registry.register(
        FilterDescriptor::builder(VIGNETTE, "Vignette")
            .description("Darken the image toward its corners")
            .category(Category::Stylize)
            .accepts(ParameterKind::Intensity)
            .accepts(ParameterKind::Radius)
            .build(),
    );
}

const PIXELLATE_DEFAULT_SCALE: f64 = 8.0;
const VIGNETTE_DEFAULT_INTENSITY: f64 = 0.0;
const VIGNETTE_DEFAULT_RADIUS: f64 = 1.0;

/// Pixellate with square blocks of `scale` pixels (rounded, at least 1).
pub fn pixellate(rgba: &RgbaImage, scale: f64) -> RgbaImage {
    let (width, height) = rgba.dimensions();
    if rgba.is_empty() {
        return rgba.clone();
    }
    let block = scale.round().clamp(1.0, width.max(height) as f64) as u32;
    let mut result = rgba.clone();
    if block <= 1 {
        return result;
    }

    let row_len = width as usize * 4;
    result
        .par_chunks_mut(row_len * block as usize)
        .enumerate()
        .for_each(|(band, rows)| {
            let y0 = band as u32 * block;
            let y1 = (y0 + block).min(height);

            for x0 in (0..width).step_by(block as usize) {
                let x1 = (x0 + block).min(width);
                let count = u64::from((x1 - x0) * (y1 - y0));

                let mut sum = [0u64; 4];
                for y in y0..y1 {
                    for x in x0..x1 {
                        let p = rgba.get_pixel(x, y);
                        for (c, total) in sum.iter_mut().enumerate() {
                            *total += u64::from(p[c]);
                        }
                    }
                }
                let average = sum.map(|s| ((s + count / 2) / count) as u8);

                for y in 0..(y1 - y0) as usize {
                    for x in x0 as usize..x1 as usize {
                        let i = y * row_len + x * 4;
                        rows[i..i + 4].copy_from_slice(&average);
                    }
                }
            }
        });

    result
}

/// Darken pixels beyond `radius` pixels from the center, reaching
/// `1 - intensity` brightness at the corners.
pub fn vignette(rgba: &RgbaImage, intensity: f64, radius: f64) -> RgbaImage {
    let amount = intensity.clamp(0.0, 1.0);
    let mut result = rgba.clone();

    let (width, height) = rgba.dimensions();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let max_distance = (cx * cx + cy * cy).sqrt();
    if amount == 0.0 || rgba.is_empty() || radius >= max_distance {
        return result;
    }
    let span = max_distance - radius;

    result
        .par_chunks_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f64 - cy;
            for (x, pixel) in row.chunks_mut(4).enumerate() {
                let dx = x as f64 - cx;
                let distance = (dx * dx + dy * dy).sqrt();
                let t = ((distance - radius) / span).clamp(0.0, 1.0);
                let factor = 1.0 - amount * t * t * (3.0 - 2.0 * t);
                for channel in pixel.iter_mut().take(3) {
                    *channel = (*channel as f64 * factor).round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    result
}

pub(crate) fn apply_pixellate(
    rgba: &RgbaImage,
    params: &NativeParameters,
) -> KernelResult<RgbaImage> {
    let scale = non_negative_or(params, ParameterKind::Scale, PIXELLATE_DEFAULT_SCALE)?;
    Ok(pixellate(rgba, scale))
}

pub(crate) fn apply_vignette(
    rgba: &RgbaImage,
    params: &NativeParameters,
) -> KernelResult<RgbaImage> {
    let intensity = scalar_or(params, ParameterKind::Intensity, VIGNETTE_DEFAULT_INTENSITY)?;
    let radius = non_negative_or(params, ParameterKind::Radius, VIGNETTE_DEFAULT_RADIUS)?;
    Ok(vignette(rgba, intensity, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_pixellate_averages_blocks() {
        let img = RgbaImage::from_fn(4, 2, |x, _| {
            if x % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([200, 100, 50, 255])
            }
        });
        let out = pixellate(&img, 2.0);
        for (_, _, p) in out.enumerate_pixels() {
            assert_eq!(*p, Rgba([100, 50, 25, 255]));
        }
    }

    #[test]
    fn test_pixellate_partial_edge_blocks() {
        let img = RgbaImage::from_fn(5, 5, |x, y| Rgba([(x * 10) as u8, (y * 10) as u8, 0, 255]));
        let out = pixellate(&img, 4.0);
        assert_eq!(out.dimensions(), (5, 5));
        // The last column forms its own 1-wide block.
        assert_eq!(out.get_pixel(4, 0)[0], 40);
        assert_eq!(out.get_pixel(0, 4)[1], 40);
    }

    #[test]
    fn test_pixellate_small_scale_is_identity() {
        let img = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8, y as u8, 9, 255]));
        assert_eq!(pixellate(&img, 0.0), img);
        assert_eq!(pixellate(&img, 1.4), img);
    }

    #[test]
    fn test_empty_images_pass_through() {
        for (w, h) in [(0, 0), (0, 5), (5, 0)] {
            let img = RgbaImage::new(w, h);
            assert_eq!(pixellate(&img, 20.0).dimensions(), (w, h));
            assert_eq!(vignette(&img, 1.0, 0.0).dimensions(), (w, h));
        }
    }

    #[test]
    fn test_vignette_darkens_corners_only() {
        let img = RgbaImage::from_pixel(20, 20, Rgba([200, 200, 200, 255]));
        let out = vignette(&img, 1.0, 5.0);
        assert_eq!(out.get_pixel(10, 10), img.get_pixel(10, 10));
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_vignette_noop_cases() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([90, 90, 90, 255]));
        assert_eq!(vignette(&img, 0.0, 0.0), img);
        assert_eq!(vignette(&img, 1.0, 650.0), img);
    }
}
