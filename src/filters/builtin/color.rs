//! Tone filters: sepia

use crate::core::error::KernelResult;
use crate::core::types::{NativeParameters, ParameterKind};
use crate::filters::builtin::{scalar_or, SEPIA_TONE};
use crate::filters::descriptor::{Category, FilterDescriptor};
use crate::filters::registry::FilterRegistry;
use image::RgbaImage;
use rayon::prelude::*;

/// Register tone filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterDescriptor::builder(SEPIA_TONE, "Sepia Tone")
            .description("Map colors to warm brown tones")
            .category(Category::Color)
            .accepts(ParameterKind::Intensity)
            .build(),
    );
}

const SEPIA_DEFAULT_INTENSITY: f64 = 1.0;

/// Sepia tone blended with the original by `intensity` in `[0, 1]`.
pub fn sepia(rgba: &RgbaImage, intensity: f64) -> RgbaImage {
    let amount = intensity.clamp(0.0, 1.0) as f32;
    let mut result = rgba.clone();
    if amount == 0.0 {
        return result;
    }

    result.par_chunks_mut(4).for_each(|pixel| {
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;

        let toned = [
            (0.393 * r + 0.769 * g + 0.189 * b).min(255.0),
            (0.349 * r + 0.686 * g + 0.168 * b).min(255.0),
            (0.272 * r + 0.534 * g + 0.131 * b).min(255.0),
        ];

        for (c, tone) in toned.iter().enumerate() {
            let orig = pixel[c] as f32;
            pixel[c] = (orig + (tone - orig) * amount).round().clamp(0.0, 255.0) as u8;
        }
    });

    result
}

pub(crate) fn apply_sepia(rgba: &RgbaImage, params: &NativeParameters) -> KernelResult<RgbaImage> {
    let intensity = scalar_or(params, ParameterKind::Intensity, SEPIA_DEFAULT_INTENSITY)?;
    Ok(sepia(rgba, intensity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_zero_intensity_is_identity() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 128]));
        assert_eq!(sepia(&img, 0.0), img);
    }

    #[test]
    fn test_full_sepia_of_gray() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        let toned = sepia(&img, 1.0);
        let p = toned.get_pixel(0, 0);
        assert_eq!(p[0], 135);
        assert_eq!(p[1], 120);
        assert_eq!(p[2], 94);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_warm_channels_ordered() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([80, 120, 160, 255]));
        let p = *sepia(&img, 1.0).get_pixel(0, 0);
        assert!(p[0] >= p[1] && p[1] >= p[2]);
    }
}
