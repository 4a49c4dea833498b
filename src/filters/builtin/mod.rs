//! Built-in filters and the CPU kernel that renders them.
//!
//! Each submodule registers its descriptors and provides the pixel
//! operations; [`BuiltinKernel`] dispatches on the filter id.

mod blur;
mod color;
mod distortion;
mod stylize;

use crate::core::error::{KernelError, KernelResult};
use crate::core::types::{ImageValue, NativeParameters, ParameterKind};
use crate::filters::kernel::FilterKernel;
use crate::filters::registry::FilterRegistry;
use image::{DynamicImage, RgbaImage};
use log::debug;
use std::time::Instant;

/// Bump distortion filter id.
pub const DISTORTION_BUMP: &str = "distortion-bump";
/// Gaussian blur filter id.
pub const GAUSSIAN_BLUR: &str = "gaussian-blur";
/// Pixellate filter id.
pub const PIXELLATE: &str = "pixellate";
/// Sepia tone filter id.
pub const SEPIA_TONE: &str = "sepia-tone";
/// Twirl distortion filter id.
pub const TWIRL_DISTORTION: &str = "twirl-distortion";
/// Unsharp mask filter id.
pub const UNSHARP_MASK: &str = "unsharp-mask";
/// Vignette filter id.
pub const VIGNETTE: &str = "vignette";

/// Filter selected when a session starts.
pub const DEFAULT_FILTER: &str = SEPIA_TONE;

/// Register all built-in filters and make [`DEFAULT_FILTER`] the default.
pub fn register_all(registry: &mut FilterRegistry) {
    distortion::register(registry);
    blur::register(registry);
    stylize::register(registry);
    color::register(registry);
    registry.set_default(DEFAULT_FILTER);
}

// Re-export for direct access
pub use blur::{gaussian_blur, unsharp_mask};
pub use color::sepia;
pub use distortion::{bump, twirl, WarpRegion};
pub use stylize::{pixellate, vignette};

type Operation = fn(&RgbaImage, &NativeParameters) -> KernelResult<RgbaImage>;

/// CPU kernel for every built-in filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinKernel;

impl BuiltinKernel {
    /// Create a new kernel.
    pub fn new() -> Self {
        Self
    }

    fn operation(filter_id: &str) -> Option<Operation> {
        let op: Operation = match filter_id {
            DISTORTION_BUMP => distortion::apply_bump,
            GAUSSIAN_BLUR => blur::apply_gaussian_blur,
            PIXELLATE => stylize::apply_pixellate,
            SEPIA_TONE => color::apply_sepia,
            TWIRL_DISTORTION => distortion::apply_twirl,
            UNSHARP_MASK => blur::apply_unsharp_mask,
            VIGNETTE => stylize::apply_vignette,
            _ => return None,
        };
        Some(op)
    }
}

impl FilterKernel for BuiltinKernel {
    fn apply(
        &self,
        filter_id: &str,
        image: &ImageValue,
        params: &NativeParameters,
    ) -> KernelResult<ImageValue> {
        let operation = Self::operation(filter_id)
            .ok_or_else(|| KernelError::UnsupportedFilter(filter_id.to_string()))?;

        if image.is_empty() {
            return Err(KernelError::EmptyImage);
        }

        let start = Instant::now();
        let rgba = image.image().to_rgba8();
        let output = operation(&rgba, params)?;

        debug!(
            "{} rendered {}x{} in {}ms",
            filter_id,
            output.width(),
            output.height(),
            start.elapsed().as_millis()
        );

        let mut result = ImageValue::new(DynamicImage::ImageRgba8(output));
        result.metadata.format = image.metadata.format;
        Ok(result)
    }

    fn supports(&self, filter_id: &str) -> bool {
        Self::operation(filter_id).is_some()
    }
}

// ============================================================================
// Parameter helpers
// ============================================================================

/// Read a finite scalar, falling back to `default` when absent.
pub(crate) fn scalar_or(
    params: &NativeParameters,
    kind: ParameterKind,
    default: f64,
) -> KernelResult<f64> {
    let Some(value) = params.get(kind) else {
        return Ok(default);
    };
    let scalar = value.as_scalar().ok_or_else(|| KernelError::InvalidParameter {
        kind,
        reason: format!("expected a number, got {}", value),
    })?;
    if !scalar.is_finite() {
        return Err(KernelError::InvalidParameter {
            kind,
            reason: "value is not finite".to_string(),
        });
    }
    Ok(scalar)
}

/// Like [`scalar_or`], additionally rejecting negative values.
pub(crate) fn non_negative_or(
    params: &NativeParameters,
    kind: ParameterKind,
    default: f64,
) -> KernelResult<f64> {
    let value = scalar_or(params, kind, default)?;
    if value < 0.0 {
        return Err(KernelError::InvalidParameter {
            kind,
            reason: format!("{} must not be negative", value),
        });
    }
    Ok(value)
}

/// Read the center point, defaulting to the image midpoint.
pub(crate) fn center_or_midpoint(
    params: &NativeParameters,
    width: u32,
    height: u32,
) -> KernelResult<(f64, f64)> {
    let Some(value) = params.get(ParameterKind::Center) else {
        return Ok((width as f64 / 2.0, height as f64 / 2.0));
    };
    match value.as_point() {
        Some(point) if value.is_finite() => Ok(point),
        _ => Err(KernelError::InvalidParameter {
            kind: ParameterKind::Center,
            reason: format!("expected a finite point, got {}", value),
        }),
    }
}
