//! Raw-to-native parameter scaling.
//!
//! Sliders produce values in `[0, 1]`. Kernels expect filter-native ranges.
//! The factors below are behavior: changing them changes every render.

use crate::core::types::{
    ImageMetadata, NativeParameters, NativeValue, ParameterKind, ParameterSet, ParameterValues,
};

/// Native radius per unit of raw radius, in pixels.
pub const RADIUS_FACTOR: f64 = 650.0;

/// Native scale per unit of raw scale.
pub const SCALE_FACTOR: f64 = 50.0;

/// Native value of one parameter kind.
///
/// Center ignores the raw values and is always the image midpoint.
pub fn native_value(kind: ParameterKind, raw: &ParameterValues, source: &ImageMetadata) -> NativeValue {
    match kind {
        ParameterKind::Intensity => NativeValue::Scalar { value: raw.intensity },
        ParameterKind::Radius => NativeValue::Scalar {
            value: raw.radius * RADIUS_FACTOR,
        },
        ParameterKind::Scale => NativeValue::Scalar {
            value: raw.scale * SCALE_FACTOR,
        },
        ParameterKind::Center => NativeValue::Point {
            x: source.width as f64 / 2.0,
            y: source.height as f64 / 2.0,
        },
    }
}

/// Native parameters for exactly the `accepted` kinds, in canonical order.
pub fn native_parameters(
    accepted: ParameterSet,
    raw: &ParameterValues,
    source: &ImageMetadata,
) -> NativeParameters {
    accepted
        .iter()
        .map(|kind| (kind, native_value(kind, raw, source)))
        .collect()
}

/// Human-readable scaling rule, for help output.
pub fn describe_rule(kind: ParameterKind) -> String {
    match kind {
        ParameterKind::Intensity => "native = raw (0..1)".to_string(),
        ParameterKind::Radius => format!("native = raw x {}", RADIUS_FACTOR),
        ParameterKind::Scale => format!("native = raw x {}", SCALE_FACTOR),
        ParameterKind::Center => "image midpoint (width / 2, height / 2)".to_string(),
    }
}
