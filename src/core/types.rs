//! Core value types that flow through the filter pipeline.
//!
//! Parameters use a closed enum rather than a string-keyed property bag:
//! - Closed set of kinds: every filter is described by the same four knobs
//! - Exhaustive matching catches a missing scaling rule at compile time
//! - Serialization: serde handles enums natively

use image::DynamicImage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Parameters
// ============================================================================

/// The universal parameter kinds a filter may honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Effect strength, native range `[0, 1]`.
    Intensity,
    /// Effect radius in pixels.
    Radius,
    /// Effect scale (block size, bump amount, twirl angle).
    Scale,
    /// Effect center in image coordinates.
    Center,
}

impl ParameterKind {
    /// All kinds in canonical order.
    pub const ALL: [ParameterKind; 4] = [
        ParameterKind::Intensity,
        ParameterKind::Radius,
        ParameterKind::Scale,
        ParameterKind::Center,
    ];

    /// Get the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParameterKind::Intensity => "Intensity",
            ParameterKind::Radius => "Radius",
            ParameterKind::Scale => "Scale",
            ParameterKind::Center => "Center",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            ParameterKind::Intensity => 1 << 0,
            ParameterKind::Radius => 1 << 1,
            ParameterKind::Scale => 1 << 2,
            ParameterKind::Center => 1 << 3,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A set of parameter kinds, iterated in canonical order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<ParameterKind>", from = "Vec<ParameterKind>")]
pub struct ParameterSet(u8);

impl ParameterSet {
    /// The empty set.
    pub const EMPTY: ParameterSet = ParameterSet(0);

    /// Build a set from a slice of kinds.
    pub const fn of(kinds: &[ParameterKind]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        ParameterSet(bits)
    }

    /// Check whether `kind` is in the set.
    pub const fn contains(&self, kind: ParameterKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Return a copy of the set with `kind` added.
    pub const fn with(self, kind: ParameterKind) -> Self {
        ParameterSet(self.0 | kind.bit())
    }

    /// Number of kinds in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the contained kinds in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = ParameterKind> + '_ {
        ParameterKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|k| k.display_name()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl FromIterator<ParameterKind> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = ParameterKind>>(iter: I) -> Self {
        iter.into_iter().fold(ParameterSet::EMPTY, ParameterSet::with)
    }
}

impl From<Vec<ParameterKind>> for ParameterSet {
    fn from(kinds: Vec<ParameterKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<ParameterSet> for Vec<ParameterKind> {
    fn from(set: ParameterSet) -> Self {
        set.iter().collect()
    }
}

/// Raw slider values in the normalized UI range `[0, 1]`.
///
/// Center has no raw slot: it is always derived from the source image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterValues {
    /// Raw intensity.
    pub intensity: f64,
    /// Raw radius.
    pub radius: f64,
    /// Raw scale.
    pub scale: f64,
}

impl ParameterValues {
    /// Get the raw value for a kind. Returns None for Center.
    pub fn get(&self, kind: ParameterKind) -> Option<f64> {
        match kind {
            ParameterKind::Intensity => Some(self.intensity),
            ParameterKind::Radius => Some(self.radius),
            ParameterKind::Scale => Some(self.scale),
            ParameterKind::Center => None,
        }
    }

    /// Clamp `raw` into `[0, 1]` and store it, returning the stored value.
    ///
    /// Center is ignored and yields None. Callers must reject non-finite
    /// input first; NaN would otherwise survive the clamp.
    pub fn set_clamped(&mut self, kind: ParameterKind, raw: f64) -> Option<f64> {
        let value = raw.clamp(0.0, 1.0);
        let slot = match kind {
            ParameterKind::Intensity => &mut self.intensity,
            ParameterKind::Radius => &mut self.radius,
            ParameterKind::Scale => &mut self.scale,
            ParameterKind::Center => return None,
        };
        *slot = value;
        Some(value)
    }
}

/// A native-ranged value as handed to a filter kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NativeValue {
    /// A single number.
    Scalar { value: f64 },
    /// A point in image coordinates.
    Point { x: f64, y: f64 },
}

impl NativeValue {
    /// Try to get this value as a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        if let NativeValue::Scalar { value } = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Try to get this value as a point.
    pub fn as_point(&self) -> Option<(f64, f64)> {
        if let NativeValue::Point { x, y } = self {
            Some((*x, *y))
        } else {
            None
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            NativeValue::Scalar { value } => value.is_finite(),
            NativeValue::Point { x, y } => x.is_finite() && y.is_finite(),
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Scalar { value } => write!(f, "{:.4}", value),
            NativeValue::Point { x, y } => write!(f, "({:.2}, {:.2})", x, y),
        }
    }
}

/// The native parameter set for one kernel invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NativeParameters(IndexMap<ParameterKind, NativeValue>);

impl NativeParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a value, replacing any previous one for the same kind.
    pub fn insert(&mut self, kind: ParameterKind, value: NativeValue) {
        self.0.insert(kind, value);
    }

    /// Get the value for a kind.
    pub fn get(&self, kind: ParameterKind) -> Option<&NativeValue> {
        self.0.get(&kind)
    }

    /// Get a scalar value for a kind.
    pub fn scalar(&self, kind: ParameterKind) -> Option<f64> {
        self.get(kind).and_then(NativeValue::as_scalar)
    }

    /// Get a point value for a kind.
    pub fn point(&self, kind: ParameterKind) -> Option<(f64, f64)> {
        self.get(kind).and_then(NativeValue::as_point)
    }

    /// The kinds present, in insertion order.
    pub fn kinds(&self) -> ParameterSet {
        self.0.keys().copied().collect()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, &NativeValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NativeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl FromIterator<(ParameterKind, NativeValue)> for NativeParameters {
    fn from_iter<I: IntoIterator<Item = (ParameterKind, NativeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Images
// ============================================================================

/// Unique identifier for an image value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    /// Create a new random image ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Shared, immutable image with metadata.
///
/// Pixel data lives behind an `Arc`, so cloning is cheap and a clone keeps
/// the same [`ImageId`]. Every newly decoded or rendered image gets a fresh id.
#[derive(Debug, Clone)]
pub struct ImageValue {
    id: ImageId,
    /// Image metadata (dimensions, format, etc.)
    pub metadata: ImageMetadata,
    data: Arc<DynamicImage>,
    /// Path the image was loaded from, if any.
    pub source_path: Option<PathBuf>,
}

impl PartialEq for ImageValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Image format
    pub format: ImageFormat,
    /// Whether the image has an alpha channel
    pub has_alpha: bool,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    #[default]
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
    Unknown,
}

impl ImageValue {
    /// Create a new ImageValue from a DynamicImage.
    pub fn new(image: DynamicImage) -> Self {
        let metadata = ImageMetadata {
            width: image.width(),
            height: image.height(),
            format: ImageFormat::Unknown,
            has_alpha: image.color().has_alpha(),
        };

        Self {
            id: ImageId::new(),
            metadata,
            data: Arc::new(image),
            source_path: None,
        }
    }

    /// Load an image from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, image::ImageError> {
        let path = path.into();
        let image = image::open(&path)?;
        let mut value = Self::new(image);
        value.metadata.format = ImageFormat::from_path(&path);
        value.source_path = Some(path);
        Ok(value)
    }

    /// Unique id of this image.
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.metadata.width == 0 || self.metadata.height == 0
    }

    /// Get a shared reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.data
    }
}

impl ImageFormat {
    /// Determine image format from file path extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    /// Determine image format from an extension or format name.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Convert to image crate's ImageFormat.
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Unknown => None,
        }
    }

    /// Get the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Unknown => "bin",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::WebP => write!(f, "WebP"),
            ImageFormat::Tiff => write!(f, "TIFF"),
            ImageFormat::Bmp => write!(f, "BMP"),
            ImageFormat::Unknown => write!(f, "Unknown"),
        }
    }
}
