//! File-system picker and sinks.

use crate::core::error::{AcquireError, PersistError};
use crate::core::types::{ImageFormat, ImageValue};
use crate::io::{ImagePicker, PersistReceipt, PersistenceSink};
use image::DynamicImage;
use log::{debug, info};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Picks images from a queue of file paths.
///
/// Each request consumes the next path. An empty queue behaves like a
/// user dismissing the picker.
#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    queue: VecDeque<PathBuf>,
}

impl FilePicker {
    /// Create a picker that will offer `paths` in order.
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            queue: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Queue another path.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.queue.push_back(path.into());
    }

    /// Number of paths still queued.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ImagePicker for FilePicker {
    fn acquire_image(&mut self) -> Result<ImageValue, AcquireError> {
        let path = self.queue.pop_front().ok_or(AcquireError::Cancelled)?;
        let image = ImageValue::from_path(&path)
            .map_err(|e| AcquireError::Load(format!("{}: {}", path.display(), e)))?;

        info!(
            "Loaded {} ({}x{}, {})",
            path.display(),
            image.width(),
            image.height(),
            image.metadata.format
        );
        Ok(image)
    }
}

/// Writes each image to a new, uniquely named file in a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    format: ImageFormat,
    file_stem: String,
}

impl DirectorySink {
    /// Create a sink writing `<stem>-<id>.<ext>` files into `directory`.
    pub fn new(directory: impl Into<PathBuf>, format: ImageFormat, file_stem: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            format,
            file_stem: file_stem.into(),
        }
    }

    /// Target directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn next_path(&self) -> PathBuf {
        let id = Uuid::new_v4().simple().to_string();
        self.directory.join(format!(
            "{}-{}.{}",
            self.file_stem,
            &id[..12],
            self.format.extension()
        ))
    }
}

impl PersistenceSink for DirectorySink {
    fn persist(&mut self, image: &ImageValue) -> Result<PersistReceipt, PersistError> {
        fs::create_dir_all(&self.directory).map_err(|error| PersistError::Io {
            path: self.directory.clone(),
            error,
        })?;
        let path = self.next_path();
        write_image(image, &path, self.format)
    }
}

/// Writes every image to one fixed path, replacing what is there.
#[derive(Debug, Clone)]
pub struct PathSink {
    path: PathBuf,
}

impl PathSink {
    /// Create a sink for `path`. The format follows the extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PersistenceSink for PathSink {
    fn persist(&mut self, image: &ImageValue) -> Result<PersistReceipt, PersistError> {
        let format = ImageFormat::from_path(&self.path);
        if format == ImageFormat::Unknown {
            return Err(PersistError::Rejected(format!(
                "Cannot tell the image format of {}",
                self.path.display()
            )));
        }
        write_image(image, &self.path, format)
    }
}

/// Encode `image` to `path`.
///
/// JPEG has no alpha channel, so images are flattened to RGB first.
fn write_image(image: &ImageValue, path: &Path, format: ImageFormat) -> Result<PersistReceipt, PersistError> {
    let encoder_format = format
        .to_image_format()
        .ok_or_else(|| PersistError::Rejected(format!("Unsupported output format {}", format)))?;

    let flattened;
    let pixels: &DynamicImage = if format == ImageFormat::Jpeg && image.metadata.has_alpha {
        flattened = DynamicImage::ImageRgb8(image.image().to_rgb8());
        &flattened
    } else {
        image.image()
    };

    pixels.save_with_format(path, encoder_format)?;

    let bytes = fs::metadata(path).ok().map(|m| m.len());
    debug!("Wrote {} ({:?} bytes)", path.display(), bytes);
    Ok(PersistReceipt::file(path.to_path_buf(), bytes))
}
