//! The filter kernel seam.
//!
//! A kernel turns `(filter id, source image, native parameters)` into an
//! output image. The session never looks inside; it only decides which
//! parameters to send and in which native range.

use crate::core::error::KernelResult;
use crate::core::types::{ImageValue, NativeParameters};
use std::sync::Arc;

/// Renders one filter over one image.
///
/// # Contract
///
/// - `params` contains only the kinds the filter's descriptor accepts.
///   Absent kinds fall back to the kernel's own defaults.
/// - The input image is never modified; a new image is returned.
/// - A kernel that cannot render returns an error instead of an image.
///   The session reports that as "no output" and keeps the previous display.
pub trait FilterKernel: Send + Sync {
    /// Apply `filter_id` to `image` with the given native parameters.
    fn apply(
        &self,
        filter_id: &str,
        image: &ImageValue,
        params: &NativeParameters,
    ) -> KernelResult<ImageValue>;

    /// Whether this kernel implements `filter_id`.
    fn supports(&self, _filter_id: &str) -> bool {
        true
    }
}

impl<K: FilterKernel + ?Sized> FilterKernel for Arc<K> {
    fn apply(
        &self,
        filter_id: &str,
        image: &ImageValue,
        params: &NativeParameters,
    ) -> KernelResult<ImageValue> {
        (**self).apply(filter_id, image, params)
    }

    fn supports(&self, filter_id: &str) -> bool {
        (**self).supports(filter_id)
    }
}

impl<K: FilterKernel + ?Sized> FilterKernel for Box<K> {
    fn apply(
        &self,
        filter_id: &str,
        image: &ImageValue,
        params: &NativeParameters,
    ) -> KernelResult<ImageValue> {
        (**self).apply(filter_id, image, params)
    }

    fn supports(&self, filter_id: &str) -> bool {
        (**self).supports(filter_id)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A kernel double that records every invocation.

    use super::*;
    use crate::core::error::KernelError;
    use crate::core::types::ImageId;
    use image::DynamicImage;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// One captured kernel invocation.
    #[derive(Debug, Clone)]
    pub struct KernelCall {
        pub filter_id: String,
        pub image_id: ImageId,
        pub width: u32,
        pub height: u32,
        pub params: NativeParameters,
    }

    /// Returns a blank image of the input size, or no output when told to fail.
    #[derive(Default)]
    pub struct RecordingKernel {
        calls: Mutex<Vec<KernelCall>>,
        fail: AtomicBool,
    }

    impl RecordingKernel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn calls(&self) -> Vec<KernelCall> {
            self.calls.lock().clone()
        }

        pub fn last_call(&self) -> Option<KernelCall> {
            self.calls.lock().last().cloned()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl FilterKernel for RecordingKernel {
        fn apply(
            &self,
            filter_id: &str,
            image: &ImageValue,
            params: &NativeParameters,
        ) -> KernelResult<ImageValue> {
            self.calls.lock().push(KernelCall {
                filter_id: filter_id.to_string(),
                image_id: image.id(),
                width: image.width(),
                height: image.height(),
                params: params.clone(),
            });

            if self.fail.load(Ordering::SeqCst) {
                return Err(KernelError::Other("stubbed failure".to_string()));
            }

            Ok(ImageValue::new(DynamicImage::new_rgba8(
                image.width(),
                image.height(),
            )))
        }
    }
}
