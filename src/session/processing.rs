//! The processing session.
//!
//! A session owns the original image, the selected filter and the raw slider
//! values. Every input change re-renders from the untouched original; the
//! previous output is never fed back into the kernel.

use crate::core::error::{KernelError, SessionError, SessionResult};
use crate::core::types::{
    ImageMetadata, ImageValue, NativeParameters, ParameterKind, ParameterValues,
};
use crate::filters::descriptor::FilterDescriptor;
use crate::filters::kernel::FilterKernel;
use crate::filters::registry::FilterRegistry;
use crate::io::{PersistReceipt, PersistenceSink};
use crate::session::scaling::native_parameters;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Whether the session has a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Loaded,
}

/// Serializable summary of a session, without pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub filter: String,
    pub parameters: ParameterValues,
    pub source: Option<ImageMetadata>,
    pub displayed: Option<ImageMetadata>,
}

/// One editing session over one source image at a time.
pub struct ProcessingSession<K: FilterKernel> {
    registry: Arc<FilterRegistry>,
    kernel: K,
    selected: FilterDescriptor,
    raw: ParameterValues,
    source: Option<ImageValue>,
    last_rendered: Option<ImageValue>,
}

impl<K: FilterKernel> ProcessingSession<K> {
    /// Create an empty session with the registry's default filter selected.
    pub fn new(registry: Arc<FilterRegistry>, kernel: K) -> SessionResult<Self> {
        let selected = registry
            .default_filter()
            .cloned()
            .ok_or(SessionError::NoFilters)?;

        debug!("New session, default filter '{}'", selected.id);
        Ok(Self {
            registry,
            kernel,
            selected,
            raw: ParameterValues::default(),
            source: None,
            last_rendered: None,
        })
    }

    /// Start from the given raw values instead of zeros. Values are clamped.
    pub fn with_parameters(mut self, raw: ParameterValues) -> Self {
        for kind in ParameterKind::ALL {
            if let Some(value) = raw.get(kind).filter(|v| v.is_finite()) {
                self.raw.set_clamped(kind, value);
            }
        }
        self
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Replace the source image and render it with the current filter.
    ///
    /// The source is replaced even if the render then fails.
    pub fn import_image(&mut self, image: ImageValue) -> SessionResult<ImageValue> {
        info!(
            "Importing image {} ({}x{})",
            image.id(),
            image.width(),
            image.height()
        );
        self.source = Some(image);
        self.last_rendered = None;
        self.render()
    }

    /// Select a filter and re-render from the original source.
    ///
    /// Requires a loaded image; otherwise the selection is left unchanged.
    pub fn select_filter(&mut self, filter_id: &str) -> SessionResult<ImageValue> {
        if self.source.is_none() {
            return Err(SessionError::NoImageLoaded);
        }

        let descriptor = self
            .registry
            .lookup(filter_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownFilter(filter_id.to_string()))?;

        debug!("Selected filter '{}' ({})", descriptor.id, descriptor.accepted);
        self.selected = descriptor;
        self.render()
    }

    /// Store a clamped raw value and re-render.
    ///
    /// Center is derived from the image and is never stored, but the call
    /// still re-renders. Without an image the value is kept for later.
    pub fn set_parameter(&mut self, kind: ParameterKind, raw: f64) -> SessionResult<ImageValue> {
        if !raw.is_finite() {
            return Err(SessionError::NonFiniteParameter { kind });
        }

        match self.raw.set_clamped(kind, raw) {
            Some(stored) if stored != raw => debug!("{} {} clamped to {}", kind, raw, stored),
            Some(_) => {}
            None => debug!("Ignoring {} value; it follows the image", kind),
        }

        self.render()
    }

    /// Render the selected filter over the original source.
    ///
    /// On failure the previous display image is kept.
    pub fn render(&mut self) -> SessionResult<ImageValue> {
        let source = self.source.as_ref().ok_or(SessionError::NoImageLoaded)?;
        let params = native_parameters(self.selected.accepted, &self.raw, &source.metadata);

        let start = Instant::now();
        let result = if self.kernel.supports(&self.selected.id) {
            self.kernel.apply(&self.selected.id, source, &params)
        } else {
            Err(KernelError::UnsupportedFilter(self.selected.id.clone()))
        };

        match result {
            Ok(output) => {
                debug!(
                    "Rendered '{}' with {} in {:?}",
                    self.selected.id,
                    params,
                    start.elapsed()
                );
                self.last_rendered = Some(output.clone());
                Ok(output)
            }
            Err(reason) => {
                warn!("Filter '{}' produced no output: {}", self.selected.id, reason);
                Err(SessionError::KernelProducedNoOutput {
                    filter: self.selected.id.clone(),
                    reason,
                })
            }
        }
    }

    /// The image to show, if a render has succeeded for the current source.
    pub fn current_display_image(&self) -> Option<&ImageValue> {
        self.last_rendered.as_ref()
    }

    /// Hand the current display image to `sink`.
    pub fn save<S: PersistenceSink + ?Sized>(&self, sink: &mut S) -> SessionResult<PersistReceipt> {
        let image = self.last_rendered.as_ref().ok_or(SessionError::NothingToSave)?;
        let receipt = sink.persist(image)?;
        info!("Saved image {} to {:?}", image.id(), receipt.location);
        Ok(receipt)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        if self.source.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    pub fn selected_filter(&self) -> &FilterDescriptor {
        &self.selected
    }

    pub fn source_image(&self) -> Option<&ImageValue> {
        self.source.as_ref()
    }

    /// Stored raw value. None for Center.
    pub fn parameter(&self, kind: ParameterKind) -> Option<f64> {
        self.raw.get(kind)
    }

    pub fn parameters(&self) -> ParameterValues {
        self.raw
    }

    /// The parameters the next render would send, if an image is loaded.
    pub fn native_parameters(&self) -> Option<NativeParameters> {
        self.source
            .as_ref()
            .map(|source| native_parameters(self.selected.accepted, &self.raw, &source.metadata))
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            filter: self.selected.id.clone(),
            parameters: self.raw,
            source: self.source.as_ref().map(|s| s.metadata),
            displayed: self.last_rendered.as_ref().map(|s| s.metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PersistError;
    use crate::core::types::NativeValue;
    use crate::filters::builtin;
    use crate::filters::kernel::testing::RecordingKernel;
    use image::DynamicImage;

    type TestSession = ProcessingSession<Arc<RecordingKernel>>;

    fn session() -> (TestSession, Arc<RecordingKernel>) {
        let kernel = Arc::new(RecordingKernel::new());
        let session =
            ProcessingSession::new(Arc::new(FilterRegistry::with_builtins()), kernel.clone()).unwrap();
        (session, kernel)
    }

    fn image(width: u32, height: u32) -> ImageValue {
        ImageValue::new(DynamicImage::new_rgba8(width, height))
    }

    struct FailingSink;

    impl PersistenceSink for FailingSink {
        fn persist(&mut self, _image: &ImageValue) -> Result<PersistReceipt, PersistError> {
            Err(PersistError::Rejected("Photo library is full".to_string()))
        }
    }

    #[derive(Default)]
    struct MemorySink(Vec<ImageValue>);

    impl PersistenceSink for MemorySink {
        fn persist(&mut self, image: &ImageValue) -> Result<PersistReceipt, PersistError> {
            self.0.push(image.clone());
            Ok(PersistReceipt {
                location: None,
                bytes: None,
            })
        }
    }

    #[test]
    fn test_new_session_is_empty_with_default_filter() {
        let (session, kernel) = session();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.selected_filter().id, builtin::SEPIA_TONE);
        assert_eq!(session.registry().len(), 7);
        assert!(session.current_display_image().is_none());
        assert!(session.native_parameters().is_none());
        assert_eq!(kernel.call_count(), 0);
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        let result = ProcessingSession::new(Arc::new(FilterRegistry::new()), RecordingKernel::new());
        assert!(matches!(result, Err(SessionError::NoFilters)));
    }

    #[test]
    fn test_pixellate_sends_only_scale() {
        let (mut session, kernel) = session();
        session.import_image(image(400, 300)).unwrap();
        session.select_filter(builtin::PIXELLATE).unwrap();
        session.set_parameter(ParameterKind::Scale, 0.4).unwrap();

        let call = kernel.last_call().unwrap();
        assert_eq!(call.filter_id, "pixellate");
        assert_eq!(call.params.len(), 1);
        assert_eq!(call.params.scalar(ParameterKind::Scale), Some(20.0));
    }

    #[test]
    fn test_vignette_sends_intensity_and_radius() {
        let (mut session, kernel) = session();
        session.import_image(image(64, 64)).unwrap();
        session.select_filter(builtin::VIGNETTE).unwrap();
        session.set_parameter(ParameterKind::Intensity, 0.5).unwrap();
        session.set_parameter(ParameterKind::Radius, 0.2).unwrap();

        let params = kernel.last_call().unwrap().params;
        let sent: Vec<_> = params.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(
            sent,
            vec![
                (ParameterKind::Intensity, NativeValue::Scalar { value: 0.5 }),
                (ParameterKind::Radius, NativeValue::Scalar { value: 130.0 }),
            ]
        );
    }

    #[test]
    fn test_select_without_image_keeps_selection() {
        let (mut session, kernel) = session();
        let result = session.select_filter(builtin::DISTORTION_BUMP);
        assert!(matches!(result, Err(SessionError::NoImageLoaded)));
        assert_eq!(session.selected_filter().id, builtin::SEPIA_TONE);
        assert_eq!(kernel.call_count(), 0);
    }

    #[test]
    fn test_twirl_center_follows_image() {
        let (mut session, kernel) = session();
        session.import_image(image(200, 100)).unwrap();
        session.select_filter(builtin::TWIRL_DISTORTION).unwrap();
        session.set_parameter(ParameterKind::Center, 0.9).unwrap();

        let params = kernel.last_call().unwrap().params;
        assert_eq!(params.point(ParameterKind::Center), Some((100.0, 50.0)));
        assert_eq!(session.parameter(ParameterKind::Center), None);
        assert_eq!(kernel.call_count(), 3);
    }

    #[test]
    fn test_kernel_failure_keeps_previous_display() {
        let (mut session, kernel) = session();
        let first = session.import_image(image(32, 32)).unwrap();

        kernel.set_failing(true);
        let err = session.set_parameter(ParameterKind::Intensity, 0.7).unwrap_err();
        assert!(err.is_render_failure());
        assert_eq!(session.current_display_image(), Some(&first));
        assert_eq!(session.parameter(ParameterKind::Intensity), Some(0.7));
    }

    #[test]
    fn test_kernel_failure_on_import_leaves_no_display() {
        let (mut session, kernel) = session();
        session.import_image(image(8, 8)).unwrap();
        kernel.set_failing(true);

        let err = session.import_image(image(16, 16)).unwrap_err();
        assert!(matches!(err, SessionError::KernelProducedNoOutput { .. }));
        assert!(session.current_display_image().is_none());
        assert_eq!(session.source_image().unwrap().width(), 16);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn test_clamping() {
        let (mut session, _) = session();
        session.import_image(image(4, 4)).unwrap();
        session.set_parameter(ParameterKind::Intensity, 1.7).unwrap();
        session.set_parameter(ParameterKind::Radius, -0.3).unwrap();
        assert_eq!(session.parameter(ParameterKind::Intensity), Some(1.0));
        assert_eq!(session.parameter(ParameterKind::Radius), Some(0.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let (mut session, kernel) = session();
        session.import_image(image(4, 4)).unwrap();
        let err = session.set_parameter(ParameterKind::Scale, f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            SessionError::NonFiniteParameter {
                kind: ParameterKind::Scale
            }
        ));
        assert_eq!(session.parameter(ParameterKind::Scale), Some(0.0));
        assert_eq!(kernel.call_count(), 1);
    }

    #[test]
    fn test_parameter_set_before_import_is_kept() {
        let (mut session, kernel) = session();
        let err = session.set_parameter(ParameterKind::Intensity, 0.25).unwrap_err();
        assert!(matches!(err, SessionError::NoImageLoaded));

        session.import_image(image(10, 10)).unwrap();
        let params = kernel.last_call().unwrap().params;
        assert_eq!(params.scalar(ParameterKind::Intensity), Some(0.25));
    }

    #[test]
    fn test_render_is_idempotent() {
        let (mut session, kernel) = session();
        session.import_image(image(50, 40)).unwrap();
        session.select_filter(builtin::UNSHARP_MASK).unwrap();
        session.render().unwrap();
        session.render().unwrap();

        let calls = kernel.calls();
        let n = calls.len();
        assert_eq!(calls[n - 1].params, calls[n - 2].params);
        assert_eq!(calls[n - 1].image_id, calls[n - 2].image_id);
    }

    #[test]
    fn test_filters_never_chain() {
        let (mut session, kernel) = session();
        let source = image(20, 20);
        let source_id = source.id();
        session.import_image(source).unwrap();

        for id in [builtin::GAUSSIAN_BLUR, builtin::PIXELLATE, builtin::VIGNETTE, builtin::SEPIA_TONE] {
            let output = session.select_filter(id).unwrap();
            assert_ne!(output.id(), source_id);
        }

        assert!(kernel.calls().iter().all(|c| c.image_id == source_id));
    }

    #[test]
    fn test_unknown_filter() {
        let (mut session, _) = session();
        session.import_image(image(4, 4)).unwrap();
        let err = session.select_filter("posterize").unwrap_err();
        assert!(matches!(err, SessionError::UnknownFilter(ref id) if id == "posterize"));
        assert_eq!(session.selected_filter().id, builtin::SEPIA_TONE);
    }

    #[test]
    fn test_native_parameters_preview() {
        let (mut session, _) = session();
        session.import_image(image(100, 60)).unwrap();
        session.select_filter(builtin::DISTORTION_BUMP).unwrap();
        session.set_parameter(ParameterKind::Radius, 0.5).unwrap();

        let params = session.native_parameters().unwrap();
        assert_eq!(params.scalar(ParameterKind::Radius), Some(325.0));
        assert_eq!(params.point(ParameterKind::Center), Some((50.0, 30.0)));
        assert_eq!(params.scalar(ParameterKind::Scale), Some(0.0));
    }

    #[test]
    fn test_with_parameters_clamps() {
        let (session, _) = session();
        let session = session.with_parameters(ParameterValues {
            intensity: 3.0,
            radius: f64::INFINITY,
            scale: 0.5,
        });
        assert_eq!(session.parameters().intensity, 1.0);
        assert_eq!(session.parameters().radius, 0.0);
        assert_eq!(session.parameters().scale, 0.5);
    }

    #[test]
    fn test_save() {
        let (mut session, _) = session();
        let mut sink = MemorySink::default();
        assert!(matches!(session.save(&mut sink), Err(SessionError::NothingToSave)));

        let rendered = session.import_image(image(12, 9)).unwrap();
        session.save(&mut sink).unwrap();
        assert_eq!(sink.0, vec![rendered]);

        match session.save(&mut FailingSink) {
            Err(SessionError::Persist(PersistError::Rejected(reason))) => {
                assert_eq!(reason, "Photo library is full")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let (mut session, _) = session();
        session.import_image(image(3, 2)).unwrap();
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["state"], "loaded");
        assert_eq!(json["filter"], "sepia-tone");
        assert_eq!(json["source"]["width"], 3);
    }
}
