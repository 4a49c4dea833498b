//! Application controller.
//!
//! Front-end actions (import button, filter menu, sliders, save button) land
//! here. This is the only place errors turn into notices; nothing below it
//! talks to the user.

use crate::core::error::SessionError;
use crate::core::notice::Notice;
use crate::core::types::{ImageValue, ParameterKind};
use crate::filters::kernel::FilterKernel;
use crate::io::{ImagePicker, NoticePresenter, PersistReceipt, PersistenceSink};
use crate::session::processing::ProcessingSession;
use log::debug;

/// Wires a session to a picker and a notice presenter.
pub struct App<K: FilterKernel, P: ImagePicker, N: NoticePresenter> {
    session: ProcessingSession<K>,
    picker: P,
    presenter: N,
}

impl<K: FilterKernel, P: ImagePicker, N: NoticePresenter> App<K, P, N> {
    pub fn new(session: ProcessingSession<K>, picker: P, presenter: N) -> Self {
        Self {
            session,
            picker,
            presenter,
        }
    }

    /// Ask the picker for an image and render it.
    ///
    /// A cancelled pick leaves everything as it was and shows nothing.
    pub fn import_picture(&mut self) -> Option<ImageValue> {
        match self.picker.acquire_image() {
            Ok(image) => self.report(|s| s.import_image(image)),
            Err(e) if e.is_cancelled() => {
                debug!("Import cancelled");
                None
            }
            Err(e) => {
                self.presenter.present(Notice::from(&e));
                None
            }
        }
    }

    /// Switch filters. Ignored until an image has been imported.
    pub fn choose_filter(&mut self, filter_id: &str) -> Option<ImageValue> {
        match self.session.select_filter(filter_id) {
            Ok(image) => Some(image),
            Err(SessionError::NoImageLoaded) => {
                debug!("No image yet; keeping filter '{}'", self.session.selected_filter().id);
                None
            }
            Err(e) => {
                self.presenter.present(Notice::from(&e));
                None
            }
        }
    }

    /// A slider moved.
    pub fn slider_changed(&mut self, kind: ParameterKind, raw: f64) -> Option<ImageValue> {
        self.report(|s| s.set_parameter(kind, raw))
    }

    /// Save the displayed image, confirming success with a notice.
    pub fn save(&mut self, sink: &mut dyn PersistenceSink) -> Option<PersistReceipt> {
        match self.session.save(sink) {
            Ok(receipt) => {
                self.presenter.present(Notice::saved());
                Some(receipt)
            }
            Err(e) => {
                self.presenter.present(Notice::from(&e));
                None
            }
        }
    }

    fn report<T>(
        &mut self,
        op: impl FnOnce(&mut ProcessingSession<K>) -> Result<T, SessionError>,
    ) -> Option<T> {
        match op(&mut self.session) {
            Ok(value) => Some(value),
            Err(e) => {
                self.presenter.present(Notice::from(&e));
                None
            }
        }
    }

    pub fn session(&self) -> &ProcessingSession<K> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AcquireError, PersistError};
    use crate::core::notice::NoticeLevel;
    use crate::filters::builtin;
    use crate::filters::kernel::testing::RecordingKernel;
    use crate::filters::registry::FilterRegistry;
    use crate::io::RecordingPresenter;
    use image::DynamicImage;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct ScriptedPicker(VecDeque<Result<ImageValue, AcquireError>>);

    impl ImagePicker for ScriptedPicker {
        fn acquire_image(&mut self) -> Result<ImageValue, AcquireError> {
            self.0.pop_front().unwrap_or(Err(AcquireError::Cancelled))
        }
    }

    struct RejectingSink;

    impl PersistenceSink for RejectingSink {
        fn persist(&mut self, _: &ImageValue) -> Result<PersistReceipt, PersistError> {
            Err(PersistError::Rejected("Access denied".to_string()))
        }
    }

    struct AcceptingSink;

    impl PersistenceSink for AcceptingSink {
        fn persist(&mut self, _: &ImageValue) -> Result<PersistReceipt, PersistError> {
            Ok(PersistReceipt {
                location: None,
                bytes: Some(1),
            })
        }
    }

    type TestApp = App<Arc<RecordingKernel>, ScriptedPicker, Arc<RecordingPresenter>>;

    fn app(
        picks: Vec<Result<ImageValue, AcquireError>>,
    ) -> (TestApp, Arc<RecordingKernel>, Arc<RecordingPresenter>) {
        let kernel = Arc::new(RecordingKernel::new());
        let presenter = Arc::new(RecordingPresenter::new());
        let session =
            ProcessingSession::new(Arc::new(FilterRegistry::with_builtins()), kernel.clone()).unwrap();
        let app = App::new(session, ScriptedPicker(picks.into()), presenter.clone());
        (app, kernel, presenter)
    }

    fn image() -> ImageValue {
        ImageValue::new(DynamicImage::new_rgba8(30, 20))
    }

    #[test]
    fn test_cancelled_import_is_silent() {
        let (mut app, kernel, presenter) = app(vec![Err(AcquireError::Cancelled)]);
        assert!(app.import_picture().is_none());
        assert!(presenter.is_empty());
        assert_eq!(kernel.call_count(), 0);
        assert!(app.session().source_image().is_none());
    }

    #[test]
    fn test_load_failure_is_reported() {
        let (mut app, _, presenter) = app(vec![Err(AcquireError::Load("corrupt".to_string()))]);
        assert!(app.import_picture().is_none());
        let notice = presenter.last().unwrap();
        assert_eq!(notice.title, "Import error");
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn test_filter_before_import_is_ignored() {
        let (mut app, _, presenter) = app(vec![]);
        assert!(app.choose_filter(builtin::TWIRL_DISTORTION).is_none());
        assert!(presenter.is_empty());
        assert_eq!(app.session().selected_filter().id, builtin::SEPIA_TONE);
    }

    #[test]
    fn test_slider_before_import_warns() {
        let (mut app, _, presenter) = app(vec![]);
        assert!(app.slider_changed(ParameterKind::Intensity, 0.3).is_none());
        assert_eq!(presenter.last().unwrap().title, "No image selected");
    }

    #[test]
    fn test_render_failure_notice() {
        let (mut app, kernel, presenter) = app(vec![Ok(image())]);
        let first = app.import_picture().unwrap();

        kernel.set_failing(true);
        assert!(app.slider_changed(ParameterKind::Intensity, 0.9).is_none());
        assert_eq!(presenter.last().unwrap().title, "No image selected");
        assert_eq!(app.session().current_display_image(), Some(&first));
    }

    #[test]
    fn test_save_flow() {
        let (mut app, _, presenter) = app(vec![Ok(image())]);

        assert!(app.save(&mut AcceptingSink).is_none());
        assert_eq!(presenter.last().unwrap().title, "No image found");

        app.import_picture().unwrap();
        assert!(app.save(&mut RejectingSink).is_none());
        let notice = presenter.last().unwrap();
        assert_eq!((notice.title.as_str(), notice.message.as_str()), ("Save error", "Access denied"));

        assert!(app.save(&mut AcceptingSink).is_some());
        assert_eq!(presenter.last().unwrap(), Notice::saved());
    }

    #[test]
    fn test_unknown_filter_reported() {
        let (mut app, _, presenter) = app(vec![Ok(image())]);
        app.import_picture().unwrap();
        assert!(app.choose_filter("CIComicEffect").is_none());
        assert_eq!(presenter.last().unwrap().title, "Unknown filter");
    }
}
