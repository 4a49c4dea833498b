//! Notice presenters.

use crate::core::notice::{Notice, NoticeLevel};
use crate::io::NoticePresenter;
use log::{error, info, warn};
use parking_lot::Mutex;

/// Presents notices through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresenter;

impl NoticePresenter for LogPresenter {
    fn present(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!("{}", notice),
            NoticeLevel::Warning => warn!("{}", notice),
            NoticeLevel::Error => error!("{}", notice),
        }
    }
}

/// Collects notices in memory.
///
/// Front-ends drain it after each action; tests inspect it.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notice presented so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Most recent notice.
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    /// Remove and return all recorded notices.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

impl NoticePresenter for RecordingPresenter {
    fn present(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

impl<P: NoticePresenter + ?Sized> NoticePresenter for std::sync::Arc<P> {
    fn present(&self, notice: Notice) {
        (**self).present(notice)
    }
}
