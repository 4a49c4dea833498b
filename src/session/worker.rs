//! Single-thread session worker.
//!
//! The session is moved onto one dedicated thread. Callers send boxed jobs
//! over a channel and wait on a per-job reply channel, so operations run
//! strictly in submission order and two renders never overlap.

use crate::core::error::{SessionError, SessionResult};
use crate::core::types::{ImageValue, ParameterKind};
use crate::filters::kernel::FilterKernel;
use crate::session::processing::{ProcessingSession, SessionSnapshot};
use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, warn};
use std::thread::{self, JoinHandle};

type Job<K> = Box<dyn FnOnce(&mut ProcessingSession<K>) + Send>;

/// Handle to a session running on its own thread.
pub struct SessionWorker<K: FilterKernel + 'static> {
    sender: Option<Sender<Job<K>>>,
    handle: Option<JoinHandle<ProcessingSession<K>>>,
}

impl<K: FilterKernel + 'static> SessionWorker<K> {
    /// Move `session` onto a new worker thread.
    pub fn spawn(session: ProcessingSession<K>) -> std::io::Result<Self> {
        let (sender, receiver) = unbounded::<Job<K>>();
        let handle = thread::Builder::new()
            .name("instafilter-session".to_string())
            .spawn(move || Self::run(session, receiver))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    fn run(mut session: ProcessingSession<K>, receiver: Receiver<Job<K>>) -> ProcessingSession<K> {
        let mut processed = 0usize;
        while let Ok(job) = receiver.recv() {
            job(&mut session);
            processed += 1;
        }
        debug!("Session worker exiting after {} jobs", processed);
        session
    }

    /// Queue `f` and return a receiver for its result without waiting.
    pub fn submit<R, F>(&self, f: F) -> SessionResult<Receiver<R>>
    where
        R: Send + 'static,
        F: FnOnce(&mut ProcessingSession<K>) -> R + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(SessionError::WorkerUnavailable)?;
        let (reply, result) = bounded(1);
        let job: Job<K> = Box::new(move |session| {
            let _ = reply.send(f(session));
        });
        sender.send(job).map_err(|_| SessionError::WorkerUnavailable)?;
        Ok(result)
    }

    /// Run `f` on the worker and wait for its result.
    pub fn call<R, F>(&self, f: F) -> SessionResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut ProcessingSession<K>) -> R + Send + 'static,
    {
        self.submit(f)?
            .recv()
            .map_err(|_| SessionError::WorkerUnavailable)
    }

    pub fn import_image(&self, image: ImageValue) -> SessionResult<ImageValue> {
        self.call(move |s| s.import_image(image))?
    }

    pub fn select_filter(&self, filter_id: impl Into<String>) -> SessionResult<ImageValue> {
        let filter_id = filter_id.into();
        self.call(move |s| s.select_filter(&filter_id))?
    }

    pub fn set_parameter(&self, kind: ParameterKind, raw: f64) -> SessionResult<ImageValue> {
        self.call(move |s| s.set_parameter(kind, raw))?
    }

    pub fn render(&self) -> SessionResult<ImageValue> {
        self.call(|s| s.render())?
    }

    pub fn current_display_image(&self) -> SessionResult<Option<ImageValue>> {
        self.call(|s| s.current_display_image().cloned())
    }

    pub fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        self.call(|s| s.snapshot())
    }

    /// Stop accepting jobs, finish queued ones and return the session.
    pub fn shutdown(mut self) -> SessionResult<ProcessingSession<K>> {
        self.sender.take();
        let handle = self.handle.take().ok_or(SessionError::WorkerUnavailable)?;
        handle.join().map_err(|_| SessionError::WorkerUnavailable)
    }
}

impl<K: FilterKernel + 'static> Drop for SessionWorker<K> {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Session worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::builtin;
    use crate::filters::kernel::testing::RecordingKernel;
    use crate::filters::registry::FilterRegistry;
    use image::DynamicImage;
    use std::sync::Arc;

    fn worker() -> (SessionWorker<Arc<RecordingKernel>>, Arc<RecordingKernel>) {
        let kernel = Arc::new(RecordingKernel::new());
        let session =
            ProcessingSession::new(Arc::new(FilterRegistry::with_builtins()), kernel.clone()).unwrap();
        (SessionWorker::spawn(session).unwrap(), kernel)
    }

    #[test]
    fn test_jobs_run_in_submission_order() {
        let (worker, kernel) = worker();
        worker
            .import_image(ImageValue::new(DynamicImage::new_rgba8(10, 10)))
            .unwrap();

        let pending: Vec<_> = (1..=5)
            .map(|i| {
                worker
                    .submit(move |s| s.set_parameter(ParameterKind::Intensity, i as f64 / 10.0))
                    .unwrap()
            })
            .collect();
        for rx in pending {
            rx.recv().unwrap().unwrap();
        }

        let sent: Vec<_> = kernel
            .calls()
            .iter()
            .skip(1)
            .map(|c| c.params.scalar(ParameterKind::Intensity).unwrap())
            .collect();
        assert_eq!(sent, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_errors_pass_through() {
        let (worker, _) = worker();
        let err = worker.select_filter(builtin::VIGNETTE).unwrap_err();
        assert!(matches!(err, SessionError::NoImageLoaded));
        assert_eq!(worker.current_display_image().unwrap(), None);
    }

    #[test]
    fn test_shutdown_returns_session() {
        let (worker, kernel) = worker();
        worker
            .import_image(ImageValue::new(DynamicImage::new_rgba8(4, 4)))
            .unwrap();
        worker.select_filter(builtin::PIXELLATE).unwrap();

        let session = worker.shutdown().unwrap();
        assert_eq!(session.selected_filter().id, builtin::PIXELLATE);
        assert_eq!(kernel.call_count(), 2);
    }

    #[test]
    fn test_panicking_job_closes_worker() {
        let (worker, _) = worker();
        let result = worker.call::<(), _>(|_| panic!("boom"));
        assert!(matches!(result, Err(SessionError::WorkerUnavailable)));
        assert!(matches!(worker.render(), Err(SessionError::WorkerUnavailable)));
    }
}
