//! View state for the two front ends.
//!
//! Every fetch takes a [`RequestToken`]. When the response arrives it is applied only if no
//! newer request was issued in the meantime, so a slow answer for an old selection can never
//! replace the view of the current one.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::api_client::{TimetableApi, UploadFile};
use crate::core::comparison::ComparisonView;
use crate::core::export::{ExportFormat, ExportedFile, Notifier, TriggerControl, export_layout};
use crate::core::grid::GridLayout;
use crate::core::html_renderer::render_table;
use crate::error::Result;
use crate::model::section::Section;
use crate::model::timetable::Timetable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Hands out increasing tokens and remembers the newest.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// Latest value of a view, guarded by a [`RequestSequencer`].
#[derive(Debug)]
pub struct ViewState<T> {
    sequencer: RequestSequencer,
    current: Mutex<Option<Arc<T>>>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState {
            sequencer: RequestSequencer::default(),
            current: Mutex::new(None),
        }
    }
}

impl<T> ViewState<T> {
    pub fn begin(&self) -> RequestToken {
        self.sequencer.issue()
    }

    /// Stores `value` if `token` is still the newest request. Returns the stored value.
    pub fn resolve(&self, token: RequestToken, value: T) -> Option<Arc<T>> {
        let mut current = self.lock();
        if !self.sequencer.is_current(token) {
            log::debug!("discarding stale response for request {:?}", token);
            return None;
        }
        let value = Arc::new(value);
        *current = Some(Arc::clone(&value));
        Some(value)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.sequencer.is_current(token)
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A loaded timetable together with its layout and HTML.
#[derive(Clone, Debug)]
pub struct RenderedTimetable {
    pub timetable: Timetable,
    pub layout: GridLayout,
    pub html: String,
}

impl RenderedTimetable {
    /// Each render lays the grid out with its own color assignment.
    pub fn new(timetable: Timetable) -> Self {
        let layout = GridLayout::build(&timetable);
        let html = render_table(&layout);
        RenderedTimetable {
            timetable,
            layout,
            html,
        }
    }
}

/// Section picker, upload, grid and export.
pub struct TimetableViewer<A> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    state: ViewState<RenderedTimetable>,
}

impl<A: TimetableApi> TimetableViewer<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier + Send + Sync>) -> Self {
        TimetableViewer {
            api,
            notifier,
            state: ViewState::default(),
        }
    }

    /// Section list for the picker. Failures alert and leave the list empty.
    pub async fn load_sections(&self) -> Vec<Section> {
        match self.api.sections().await {
            Ok(sections) => sections,
            Err(err) => {
                log::error!("failed to load sections: {}", err);
                self.notifier
                    .alert(&format!("Failed to load sections: {}", err.user_message()));
                Vec::new()
            }
        }
    }

    pub async fn select_section(&self, section: &Section) -> Option<Arc<RenderedTimetable>> {
        let token = self.state.begin();
        log::info!("loading timetable for section {}", section);
        let result = self.api.timetable(section).await;
        self.apply(token, result, "Failed to load timetable")
    }

    pub async fn upload(&self, path: &Path) -> Option<Arc<RenderedTimetable>> {
        let token = self.state.begin();
        let result = match UploadFile::read(path).await {
            Ok(file) => self.api.upload(file).await,
            Err(err) => Err(err),
        };
        self.apply(token, result, "Failed to process upload")
    }

    fn apply(
        &self,
        token: RequestToken,
        result: Result<Timetable>,
        failure: &str,
    ) -> Option<Arc<RenderedTimetable>> {
        if !self.state.is_current(token) {
            log::debug!("ignoring superseded timetable response {:?}", token);
            return None;
        }
        match result {
            Ok(timetable) => self.state.resolve(token, RenderedTimetable::new(timetable)),
            Err(err) => {
                log::error!("{}: {}", failure, err);
                self.notifier
                    .alert(&format!("{}: {}", failure, err.user_message()));
                None
            }
        }
    }

    pub fn current(&self) -> Option<Arc<RenderedTimetable>> {
        self.state.current()
    }

    /// Exports the currently displayed grid.
    pub fn export(
        &self,
        format: ExportFormat,
        trigger: &mut TriggerControl,
    ) -> Option<ExportedFile> {
        let Some(rendered) = self.current() else {
            self.notifier.alert("Load a timetable before exporting.");
            return None;
        };
        export_layout(&rendered.layout, format, trigger, self.notifier.as_ref())
    }
}

/// Section picker and shared-lecturer cards.
pub struct ComparisonViewer<A> {
    api: Arc<A>,
    state: ViewState<ComparisonView>,
}

impl<A: TimetableApi> ComparisonViewer<A> {
    pub fn new(api: Arc<A>) -> Self {
        ComparisonViewer {
            api,
            state: ViewState::default(),
        }
    }

    /// Section list, or the inline message to show instead of the picker.
    pub async fn load_sections(&self) -> std::result::Result<Vec<Section>, String> {
        self.api.sections().await.map_err(|err| {
            log::error!("failed to load sections: {}", err);
            format!("Failed to load sections: {}", err.user_message())
        })
    }

    /// Fetches and shows `section`. Errors become an inline message rather than a failure.
    pub async fn select_section(&self, section: &Section) -> Option<Arc<ComparisonView>> {
        let token = self.state.begin();
        let view = match self.api.shared_lecturers(section).await {
            Ok(courses) => ComparisonView::new(section.clone(), courses),
            Err(err) => {
                log::error!("failed to load shared lecturers for {}: {}", section, err);
                ComparisonView::Message(format!(
                    "Failed to load shared lecturer data: {}",
                    err.user_message()
                ))
            }
        };
        self.state.resolve(token, view)
    }

    pub fn current(&self) -> Option<Arc<ComparisonView>> {
        self.state.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_newest_token_resolves() {
        let state: ViewState<&str> = ViewState::default();
        let first = state.begin();
        let second = state.begin();

        assert!(state.resolve(second, "second").is_some());
        assert!(state.resolve(first, "first").is_none());
        assert_eq!(state.current().as_deref(), Some(&"second"));
    }

    #[test]
    fn tokens_increase() {
        let sequencer = RequestSequencer::default();
        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert!(sequencer.is_current(b));
        assert!(!sequencer.is_current(a));
    }
}
