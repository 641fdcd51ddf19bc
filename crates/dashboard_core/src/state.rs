use crate::projection::compute_projection;
use crate::view_model::{DashboardViewModel, ProjectCardView, UploadView};
use crate::{Project, SortKey};

pub type LoadRequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Empty,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadState {
    pub(crate) file_name: String,
    pub(crate) percent: u8,
}

/// State of one dashboard session.
///
/// `projection` is recomputed whenever `source`, `query` or `sort_key`
/// changes, so it never lags behind its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    source: Vec<Project>,
    query: String,
    sort_key: SortKey,
    projection: Vec<usize>,
    in_flight: Option<LoadRequestId>,
    last_request_id: LoadRequestId,
    load_error: Option<String>,
    reload_queued: bool,
    notice: Option<Notice>,
    upload: Option<UploadState>,
    active: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Loading
        } else if self.load_error.is_some() {
            Phase::Error
        } else if self.projection.is_empty() {
            Phase::Empty
        } else {
            Phase::Ready
        }
    }

    pub fn source(&self) -> &[Project] {
        &self.source
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn current_projection(&self) -> Vec<&Project> {
        self.projection
            .iter()
            .map(|&index| &self.source[index])
            .collect()
    }

    /// True between `Msg::Activated` and `Msg::Deactivated`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> DashboardViewModel {
        DashboardViewModel {
            phase: self.phase(),
            query: self.query.clone(),
            sort_key: self.sort_key,
            total_count: self.source.len(),
            cards: self
                .current_projection()
                .into_iter()
                .map(ProjectCardView::from_project)
                .collect(),
            load_error: self.load_error.clone(),
            notice: self.notice.clone(),
            upload: self.upload.as_ref().map(|upload| UploadView {
                file_name: upload.file_name.clone(),
                percent: upload.percent,
            }),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Starts a load unless one is already in flight.
    pub(crate) fn begin_load(&mut self) -> Option<LoadRequestId> {
        if self.in_flight.is_some() {
            return None;
        }
        self.last_request_id += 1;
        self.in_flight = Some(self.last_request_id);
        self.mark_dirty();
        Some(self.last_request_id)
    }

    /// Only the in-flight request, which is always the last one started, may settle a load.
    pub(crate) fn accepts_result(&self, request_id: LoadRequestId) -> bool {
        self.in_flight == Some(request_id)
    }

    pub(crate) fn apply_loaded(&mut self, projects: Vec<Project>) {
        self.in_flight = None;
        self.load_error = None;
        self.source = projects;
        self.recompute();
    }

    pub(crate) fn apply_load_failure(&mut self, message: String) {
        self.in_flight = None;
        self.load_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.recompute();
    }

    pub(crate) fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.recompute();
    }

    /// Marks a reload to run once the in-flight load settles.
    pub(crate) fn queue_reload(&mut self) {
        self.reload_queued = true;
    }

    pub(crate) fn take_queued_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_queued)
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice = notice;
        self.mark_dirty();
    }

    pub(crate) fn is_uploading(&self) -> bool {
        self.upload.is_some()
    }

    pub(crate) fn start_upload(&mut self, file_name: String) {
        self.upload = Some(UploadState {
            file_name,
            percent: 0,
        });
        self.mark_dirty();
    }

    pub(crate) fn set_upload_percent(&mut self, percent: u8) {
        if let Some(upload) = self.upload.as_mut() {
            upload.percent = percent.min(100);
            self.mark_dirty();
        }
    }

    pub(crate) fn finish_upload(&mut self) {
        self.upload = None;
        self.mark_dirty();
    }

    /// Tears the session down and leaves it inactive. The request counter
    /// survives so results of loads started before the reset can never match
    /// a new request.
    pub(crate) fn reset_session(&mut self) {
        let last_request_id = self.last_request_id;
        *self = Self {
            last_request_id,
            dirty: true,
            ..Self::default()
        };
    }

    fn recompute(&mut self) {
        self.projection = compute_projection(&self.source, &self.query, self.sort_key);
        self.mark_dirty();
    }
}
