//! Dashboard core: pure project-list state machine and view-model helpers.
mod effect;
mod msg;
mod project;
mod projection;
mod state;
mod timestamp;
mod update;
mod view_model;

pub use effect::{Effect, ProjectAction};
pub use msg::Msg;
pub use project::{Project, ProjectId, ProjectStatus, UNTITLED_LABEL};
pub use projection::{
    compare_names, compare_projects, compute_projection, matches_query, normalize_query, SortKey,
};
pub use state::{AppState, LoadRequestId, Notice, NoticeSeverity, Phase};
pub use timestamp::{coerce_instant, RawTimestamp, EPOCH_MILLIS_THRESHOLD};
pub use update::update;
pub use view_model::{DashboardViewModel, ProjectCardView, UploadView, CREATED_AT_FORMAT};
