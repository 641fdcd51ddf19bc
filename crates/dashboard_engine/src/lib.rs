//! Dashboard engine: backend access, credential storage and effect execution.
mod download;
mod engine;
mod filename;
mod persist;
mod repository;
mod token;
mod types;
mod wire;

pub use download::{DirectoryDownloadSink, DownloadSink};
pub use engine::EngineHandle;
pub use filename::download_filename;
pub use persist::{ensure_dir, PersistError, StateDir};
pub use repository::{
    ApiSettings, ChannelProgressSink, Clock, ProgressSink, ProjectRepository,
    ReqwestProjectRepository,
};
pub use token::{
    Credential, CredentialScope, FileScope, MemoryScope, Persistence, TokenStore,
    CREDENTIAL_FILENAME,
};
pub use types::{EngineEvent, RepositoryError};
