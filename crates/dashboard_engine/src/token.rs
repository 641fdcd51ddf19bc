//! Bearer credential lookup across the durable and session scopes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};
use serde::{Deserialize, Serialize};

use crate::persist::{PersistError, StateDir};

pub const CREDENTIAL_FILENAME: &str = "credentials.ron";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Where a credential is kept, picked at login time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Survives restarts.
    Durable,
    /// Lives as long as the process.
    Session,
}

pub trait CredentialScope: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, PersistError>;
    fn store(&self, credential: &Credential) -> Result<(), PersistError>;
    fn clear(&self) -> Result<(), PersistError>;
}

#[derive(Debug, Default)]
pub struct MemoryScope {
    slot: Mutex<Option<Credential>>,
}

impl MemoryScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Credential>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialScope for MemoryScope {
    fn load(&self) -> Result<Option<Credential>, PersistError> {
        Ok(self.slot().clone())
    }

    fn store(&self, credential: &Credential) -> Result<(), PersistError> {
        *self.slot() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Credential kept as RON in `{dir}/credentials.ron`.
#[derive(Debug, Clone)]
pub struct FileScope {
    dir: StateDir,
}

impl FileScope {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir: StateDir::new(dir),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path_of(CREDENTIAL_FILENAME)
    }
}

impl CredentialScope for FileScope {
    fn load(&self) -> Result<Option<Credential>, PersistError> {
        let Some(bytes) = self.dir.read(CREDENTIAL_FILENAME)? else {
            return Ok(None);
        };
        let path = self.path();
        let content = std::str::from_utf8(&bytes)
            .map_err(|err| PersistError::Format(format!("{}: {err}", path.display())))?;
        ron::from_str(content)
            .map(Some)
            .map_err(|err| PersistError::Format(format!("{}: {err}", path.display())))
    }

    fn store(&self, credential: &Credential) -> Result<(), PersistError> {
        let content = ron::ser::to_string_pretty(credential, ron::ser::PrettyConfig::new())
            .map_err(|err| PersistError::Format(err.to_string()))?;
        self.dir
            .write(CREDENTIAL_FILENAME, content.as_bytes())
            .map(|_| ())
    }

    fn clear(&self) -> Result<(), PersistError> {
        if self.dir.remove(CREDENTIAL_FILENAME)? {
            dashboard_debug!("Removed {}", self.path().display());
        }
        Ok(())
    }
}

/// Resolves the current credential: durable scope first, then session.
pub struct TokenStore {
    durable: Box<dyn CredentialScope>,
    session: Box<dyn CredentialScope>,
}

impl TokenStore {
    pub fn new(durable: Box<dyn CredentialScope>, session: Box<dyn CredentialScope>) -> Self {
        Self { durable, session }
    }

    /// File-backed durable scope in `state_dir`, in-memory session scope.
    pub fn with_state_dir(state_dir: &Path) -> Self {
        Self::new(
            Box::new(FileScope::new(state_dir.to_path_buf())),
            Box::new(MemoryScope::new()),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryScope::new()), Box::new(MemoryScope::new()))
    }

    /// Never fails: unreadable scopes count as empty.
    pub fn get(&self) -> Option<Credential> {
        read_scope("durable", self.durable.as_ref())
            .or_else(|| read_scope("session", self.session.as_ref()))
    }

    /// Bearer token, empty when no credential is stored.
    pub fn token(&self) -> String {
        self.get().map(|credential| credential.token).unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<String> {
        self.get().and_then(|credential| credential.user_id)
    }

    pub fn remember(
        &self,
        credential: &Credential,
        persistence: Persistence,
    ) -> Result<(), PersistError> {
        match persistence {
            Persistence::Durable => self.durable.store(credential),
            Persistence::Session => self.session.store(credential),
        }?;
        dashboard_info!("Stored credential in {:?} scope", persistence);
        Ok(())
    }

    /// Clears both scopes; the first failure is reported after both were tried.
    pub fn logout(&self) -> Result<(), PersistError> {
        let durable = self.durable.clear();
        let session = self.session.clear();
        dashboard_info!("Cleared stored credentials");
        durable.and(session)
    }
}

fn read_scope(name: &str, scope: &dyn CredentialScope) -> Option<Credential> {
    match scope.load() {
        Ok(credential) => credential.filter(|credential| !credential.token.is_empty()),
        Err(err) => {
            dashboard_warn!("Ignoring unreadable {} credential: {}", name, err);
            None
        }
    }
}
