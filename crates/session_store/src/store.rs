use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::session::{Session, SESSION_FORMAT_VERSION};

/// Key-value persistence for the signed-in session.
///
/// Implementations must be cheap to read: the request pipeline calls
/// [`SessionStorage::access_token`] before every outgoing request.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Removes every persisted key. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), SessionStoreError>;

    fn access_token(&self) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .load()?
            .and_then(|session| session.access_token().map(str::to_owned)))
    }

    fn refresh_token(&self) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .load()?
            .and_then(|session| session.refresh_token().map(str::to_owned)))
    }

    fn user_id(&self) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .load()?
            .and_then(|session| session.user_id().map(str::to_owned)))
    }

    /// Rewrites only the access token of the stored session.
    fn set_access_token(&self, token: &str) -> Result<(), SessionStoreError> {
        let session = self.load()?.ok_or(SessionStoreError::NoSession)?;
        self.save(&session.with_access_token(token)?)
    }
}

/// JSON file store, written atomically through a sibling temp file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionStoreError::io(
                    "reading session file",
                    &self.path,
                    source,
                ))
            }
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let session = serde_json::from_str::<Session>(&raw)
            .map_err(|source| SessionStoreError::json_parse(&self.path, source))?;
        validate_session(&self.path, &session)?;
        Ok(Some(session))
    }

    fn write(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| {
                SessionStoreError::io("creating session directory", parent, source)
            })?;
        }

        let encoded = serde_json::to_vec_pretty(session)
            .map_err(|source| SessionStoreError::json_serialize(&self.path, source))?;

        let temp_path = self.temp_path();
        let mut file = open_private(&temp_path)
            .map_err(|source| SessionStoreError::io("creating session temp file", &temp_path, source))?;
        file.write_all(&encoded)
            .and_then(|()| file.sync_all())
            .map_err(|source| SessionStoreError::io("writing session temp file", &temp_path, source))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .map_err(|source| SessionStoreError::io("replacing session file", &self.path, source))
    }
}

impl SessionStorage for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        self.read()
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let _guard = lock_unpoisoned(&self.write_lock);
        self.write(session)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let _guard = lock_unpoisoned(&self.write_lock);
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionStoreError::io(
                "removing session file",
                &self.path,
                source,
            )),
        }
    }

    fn set_access_token(&self, token: &str) -> Result<(), SessionStoreError> {
        let _guard = lock_unpoisoned(&self.write_lock);
        let session = self.read()?.ok_or(SessionStoreError::NoSession)?;
        self.write(&session.with_access_token(token)?)
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(lock_unpoisoned(&self.session).clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        *lock_unpoisoned(&self.session) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        lock_unpoisoned(&self.session).take();
        Ok(())
    }

    fn set_access_token(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut slot = lock_unpoisoned(&self.session);
        let session = slot.clone().ok_or(SessionStoreError::NoSession)?;
        *slot = Some(session.with_access_token(token)?);
        Ok(())
    }
}

fn validate_session(path: &Path, session: &Session) -> Result<(), SessionStoreError> {
    if session.version != SESSION_FORMAT_VERSION {
        return Err(SessionStoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: session.version,
        });
    }

    if OffsetDateTime::parse(&session.saved_at, &Rfc3339).is_err() {
        return Err(SessionStoreError::InvalidTimestamp {
            path: path.to_path_buf(),
            field: "saved_at",
            value: session.saved_at.clone(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
