//! JSON file persistence for [`StateRecord`]s.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

use super::StateRecord;

/// Errors raised while loading or saving state.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the state file does not hold a valid record.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path that could not be parsed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the configured path cannot name a file.
    #[error("invalid state path {path}: {message}")]
    InvalidPath {
        /// Offending path.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

/// Abstraction over state persistence for dependency injection.
pub trait StateStore {
    /// Loads the stored record; a store with nothing saved yields an empty
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when the backing storage cannot be read
    /// or parsed.
    fn load(&self) -> Result<StateRecord, StateStoreError>;

    /// Persists the record and returns where it was written.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError`] when the record cannot be written.
    fn save(&self, record: &StateRecord) -> Result<Utf8PathBuf, StateStoreError>;
}

/// Stores a single record as pretty-printed JSON at a fixed path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateFile {
    path: Utf8PathBuf,
}

impl StateFile {
    /// Creates a store for the given path. Nothing is touched until the
    /// first load or save.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn parent(&self) -> &Utf8Path {
        match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        }
    }

    fn file_name(&self) -> Result<&str, StateStoreError> {
        self.path
            .file_name()
            .ok_or_else(|| StateStoreError::InvalidPath {
                path: self.path.clone(),
                message: String::from("state file path is missing a filename"),
            })
    }
}

fn io_error(path: &Utf8Path, err: &io::Error) -> StateStoreError {
    StateStoreError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

impl StateStore for StateFile {
    fn load(&self) -> Result<StateRecord, StateStoreError> {
        let file_name = self.file_name()?;
        let parent = self.parent();
        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(StateRecord::new()),
            Err(err) => return Err(io_error(parent, &err)),
        };

        let contents = match dir.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(StateRecord::new()),
            Err(err) => return Err(io_error(&self.path, &err)),
        };

        if contents.trim().is_empty() {
            return Ok(StateRecord::new());
        }

        serde_json::from_str(&contents).map_err(|err| StateStoreError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn save(&self, record: &StateRecord) -> Result<Utf8PathBuf, StateStoreError> {
        let file_name = self.file_name()?;
        let parent = self.parent();
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| io_error(parent, &err))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| io_error(parent, &err))?;

        let mut rendered =
            serde_json::to_string_pretty(record).map_err(|err| StateStoreError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        rendered.push('\n');

        dir.write(file_name, rendered)
            .map_err(|err| io_error(&self.path, &err))?;
        Ok(self.path.clone())
    }
}
