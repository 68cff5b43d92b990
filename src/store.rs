//! Durable slot holding the serialized session.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::Result;
use crate::session::{Profile, Session};

pub trait SessionStore {
    /// Reads the slot. Missing or corrupt data yields `Session::Uninitialized`.
    fn load(&self) -> Session;

    /// Replaces the whole slot with `profile`.
    fn save(&mut self, profile: &Profile) -> Result<()>;
}

/// Decodes a slot's contents, failing soft to `Uninitialized`.
pub fn decode(contents: &str) -> Session {
    match serde_json::from_str::<Profile>(contents) {
        Ok(profile) => Session::from_profile(profile),
        Err(e) => {
            warn!(error = %e, "session data is corrupt, starting fresh");
            Session::Uninitialized
        }
    }
}

/// JSON file store. Writes go to a sibling temp file that is renamed over the slot.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Session {
        match fs::read_to_string(&self.path) {
            Ok(contents) => decode(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved session");
                Session::Uninitialized
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read saved session");
                Session::Uninitialized
            }
        }
    }

    fn save(&mut self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profile)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), letters = profile.letters.len(), "session saved");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// In-memory slot that round-trips through JSON like the file store.
    #[derive(Default)]
    pub struct MemoryStore {
        pub blob: Option<String>,
        pub saves: usize,
        pub fail: bool,
    }

    impl MemoryStore {
        pub fn with_profile(profile: &Profile) -> Self {
            MemoryStore {
                blob: Some(serde_json::to_string(profile).unwrap()),
                ..Default::default()
            }
        }
    }

    impl SessionStore for MemoryStore {
        fn load(&self) -> Session {
            self.blob.as_deref().map(decode).unwrap_or(Session::Uninitialized)
        }

        fn save(&mut self, profile: &Profile) -> Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only slot").into());
            }
            self.blob = Some(serde_json::to_string(profile)?);
            self.saves += 1;
            Ok(())
        }
    }
}
