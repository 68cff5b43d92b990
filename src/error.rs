//! Error types shared across the journal.

use std::io;
use thiserror::Error;

use crate::controller::Screen;

#[derive(Debug, Error)]
pub enum Error {
    /// Terminal or filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Session blob could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be serialized
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A user action that is not allowed in the current state. Nothing changes when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("not available from the {0} screen")]
    NotAvailable(Screen),

    #[error("a name is needed to begin")]
    EmptyName,

    #[error("tonight's letter is empty")]
    EmptyDraft,

    #[error("you've already shared your letter tonight")]
    AlreadyWrittenToday,

    #[error("no letter at position {0}")]
    NoSuchLetter(usize),
}
