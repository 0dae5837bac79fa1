use chrono::NaiveDate;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so handlers can
/// decide consistently between a re-prompt, a dialog cancel, and a generic
/// failure message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Bad user input. Reported with a re-prompt, never fatal.
    #[error("{0}")]
    Validation(String),

    /// Summary range where start is after end.
    #[error("invalid range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A referenced pet/entry/attachment does not exist (or is not owned by
    /// the requesting chat). Reported, and any active dialog is cancelled.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write or transaction failure in the store. Surfaced to the user as a
    /// generic failure; details go to the log.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
