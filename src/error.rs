use thiserror::Error;

pub type Result<T> = std::result::Result<T, RosterError>;

/// Failures surfaced by roster operations.
///
/// None of these are fatal; the REPL reports them and keeps reading commands.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A field is missing or holds an invalid value
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    /// No record exists with the given identifier
    #[error("student {0} not found")]
    NotFound(u64),
    /// Seed document or storage content could not be understood
    #[error("malformed data; {0}")]
    Data(String),
    /// Seed document could not be read
    #[error("failed to fetch seed document `{path}`; {source}")]
    Fetch {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage failure; {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown command `{0}`.")]
    UnknownCommand(String),
}

impl RosterError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(value: serde_json::Error) -> Self {
        Self::Data(value.to_string())
    }
}
