use std::fmt::Write as _;

/// Storage-layer failures. Remote *absence* is deliberately not an error:
/// it is detected once, at connect time, and selects the local adapter
/// (see `GroupDb::connect`). A `Remote` failure after a successful init is
/// terminal for that operation; there is no automatic fallback.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("remote {op} on '{table}' failed: {message}")]
    Remote {
        op: &'static str,
        table: &'static str,
        message: String,
    },

    #[error("local storage quota exceeded")]
    QuotaExceeded,

    #[error("no matching record in '{table}'")]
    NotFound { table: &'static str },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Maps a write-side io error, promoting disk exhaustion to the
    /// user-visible quota variant.
    pub(crate) fn from_write_error(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::StorageFull | ErrorKind::QuotaExceeded => StoreError::QuotaExceeded,
            _ => StoreError::Io(err),
        }
    }
}

/// Per-field submit-time validation failures. These are raised before any
/// storage call is attempted, so a failed validation never touches either
/// backend.
#[derive(Debug, Default)]
pub struct ValidationError {
    pub issues: Vec<(&'static str, String)>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Consumes the collector: `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::from("validation failed");
        for (field, message) in &self.issues {
            let _ = write!(out, "; {field}: {message}");
        }
        f.write_str(&out)
    }
}

impl std::error::Error for ValidationError {}
