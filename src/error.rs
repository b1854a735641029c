use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end an extraction run.
///
/// None of these are retried: the binary reports the message and exits
/// non-zero.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to fetch document from {source_ref}: {reason}")]
    Fetch { source_ref: String, reason: String },

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Table not found: no page contains {tried}")]
    TableNotFound { tried: String },

    #[error("No probe records could be extracted from the table text")]
    Parse,

    #[error("Unsupported format: {0} (expected json, yaml or csv)")]
    UnsupportedFormat(String),

    #[error("Failed to serialize output as {format}: {reason}")]
    Serialize { format: &'static str, reason: String },

    #[error("Failed to write output to {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    pub(crate) fn fetch(source_ref: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            source_ref: source_ref.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
