use thiserror::Error;

use crate::data::export::ExportError;
use crate::data::filter::InvalidSpec;

/// Failures surfaced to the user by the application state.
#[derive(Debug, Error)]
pub enum SieveError {
    /// The source file could not be read or parsed.
    #[error("could not load '{path}': {message}")]
    SourceLoad { path: String, message: String },

    #[error(transparent)]
    InvalidSpec(#[from] InvalidSpec),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
