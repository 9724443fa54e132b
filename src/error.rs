use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with [`FslxError`].
pub type FslxResult<T> = std::result::Result<T, FslxError>;

/// Error types that can occur while registering, resolving, or running
/// operations.
///
/// Registration and configuration problems abort a run before any input
/// is touched; external-tool failures are recorded per input by the
/// dispatcher and never abort the remaining inputs.
#[derive(Debug, Error)]
pub enum FslxError {
    /// An operation with the same name is already registered.
    #[error("operation `{name}` is already registered")]
    DuplicateOperation { name: String },
    /// The dispatch key has no registry entry.
    #[error("unknown operation `{name}`")]
    UnknownOperation { name: String },
    /// The requested target directory does not exist.
    #[error("target directory does not exist: {}", path.display())]
    TargetDirectoryMissing { path: PathBuf },
    /// An input file does not exist or cannot be opened for reading.
    #[error("cannot read input file: {}", path.display())]
    MissingInput { path: PathBuf },
    /// The external binary could not be found on the search path.
    #[error("`{tool}` was not found on PATH")]
    ToolNotFound { tool: String },
    /// The external binary ran but reported failure.
    #[error("`{tool}` failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
    /// The external binary produced output we could not interpret.
    #[error("could not parse `{tool}` output: {output:?}")]
    UnparsableToolOutput { tool: String, output: String },
    /// The input image header carries no usable repetition time.
    #[error("no usable repetition time in the header of {}", path.display())]
    MissingTimingParameter { path: PathBuf },
    /// Registry metadata and dispatch arguments disagree. Unreachable when
    /// the parser is built from the same registry, but checked anyway.
    #[error("operation misconfigured: {detail}")]
    InvalidOperation { detail: String },
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
