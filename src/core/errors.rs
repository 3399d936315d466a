use std::path::PathBuf;

/// All domain errors for keyferry.
///
/// Startup and write errors are fatal; fetch and response errors are
/// scoped to a single identifier and only bump the failure tally.
#[derive(Debug, thiserror::Error)]
pub enum KeyferryError {
    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "Invalid keyserver URL template: {detail}\n\n  \
         The template must be non-empty and contain exactly one %s placeholder,\n  \
         e.g. https://launchpad.net/~%s/+sshkeys"
    )]
    InvalidTemplate { detail: String },

    #[error(
        "Could not determine a home directory for the current user\n\n  \
         Set HOME, or pass an explicit destination with -o FILE."
    )]
    NoHomeDirectory,

    #[error("Could not prepare destination {path}: {source}")]
    DestinationSetup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("fetch failed: {reason}")]
    FetchFailed { reason: String },

    #[error("invalid key material: {detail}")]
    InvalidResponse { detail: String },

    #[error(
        "Write to {target} failed: {source}\n\n  \
         The destination may hold a partial record; aborting the batch."
    )]
    WriteFailed {
        target: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KeyferryError>;
