//! Error types and exit codes for go-include

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Every way a run can fail after the command line has been accepted.
#[derive(Error, Debug)]
pub enum IncludeError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("unsupported value for key {key:?}: {found} (only strings, numbers and booleans can be embedded)")]
    Schema { key: String, found: String },

    #[error("top-level {format} value must be a table of keys, found {found}")]
    NotATable {
        format: &'static str,
        found: String,
    },

    #[error("could not determine package of generated code: {0}")]
    Package(String),

    #[error("could not determine package of generated code: conflicting packages {first:?} ({first_file}) and {second:?} ({second_file})")]
    PackageConflict {
        first: String,
        first_file: PathBuf,
        second: String,
        second_file: PathBuf,
    },
}

impl IncludeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        IncludeError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            IncludeError::Usage(_) => ExitStatus::Usage,
            IncludeError::Io { .. } => ExitStatus::Io,
            IncludeError::Parse { .. } => ExitStatus::Parse,
            IncludeError::Schema { .. } | IncludeError::NotATable { .. } => ExitStatus::Schema,
            IncludeError::Package(_) | IncludeError::PackageConflict { .. } => ExitStatus::Package,
        }
    }
}

pub type Result<T> = std::result::Result<T, IncludeError>;

/// Process exit codes, loosely following sysexits.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    /// Anything not covered by a more specific code
    Failure = 1,
    /// Rejected by the argument parser (clap's own convention)
    Argument = 2,
    Usage = 64,
    Parse = 65,
    Schema = 66,
    Package = 70,
    Io = 74,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

/// Picks the exit status for an error bubbling out of `main`.
pub fn exit_status_for(err: &anyhow::Error) -> ExitStatus {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<IncludeError>())
        .map(IncludeError::exit_status)
        .unwrap_or(ExitStatus::Failure)
}
