use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, parsing or projecting a Terraform state.
///
/// Every variant is user-facing: the binary prints it as a single line and
/// exits non-zero.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("no state files could be found under {}", .root.display())]
    StateNotFound { root: PathBuf },

    #[error(
        "found {} state files under {}, pass --state to pick one: {}",
        .candidates.len(),
        .root.display(),
        join_paths(.candidates)
    )]
    AmbiguousState {
        root: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to parse state file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid state file {}: module #{index} has an empty path", .path.display())]
    InvalidModule { path: PathBuf, index: usize },

    #[error(
        "invalid state file {}: resource '{key}' in module #{module} is not an object",
        .path.display()
    )]
    InvalidResource {
        path: PathBuf,
        module: usize,
        key: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid filter '{0}': expected key=value")]
    InvalidFilter(String),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
