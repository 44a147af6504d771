use std::env;
use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

use crate::error::StateError;

/// Where to read state from for a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    pub root: PathBuf,
    /// Explicit state file; bypasses discovery under `root`.
    pub state_file: Option<PathBuf>,
}

impl ReaderConfig {
    pub fn new(root: PathBuf, state_file: Option<PathBuf>) -> Self {
        Self { root, state_file }
    }

    /// Uses the current directory when no root is given.
    pub fn resolve(root: Option<PathBuf>, state_file: Option<PathBuf>) -> Result<Self, StateError> {
        let root = match root {
            Some(root) => root,
            None => env::current_dir().map_err(|source| StateError::Io {
                path: PathBuf::from("."),
                source,
            })?,
        };
        Ok(Self::new(root, state_file))
    }
}

/// Default log level for a `-v` count. `RUST_LOG` still takes precedence.
pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_to_current_dir() {
        let config = ReaderConfig::resolve(None, None).unwrap();
        assert_eq!(config.root, env::current_dir().unwrap());
        assert!(config.state_file.is_none());
    }

    #[test]
    fn test_resolve_keeps_explicit_paths() {
        let config = ReaderConfig::resolve(
            Some(PathBuf::from("infra")),
            Some(PathBuf::from("infra/prod.tfstate")),
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("infra"));
        assert_eq!(config.state_file, Some(PathBuf::from("infra/prod.tfstate")));
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_level(0), LevelFilter::WARN);
        assert_eq!(verbosity_level(1), LevelFilter::INFO);
        assert_eq!(verbosity_level(2), LevelFilter::DEBUG);
        assert_eq!(verbosity_level(7), LevelFilter::TRACE);
    }
}
