mod locate;
mod state;

pub use locate::{STATE_EXTENSION, find_state_files, locate_state_file};
pub use state::{Module, ResourceEntry, State};

use crate::config::ReaderConfig;
use crate::error::StateError;

/// Locates (unless an explicit file is configured) and parses the state.
pub fn read_state(config: &ReaderConfig) -> Result<State, StateError> {
    let path = match &config.state_file {
        Some(path) => path.clone(),
        None => locate_state_file(&config.root)?,
    };
    tracing::info!(path = %path.display(), "reading state file");
    State::load(&path)
}
