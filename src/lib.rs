//! terrastate - read-only views over Terraform state files
//!
//! Locates a `*.tfstate` file under a root directory, parses it, and projects
//! it into module names, fully-qualified resource names, or a filtered state.

pub mod config;
pub mod filter;
pub mod output;
pub mod terraform;

mod error;

pub use config::ReaderConfig;
pub use error::StateError;
pub use filter::{Filter, Selector};
pub use terraform::{Module, ResourceEntry, State, find_state_files, locate_state_file, read_state};
