mod args;

pub use args::{Cli, Command, ModulesFormat, ResourcesFormat, StateArgs};
