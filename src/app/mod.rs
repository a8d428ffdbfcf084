//! Application runtime composition modules.

pub(crate) mod config;
pub(crate) mod credentials;
pub(crate) mod output;
pub(crate) mod progress;
pub(crate) mod prompt;
pub(crate) mod settings;
pub(crate) mod terminal;
