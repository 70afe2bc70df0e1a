use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while dispatching actions, selecting props or routing.
///
/// `set_state` itself never fails. Everything here originates either in an
/// action invocation or in the collaborators around the store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no action named '{0}' is bound")]
    UnknownAction(String),

    #[error("action '{action}' got a bad argument at position {index}: {reason}")]
    BadArgument {
        action: String,
        index: usize,
        reason: String,
    },

    #[error("expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("failed to select props from state: {0}")]
    Select(#[from] serde_json::Error),

    #[error("no route for path '{0}'")]
    NoRoute(String),

    #[error("no handler for '{0}' events")]
    NoHandler(String),

    #[error("store has been dropped")]
    StoreDropped,

    #[error("action '{action}' failed: {message}")]
    Action { action: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when loading store configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
}
