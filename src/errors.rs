use thiserror::Error;

pub const EXIT_OK: i32 = 0;
pub const EXIT_HTTP_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_TRANSPORT: i32 = 3;

/// Everything that keeps the forwarder from producing a result object.
///
/// An error status returned by the endpoint is not one of these, it ends up
/// in the result object with `ok: false`.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Input(String),

    #[error("could not set up the http client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ForwardError {
    pub fn configuration(msg: impl Into<String>) -> ForwardError {
        ForwardError::Configuration(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> ForwardError {
        ForwardError::Input(msg.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ForwardError::Configuration(_) | ForwardError::Input(_) => EXIT_USAGE,
            ForwardError::Client(_) | ForwardError::Transport { .. } => EXIT_TRANSPORT,
        }
    }
}
