use thiserror::Error;

use crate::access::Denial;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Policy denied a gated operation. Deterministic for a given path,
    /// policy, and filesystem state at check time; never retried.
    #[error("cannot {action} \"{path}\": {reason}")]
    Security {
        action: &'static str,
        path: String,
        reason: Denial,
    },

    /// The operation has no safe definition under this access model,
    /// regardless of policy.
    #[error("operation is not supported: {0}")]
    Unsupported(&'static str),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("i/o failure at \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Security { .. } => "security",
            Error::Unsupported(_) => "unsupported",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Io { .. } => "io",
        }
    }

    /// The offending path for errors that carry one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Security { path, .. } | Error::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
