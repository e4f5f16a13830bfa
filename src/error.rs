//! Error taxonomy for the CLI surface.
//!
//! Each variant maps onto a process exit code so handlers stay
//! `Result`-shaped and `main` owns termination. Empty listings are
//! deliberately not represented here: an absent collection key is a
//! diagnostic, not an error (see the `inventory` module).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The remote call itself failed (network, auth, API error text).
    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    /// A requested machine name has no entry in the address index.
    #[error("Machine not found")]
    NotFound,

    /// A required positional argument was not supplied.
    #[error("usage: {usage}\n{message}")]
    MissingArgument { usage: String, message: String },

    /// The first CLI token names no known command.
    #[error("command \"{0}\" not found")]
    CommandNotFound(String),

    /// A record in an otherwise-successful listing lacks a field the
    /// normalizer depends on.
    #[error("malformed record \"{key}\": missing {field}")]
    MalformedRecord { key: String, field: String },
}

impl Error {
    /// Exit code for this error: 2 for usage errors, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingArgument { .. } | Error::CommandNotFound(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
