use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not reach the server")]
    Transport(#[source] reqwest::Error),

    #[error("{message}")]
    Http { status: u16, message: String },

    /// A delete refused because other records still reference the target.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("Sign in to continue")]
    MissingCredential,

    #[error("Unexpected response from the server")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Http,
    Conflict,
    InvalidCredentials,
    Forbidden,
    RateLimited,
    Validation,
    MissingCredential,
    Decode,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Http { .. } => ErrorKind::Http,
            ClientError::Conflict(_) => ErrorKind::Conflict,
            ClientError::Auth(AuthError::InvalidCredentials(_)) => ErrorKind::InvalidCredentials,
            ClientError::Auth(AuthError::Forbidden(_)) => ErrorKind::Forbidden,
            ClientError::Auth(AuthError::RateLimited { .. }) => ErrorKind::RateLimited,
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::MissingCredential => ErrorKind::MissingCredential,
            ClientError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// The single line shown in the message area.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}
