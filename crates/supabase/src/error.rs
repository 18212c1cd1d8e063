use engine::{AuthError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid supabase url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid endpoint {path}: {source}")]
    Endpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(_) => StoreError::Transport(err.to_string()),
            ClientError::InvalidUrl { .. } | ClientError::Endpoint { .. } => {
                StoreError::Backend(err.to_string())
            }
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        AuthError::Transport(err.to_string())
    }
}
