use reqwest::StatusCode;
use thiserror::Error;

/// Terminal outcome of an upstream request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt failed with a retryable error; carries the last one.
    #[error("upstream unavailable after {attempts} attempt(s): {cause}")]
    TransientUpstream {
        attempts: u32,
        #[source]
        cause: TransientCause,
    },

    /// The upstream answered but not with the structure we expect. Never retried.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("could not build upstream request: {0}")]
    InvalidRequest(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum TransientCause {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl FetchError {
    /// A single failed attempt, before the retry loop has counted it.
    pub fn transient(cause: TransientCause) -> Self {
        FetchError::TransientUpstream { attempts: 1, cause }
    }

    pub fn with_attempts(self, attempts: u32) -> Self {
        match self {
            FetchError::TransientUpstream { cause, .. } => {
                FetchError::TransientUpstream { attempts, cause }
            }
            other => other,
        }
    }
}

impl From<reqwest::Error> for TransientCause {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransientCause::Timeout(e)
        } else {
            TransientCause::Network(e)
        }
    }
}

/// Server-side and transport statuses worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}
