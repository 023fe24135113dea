use thiserror::Error;

/// Errors used within the app.
///
/// The `Display` strings end up on the page verbatim, so HTTP failures keep
/// the backend's status code and body untouched.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{status} {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API base {0} cannot carry a path")]
    InvalidBaseUrl(String),
    #[error("Failed to render template: {0}")]
    TemplateError(#[from] askama::Error),
    #[error("Invalid path segment {0:?}")]
    InvalidSegment(String),
    #[error("No certificate found in metadata.")]
    MissingCertificate,
}
