use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures after the invocation has been validated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse service account credentials: {reason}")]
    CredentialFormat {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },
    #[error("cannot initialize drive client")]
    ServiceInit(#[source] std::io::Error),
    /// `body` is the error text drive sent back, when it sent any.
    #[error("upload of {name:?} failed{}", .body.as_deref().map(|body| format!(": {body}")).unwrap_or_default())]
    Upload {
        name: String,
        body: Option<String>,
        #[source]
        source: google_drive3::client::Error,
    },
}
