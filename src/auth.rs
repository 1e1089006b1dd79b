use google_drive3::oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::Options;

pub type Hub = google_drive3::DriveHub<HttpsConnector<HttpConnector>>;

const SERVICE_ACCOUNT: &str = "service_account";

/// Parses a service account key file. Only keys of type `service_account`
/// are accepted.
pub fn parse_key(bytes: &[u8]) -> Result<ServiceAccountKey> {
    let key: ServiceAccountKey =
        serde_json::from_slice(bytes).map_err(|source| Error::CredentialFormat {
            reason: "not a valid key file".to_string(),
            source: Some(source),
        })?;
    match key.key_type.as_deref() {
        Some(SERVICE_ACCOUNT) => Ok(key),
        other => Err(Error::CredentialFormat {
            reason: format!(
                "type is {:?}, expected {SERVICE_ACCOUNT:?}",
                other.unwrap_or_default()
            ),
            source: None,
        }),
    }
}

/// Builds a drive hub authenticated as the service account in the
/// credentials file, impersonating the owner if one was given.
///
/// No request is made here; the token is fetched on first use.
pub async fn resolve(opts: &Options) -> Result<Hub> {
    let path = opts.creds_path();
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let key = parse_key(&bytes)?;
    debug!(client_email = %key.client_email, subject = ?opts.owner(), "loaded service account key");

    let tls = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .https_only()
        .enable_http1()
        .build();

    let client = hyper::Client::builder().build(tls);

    let mut auth = ServiceAccountAuthenticator::builder(key).hyper_client(client.clone());
    if let Some(owner) = opts.owner() {
        auth = auth.subject(owner);
    }
    let auth = auth.build().await.map_err(Error::ServiceInit)?;

    Ok(google_drive3::DriveHub::new(client, auth))
}
