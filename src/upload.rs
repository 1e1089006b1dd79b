use std::path::Path;

use google_drive3::api::{File, Scope};
use google_drive3::client;
use mime::Mime;
use tracing::info;

use crate::auth::Hub;
use crate::error::{Error, Result};
use crate::options::Options;

/// Everything `files.create` is called with, apart from the content.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub name: String,
    pub parents: Vec<String>,
    pub supports_all_drives: bool,
    pub mime: Mime,
}

impl CreateRequest {
    pub fn new(opts: &Options) -> Self {
        let path = opts.file_path();
        Self {
            name: display_name(path),
            parents: vec![opts.folder_id().to_string()],
            supports_all_drives: opts.all_drives(),
            mime: mime_guess::guess_mime_type(path),
        }
    }

    pub fn file(&self) -> File {
        File {
            name: Some(self.name.clone()),
            parents: Some(self.parents.clone()),
            ..Default::default()
        }
    }
}

/// Final component of the path, used as the remote file name.
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Creates a new file in the destination folder with the source file's
/// content. Exactly one request is made and nothing is retried.
pub async fn upload(opts: &Options, hub: &Hub) -> Result<()> {
    let path = opts.file_path();
    let content = std::fs::File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let request = CreateRequest::new(opts);
    info!(
        name = %request.name,
        folder = %opts.folder_id(),
        mime = %request.mime,
        all_drives = request.supports_all_drives,
        "uploading"
    );

    let result = hub
        .files()
        .create(request.file())
        .supports_all_drives(request.supports_all_drives)
        .add_scope(Scope::Full)
        .upload(content, request.mime.clone())
        .await;
    let (_, created) = match result {
        Ok(done) => done,
        Err(err) => return Err(upload_error(request.name, err).await),
    };

    info!(id = created.id.as_deref().unwrap_or_default(), "upload complete");
    Ok(())
}

/// Wraps a failed create call. A bare HTTP failure still has its body
/// unread; it is read here so drive's explanation ends up in the message.
async fn upload_error(name: String, err: client::Error) -> Error {
    match err {
        client::Error::Failure(response) => {
            let (parts, body) = response.into_parts();
            let bytes = hyper::body::to_bytes(body).await.unwrap_or_default();
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            Error::Upload {
                name,
                body: (!text.is_empty()).then_some(text),
                source: client::Error::Failure(hyper::Response::from_parts(
                    parts,
                    hyper::Body::from(bytes),
                )),
            }
        }
        source => Error::Upload {
            name,
            body: None,
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tests::valid_options;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    #[test_case("/tmp/report.pdf", "report.pdf")]
    #[test_case("report.pdf", "report.pdf")]
    #[test_case("/var/data/archive.tar.gz", "archive.tar.gz")]
    #[test_case("relative/dir/notes", "notes")]
    fn strips_directory(path: &str, want: &str) {
        assert_eq!(display_name(Path::new(path)), want);
    }

    fn source_file(suffix: &str) -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        file.write_all(b"%PDF-1.4")?;
        Ok(file)
    }

    #[test_case(false ; "own drive")]
    #[test_case(true ; "all drives")]
    fn maps_options_to_request(all_drives: bool) -> std::io::Result<()> {
        let creds = NamedTempFile::new()?;
        let file = source_file(".pdf")?;
        let opts = valid_options(creds.path(), file.path(), "", all_drives);

        let request = CreateRequest::new(&opts);
        assert_eq!(request.name, display_name(file.path()));
        assert!(request.name.ends_with(".pdf"), "{}", request.name);
        assert_eq!(request.parents, vec!["F123".to_string()]);
        assert_eq!(request.supports_all_drives, all_drives);
        assert_eq!(request.mime.to_string(), "application/pdf");
        Ok(())
    }

    #[test]
    fn unknown_extension_is_octet_stream() -> std::io::Result<()> {
        let creds = NamedTempFile::new()?;
        let file = source_file(".zzunknown")?;
        let opts = valid_options(creds.path(), file.path(), "", false);
        assert_eq!(
            CreateRequest::new(&opts).mime.to_string(),
            "application/octet-stream"
        );
        Ok(())
    }

    #[test]
    fn file_has_single_parent() -> std::io::Result<()> {
        let creds = NamedTempFile::new()?;
        let file = source_file(".pdf")?;
        let opts = valid_options(creds.path(), file.path(), "", false);

        let remote = CreateRequest::new(&opts).file();
        assert_eq!(remote.name, Some(display_name(file.path())));
        assert_eq!(remote.parents, Some(vec!["F123".to_string()]));
        assert_eq!(remote.id, None);
        Ok(())
    }

    #[tokio::test]
    async fn failure_keeps_drive_explanation() {
        let response = hyper::Response::builder()
            .status(hyper::StatusCode::FORBIDDEN)
            .body(hyper::Body::from("The user's Drive storage quota has been exceeded.\n"))
            .unwrap();

        let err = upload_error("report.pdf".into(), client::Error::Failure(response)).await;
        let message = err.to_string();
        assert!(message.contains("report.pdf"), "{message}");
        assert!(message.contains("quota has been exceeded."), "{message}");
        match err {
            Error::Upload {
                source: client::Error::Failure(response),
                ..
            } => assert_eq!(response.status(), hyper::StatusCode::FORBIDDEN),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_failures_keep_their_source() {
        let err = upload_error("report.pdf".into(), client::Error::Cancelled).await;
        assert!(matches!(err, Error::Upload { body: None, .. }), "{err:?}");
        assert!(std::error::Error::source(&err).is_some());
    }
}
