use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::args::{self, Args};

/// Validated settings for a single upload. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    creds_path: PathBuf,
    file_path: PathBuf,
    folder_id: String,
    owner: Option<String>,
    all_drives: bool,
}

/// Problems with the invocation itself. Reported with the usage summary.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("{0}")]
    Arguments(String),
    /// Usage was explicitly requested.
    #[error("{0}")]
    Help(String),
    #[error("credspath {0:?} does not exist.")]
    MissingCredentials(String),
    #[error("filepath {0:?} does not exist.")]
    MissingSourceFile(String),
    #[error("folderid must not be empty.")]
    MissingFolderId,
}

impl Options {
    pub fn from_env() -> Result<Self, UsageError> {
        Self::parse_os(&args::command_name(), std::env::args_os().skip(1))
    }

    /// Like `parse`, for raw process arguments. Arguments that are not valid
    /// UTF-8 are rejected as a usage error.
    pub fn parse_os<I>(command: &str, args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = args
            .into_iter()
            .map(|arg| {
                arg.into_string().map_err(|arg| {
                    UsageError::Arguments(format!(
                        "argument {:?} is not valid UTF-8",
                        arg.to_string_lossy()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::parse(command, &args)
    }

    pub fn parse(command: &str, args: &[String]) -> Result<Self, UsageError> {
        let args = args::parse(command, args).map_err(|exit| match exit.status {
            Ok(()) => UsageError::Help(exit.output),
            Err(()) => UsageError::Arguments(exit.output.trim_end().to_string()),
        })?;
        Self::from_args(args)
    }

    pub fn from_args(args: Args) -> Result<Self, UsageError> {
        let creds_path = args.credspath.unwrap_or_default();
        if !is_file(&creds_path) {
            return Err(UsageError::MissingCredentials(creds_path));
        }

        let file_path = args.filepath.unwrap_or_default();
        if !is_file(&file_path) {
            return Err(UsageError::MissingSourceFile(file_path));
        }

        let folder_id = args.folderid.unwrap_or_default();
        if folder_id.is_empty() {
            return Err(UsageError::MissingFolderId);
        }

        Ok(Options {
            creds_path: creds_path.into(),
            file_path: file_path.into(),
            folder_id,
            owner: args.owner.filter(|owner| !owner.is_empty()),
            all_drives: args.alldrives,
        })
    }

    pub fn creds_path(&self) -> &Path {
        &self.creds_path
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Delegation subject, if the service account should act as a user.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn all_drives(&self) -> bool {
        self.all_drives
    }
}

fn is_file(path: &str) -> bool {
    !path.is_empty() && Path::new(path).is_file()
}
