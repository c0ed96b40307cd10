//! Error type shared by the Haat crates

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures outside the extraction and composition rules
///
/// Extracting filters and composing descriptions never fail; errors come
/// from the config file and from category names supplied by callers.
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read, written or moved into place
    #[error("{action} {} failed: {source}", path.display())]
    ConfigIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected layout
    #[error("Parse {} failed: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// Config could not be rendered as TOML
    #[error("Serialize config failed: {0}")]
    ConfigSerialize(String),

    /// Category name outside the catalog's list
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

impl Error {
    pub(crate) fn config_io(
        action: &'static str,
        path: &std::path::Path,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Error::ConfigIo {
            action,
            path,
            source,
        }
    }

    /// True for errors caused by caller input rather than local state
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::UnknownCategory(_))
    }
}
