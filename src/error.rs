//! Error taxonomy shared by the library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A registered class is unknown to the method lister.
    #[error("class `{0}` doesn't exist")]
    ClassNotFound(String),

    #[error("can not write file `{}`", path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load schema resource `{name}`: {reason}")]
    SchemaResource { name: String, reason: String },

    #[error("failed to read source file `{}`", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file `{}`: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("failed to serialize document: {0}")]
    Serialize(String),
}

impl Error {
    pub(crate) fn schema(name: &str, reason: impl Into<String>) -> Self {
        Error::SchemaResource {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
