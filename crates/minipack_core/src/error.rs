//! Build failures. Every variant is fatal to the run.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::asset::AssetId;
use crate::compiler::TransformError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Where a file entered the build: as the entry, or through an import.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Origin {
    #[default]
    Entry,
    Import { importer: PathBuf, specifier: String },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Entry => Ok(()),
            Origin::Import { importer, specifier } => {
                write!(f, " (imported as \"{}\" from {})", specifier, importer.display())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}{origin}: {source}", .path.display())]
    UnreadableSource {
        path: PathBuf,
        origin: Origin,
        #[source]
        source: io::Error,
    },
    #[error("cannot transform {}{origin}: {source}", .path.display())]
    Transform {
        path: PathBuf,
        origin: Origin,
        #[source]
        source: TransformError,
    },
    #[error("unsupported specifier \"{specifier}\" in {}: only relative imports can be bundled", .importer.display())]
    UnsupportedSpecifier { importer: PathBuf, specifier: String },
    #[error("broken graph: asset {asset} maps \"{specifier}\" to missing asset {target}")]
    BrokenGraph {
        asset: AssetId,
        specifier: String,
        target: AssetId,
    },
    #[error("asset limit of {limit} exceeded while expanding {}", .path.display())]
    AssetLimitExceeded { limit: usize, path: PathBuf },
}

impl Error {
    /// Attach the import site to a failure raised while extracting a dependency.
    pub(crate) fn imported_from(self, importer: PathBuf, specifier: &str) -> Self {
        let origin = Origin::Import {
            importer,
            specifier: specifier.to_string(),
        };
        match self {
            Error::UnreadableSource { path, source, .. } => Error::UnreadableSource {
                path,
                origin,
                source,
            },
            Error::Transform { path, source, .. } => Error::Transform {
                path,
                origin,
                source,
            },
            other => other,
        }
    }
}
