//! Minipack core: module graph construction and single-file bundle emission.

pub mod asset;
pub mod bundler;
pub mod compiler;
pub mod error;
pub mod graph;
pub mod options;
pub mod parser;
pub mod resolver;
pub mod runtime;

pub use asset::{Asset, AssetExtractor, AssetId, IdCounter, Mapping};
pub use bundler::{bundle, bundle_with, emit};
pub use compiler::{EsmTransformer, SourceTransformer, TransformError, Transformed};
pub use error::{Error, Origin, Result};
pub use graph::{Graph, GraphBuilder};
pub use options::{BuildOptions, IdentityPolicy, RuntimeMode};
