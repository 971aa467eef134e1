use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::compiler::SourceTransformer;
use crate::error::{Error, Origin, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out asset ids for one build. Owned by the caller so runs are reproducible.
#[derive(Clone, Debug, Default)]
pub struct IdCounter {
    next: u32,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> AssetId {
        let id = AssetId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to `next_id` returns.
    pub fn peek(&self) -> AssetId {
        AssetId(self.next)
    }
}

/// Specifier to asset id, in the order the specifiers were first resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, AssetId)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an overwritten key keeps its position.
    pub fn insert(&mut self, specifier: impl Into<String>, id: AssetId) {
        let specifier = specifier.into();
        match self.entries.iter_mut().find(|(s, _)| *s == specifier) {
            Some(entry) => entry.1 = id,
            None => self.entries.push((specifier, id)),
        }
    }

    pub fn get(&self, specifier: &str) -> Option<AssetId> {
        self.entries
            .iter()
            .find(|(s, _)| s == specifier)
            .map(|(_, id)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AssetId)> {
        self.entries.iter().map(|(s, id)| (s.as_str(), *id))
    }

    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat JSON object, e.g. `{"./message.js":1}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (specifier, id) in &self.entries {
            map.serialize_entry(specifier, id)?;
        }
        map.end()
    }
}

/// One compiled source unit.
#[derive(Clone, Debug)]
pub struct Asset {
    pub id: AssetId,
    pub filename: PathBuf,
    pub dependencies: Vec<String>,
    pub code: String,
    pub mapping: Mapping,
}

/// Reads a file and runs it through a [`SourceTransformer`].
pub struct AssetExtractor<T> {
    transformer: T,
}

impl<T: SourceTransformer> AssetExtractor<T> {
    pub fn new(transformer: T) -> Self {
        Self { transformer }
    }

    /// `filename` must already be canonical; it becomes the asset's identity.
    pub fn extract(&self, filename: &Path, ids: &mut IdCounter) -> Result<Asset> {
        let source = std::fs::read_to_string(filename).map_err(|source| Error::UnreadableSource {
            path: filename.to_path_buf(),
            origin: Origin::Entry,
            source,
        })?;

        let transformed = self
            .transformer
            .transform(&source, filename)
            .map_err(|source| Error::Transform {
                path: filename.to_path_buf(),
                origin: Origin::Entry,
                source,
            })?;

        let id = ids.next_id();
        tracing::debug!(
            "extracted asset {} from {} ({} dependencies)",
            id,
            filename.display(),
            transformed.dependencies.len()
        );

        Ok(Asset {
            id,
            filename: filename.to_path_buf(),
            dependencies: transformed.dependencies,
            code: transformed.code,
            mapping: Mapping::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_monotonic() {
        let mut ids = IdCounter::new();
        assert_eq!(ids.next_id(), AssetId(0));
        assert_eq!(ids.next_id(), AssetId(1));
        assert_eq!(ids.peek(), AssetId(2));

        let mut ids = IdCounter::starting_at(10);
        assert_eq!(ids.next_id(), AssetId(10));
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let mut mapping = Mapping::new();
        mapping.insert("./b.js", AssetId(2));
        mapping.insert("./a.js", AssetId(1));
        assert_eq!(mapping.to_json(), r#"{"./b.js":2,"./a.js":1}"#);
    }

    #[test]
    fn test_mapping_overwrite_keeps_position() {
        let mut mapping = Mapping::new();
        mapping.insert("./a.js", AssetId(1));
        mapping.insert("./b.js", AssetId(2));
        mapping.insert("./a.js", AssetId(3));
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("./a.js"), Some(AssetId(3)));
        assert_eq!(mapping.specifiers().collect::<Vec<_>>(), vec!["./a.js", "./b.js"]);
    }

    #[test]
    fn test_empty_mapping_json() {
        assert_eq!(Mapping::new().to_json(), "{}");
    }
}
