use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::asset::{Asset, AssetExtractor, AssetId, IdCounter, Mapping};
use crate::compiler::SourceTransformer;
use crate::error::{Error, Origin, Result};
use crate::options::{BuildOptions, IdentityPolicy};
use crate::resolver;

/// Assets in discovery order; the entry comes first.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    assets: Vec<Asset>,
    index: HashMap<AssetId, usize>,
}

impl Graph {
    pub fn from_assets(assets: Vec<Asset>) -> Self {
        let mut index = HashMap::with_capacity(assets.len());
        for (pos, asset) in assets.iter().enumerate() {
            index.entry(asset.id).or_insert(pos);
        }
        Self { assets, index }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    pub fn entry(&self) -> Option<&Asset> {
        self.assets.first()
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.index.get(&id).map(|&pos| &self.assets[pos])
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Id of the asset extracted from `path`; the first one in legacy builds.
    pub fn find_by_path(&self, path: &Path) -> Option<AssetId> {
        self.assets
            .iter()
            .find(|a| a.filename == path)
            .map(|a| a.id)
    }

    /// Every mapping value must name an asset of this graph.
    pub fn validate(&self) -> Result<()> {
        for asset in &self.assets {
            for (specifier, target) in asset.mapping.iter() {
                if !self.index.contains_key(&target) {
                    return Err(Error::BrokenGraph {
                        asset: asset.id,
                        specifier: specifier.to_string(),
                        target,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

/// Breadth-first expansion of the entry's relative imports.
pub struct GraphBuilder<T> {
    extractor: AssetExtractor<T>,
    options: BuildOptions,
}

impl<T: SourceTransformer> GraphBuilder<T> {
    pub fn new(transformer: T, options: BuildOptions) -> Self {
        Self {
            extractor: AssetExtractor::new(transformer),
            options,
        }
    }

    /// Build with a fresh counter, so the entry gets id 0.
    pub fn build(&self, entry: &Path) -> Result<Graph> {
        self.build_with(entry, &mut IdCounter::new())
    }

    pub fn build_with(&self, entry: &Path, ids: &mut IdCounter) -> Result<Graph> {
        let entry = resolver::canonicalize_entry(entry).map_err(|source| {
            Error::UnreadableSource {
                path: entry.to_path_buf(),
                origin: Origin::Entry,
                source,
            }
        })?;
        tracing::info!("building graph from {}", entry.display());

        let mut assets = vec![self.extractor.extract(&entry, ids)?];
        let mut seen: HashMap<PathBuf, AssetId> = HashMap::new();
        seen.insert(entry, assets[0].id);

        let mut cursor = 0;
        while cursor < assets.len() {
            let importer = assets[cursor].filename.clone();
            let dependencies = assets[cursor].dependencies.clone();
            let mut mapping = Mapping::new();

            for specifier in &dependencies {
                let path = resolver::resolve(&importer, specifier)?;

                let cached = match self.options.identity {
                    IdentityPolicy::Deduplicate => seen.get(&path).copied(),
                    IdentityPolicy::Legacy => None,
                };
                let id = match cached {
                    Some(id) => {
                        tracing::trace!("reusing asset {} for {}", id, path.display());
                        id
                    }
                    None => {
                        if let Some(limit) = self.options.asset_limit {
                            if assets.len() >= limit {
                                return Err(Error::AssetLimitExceeded { limit, path });
                            }
                        }
                        let child = self
                            .extractor
                            .extract(&path, ids)
                            .map_err(|e| e.imported_from(importer.clone(), specifier))?;
                        let id = child.id;
                        seen.entry(path).or_insert(id);
                        assets.push(child);
                        id
                    }
                };

                tracing::debug!("{}: \"{}\" -> {}", importer.display(), specifier, id);
                mapping.insert(specifier.as_str(), id);
            }

            assets[cursor].mapping = mapping;
            cursor += 1;
        }

        tracing::info!("graph complete: {} assets", assets.len());
        Ok(Graph::from_assets(assets))
    }
}
