/// How the graph builder decides whether two imports name the same asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// One asset per canonical filename; cycles and diamonds reuse ids.
    #[default]
    Deduplicate,
    /// Every import edge extracts a fresh asset with a fresh id.
    ///
    /// Diamonds are bundled once per edge and a cycle never terminates unless
    /// [`BuildOptions::asset_limit`] is set.
    Legacy,
}

/// Instantiation semantics of the emitted runtime loader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Every `require` runs the module body again and returns new exports.
    #[default]
    Reexecute,
    /// A module body runs once per id; later requires share its exports.
    Cached,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub identity: IdentityPolicy,
    pub runtime: RuntimeMode,
    /// Abort once the graph would hold more than this many assets.
    pub asset_limit: Option<usize>,
}

impl BuildOptions {
    pub fn with_identity(mut self, identity: IdentityPolicy) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeMode) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_asset_limit(mut self, limit: usize) -> Self {
        self.asset_limit = Some(limit);
        self
    }
}
