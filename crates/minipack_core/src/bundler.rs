use std::path::Path;

use crate::compiler::{EsmTransformer, SourceTransformer};
use crate::error::Result;
use crate::graph::{Graph, GraphBuilder};
use crate::options::{BuildOptions, RuntimeMode};
use crate::runtime;

/// Serialize a finished graph into one self-executing script.
///
/// Each registry entry is `id: [function (require, module, exports) { code }, mapping]`;
/// the loader then requires the entry asset.
pub fn emit(graph: &Graph, mode: RuntimeMode) -> Result<String> {
    graph.validate()?;

    let mut modules = String::new();
    for asset in graph {
        modules.push_str(&format!(
            "  {}: [\n    function (require, module, exports) {{\n{}\n    }},\n    {},\n  ],\n",
            asset.id,
            asset.code,
            asset.mapping.to_json()
        ));
    }

    let start = graph
        .entry()
        .map(|entry| format!("\n  require({});\n", entry.id))
        .unwrap_or_default();

    tracing::debug!("emitting {} modules ({:?} runtime)", graph.len(), mode);

    Ok(format!(
        "(function (modules) {{{}{}}})({{\n{}}});\n",
        runtime::loader(mode),
        start,
        modules
    ))
}

/// Build the graph for `entry` with `transformer` and emit it.
pub fn bundle_with<T: SourceTransformer>(
    entry: &Path,
    transformer: T,
    options: &BuildOptions,
) -> Result<String> {
    let graph = GraphBuilder::new(transformer, options.clone()).build(entry)?;
    let artifact = emit(&graph, options.runtime)?;
    tracing::info!("bundled {} assets ({} bytes)", graph.len(), artifact.len());
    Ok(artifact)
}

pub fn bundle(entry: &Path, options: &BuildOptions) -> Result<String> {
    bundle_with(entry, EsmTransformer, options)
}
