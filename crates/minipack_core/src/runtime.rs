use crate::options::RuntimeMode;

/// Loader that runs a module body on every require.
pub const REEXECUTE_LOADER_JS: &str = r#"
  function require(id) {
    const [fn, mapping] = modules[id];

    function localRequire(name) {
      if (!Object.prototype.hasOwnProperty.call(mapping, name)) {
        throw new Error("Cannot find module '" + name + "'");
      }
      return require(mapping[name]);
    }

    const module = { exports: {} };

    fn(localRequire, module, module.exports);

    return module.exports;
  }
"#;

/// Loader that instantiates each module once and shares its exports.
pub const CACHED_LOADER_JS: &str = r#"
  const cache = {};

  function require(id) {
    if (cache[id]) {
      return cache[id].exports;
    }

    const [fn, mapping] = modules[id];

    function localRequire(name) {
      if (!Object.prototype.hasOwnProperty.call(mapping, name)) {
        throw new Error("Cannot find module '" + name + "'");
      }
      return require(mapping[name]);
    }

    const module = { exports: {} };
    cache[id] = module;

    fn(localRequire, module, module.exports);

    return module.exports;
  }
"#;

pub fn loader(mode: RuntimeMode) -> &'static str {
    match mode {
        RuntimeMode::Reexecute => REEXECUTE_LOADER_JS,
        RuntimeMode::Cached => CACHED_LOADER_JS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexecute_loader_has_no_cache() {
        let js = loader(RuntimeMode::Reexecute);
        assert!(js.contains("function require(id)"));
        assert!(js.contains("function localRequire(name)"));
        assert!(js.contains("fn(localRequire, module, module.exports);"));
        assert!(!js.contains("cache"));
    }

    #[test]
    fn test_cached_loader_registers_before_running() {
        let js = loader(RuntimeMode::Cached);
        let register = js.find("cache[id] = module;").unwrap();
        let run = js.find("fn(localRequire, module, module.exports);").unwrap();
        assert!(register < run);
    }
}
