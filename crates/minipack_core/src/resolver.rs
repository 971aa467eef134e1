//! Relative specifier resolution.
//!
//! Paths are joined and normalized lexically: no extension probing, no
//! `node_modules` lookup and no symlink resolution.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Resolve `specifier` against the directory of the importing file.
pub fn resolve(importer: &Path, specifier: &str) -> Result<PathBuf> {
    if !is_relative(specifier) {
        return Err(Error::UnsupportedSpecifier {
            importer: importer.to_path_buf(),
            specifier: specifier.to_string(),
        });
    }
    let dir = importer.parent().unwrap_or(Path::new("/"));
    Ok(normalize(&dir.join(specifier)))
}

/// Make the entry path absolute against the working directory.
pub fn canonicalize_entry(entry: &Path) -> io::Result<PathBuf> {
    if entry.is_absolute() {
        return Ok(normalize(entry));
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize(&cwd.join(entry)))
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_detection() {
        assert!(is_relative("./a.js"));
        assert!(is_relative("../lib/b.js"));
        assert!(is_relative(".."));
        assert!(!is_relative("react"));
        assert!(!is_relative("/abs/c.js"));
        assert!(!is_relative(".hidden.js"));
    }

    #[test]
    fn test_resolve_joins_importer_dir() {
        let importer = Path::new("/project/src/entry.js");
        assert_eq!(
            resolve(importer, "./message.js").unwrap(),
            PathBuf::from("/project/src/message.js")
        );
        assert_eq!(
            resolve(importer, "../lib/./util.js").unwrap(),
            PathBuf::from("/project/lib/util.js")
        );
    }

    #[test]
    fn test_resolve_rejects_bare_specifier() {
        let err = resolve(Path::new("/project/src/entry.js"), "lodash").unwrap_err();
        match err {
            Error::UnsupportedSpecifier { importer, specifier } => {
                assert_eq!(importer, PathBuf::from("/project/src/entry.js"));
                assert_eq!(specifier, "lodash");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_normalize_stops_at_root() {
        assert_eq!(normalize(Path::new("/a/../../b.js")), PathBuf::from("/b.js"));
        assert_eq!(normalize(Path::new("a/./b/../c.js")), PathBuf::from("a/c.js"));
        assert_eq!(normalize(Path::new("../../c.js")), PathBuf::from("../../c.js"));
    }

    #[test]
    fn test_entry_made_absolute() {
        let entry = canonicalize_entry(Path::new("./example/entry.js")).unwrap();
        assert!(entry.is_absolute());
        assert!(entry.ends_with("example/entry.js"));
    }
}
