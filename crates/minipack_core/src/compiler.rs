//! ES module to CommonJS compilation.
//!
//! Imports and exports are rewritten from the spans recorded by
//! [`crate::parser`]; everything else in the unit is copied through verbatim.

use std::path::Path;

use crate::parser::{parse_module, ImportBinding, ModuleItem, ModuleRecord};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Output of a [`SourceTransformer`] for one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transformed {
    /// Raw import specifiers, in declaration order.
    pub dependencies: Vec<String>,
    /// Code runnable inside `function (require, module, exports) { ... }`.
    pub code: String,
}

/// Front-end turning one unit of source text into runnable code.
pub trait SourceTransformer {
    fn transform(&self, source: &str, filename: &Path) -> Result<Transformed, TransformError>;
}

impl<T: SourceTransformer + ?Sized> SourceTransformer for &T {
    fn transform(&self, source: &str, filename: &Path) -> Result<Transformed, TransformError> {
        (**self).transform(source, filename)
    }
}

/// Default front-end: parses with oxc and lowers module syntax to CommonJS.
#[derive(Clone, Copy, Debug, Default)]
pub struct EsmTransformer;

impl SourceTransformer for EsmTransformer {
    fn transform(&self, source: &str, filename: &Path) -> Result<Transformed, TransformError> {
        compile(source, filename)
    }
}

pub fn compile(source: &str, filename: &Path) -> Result<Transformed, TransformError> {
    let record = parse_module(source, filename)?;
    Ok(Transformed {
        dependencies: record.dependencies(),
        code: transform_cjs(source, &record),
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// `.name` when `name` is a valid identifier, `["name"]` otherwise.
fn member(name: &str) -> String {
    if is_identifier(name) {
        format!(".{name}")
    } else {
        format!("[{}]", js_string(name))
    }
}

fn export_assignment(exported: &str, value: &str) -> String {
    format!("exports{} = {};", member(exported), value)
}

fn require_call(specifier: &str) -> String {
    format!("require({})", js_string(specifier))
}

/// Rewrite the module statements of `source` into CommonJS.
///
/// Dependencies are required ahead of the body in source order, the way an
/// ES module evaluates its imports before its own statements.
pub fn transform_cjs(source: &str, record: &ModuleRecord) -> String {
    if !record.has_module_syntax() {
        return source[record.body_start..].to_string();
    }

    let mut prologue = String::from(
        "\"use strict\";\nObject.defineProperty(exports, \"__esModule\", { value: true });\n",
    );
    let mut requires = String::new();
    let mut epilogue = String::new();
    let mut out = String::with_capacity(source.len());
    let mut cursor = record.body_start;
    let mut temps = 0usize;
    let mut fresh = || {
        let name = format!("_minipack_dep_{temps}");
        temps += 1;
        name
    };

    for item in &record.items {
        let range = item.range();
        out.push_str(&source[cursor..range.start]);
        cursor = range.end;

        match item {
            ModuleItem::Import {
                source: specifier,
                bindings,
                ..
            } => {
                if bindings.is_empty() {
                    requires.push_str(&format!("{};\n", require_call(specifier)));
                    continue;
                }
                let temp = fresh();
                requires.push_str(&format!("const {temp} = {};\n", require_call(specifier)));
                for binding in bindings {
                    let line = match binding {
                        ImportBinding::Default(local) => format!(
                            "const {local} = {temp} && {temp}.__esModule ? {temp}.default : {temp};\n"
                        ),
                        ImportBinding::Named { imported, local } => {
                            format!("const {local} = {temp}{};\n", member(imported))
                        }
                        ImportBinding::Namespace(local) => format!("const {local} = {temp};\n"),
                    };
                    requires.push_str(&line);
                }
            }
            ModuleItem::ExportDeclaration {
                declaration_start,
                names,
                hoisted,
                ..
            } => {
                out.push_str(&source[*declaration_start..range.end]);
                let assignments = names
                    .iter()
                    .map(|name| export_assignment(name, name))
                    .collect::<Vec<_>>()
                    .join("\n");
                if *hoisted {
                    prologue.push_str(&assignments);
                    prologue.push('\n');
                } else {
                    out.push('\n');
                    out.push_str(&assignments);
                }
            }
            ModuleItem::ExportDefaultExpression {
                expression_start, ..
            } => {
                let expression = &source[*expression_start..range.end];
                out.push_str("exports.default = ");
                out.push_str(expression);
                if !expression.trim_end().ends_with(';') {
                    out.push(';');
                }
            }
            ModuleItem::ExportDefaultDeclaration {
                declaration_start,
                name,
                hoisted,
                ..
            } => {
                out.push_str(&source[*declaration_start..range.end]);
                let assignment = export_assignment("default", name);
                if *hoisted {
                    prologue.push_str(&assignment);
                    prologue.push('\n');
                } else {
                    out.push('\n');
                    out.push_str(&assignment);
                }
            }
            ModuleItem::ExportLocal { specifiers, .. } => {
                // assigned last so `let`/`const` bindings are initialized
                for (local, exported) in specifiers {
                    epilogue.push('\n');
                    epilogue.push_str(&export_assignment(exported, local));
                }
            }
            ModuleItem::ReExport {
                source: specifier,
                specifiers,
                ..
            } => {
                let temp = fresh();
                requires.push_str(&format!("const {temp} = {};\n", require_call(specifier)));
                for (imported, exported) in specifiers {
                    requires.push_str(&export_assignment(
                        exported,
                        &format!("{temp}{}", member(imported)),
                    ));
                    requires.push('\n');
                }
            }
            ModuleItem::ReExportAll {
                source: specifier,
                namespace: Some(namespace),
                ..
            } => {
                requires.push_str(&export_assignment(namespace, &require_call(specifier)));
                requires.push('\n');
            }
            ModuleItem::ReExportAll {
                source: specifier,
                namespace: None,
                ..
            } => {
                let temp = fresh();
                requires.push_str(&format!(
                    "const {temp} = {};\n\
                     Object.keys({temp}).forEach(function (key) {{\n\
                     \x20 if (key === \"default\" || key === \"__esModule\") return;\n\
                     \x20 if (Object.prototype.hasOwnProperty.call(exports, key)) return;\n\
                     \x20 exports[key] = {temp}[key];\n\
                     }});\n",
                    require_call(specifier)
                ));
            }
        }
    }
    out.push_str(&source[cursor..]);

    prologue.push_str(&requires);
    prologue.push_str(&out);
    prologue.push_str(&epilogue);
    prologue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_access() {
        assert_eq!(member("foo"), ".foo");
        assert_eq!(member("$el_2"), ".$el_2");
        assert_eq!(member("kebab-case"), "[\"kebab-case\"]");
        assert_eq!(member("1st"), "[\"1st\"]");
    }

    #[test]
    fn test_plain_script_passes_through() {
        let source = "module.exports = 1;";
        let out = compile(source, Path::new("plain.js")).unwrap();
        assert_eq!(out.code, source);
        assert!(out.dependencies.is_empty());
    }

    #[test]
    fn test_hashbang_dropped_from_script() {
        let out = compile("#!/usr/bin/env node\nmodule.exports = 1;", Path::new("bin.js")).unwrap();
        assert_eq!(out.code, "\nmodule.exports = 1;");
    }
}
