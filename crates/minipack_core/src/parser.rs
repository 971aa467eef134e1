use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Declaration, ExportDefaultDeclarationKind, ImportDeclarationSpecifier, ModuleExportName,
    Statement,
};
use oxc_ast::syntax_directed_operations::BoundNames;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use std::path::Path;

use crate::compiler::TransformError;

/// Byte range of a statement in the original source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Range {
    fn from(span: Span) -> Self {
        Self {
            start: span.start as usize,
            end: span.end as usize,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportBinding {
    Default(String),
    Named { imported: String, local: String },
    Namespace(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleItem {
    Import {
        range: Range,
        source: String,
        bindings: Vec<ImportBinding>,
    },
    /// `export const|let|var|class|function ...`
    ExportDeclaration {
        range: Range,
        declaration_start: usize,
        names: Vec<String>,
        hoisted: bool,
    },
    /// `export default <expr>` and anonymous default functions/classes.
    ExportDefaultExpression { range: Range, expression_start: usize },
    /// `export default function f() {}` / `export default class C {}`
    ExportDefaultDeclaration {
        range: Range,
        declaration_start: usize,
        name: String,
        hoisted: bool,
    },
    /// `export { a, b as c }`, as `(local, exported)` pairs.
    ExportLocal {
        range: Range,
        specifiers: Vec<(String, String)>,
    },
    /// `export { a as b } from "./x"`, as `(imported, exported)` pairs.
    ReExport {
        range: Range,
        source: String,
        specifiers: Vec<(String, String)>,
    },
    /// `export * from "./x"` and `export * as ns from "./x"`.
    ReExportAll {
        range: Range,
        source: String,
        namespace: Option<String>,
    },
}

impl ModuleItem {
    pub fn range(&self) -> Range {
        match self {
            ModuleItem::Import { range, .. }
            | ModuleItem::ExportDeclaration { range, .. }
            | ModuleItem::ExportDefaultExpression { range, .. }
            | ModuleItem::ExportDefaultDeclaration { range, .. }
            | ModuleItem::ExportLocal { range, .. }
            | ModuleItem::ReExport { range, .. }
            | ModuleItem::ReExportAll { range, .. } => *range,
        }
    }

    /// The specifier this item pulls in, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            ModuleItem::Import { source, .. }
            | ModuleItem::ReExport { source, .. }
            | ModuleItem::ReExportAll { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The import/export statements of one unit, in source order.
#[derive(Clone, Debug, Default)]
pub struct ModuleRecord {
    pub items: Vec<ModuleItem>,
    /// Offset of the first byte after a `#!` line, 0 without one.
    pub body_start: usize,
}

impl ModuleRecord {
    pub fn has_module_syntax(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn dependencies(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.source().map(str::to_string))
            .collect()
    }
}

fn export_name(name: &ModuleExportName) -> String {
    name.name().to_string()
}

/// Units are parsed as plain JavaScript modules; TypeScript and JSX have no
/// lowering and would reach the bundle untranslated.
fn source_type(path: &Path) -> Result<SourceType, TransformError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext @ ("ts" | "mts" | "cts" | "tsx" | "jsx")) => Err(TransformError::new(format!(
            "unsupported source type `.{ext}`: only plain JavaScript can be bundled"
        ))),
        _ => Ok(SourceType::mjs()),
    }
}

pub fn parse_module(source: &str, path: &Path) -> Result<ModuleRecord, TransformError> {
    let allocator = Allocator::default();
    let source_type = source_type(path)?;

    let ret = Parser::new(&allocator, source, source_type).parse();

    if !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TransformError::new(message));
    }

    let mut record = ModuleRecord {
        body_start: ret
            .program
            .hashbang
            .as_ref()
            .map_or(0, |hashbang| hashbang.span.end as usize),
        ..ModuleRecord::default()
    };

    for stmt in ret.program.body.iter() {
        let range = Range::from(stmt.span());
        match stmt {
            Statement::ImportDeclaration(decl) => {
                let mut bindings = Vec::new();
                if let Some(specifiers) = &decl.specifiers {
                    for spec in specifiers.iter() {
                        match spec {
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                                bindings.push(ImportBinding::Default(s.local.name.to_string()));
                            }
                            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                                bindings
                                    .push(ImportBinding::Namespace(s.local.name.to_string()));
                            }
                            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                                bindings.push(ImportBinding::Named {
                                    imported: export_name(&s.imported),
                                    local: s.local.name.to_string(),
                                });
                            }
                        }
                    }
                }
                record.items.push(ModuleItem::Import {
                    range,
                    source: decl.source.value.to_string(),
                    bindings,
                });
            }
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    let declaration_start = declaration.span().start as usize;
                    let mut names = Vec::new();
                    let hoisted = match declaration {
                        Declaration::FunctionDeclaration(func) => {
                            names.extend(func.id.as_ref().map(|id| id.name.to_string()));
                            true
                        }
                        Declaration::ClassDeclaration(class) => {
                            names.extend(class.id.as_ref().map(|id| id.name.to_string()));
                            false
                        }
                        Declaration::VariableDeclaration(var) => {
                            var.bound_names(&mut |id| names.push(id.name.to_string()));
                            false
                        }
                        _ => continue,
                    };
                    record.items.push(ModuleItem::ExportDeclaration {
                        range,
                        declaration_start,
                        names,
                        hoisted,
                    });
                    continue;
                }

                let specifiers = decl
                    .specifiers
                    .iter()
                    .map(|s| (export_name(&s.local), export_name(&s.exported)))
                    .collect();
                match &decl.source {
                    Some(source) => record.items.push(ModuleItem::ReExport {
                        range,
                        source: source.value.to_string(),
                        specifiers,
                    }),
                    None => record.items.push(ModuleItem::ExportLocal { range, specifiers }),
                }
            }
            Statement::ExportAllDeclaration(decl) => {
                record.items.push(ModuleItem::ReExportAll {
                    range,
                    source: decl.source.value.to_string(),
                    namespace: decl.exported.as_ref().map(export_name),
                });
            }
            Statement::ExportDefaultDeclaration(decl) => {
                let declaration_start = decl.declaration.span().start as usize;
                let named = match &decl.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => func
                        .id
                        .as_ref()
                        .map(|id| (id.name.to_string(), true)),
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => class
                        .id
                        .as_ref()
                        .map(|id| (id.name.to_string(), false)),
                    _ => None,
                };
                let item = match named {
                    Some((name, hoisted)) => ModuleItem::ExportDefaultDeclaration {
                        range,
                        declaration_start,
                        name,
                        hoisted,
                    },
                    None => ModuleItem::ExportDefaultExpression {
                        range,
                        expression_start: declaration_start,
                    },
                };
                record.items.push(item);
            }
            _ => {}
        }
    }

    tracing::trace!("{}: {} module items", path.display(), record.items.len());
    Ok(record)
}

/// Import specifiers of a unit, in declaration order.
pub fn extract_dependencies(source: &str, path: &Path) -> Result<Vec<String>, TransformError> {
    parse_module(source, path).map(|record| record.dependencies())
}
