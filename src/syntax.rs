/// Lowering of the tree-sitter CST into the declaration-level `SourceTree`.
///
/// Tree-sitter never fails outright on bad input; it recovers by inserting
/// `ERROR` and `MISSING` nodes. Those are turned back into hard parse
/// failures here, along with the structural rules the Go front end enforces
/// at the top level (package clause first, declarations only).
use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::error::Error;
use crate::types::{Decl, Ident, SourceTree};

/// Longest snippet of offending source quoted in a diagnostic.
const SNIPPET_CHARS: usize = 24;

/// Decode raw file bytes as Go source text. Invalid UTF-8 is a parse
/// error positioned at the first bad byte.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if `bytes` is not valid UTF-8.
pub fn decode(path: &Path, bytes: Vec<u8>) -> Result<String, Error> {
    return String::from_utf8(bytes).map_err(|err| {
        let (line, column) = line_column(err.as_bytes(), err.utf8_error().valid_up_to());
        return parse_failure(path, line, column, "illegal UTF-8 encoding");
    });
}

/// Lower a parsed Go file into its package name and top-level declarations.
///
/// # Errors
///
/// Returns `Error::ParseFailed` on the first syntax error, on a missing or
/// misplaced package clause, or on a statement outside a function body.
pub fn lower(path: &Path, source: &str, tree: &Tree) -> Result<SourceTree, Error> {
    let lowering = Lowering { path, source };
    let root = tree.root_node();

    // Tree-sitter accepts NUL bytes; Go rejects them.
    if let Some(offset) = source.find('\0') {
        let (line, column) = line_column(source.as_bytes(), offset);
        return Err(lowering.failure(line, column, "illegal character NUL"));
    }

    if let Some(bad) = first_syntax_error(root) {
        let detail = lowering.describe_syntax_error(bad);
        return Err(lowering.failure_at(bad, &detail));
    }

    let mut package: Option<Ident> = None;
    let mut decls = Vec::new();
    let mut cursor = root.walk();

    for node in root.named_children(&mut cursor) {
        if node.is_extra() {
            continue;
        }
        if package.is_some() {
            decls.push(lowering.declaration(node)?);
            continue;
        }
        if node.kind() != "package_clause" {
            let detail = format!("expected 'package', found {}", node.kind());
            return Err(lowering.failure_at(node, &detail));
        }
        package = Some(lowering.package_name(node)?);
    }

    let Some(package) = package else {
        return Err(lowering.failure(1, 1, "expected 'package', found 'EOF'"));
    };

    return Ok(SourceTree {
        path: path.to_path_buf(),
        package,
        decls,
    });
}

/// One-based line and byte column of `offset` within `bytes`.
fn line_column(bytes: &[u8], offset: usize) -> (usize, usize) {
    let prefix = bytes.get(..offset).unwrap_or(bytes);
    let line_start = prefix
        .iter()
        .rposition(|&b| return b == b'\n')
        .map_or(0, |newline| return newline.saturating_add(1));
    let newlines = prefix.iter().filter(|&&b| return b == b'\n').count();
    return (newlines.saturating_add(1), offset.saturating_sub(line_start).saturating_add(1));
}

/// Parse failure with a `<path>:<line>:<col>: <detail>` reason.
fn parse_failure(path: &Path, line: usize, column: usize, detail: &str) -> Error {
    return Error::ParseFailed {
        file: path.to_path_buf(),
        reason: format!("{}:{line}:{column}: {detail}", path.display()),
    };
}

/// Depth-first search for the first `ERROR` or `MISSING` node in document order.
fn first_syntax_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_syntax_error(child) {
            return Some(found);
        }
    }
    return None;
}

/// File context shared by every lowering step, used to build diagnostics.
struct Lowering<'a> {
    /// Path reported in diagnostics.
    path: &'a Path,
    /// Full file text the tree was parsed from.
    source: &'a str,
}

impl Lowering<'_> {
    /// Lower one top-level node into a declaration.
    fn declaration(&self, node: Node<'_>) -> Result<Decl, Error> {
        return match node.kind() {
            "function_declaration" => Ok(Decl::Function {
                has_receiver: false,
                name: self.field_ident(node, "name")?,
            }),
            "method_declaration" => Ok(Decl::Function {
                has_receiver: true,
                name: self.field_ident(node, "name")?,
            }),
            "type_declaration" => {
                let mut names = Vec::new();
                self.collect_type_names(node, &mut names)?;
                Ok(Decl::Type { names })
            },
            "var_declaration" => {
                let mut names = Vec::new();
                self.collect_value_names(node, "var_spec", &mut names)?;
                Ok(Decl::Value { names })
            },
            "const_declaration" => {
                let mut names = Vec::new();
                self.collect_value_names(node, "const_spec", &mut names)?;
                Ok(Decl::Value { names })
            },
            "import_declaration" => Ok(Decl::Import),
            other => {
                let detail = format!("expected declaration, found {other}");
                Err(self.failure_at(node, &detail))
            },
        };
    }

    /// Names of every `type_spec` and `type_alias` under a type declaration.
    fn collect_type_names(&self, node: Node<'_>, names: &mut Vec<Ident>) -> Result<(), Error> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_spec" | "type_alias" => names.push(self.field_ident(child, "name")?),
                kind if kind.ends_with("_list") => self.collect_type_names(child, names)?,
                _ => {},
            }
        }
        return Ok(());
    }

    /// Names of every spec under a `var` or `const` declaration. Grouped
    /// declarations may wrap their specs in a `*_spec_list` node.
    fn collect_value_names(
        &self,
        node: Node<'_>,
        spec_kind: &str,
        names: &mut Vec<Ident>,
    ) -> Result<(), Error> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == spec_kind {
                let mut name_cursor = child.walk();
                for name in child.children_by_field_name("name", &mut name_cursor) {
                    // The field also covers the separating commas.
                    if name.is_named() {
                        names.push(self.ident(name)?);
                    }
                }
            } else if child.kind().ends_with("_spec_list") {
                self.collect_value_names(child, spec_kind, names)?;
            }
        }
        return Ok(());
    }

    /// The identifier inside a `package_clause`.
    fn package_name(&self, clause: Node<'_>) -> Result<Ident, Error> {
        let mut cursor = clause.walk();
        let name = clause
            .named_children(&mut cursor)
            .find(|child| return child.kind() == "package_identifier");
        return match name {
            Some(name) => self.ident(name),
            None => Err(self.failure_at(clause, "expected package name")),
        };
    }

    /// Identifier stored under `field` of `node`.
    fn field_ident(&self, node: Node<'_>, field: &str) -> Result<Ident, Error> {
        return match node.child_by_field_name(field) {
            Some(name) => self.ident(name),
            None => {
                let detail = format!("expected {field} in {}", node.kind());
                Err(self.failure_at(node, &detail))
            },
        };
    }

    /// Text and line of an identifier node.
    fn ident(&self, node: Node<'_>) -> Result<Ident, Error> {
        let name = node.utf8_text(self.source.as_bytes()).map_err(|err| {
            return self.failure_at(node, &err.to_string());
        })?;
        return Ok(Ident {
            line: node.start_position().row.saturating_add(1),
            name: name.to_string(),
        });
    }

    /// Go-style detail for an `ERROR` or `MISSING` node.
    fn describe_syntax_error(&self, node: Node<'_>) -> String {
        if node.is_missing() {
            return format!("expected '{}'", node.kind());
        }

        let text = node.utf8_text(self.source.as_bytes()).unwrap_or("");
        let snippet: String = text
            .lines()
            .map(str::trim)
            .find(|line| return !line.is_empty())
            .unwrap_or("")
            .chars()
            .take(SNIPPET_CHARS)
            .collect();

        if snippet.is_empty() {
            return "unexpected token".to_string();
        }
        return format!("unexpected {snippet}");
    }

    /// Parse failure positioned at the start of `node`.
    fn failure_at(&self, node: Node<'_>, detail: &str) -> Error {
        let point = node.start_position();
        return self.failure(
            point.row.saturating_add(1),
            point.column.saturating_add(1),
            detail,
        );
    }

    /// Parse failure at an explicit position in this file.
    fn failure(&self, line: usize, column: usize, detail: &str) -> Error {
        return parse_failure(self.path, line, column, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn lower_str(source: &str) -> Result<SourceTree, Error> {
        let mut parser = grammar::go_parser().unwrap();
        let tree = parser.parse(source, None).unwrap();
        lower(Path::new("t.go"), source, &tree)
    }

    fn names(idents: &[Ident]) -> Vec<&str> {
        idents.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn package_name_and_line() {
        let tree = lower_str("// header\n\npackage demo\n").unwrap();
        assert_eq!(tree.package, Ident { name: "demo".to_string(), line: 3 });
        assert!(tree.decls.is_empty());
    }

    #[test]
    fn functions_and_methods() {
        let src = "package demo\nfunc Hello() {}\nfunc (s *S) Run() {}\n";
        let tree = lower_str(src).unwrap();
        assert_eq!(
            tree.decls,
            vec![
                Decl::Function {
                    has_receiver: false,
                    name: Ident { name: "Hello".to_string(), line: 2 },
                },
                Decl::Function {
                    has_receiver: true,
                    name: Ident { name: "Run".to_string(), line: 3 },
                },
            ]
        );
    }

    #[test]
    fn grouped_types_and_aliases() {
        let src = "package demo\ntype (\n\tA struct{}\n\tB = int\n)\ntype C[T any] []T\n";
        let tree = lower_str(src).unwrap();
        let Decl::Type { names: group } = &tree.decls[0] else {
            panic!("expected type decl, got {:?}", tree.decls[0]);
        };
        assert_eq!(names(group), ["A", "B"]);
        assert_eq!(group[1].line, 4);
        let Decl::Type { names: single } = &tree.decls[1] else {
            panic!("expected type decl, got {:?}", tree.decls[1]);
        };
        assert_eq!(names(single), ["C"]);
    }

    #[test]
    fn grouped_values_keep_every_name() {
        let src = "package demo\nvar a, B int\nvar (\n\tx = 1\n\ty, _ = 2, 3\n)\n";
        let tree = lower_str(src).unwrap();
        let Decl::Value { names: first } = &tree.decls[0] else {
            panic!("expected var decl, got {:?}", tree.decls[0]);
        };
        assert_eq!(names(first), ["a", "B"]);
        let Decl::Value { names: group } = &tree.decls[1] else {
            panic!("expected var decl, got {:?}", tree.decls[1]);
        };
        assert_eq!(names(group), ["x", "y", "_"]);
        assert_eq!(group[2].line, 5);
    }

    #[test]
    fn implicit_const_repetition_still_names_each_constant() {
        let src = "package demo\nconst (\n\tRed = iota\n\tGreen\n\tBlue\n)\n";
        let tree = lower_str(src).unwrap();
        let Decl::Value { names: group } = &tree.decls[0] else {
            panic!("expected const decl, got {:?}", tree.decls[0]);
        };
        assert_eq!(names(group), ["Red", "Green", "Blue"]);
    }

    #[test]
    fn imports_lower_to_import() {
        let tree = lower_str("package demo\nimport \"fmt\"\nimport (\n\t\"os\"\n)\n").unwrap();
        assert_eq!(tree.decls, vec![Decl::Import, Decl::Import]);
    }

    #[test]
    fn syntax_error_reports_position() {
        let err = lower_str("package demo\n\nfunc broken( {\n").unwrap_err();
        let Error::ParseFailed { file, reason } = err else {
            panic!("expected parse failure");
        };
        assert_eq!(file, Path::new("t.go"));
        assert!(reason.starts_with("t.go:"), "reason: {reason}");
    }

    #[test]
    fn empty_file_lacks_package() {
        let err = lower_str("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "error parsing file t.go - t.go:1:1: expected 'package', found 'EOF'"
        );
    }

    #[test]
    fn declaration_before_package_is_rejected() {
        let err = lower_str("func f() {}\n").unwrap_err();
        assert!(err.to_string().contains("expected 'package'"), "{err}");
    }

    #[test]
    fn second_package_clause_is_rejected() {
        let err = lower_str("package a\npackage b\n").unwrap_err();
        assert!(matches!(err, Error::ParseFailed { .. }));
    }

    #[test]
    fn nul_byte_is_illegal() {
        let err = lower_str("package p\nvar X = 1\0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "error parsing file t.go - t.go:2:10: illegal character NUL"
        );
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = decode(Path::new("t.go"), b"package p\n// caf\xe9\n".to_vec()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error parsing file t.go - t.go:2:7: illegal UTF-8 encoding"
        );
    }

    #[test]
    fn valid_utf8_decodes_unchanged() {
        let text = decode(Path::new("t.go"), "package café\n".as_bytes().to_vec()).unwrap();
        assert_eq!(text, "package café\n");
    }
}
