/// Symbol classification and display naming for one lowered Go file.
use crate::types::{Decl, Ident, SourceTree, Tag, TagKind};

/// Build every tag for one file, in declaration order: the package tag
/// first, then one tag per function, method, type name and value name.
pub fn extract(tree: &SourceTree) -> Vec<Tag> {
    let file = tree.path.display().to_string();
    let package = tree.package.name.as_str();
    let mut tags = vec![make_tag(&file, &tree.package, tree.package.name.clone(), TagKind::Package)];

    for decl in &tree.decls {
        match decl {
            Decl::Function { has_receiver, name } => {
                let display = if *has_receiver {
                    name.name.clone()
                } else {
                    qualify(package, &name.name)
                };
                tags.push(make_tag(&file, name, display, TagKind::Function));
            },
            Decl::Type { names } => {
                for name in names {
                    tags.push(make_tag(&file, name, name.name.clone(), TagKind::Type));
                }
            },
            Decl::Value { names } => {
                for name in names {
                    tags.push(make_tag(&file, name, qualify(package, &name.name), TagKind::Variable));
                }
            },
            Decl::Import => {},
        }
    }

    return tags;
}

/// A name is private when its first character is a lowercase letter.
/// Anything else, including `_` and non-letters, counts as exported.
pub fn is_private(name: &str) -> bool {
    return name.chars().next().is_some_and(char::is_lowercase);
}

/// `package.Name` for exported names, the bare name otherwise.
fn qualify(package: &str, name: &str) -> String {
    if is_private(name) {
        return name.to_string();
    }
    return format!("{package}.{name}");
}

/// Tag anchored at the identifier's own line.
fn make_tag(file: &str, ident: &Ident, name: String, kind: TagKind) -> Tag {
    return Tag {
        file: file.to_string(),
        kind,
        line: ident.line,
        name,
    };
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn ident(name: &str, line: usize) -> Ident {
        Ident { name: name.to_string(), line }
    }

    fn tree(decls: Vec<Decl>) -> SourceTree {
        SourceTree {
            path: PathBuf::from("bar.go"),
            package: ident("bar", 1),
            decls,
        }
    }

    fn rendered(tree: &SourceTree) -> Vec<String> {
        extract(tree).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn package_tag_comes_first() {
        assert_eq!(rendered(&tree(Vec::new())), ["bar\tbar.go\t1;\"\tp"]);
    }

    #[test]
    fn exported_function_is_qualified() {
        let t = tree(vec![
            Decl::Function { has_receiver: false, name: ident("Foo", 2) },
            Decl::Function { has_receiver: false, name: ident("foo", 3) },
        ]);
        assert_eq!(
            rendered(&t)[1..],
            ["bar.Foo\tbar.go\t2;\"\tf", "foo\tbar.go\t3;\"\tf"]
        );
    }

    #[test]
    fn methods_are_never_qualified() {
        let t = tree(vec![Decl::Function { has_receiver: true, name: ident("Foo", 4) }]);
        assert_eq!(rendered(&t)[1], "Foo\tbar.go\t4;\"\tf");
    }

    #[test]
    fn types_are_never_qualified() {
        let t = tree(vec![Decl::Type { names: vec![ident("Foo", 2), ident("baz", 3)] }]);
        assert_eq!(rendered(&t)[1..], ["Foo\tbar.go\t2;\"\tt", "baz\tbar.go\t3;\"\tt"]);
    }

    #[test]
    fn each_value_name_gets_a_tag() {
        let t = tree(vec![Decl::Value {
            names: vec![ident("Red", 3), ident("green", 4), ident("_", 5)],
        }]);
        assert_eq!(
            rendered(&t)[1..],
            [
                "bar.Red\tbar.go\t3;\"\tv",
                "green\tbar.go\t4;\"\tv",
                "bar._\tbar.go\t5;\"\tv",
            ]
        );
    }

    #[test]
    fn imports_produce_nothing() {
        assert_eq!(extract(&tree(vec![Decl::Import])).len(), 1);
    }

    #[test]
    fn privacy_follows_unicode_lowercase() {
        assert!(is_private("helper"));
        assert!(is_private("état"));
        assert!(is_private("δ"));
        assert!(!is_private("Δ"));
        assert!(!is_private("Exported"));
        assert!(!is_private("_hidden"));
        assert!(!is_private("日本"));
        assert!(!is_private(""));
    }
}
