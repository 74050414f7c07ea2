/// Core domain types: the lowered Go syntax tree and tag records.
use std::fmt;
use std::path::PathBuf;

/// An identifier token and the 1-based line it sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// One-based line number of the identifier in its file.
    pub line: usize,
    /// The identifier as written in the source.
    pub name: String,
}

/// A top-level declaration. Closed on purpose: adding a declaration kind
/// forces every consumer to decide what it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// `func Name(...)` or `func (r T) Name(...)`.
    Function {
        /// True for methods, i.e. declarations with a receiver.
        has_receiver: bool,
        /// Function or method name.
        name: Ident,
    },
    /// An `import` declaration. Produces no tags.
    Import,
    /// `type Name ...`, or every spec of a `type (...)` group.
    Type {
        /// Declared type names in source order.
        names: Vec<Ident>,
    },
    /// `var`/`const` declaration, grouped or not. Constants are tagged
    /// exactly like variables, so the two are not told apart.
    Value {
        /// Every declared name across all specs, in source order.
        names: Vec<Ident>,
    },
}

/// One parsed Go file: package name and its top-level declarations.
/// Dropped as soon as its tags are extracted.
#[derive(Debug, Clone)]
pub struct SourceTree {
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
    /// The name from the `package` clause.
    pub package: Ident,
    /// Path exactly as given on the command line.
    pub path: PathBuf,
}

/// Kind marker of a tag record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Functions and methods.
    Function,
    /// The package clause.
    Package,
    /// Type declarations.
    Type,
    /// Variables and constants.
    Variable,
}

impl TagKind {
    /// Single-character kind field of the tags file.
    pub const fn marker(self) -> char {
        return match self {
            TagKind::Function => 'f',
            TagKind::Package => 'p',
            TagKind::Type => 't',
            TagKind::Variable => 'v',
        };
    }
}

/// One line of the tags file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// File path as given on the command line.
    pub file: String,
    /// Symbol kind.
    pub kind: TagKind,
    /// One-based line number.
    pub line: usize,
    /// Display name, possibly package-qualified.
    pub name: String,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(
            f,
            "{}\t{}\t{};\"\t{}",
            self.name,
            self.file,
            self.line,
            self.kind.marker()
        );
    }
}
