/// Crate-level error types for gotags.
use std::path::PathBuf;

/// Every error names the input file it came from so that a failed run over
/// thousands of files still points at the one that broke it.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Go grammar could not be loaded into the parser.
    #[error("grammar: {0}")]
    Grammar(
        /// The wrapped language version mismatch.
        #[from]
        tree_sitter::LanguageError,
    ),

    /// Underlying I/O error while writing the tag file.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// The source file is not valid Go.
    #[error("error parsing file {} - {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Parser diagnostic, prefixed with `<path>:<line>:<col>`.
        reason: String,
    },

    /// The source file's metadata or content could not be read.
    #[error("error reading file {} - {source}", file.display())]
    ReadFailed {
        /// File that could not be read.
        file: PathBuf,
        /// The underlying filesystem error.
        source: std::io::Error,
    },

    /// The tag file given with `--output` could not be created.
    #[error("error writing file {} - {source}", file.display())]
    WriteFailed {
        /// Destination that could not be created.
        file: PathBuf,
        /// The underlying filesystem error.
        source: std::io::Error,
    },
}
