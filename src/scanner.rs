use std::path::{Path, PathBuf};

use tree_sitter::Parser;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::syntax;
use crate::types::SourceTree;

/// Resolve the command-line inputs into the ordered list of files to scan.
/// Without `recurse` the arguments are used as given. With it, each directory
/// argument is replaced by the `.go` files beneath it, sorted by name and
/// filtered through the config's exclude prefixes.
///
/// # Errors
///
/// Returns `Error::ReadFailed` if an argument's metadata cannot be read.
pub fn expand_inputs(config: &Config) -> Result<Vec<PathBuf>, Error> {
    if !config.recurse {
        return Ok(config.files.clone());
    }

    let mut files = Vec::new();
    for arg in &config.files {
        let metadata = std::fs::metadata(arg).map_err(|source| {
            return Error::ReadFailed { file: arg.clone(), source };
        })?;
        if metadata.is_dir() {
            collect_go_files(arg, config, &mut files);
        } else {
            files.push(arg.clone());
        }
    }
    return Ok(files);
}

/// Walk `root` and collect every `.go` file the config allows.
/// Unreadable entries are skipped with a warning.
fn collect_go_files(root: &Path, config: &Config, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            },
        };
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| return ext != "go") {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
        if !config.should_scan(&relative) {
            tracing::debug!(path = %path.display(), "excluded");
            continue;
        }
        files.push(path.to_path_buf());
    }
}

/// Read and parse one Go file into its lowered syntax tree.
///
/// # Errors
///
/// Returns `Error::ReadFailed` if the metadata lookup or the read fails,
/// or `Error::ParseFailed` if the file is not valid UTF-8 or not valid Go.
pub fn scan_file(parser: &mut Parser, path: &Path) -> Result<SourceTree, Error> {
    let read_failed = |source: std::io::Error| return Error::ReadFailed { file: path.to_path_buf(), source };

    let size = std::fs::metadata(path).map_err(read_failed)?.len();
    tracing::debug!(path = %path.display(), size, "scanning");

    let bytes = std::fs::read(path).map_err(read_failed)?;
    let source = syntax::decode(path, bytes)?;
    let tree = parser.parse(&source, None).ok_or_else(|| return Error::ParseFailed {
        file: path.to_path_buf(),
        reason: format!("{}: parser returned no tree", path.display()),
    })?;

    return syntax::lower(path, &source, &tree);
}
