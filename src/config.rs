use std::path::PathBuf;

/// Run configuration, built from the command line.
/// Exclude patterns are path prefixes applied to files found by recursion.
#[derive(Debug, Default)]
pub struct Config {
    /// Prefixes of paths, relative to a walked directory, to skip.
    pub exclude: Vec<String>,
    /// Inputs in argument order.
    pub files: Vec<PathBuf>,
    /// Tag file destination; `None` means stdout.
    pub output: Option<PathBuf>,
    /// Descend into directory arguments.
    pub recurse: bool,
    /// Debug-level logging.
    pub verbose: bool,
}

impl Config {
    /// Whether a file discovered under a walked directory should be scanned.
    ///
    /// A path is skipped if it starts with any exclude pattern.
    /// Explicit file arguments never go through this check.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
