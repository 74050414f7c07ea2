mod config;
mod error;
mod extractor;
mod grammar;
mod scanner;
mod syntax;
mod tags;
mod types;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::config::Config;
use crate::tags::TagList;

/// Generate a sorted exuberant-ctags tag file for Go sources.
#[derive(Parser)]
#[command(name = "gotags", about = "Generate a ctags file for Go source files")]
struct Cli {
    /// Skip recursed files whose path under the walked directory starts with PREFIX
    #[arg(long, value_name = "PREFIX")]
    exclude: Vec<String>,
    /// Go source files to index. Put paths that start with `-` after `--`
    files: Vec<PathBuf>,
    /// Write the tag file here instead of stdout (`-` for stdout)
    #[arg(short = 'f', long)]
    output: Option<PathBuf>,
    /// Descend into directory arguments and index every .go file beneath them
    #[arg(short = 'R', long)]
    recurse: bool,
    /// Log each scanned file to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        return Self {
            exclude: cli.exclude,
            files: cli.files,
            output: cli.output.filter(|path| return path.as_os_str() != "-"),
            recurse: cli.recurse,
            verbose: cli.verbose,
        };
    }
}

fn main() -> ExitCode {
    let config = Config::from(Cli::parse());
    init_tracing(config.verbose);

    return match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    };
}

/// Install a stderr subscriber. Stdout carries the tag file only.
fn init_tracing(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Scan every input, then sort and write the tag file once.
/// Nothing is written unless every file parsed.
///
/// # Errors
///
/// Returns the first read or parse failure, or an I/O error while writing.
fn run(config: &Config) -> Result<(), error::Error> {
    let inputs = scanner::expand_inputs(config)?;
    let mut parser = grammar::go_parser()?;
    let mut tags = TagList::default();

    for path in &inputs {
        let tree = scanner::scan_file(&mut parser, path)?;
        let file_tags = extractor::extract(&tree);
        tracing::debug!(path = %path.display(), tags = file_tags.len(), "extracted");
        tags.extend(file_tags);
    }

    tracing::debug!(files = inputs.len(), tags = tags.len(), "writing tag file");
    let sorted = tags.into_sorted();

    return match &config.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| {
                return error::Error::WriteFailed { file: path.clone(), source };
            })?;
            sorted.write_to(BufWriter::new(file))
        },
        None => sorted.write_to(BufWriter::new(io::stdout().lock())),
    };
}
