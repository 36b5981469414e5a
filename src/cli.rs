//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::Parser;
use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::core::model::{Encoding, SearchOptions};
use crate::flows::search::{run_search, SearchRequest};

/// Version, with the commit appended when the build provides one
static VERSION: Lazy<String> = Lazy::new(|| match option_env!("REPORG_COMMIT") {
    Some(commit) if !commit.is_empty() => {
        format!("{} (commit: {})", env!("CARGO_PKG_VERSION"), commit)
    }
    _ => env!("CARGO_PKG_VERSION").to_string(),
});

/// reporg - search git repositories with ripgrep and generate shareable references.
#[derive(Parser, Debug)]
#[command(name = "reporg")]
#[command(
    author,
    version = VERSION.as_str(),
    about,
    long_about = r#"reporg searches Git repositories using ripgrep and outputs results in TSV format.

Each result line has four tab-separated columns:
    repository    owner/name of the GitHub origin remote
    local_path    path relative to the repository root, plus ":line"
    matched_line  the matched text (tabs/newlines replaced by spaces)
    github_url    https://github.com/<owner>/<name>/blob/<branch>/<path>#L<line>

Every REPO must be the top-level directory of a git repository whose origin
remote points at github.com. Results are written and flushed one line at a time.

Examples:
    reporg "TODO|FIXME" ~/src/app ~/src/lib
    reporg -i -g '*.go' -g '!*_test.go' "context.Context" .
    reporg -F "main()" . -o results.tsv
"#
)]
pub struct Cli {
    /// ripgrep regex pattern (or literal string with -F).
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Repository root directories to search.
    #[arg(
        value_name = "REPO",
        required = true,
        num_args = 1..,
        long_help = "Repository root directories to search, in order.\n\n\
Each path must be the top-level directory of a git repository; subdirectories are\n\
rejected. Paths that resolve to the same directory are searched once."
    )]
    pub repos: Vec<PathBuf>,

    /// Output file path (default: stdout).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Case-insensitive search.
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Include or exclude files matching a glob (repeatable).
    #[arg(
        short,
        long = "glob",
        value_name = "GLOB",
        long_help = "Include or exclude files matching a glob pattern. Can be given multiple\n\
times; later globs take precedence. Prefix with '!' to exclude.\n\n\
Example: -g '*.go' -g '!*_test.go'"
    )]
    pub glob: Vec<String>,

    /// Search hidden files and directories.
    #[arg(long)]
    pub hidden: bool,

    /// Treat the pattern as a literal string, not a regex.
    #[arg(short = 'F', long)]
    pub fixed_strings: bool,

    /// Maximum matched line length in output (0 = no limit).
    #[arg(
        short,
        long,
        default_value = "0",
        value_name = "N",
        env = "REPORG_MAX_LINE_LENGTH",
        long_help = "Maximum length of the matched line in output. Longer lines are cut to N\n\
characters and '...' is appended. 0 disables truncation."
    )]
    pub max_line_length: usize,

    /// Text encoding used by ripgrep to read files.
    #[arg(
        short = 'E',
        long,
        default_value = "auto",
        value_name = "ENCODING",
        env = "REPORG_ENCODING",
        long_help = "Text encoding used to read files (e.g. utf-8, shift_jis, euc-jp,\n\
iso-2022-jp).\n\n\
The default, auto, only detects UTF-8/UTF-16 byte-order marks."
    )]
    pub encoding: String,

    /// Branch name to use in GitHub URLs.
    #[arg(
        short,
        long,
        value_name = "BRANCH",
        env = "REPORG_BRANCH",
        long_help = "Branch name embedded in GitHub URLs for every repository.\n\n\
If omitted, each repository's checked-out branch is used, falling back to 'main'\n\
when HEAD is detached."
    )]
    pub branch: Option<String>,

    /// Verbose mode (more diagnostics on stderr).
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Search options shared by every repository
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            ignore_case: self.ignore_case,
            globs: self.glob.clone(),
            hidden: self.hidden,
            fixed_strings: self.fixed_strings,
            max_line_length: self.max_line_length,
            encoding: Encoding::parse(&self.encoding),
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let options = cli.search_options();

    run_search(SearchRequest {
        pattern: cli.pattern,
        repos: cli.repos,
        options,
        branch: cli.branch,
        output: cli.output,
    })
}
