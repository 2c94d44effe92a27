use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Concurrent Gelbooru image downloader.
#[derive(Clone, Parser)]
#[command(name = "gelfetch")]
#[command(about = "Search tags or download every image matching a tag set.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// List tags starting with QUERY and their post counts.
    SearchTags {
        /// At least 3 characters.
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Download every post matching all TAGS.
    Download {
        /// One or more tags, e.g. `rating:general blue_sky`.
        #[arg(value_name = "TAGS", required = true, num_args = 1..)]
        tags: Vec<String>,
    },
}

/// Flags shared by every subcommand. Unset flags fall back to `.gelfetch.toml`, then defaults.
#[derive(Clone, Debug, Args)]
pub struct CommonArgs {
    /// Number of fetcher threads. Default: 10.
    #[arg(long, short = 'w', global = true)]
    pub workers: Option<usize>,

    /// Delay between listing pages in milliseconds (min 100). Default: 500.
    #[arg(long, global = true)]
    pub page_delay_ms: Option<u64>,

    /// Delay after each downloaded item in milliseconds (min 100). Default: 100.
    #[arg(long, global = true)]
    pub item_delay_ms: Option<u64>,

    /// Output directory. Default: `gelbooru_downloads`.
    #[arg(long, short = 'o', global = true)]
    pub output_dir: Option<PathBuf>,

    /// Board root URL. Default: https://gelbooru.com
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// User-Agent header sent with every request.
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Image formats to try, in order. Can specify multiple: -f png jpg
    #[arg(long = "format", short = 'f', num_args = 1.., global = true)]
    pub formats: Vec<String>,

    /// No progress bars.
    #[arg(long, short = 'q', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool), global = true)]
    pub quiet: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool), global = true)]
    pub verbose: Option<bool>,
}
