//! CLI command handler: merge defaults, `.gelfetch.toml` and flags, then dispatch.

use anyhow::{Context, Result};
use log::debug;

use crate::Opts;
use crate::engine::arg_parser::{Cli, Commands, CommonArgs};
use crate::engine::handlers::{handle_download, handle_search};
use crate::utils::{apply_file_to_opts, load_gelfetch_toml, setup_logging};

/// Overwrite opts field from the command line when the flag was given.
macro_rules! apply_cli_opt {
    ($args:expr, $opts:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $args.$field.clone() {
                $opts.$field = v;
            }
        )+
    };
}

fn apply_cli_to_opts(common: &CommonArgs, opts: &mut Opts) {
    apply_cli_opt!(
        common,
        opts,
        workers,
        page_delay_ms,
        item_delay_ms,
        output_dir,
        host,
        user_agent,
        quiet,
        verbose,
    );
    if !common.formats.is_empty() {
        opts.formats = common.formats.clone();
    }
}

/// Defaults, then `.gelfetch.toml` in the working directory, then flags.
pub fn setup_opts(common: &CommonArgs) -> Result<Opts> {
    let mut opts = Opts::default();
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let file = load_gelfetch_toml(&cwd);
    if let Some(ref file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    apply_cli_to_opts(common, &mut opts);
    setup_logging(opts.verbose);
    if file.is_some() {
        debug!("Loaded settings from {}", cwd.display());
    }
    Ok(opts)
}

/// Run the selected subcommand.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(&cli.common)?;
    match &cli.command {
        Commands::SearchTags { query } => handle_search(query, &opts),
        Commands::Download { tags } => handle_download(tags, &opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "gelfetch", "download", "blue_sky", "-w", "4", "-o", "out", "-q", "-f", "png", "gif",
        ]);
        let mut opts = Opts::default();
        apply_cli_to_opts(&cli.common, &mut opts);
        assert_eq!(opts.workers, 4);
        assert_eq!(opts.output_dir, PathBuf::from("out"));
        assert_eq!(opts.formats, vec!["png".to_string(), "gif".to_string()]);
        match cli.command {
            Commands::Download { ref tags } => assert_eq!(tags, &vec!["blue_sky".to_string()]),
            _ => panic!("expected download"),
        }
        assert!(opts.quiet);
        assert!(!opts.verbose);
        assert_eq!(opts.page_delay_ms, Opts::default().page_delay_ms);
    }

    #[test]
    fn download_requires_tags() {
        assert!(Cli::try_parse_from(["gelfetch", "download"]).is_err());
    }

    #[test]
    fn search_tags_takes_query_and_global_flags_after_it() {
        let cli = Cli::parse_from(["gelfetch", "search-tags", "blue", "--host", "http://x"]);
        match cli.command {
            Commands::SearchTags { ref query } => assert_eq!(query, "blue"),
            _ => panic!("expected search-tags"),
        }
        assert_eq!(cli.common.host.as_deref(), Some("http://x"));
    }
}
