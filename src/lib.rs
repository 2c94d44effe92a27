//! Gelfetch: concurrent Gelbooru image downloader built on a discoverer / fetcher-pool pipeline

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{GelfetchError, GelfetchResult};

use log::debug;

use crate::engine::{
    GelbooruListing, GelbooruRetriever, HttpClient, NullRenderer, Renderer, TerminalRenderer,
    ensure_output_dir,
};
use crate::pipeline::{PipelineTuning, run_pipeline};

/// Result alias used by public gelfetch API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Download every post matching all of `tags` into `opts.output_dir`.
///
/// Blocks until discovery has ended and every discovered item has been processed. Items that
/// fail are counted in the returned [`RunSummary`] rather than aborting the run; only setup
/// failures (bad output dir, no tags, thread spawn) are returned as errors.
///
/// ```ignore
/// let opts = gelfetch::Opts { workers: 4, quiet: true, ..Default::default() };
/// let summary = gelfetch::download(&["blue_sky".to_string()], &opts)?;
/// println!("{} new files", summary.succeeded);
/// ```
pub fn download(tags: &[String], opts: &Opts) -> Result<RunSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    if engine::tools::tags_query(tags).is_none() {
        return Err(GelfetchError::Configuration("no tags given".to_string()).into());
    }
    ensure_output_dir(&opts.output_dir)?;

    let client = HttpClient::new(opts.user_agent.clone());
    let listing = GelbooruListing::new(client.clone(), &opts.host, tags.to_vec());
    let retriever =
        GelbooruRetriever::new(client, &opts.host, &opts.output_dir, opts.formats.clone());
    let tuning = PipelineTuning::from(opts);

    let mut renderer: Box<dyn Renderer> = if opts.quiet {
        Box::new(NullRenderer)
    } else {
        Box::new(TerminalRenderer::new())
    };
    let summary = run_pipeline(&listing, &retriever, &tuning, renderer.as_mut())?;
    Ok(summary)
}

/// Tags starting with `query` (at least 3 characters) and their post counts.
pub fn search_tags(query: &str, opts: &Opts) -> Result<Vec<Tag>> {
    let client = HttpClient::new(opts.user_agent.clone());
    Ok(engine::search_tags(&client, &opts.host, query)?)
}
