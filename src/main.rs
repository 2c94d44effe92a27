//! Gelfetch CLI: search tags or download every image for a tag set.

use anyhow::Result;
use clap::Parser;
use gelfetch::engine::arg_parser::Cli;
use gelfetch::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
