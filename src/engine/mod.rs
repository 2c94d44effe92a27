//! Engine module: HTTP, page parsing, progress display and the CLI front-end

pub mod arg_parser;
pub mod cli;
pub mod gelbooru;
pub mod handlers;
pub mod http;
pub mod parse;
pub mod progress;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::{Cli, Commands, CommonArgs};
pub use cli::handle_run;
pub use gelbooru::{GelbooruListing, GelbooruRetriever, search_tags};
pub use handlers::{handle_download, handle_search};
pub use http::{Download, HttpClient};
pub use parse::{parse_item_identifiers, parse_tags, parse_upper_bound};
pub use progress::{
    Frame, NullRenderer, ProgressSink, ProgressTracker, Renderer, TerminalRenderer,
    TrackerSnapshot,
};
pub use tools::{ensure_output_dir, image_output_path, image_url, posts_page_url, tag_search_url};
