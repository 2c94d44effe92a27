//! Gelbooru implementations of the pipeline collaborators, plus the tag search.

use log::debug;
use std::path::{Path, PathBuf};

use crate::engine::http::{Download, HttpClient};
use crate::engine::parse;
use crate::engine::progress::ProgressSink;
use crate::engine::tools::{image_output_path, image_url, posts_page_url, tag_search_url};
use crate::error::{GelfetchError, GelfetchResult};
use crate::pipeline::{ItemRetriever, Listing};
use crate::{Retrieved, Tag, WorkItem};

/// Post listing filtered by a fixed tag set.
pub struct GelbooruListing {
    client: HttpClient,
    host: String,
    tags: Vec<String>,
}

impl GelbooruListing {
    pub fn new(client: HttpClient, host: &str, tags: Vec<String>) -> Self {
        GelbooruListing {
            client,
            host: host.to_string(),
            tags,
        }
    }
}

impl Listing for GelbooruListing {
    fn page_url(&self, cursor: u64) -> GelfetchResult<String> {
        posts_page_url(&self.host, &self.tags, cursor)
    }

    fn fetch_page(&self, url: &str) -> GelfetchResult<Vec<u8>> {
        self.client.get_bytes(url)
    }

    fn parse_upper_bound(&self, page: &[u8]) -> GelfetchResult<u64> {
        parse::parse_upper_bound(page)
    }

    fn parse_item_identifiers(&self, page: &[u8]) -> GelfetchResult<Vec<WorkItem>> {
        parse::parse_item_identifiers(page)
    }
}

/// Downloads `<hash>.<format>` into the output directory, trying each format in order.
pub struct GelbooruRetriever {
    client: HttpClient,
    host: String,
    output_dir: PathBuf,
    formats: Vec<String>,
}

impl GelbooruRetriever {
    pub fn new(client: HttpClient, host: &str, output_dir: &Path, formats: Vec<String>) -> Self {
        GelbooruRetriever {
            client,
            host: host.to_string(),
            output_dir: output_dir.to_path_buf(),
            formats,
        }
    }

    /// First configured format whose output file is already on disk.
    fn existing_format(&self, hash: &str) -> Option<&str> {
        self.formats
            .iter()
            .map(String::as_str)
            .find(|f| image_output_path(&self.output_dir, hash, f).exists())
    }
}

impl ItemRetriever for GelbooruRetriever {
    fn retrieve(&self, item: &WorkItem, sink: &dyn ProgressSink) -> GelfetchResult<Retrieved> {
        let hash = item.as_str();
        if self.formats.is_empty() {
            return Err(GelfetchError::Configuration(
                "no image formats configured".to_string(),
            ));
        }
        if let Some(format) = self.existing_format(hash) {
            sink.label(&format!("{hash}.{format}"));
            return Ok(Retrieved::AlreadyExists);
        }

        let mut attempts = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            sink.label(&format!("{hash}.{format}"));
            let url = image_url(&self.host, hash, format)?;
            let dest = image_output_path(&self.output_dir, hash, format);
            match self.client.download_to(&url, &dest, sink) {
                Ok(Download::Saved(bytes)) => return Ok(Retrieved::Downloaded { bytes }),
                Ok(Download::Status(status)) => {
                    debug!("{url}: HTTP {status}");
                    attempts.push(format!("{format}: HTTP {status}"));
                }
                // Local disk trouble will not go away by switching format.
                Err(e @ GelfetchError::Filesystem { .. }) => return Err(e),
                Err(e) => {
                    debug!("{url}: {e}");
                    attempts.push(format!("{format}: {e}"));
                }
            }
        }
        Err(GelfetchError::Transport {
            url: image_url(&self.host, hash, "*")?,
            message: format!("no format available ({})", attempts.join(", ")),
        })
    }
}

/// Look up tags starting with `query` along with their post counts.
pub fn search_tags(client: &HttpClient, host: &str, query: &str) -> GelfetchResult<Vec<Tag>> {
    let url = tag_search_url(host, query)?;
    let body = client.get_bytes(&url)?;
    parse::parse_tags(&body)
}
