//! Response parsing: listing pages (HTML) and tag search results (JSON).

use regex::bytes::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::error::{GelfetchError, GelfetchResult};
use crate::{Tag, WorkItem};

static PID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pid=([0-9]+)").expect("pid pattern compiles"));

static THUMBNAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"thumbnail_([a-f0-9]+)\.jpg").expect("thumbnail pattern compiles")
});

/// Largest `pid=N` referenced anywhere on the page (the pager's last link).
pub fn parse_upper_bound(page: &[u8]) -> GelfetchResult<u64> {
    PID_RE
        .captures_iter(page)
        .filter_map(|c| c.get(1))
        .filter_map(|m| std::str::from_utf8(m.as_bytes()).ok()?.parse::<u64>().ok())
        .max()
        .ok_or_else(|| GelfetchError::Parse("no pid= links on listing page".to_string()))
}

/// Every `thumbnail_<hash>.jpg` hash on the page, in page order.
///
/// A page with no thumbnails is valid (empty result). An empty body is not.
pub fn parse_item_identifiers(page: &[u8]) -> GelfetchResult<Vec<WorkItem>> {
    if page.is_empty() {
        return Err(GelfetchError::Parse("empty listing page".to_string()));
    }
    THUMBNAIL_RE
        .captures_iter(page)
        .filter_map(|c| c.get(1))
        .map(|m| {
            std::str::from_utf8(m.as_bytes())
                .map(WorkItem::from)
                .map_err(|e| GelfetchError::Parse(e.to_string()))
        })
        .collect()
}

/// The autocomplete endpoint has served `post_count` both as a string and as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostCount {
    Number(u64),
    Text(String),
}

impl Default for PostCount {
    fn default() -> Self {
        PostCount::Number(0)
    }
}

impl PostCount {
    fn value(&self) -> u64 {
        match self {
            PostCount::Number(n) => *n,
            PostCount::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTag {
    value: String,
    #[serde(default)]
    post_count: PostCount,
}

/// Parse the autocomplete JSON array into tags, in response order.
pub fn parse_tags(body: &[u8]) -> GelfetchResult<Vec<Tag>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let raw: Vec<RawTag> =
        serde_json::from_slice(body).map_err(|e| GelfetchError::Parse(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|t| Tag {
            post_count: t.post_count.value(),
            name: t.value,
        })
        .collect())
}
