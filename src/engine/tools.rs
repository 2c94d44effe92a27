//! URL and path construction

use std::path::{Path, PathBuf};

use crate::error::{GelfetchError, GelfetchResult};
use crate::utils::config::{HttpConsts, PackagePaths};

/// Space-joined tag query, e.g. `"rating:safe blue_sky"`. `None` when there are no usable tags.
pub fn tags_query(tags: &[String]) -> Option<String> {
    let parts: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn base(host: &str) -> &str {
    host.trim_end_matches('/')
}

/// `<host>/index.php?page=post&s=list&tags=<tags>&pid=<pid>`
pub fn posts_page_url(host: &str, tags: &[String], pid: u64) -> GelfetchResult<String> {
    let query = tags_query(tags)
        .ok_or_else(|| GelfetchError::Configuration("no tags given".to_string()))?;
    Ok(format!(
        "{}/index.php?page=post&s=list&tags={}&pid={}",
        base(host),
        urlencoding::encode(&query),
        pid
    ))
}

/// `<host>/index.php?page=autocomplete2&type=tag_query&term=<query>`
///
/// Rejects empty queries and queries shorter than [`HttpConsts::MIN_QUERY_LEN`].
pub fn tag_search_url(host: &str, query: &str) -> GelfetchResult<String> {
    let query = query.trim();
    if query.is_empty() {
        return Err(GelfetchError::Configuration("empty query".to_string()));
    }
    if query.chars().count() < HttpConsts::MIN_QUERY_LEN {
        return Err(GelfetchError::Configuration(format!(
            "query {query:?} is shorter than {} characters",
            HttpConsts::MIN_QUERY_LEN
        )));
    }
    Ok(format!(
        "{}/index.php?page=autocomplete2&type=tag_query&term={}",
        base(host),
        urlencoding::encode(query)
    ))
}

/// Images are sharded by the first two byte pairs of the hash:
/// `<host>/images/ab/cd/abcd....<format>`.
pub fn image_url(host: &str, hash: &str, format: &str) -> GelfetchResult<String> {
    match (hash.get(0..2), hash.get(2..4)) {
        (Some(dir1), Some(dir2)) => Ok(format!(
            "{}/images/{}/{}/{}.{}",
            base(host),
            dir1,
            dir2,
            hash,
            format
        )),
        _ => Err(GelfetchError::Parse(format!(
            "identifier {hash:?} is too short for an image path"
        ))),
    }
}

/// `<outdir>/<hash>.<format>`
pub fn image_output_path(outdir: &Path, hash: &str, format: &str) -> PathBuf {
    outdir.join(format!("{hash}.{format}"))
}

/// In-progress download path next to the final file. Never matched by the existence check.
pub fn part_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PackagePaths::get().pkg_name().to_string());
    path.with_file_name(format!("{name}.part"))
}

/// Create the output directory (and parents) if it is missing.
pub fn ensure_output_dir(dir: &Path) -> GelfetchResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    log::info!("Output dir {} does not exist, creating", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| GelfetchError::filesystem(dir, e))
}
