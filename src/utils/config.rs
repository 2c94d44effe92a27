//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    default_output_dir: &'static str,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                default_output_dir: "gelbooru_downloads",
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file looked up in the working directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn default_output_dir(&self) -> &str {
        self.default_output_dir
    }
}

// ---- Worker threads ----

/// Fetcher pool bounds.
pub struct WorkerLimits;

impl WorkerLimits {
    /// Anything lower is coerced up to this.
    pub const MIN: usize = 1;
    pub const DEFAULT: usize = 10;
}

// ---- Delays ----

/// Politeness delays between requests to the remote service.
pub struct DelayConsts;

impl DelayConsts {
    /// Floor for both delays; smaller values are raised to this.
    pub const MIN_MS: u64 = 100;
    pub const PAGE_DEFAULT_MS: u64 = 500;
    pub const ITEM_DEFAULT_MS: u64 = 100;
}

// ---- Pipeline ----

pub struct PipelineConsts;

impl PipelineConsts {
    /// Posts per listing page; the `pid` cursor advances by this much.
    pub const PAGE_STRIDE: u64 = 42;
    /// Reporter poll interval.
    pub const REPORT_INTERVAL: Duration = Duration::from_millis(100);
    /// Width of the label column in progress lines.
    pub const LABEL_WIDTH: usize = 40;
}

// ---- HTTP ----

pub struct HttpConsts;

impl HttpConsts {
    pub const HOST: &'static str = "https://gelbooru.com";
    pub const DEFAULT_USER_AGENT: &'static str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:146.0) Gecko/20100101 Firefox/146.0";
    pub const DEFAULT_FORMATS: [&'static str; 4] = ["jpg", "jpeg", "png", "gif"];
    /// Global per-request timeout.
    pub const TIMEOUT_SECS: u64 = 60;
    /// Cap on listing / search bodies read into memory (bytes). 8 MB.
    pub const MAX_PAGE_BYTES: u64 = 8 * 1024 * 1024;
    /// Read buffer for streamed image bodies (bytes). 64 KB.
    pub const STREAM_CHUNK: usize = 64 * 1024;
    /// Minimum tag search query length.
    pub const MIN_QUERY_LEN: usize = 3;
}
