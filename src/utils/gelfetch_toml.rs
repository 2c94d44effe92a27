//! Load `.gelfetch.toml` from the working directory (CLI only). Library callers build [`Opts`] directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct GelfetchToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    workers: Option<usize>,
    page_delay_ms: Option<u64>,
    item_delay_ms: Option<u64>,
    output_dir: Option<String>,
    host: Option<String>,
    user_agent: Option<String>,
    formats: Option<Vec<String>>,
    verbose: Option<bool>,
    quiet: Option<bool>,
}

/// Parse settings text. Malformed files are logged and treated as absent.
pub fn parse_gelfetch_toml(text: &str, origin: &Path) -> Option<GelfetchToml> {
    toml::from_str(text)
        .map_err(|e| log::warn!("{}: {}", origin.display(), e))
        .ok()
}

/// Load the settings file from `dir` if present. Returns None if missing, unreadable or malformed.
pub fn load_gelfetch_toml(dir: &Path) -> Option<GelfetchToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_gelfetch_toml(&s, &path)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $section.$field.clone() {
                $opts.$field = v;
            }
        )+
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &GelfetchToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(
        s,
        opts,
        workers,
        page_delay_ms,
        item_delay_ms,
        host,
        user_agent,
        formats,
        verbose,
        quiet,
    );
    if let Some(ref dir) = s.output_dir {
        opts.output_dir = PathBuf::from(dir);
    }
}
