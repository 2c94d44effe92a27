//! Blocking HTTP client shared by the discoverer and every fetcher.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use crate::engine::progress::ProgressSink;
use crate::engine::tools::part_path_for;
use crate::error::{GelfetchError, GelfetchResult};
use crate::utils::config::HttpConsts;

/// Result of a streamed download that reached the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Download {
    /// HTTP 200; body written to the destination (bytes on disk).
    Saved(u64),
    /// Any other status; nothing is left on disk.
    Status(u16),
}

/// Cheap to clone: the agent shares one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpClient {
    pub fn new(user_agent: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(HttpConsts::TIMEOUT_SECS)))
            .build();
        HttpClient {
            agent: config.into(),
            user_agent: user_agent.into(),
        }
    }

    fn call(&self, url: &str) -> GelfetchResult<ureq::http::Response<ureq::Body>> {
        self.agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| GelfetchError::transport(url, e))
    }

    /// GET `url` into memory. Any non-2xx status is an error, and so is a body larger than
    /// [`HttpConsts::MAX_PAGE_BYTES`].
    pub fn get_bytes(&self, url: &str) -> GelfetchResult<Vec<u8>> {
        let mut response = self.call(url)?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(GelfetchError::Http {
                url: url.to_string(),
                status,
            });
        }
        let mut body = Vec::new();
        response
            .body_mut()
            .as_reader()
            .take(HttpConsts::MAX_PAGE_BYTES + 1)
            .read_to_end(&mut body)
            .map_err(|e| GelfetchError::transport(url, e))?;
        // Read one byte past the cap to tell a full page from a cut one.
        if body.len() as u64 > HttpConsts::MAX_PAGE_BYTES {
            return Err(GelfetchError::transport(
                url,
                format!("body exceeds {} bytes", HttpConsts::MAX_PAGE_BYTES),
            ));
        }
        Ok(body)
    }

    /// Stream `url` into `dest`, reporting `(bytes so far, content length)` to `sink`.
    ///
    /// The body goes to `<dest>.part` first and is renamed on completion, so `dest` only ever
    /// exists as a complete file. Any failure removes the partial file.
    pub fn download_to(
        &self,
        url: &str,
        dest: &Path,
        sink: &dyn ProgressSink,
    ) -> GelfetchResult<Download> {
        let mut response = self.call(url)?;
        let status = response.status().as_u16();
        if status != 200 {
            return Ok(Download::Status(status));
        }
        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let part = part_path_for(dest);
        let mut output = File::create(&part).map_err(|e| GelfetchError::filesystem(&part, e))?;
        let mut reader = response.body_mut().as_reader();
        let mut buf = vec![0_u8; HttpConsts::STREAM_CHUNK];
        let mut written = 0_u64;

        let streamed = loop {
            let read = match reader.read(&mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(e) => break Err(GelfetchError::transport(url, e)),
            };
            if let Err(e) = output.write_all(&buf[..read]) {
                break Err(GelfetchError::filesystem(&part, e));
            }
            written = written.saturating_add(read as u64);
            sink.transferred(written, total.max(written));
        };
        let finished = streamed
            .and_then(|()| output.flush().map_err(|e| GelfetchError::filesystem(&part, e)));
        drop(output);

        if let Err(e) = finished {
            let _ = std::fs::remove_file(&part);
            return Err(e);
        }
        std::fs::rename(&part, dest).map_err(|e| {
            let _ = std::fs::remove_file(&part);
            GelfetchError::filesystem(dest, e)
        })?;
        Ok(Download::Saved(written))
    }
}
