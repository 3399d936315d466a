use std::io::{Read, Seek, SeekFrom, Write};
use std::time::Duration;

use crate::core::errors::{KeyferryError, Result};
use crate::core::traits::fetcher::KeyFetcher;

/// Timeout for one keyserver GET. One attempt per identifier, no retries,
/// so a batch stays bounded-time.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP key fetcher backed by reqwest on a current-thread runtime.
pub struct HttpFetcher {
    inherit_env: bool,
}

impl HttpFetcher {
    /// `inherit_env` opts back into proxy configuration from the caller's
    /// environment; the default keeps the request isolated from it.
    pub fn new(inherit_env: bool) -> Self {
        Self { inherit_env }
    }

    fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("keyferry/", env!("CARGO_PKG_VERSION")));
        if !self.inherit_env {
            builder = builder.no_proxy();
        }
        builder.build().map_err(|e| KeyferryError::FetchFailed {
            reason: format!("failed to create HTTP client: {e}"),
        })
    }
}

impl KeyFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| KeyferryError::FetchFailed {
                reason: format!("failed to create async runtime: {e}"),
            })?;

        rt.block_on(async {
            let client = self.build_client()?;
            let resp = client
                .get(url)
                .send()
                .await
                .map_err(|e| KeyferryError::FetchFailed {
                    reason: e.to_string(),
                })?;

            if !resp.status().is_success() {
                return Err(KeyferryError::FetchFailed {
                    reason: format!("server returned status {}", resp.status()),
                });
            }

            let body = resp
                .bytes()
                .await
                .map_err(|e| KeyferryError::FetchFailed {
                    reason: format!("failed to read response: {e}"),
                })?;

            stage_body(&body).map_err(|e| KeyferryError::FetchFailed {
                reason: format!("failed to stage response: {e}"),
            })
        })
    }
}

/// Stage the body through an anonymous scratch file before validation.
///
/// `tempfile::tempfile()` is unlinked on creation, so the scratch space is
/// reclaimed no matter how the process ends, signals included.
fn stage_body(body: &[u8]) -> std::io::Result<String> {
    let mut scratch = tempfile::tempfile()?;
    scratch.write_all(body)?;
    scratch.seek(SeekFrom::Start(0))?;

    let mut text = String::new();
    scratch.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_body_round_trips_text() {
        let text = stage_body(b"ssh-rsa AAAA user@host\n").unwrap();
        assert_eq!(text, "ssh-rsa AAAA user@host\n");
    }

    #[test]
    fn stage_body_rejects_non_utf8() {
        assert!(stage_body(&[0xff, 0xfe, 0x00]).is_err());
    }
}
