//! HTTP download with bounded redirect following.
//!
//! GitHub release URLs redirect to a CDN, so the client follows redirects
//! by hand (up to [`MAX_REDIRECTS`] hops) instead of trusting reqwest's
//! default policy. The response body is streamed to disk in chunks; a
//! failed or timed-out download never leaves a partial file behind.

use crate::error::{Error, Result};
use reqwest::{header, redirect::Policy, Client, Url};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Maximum number of redirect hops before the fetch is abandoned.
pub const MAX_REDIRECTS: usize = 5;

/// Wall-clock bound on a single download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

fn fetch_error(url: &str, reason: impl Into<String>) -> Error {
    Error::Fetch {
        url: url.to_string(),
        reason: reason.into(),
    }
}

/// Downloads `url` to `dest`, following up to [`MAX_REDIRECTS`] redirects.
///
/// On any failure the partially written file is removed before the error
/// propagates, so callers can treat file presence as download success.
pub async fn download(url: &str, dest: &Path) -> Result<()> {
    let outcome = tokio::time::timeout(DOWNLOAD_TIMEOUT, stream_to_file(url, dest)).await;
    let result = match outcome {
        Ok(result) => result,
        Err(_) => Err(fetch_error(
            url,
            format!(
                "timed out after {} seconds",
                DOWNLOAD_TIMEOUT.as_secs()
            ),
        )),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }
    result
}

async fn stream_to_file(url: &str, dest: &Path) -> Result<()> {
    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .map_err(|e| fetch_error(url, format!("failed to build HTTP client: {e}")))?;

    let mut current = Url::parse(url).map_err(|e| fetch_error(url, format!("invalid URL: {e}")))?;

    // One initial request plus up to MAX_REDIRECTS follow-ups.
    for _ in 0..=MAX_REDIRECTS {
        log::debug!("GET {}", current);
        let mut response = client
            .get(current.clone())
            .send()
            .await
            .map_err(|e| fetch_error(url, e.to_string()))?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    fetch_error(url, format!("redirect ({status}) without a Location header"))
                })?;
            // join() resolves relative Location values against the current URL
            current = current
                .join(location)
                .map_err(|e| fetch_error(url, format!("invalid redirect target: {e}")))?;
            continue;
        }

        if !status.is_success() {
            return Err(fetch_error(url, format!("download failed (status {status})")));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| fetch_error(url, format!("failed while reading body: {e}")))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        return Ok(());
    }

    Err(fetch_error(
        url,
        format!("more than {MAX_REDIRECTS} redirects"),
    ))
}
