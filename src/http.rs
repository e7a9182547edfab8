//! HTTP download helper shared by the tool provisioner and keystore resolver.

use crate::error::DownloadError;

/// Downloads a file from a URL.
///
/// Returns the file contents as a byte vector. Non-success HTTP statuses are
/// errors; a 404 must not end up cached as a tool binary.
pub async fn download(url: &str) -> Result<Vec<u8>, DownloadError> {
    log::info!("Downloading {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|source| DownloadError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| DownloadError::Request {
            url: url.to_string(),
            source,
        })?;

    Ok(bytes.to_vec())
}
