//! Remote source download and local caching.
//!
//! The source is one CSV fetched over plain HTTP GET. The body is Latin-1
//! encoded, so it is decoded to UTF-8 before anything else sees it; the
//! decoded text is cached under the data directory so later runs (or the
//! offline mode) can skip the network entirely.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::error::AppError;

/// Historical accumulated series, per region per day.
pub const DEFAULT_URL: &str = "https://covid19.isciii.es/resources/serie_historica_acumulados.csv";

/// Where the decoded body of `url` is cached inside `data_dir`.
pub fn cache_path(data_dir: &Path, url: &str) -> PathBuf {
    let name = url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("source.csv");
    data_dir.join(name)
}

/// Latin-1 bytes map one-to-one onto the first 256 Unicode code points.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Download the source, decode it, and write it to the cache.
pub fn fetch_source(url: &str, data_dir: &Path) -> Result<String, AppError> {
    let client = Client::new();
    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::new(4, format!("Download failed for '{url}': {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::new(
            4,
            format!("Download failed for '{url}': status {}.", resp.status()),
        ));
    }

    let bytes = resp
        .bytes()
        .map_err(|e| AppError::new(4, format!("Failed to read response body: {e}")))?;
    let text = decode_latin1(&bytes);

    let path = cache_path(data_dir, url);
    fs::write(&path, &text)
        .map_err(|e| AppError::new(4, format!("Failed to cache source at '{}': {e}", path.display())))?;

    Ok(text)
}

/// Reuse a previously cached download.
pub fn read_cached_source(url: &str, data_dir: &Path) -> Result<String, AppError> {
    let path = cache_path(data_dir, url);
    fs::read_to_string(&path).map_err(|e| {
        AppError::new(
            2,
            format!(
                "No cached source at '{}' ({e}). Run once without --offline first.",
                path.display()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_path_uses_last_url_segment() {
        let dir = Path::new("data");
        let path = cache_path(dir, "https://example.org/a/b/series.csv");
        assert_eq!(path, dir.join("series.csv"));
    }

    #[test]
    fn cache_path_falls_back_on_trailing_slash() {
        let dir = Path::new("data");
        let path = cache_path(dir, "https://example.org/feed/");
        assert_eq!(path, dir.join("source.csv"));
    }

    #[test]
    fn latin1_decoding_preserves_accents() {
        // "Andalucía" in Latin-1: í is byte 0xED.
        let bytes = b"Andaluc\xEDa";
        assert_eq!(decode_latin1(bytes), "Andalucía");
    }
}
