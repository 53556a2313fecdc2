//! Remote tile fetching: transport capability, checksum verification and
//! archive unpacking.
//!
//! The store never picks a transport itself — it is handed a [`Fetch`]
//! implementation at construction. The crate ships [`HttpFetch`] (blocking
//! reqwest) behind the `http` feature; tests and embedders can inject
//! anything else that can turn a URL into bytes.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{AltiError, Result};

/// Default timeout for HTTP requests in seconds.
#[cfg(feature = "http")]
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Capability to fetch a remote resource as bytes.
///
/// Implementations decide transport, timeouts and authentication. Errors
/// are reported as [`AltiError::DownloadFailed`]; the core never retries.
pub trait Fetch {
    /// Fetch `url` and return the full response body.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetch backend built on reqwest.
#[cfg(feature = "http")]
pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetch {
    /// Create a backend with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a backend with a request timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AltiError::DownloadFailed {
                url: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Fetch for HttpFetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| AltiError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AltiError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes().map_err(|e| AltiError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

/// Check the md5 hex digest of `bytes` against the cataloged value.
///
/// The comparison is case-insensitive; `name` only labels the error.
pub fn verify_checksum(bytes: &[u8], expected_md5: &str, name: &str) -> Result<()> {
    let digest = format!("{:x}", md5::compute(bytes));
    if digest.eq_ignore_ascii_case(expected_md5) {
        Ok(())
    } else {
        Err(AltiError::Checksum {
            name: name.to_string(),
        })
    }
}

/// Extract the single entry of a ZIP archive.
///
/// The tile archives each hold exactly one `.hgt` file; anything else is
/// malformed. The extracted length must match the entry's declared size.
pub fn unpack(archive: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(|e| AltiError::Archive {
        reason: e.to_string(),
    })?;

    if zip.len() != 1 {
        return Err(AltiError::Archive {
            reason: format!("expected a single entry, found {}", zip.len()),
        });
    }

    let mut entry = zip.by_index(0).map_err(|e| AltiError::Archive {
        reason: e.to_string(),
    })?;
    let declared = entry.size();

    let mut content = Vec::with_capacity(declared as usize);
    entry
        .read_to_end(&mut content)
        .map_err(|e| AltiError::Archive {
            reason: e.to_string(),
        })?;

    if content.len() as u64 != declared {
        return Err(AltiError::Archive {
            reason: format!(
                "entry {} truncated: {} of {} bytes",
                entry.name(),
                content.len(),
                declared
            ),
        });
    }

    Ok(content)
}
