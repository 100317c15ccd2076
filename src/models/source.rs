//! Where asset bytes come from
//!
//! Artwork records carry URLs the way the web API serves them: absolute
//! `http(s)://` URLs, site-root paths such as `/models/bust.glb`, plain
//! relative paths, `file://` URLs and inline `data:` URIs. [`DefaultSource`]
//! routes each to the right fetcher.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use base64::Engine;

use crate::error::AssetError;

/// Fetches the raw bytes behind a URL
///
/// Implementations run on loader worker threads.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Local files resolved against a root directory
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a URL onto the file system
    pub fn resolve(&self, url: &str) -> Result<PathBuf, AssetError> {
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        if let Some(scheme) = scheme_of(url) {
            return Err(AssetError::UnsupportedScheme(scheme.to_string()));
        }
        let relative = url.trim_start_matches('/');
        Ok(self.root.join(Path::new(relative)))
    }
}

impl AssetSource for FileSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(url)?;
        std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// `http(s)://` URLs through a blocking client, created on first use
#[derive(Debug, Default)]
pub struct HttpSource {
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, AssetError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("vernissage/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl AssetSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let response = self.client()?.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Routes `data:`, `http(s)://` and file URLs
#[derive(Debug)]
pub struct DefaultSource {
    files: FileSource,
    http: HttpSource,
}

impl DefaultSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            files: FileSource::new(root),
            http: HttpSource::new(),
        }
    }
}

impl AssetSource for DefaultSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        match scheme_of(url) {
            Some("data") => decode_data_uri(url),
            Some("http") | Some("https") => self.http.fetch(url),
            _ => self.files.fetch(url),
        }
    }
}

/// Scheme of an absolute URL, `None` for paths
///
/// Single letters are treated as Windows drive letters, not schemes.
fn scheme_of(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    let valid = scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Decodes a base64 `data:` URI
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AssetError> {
    let invalid = || AssetError::InvalidDataUri(uri.chars().take(48).collect());
    let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    if !header.ends_with(";base64") {
        return Err(invalid());
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid())
}

/// Resolves a URI found inside an asset against the asset's own URL
///
/// Absolute URLs, site-root paths and data URIs are returned unchanged.
pub fn resolve_relative(base: &str, uri: &str) -> String {
    if scheme_of(uri).is_some() || uri.starts_with('/') {
        return uri.to_string();
    }
    match base.rfind('/') {
        Some(slash) => format!("{}{}", &base[..=slash], uri),
        None => uri.to_string(),
    }
}
