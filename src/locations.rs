//! Resource location resolution
//!
//! Schema sources are addressed by file path, by URL, or held in memory.
//! `schemaLocation` attributes of `xs:include` / `xs:import` are resolved
//! relative to the location of the document that carries them.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Resource location - can be a URL, file path, or string identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// URL (http, https, ftp, etc.)
    Url(Url),
    /// In-memory source text
    String(String),
}

impl Location {
    /// Parse a location reference, mapping `file:` URLs to paths
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(url) = Url::parse(s) {
            if url.scheme() == "file" {
                return file_url_to_path(&url).map(Location::Path);
            }
            // Single letters are Windows drive prefixes, not schemes
            if url.scheme().len() > 1 {
                return Ok(Location::Url(url));
            }
        }
        Ok(Location::Path(PathBuf::from(s)))
    }

    /// Resolve a reference found inside the resource at this location
    ///
    /// Absolute references stand alone; relative ones are joined to this
    /// location's directory. In-memory sources have no base, so relative
    /// references resolve against the working directory.
    pub fn resolve(&self, reference: &str) -> Result<Location> {
        match Location::parse(reference)? {
            Location::Path(path) if path.is_relative() => match self {
                Location::Path(base) => Ok(Location::Path(
                    base.parent().unwrap_or_else(|| Path::new("")).join(path),
                )),
                Location::Url(base) => Ok(Location::Url(base.join(reference)?)),
                Location::String(_) => Ok(Location::Path(path)),
            },
            other => Ok(other),
        }
    }

    /// Get the location as a string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
            Location::String(_) => "<string>".to_string(),
        }
    }
}

fn file_url_to_path(url: &Url) -> Result<PathBuf> {
    url.to_file_path()
        .map_err(|_| Error::Resource(format!("Cannot map URL '{}' to a file path", url)))
}
