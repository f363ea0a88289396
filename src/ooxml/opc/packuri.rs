//! Part names inside an OPC package.
//!
//! A part name always starts with `/` and uses `/` as separator. ZIP members
//! carry the same name without the leading slash.

use crate::ooxml::opc::error::{OpcError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full part name (e.g. "/ppt/slides/slide1.xml")
    uri: String,
}

impl PackURI {
    /// Create a part name, rejecting anything that does not start with `/`.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(OpcError::InvalidPackUri(format!(
                "part name must begin with slash, got '{}'",
                uri
            )));
        }
        Ok(PackURI { uri })
    }

    /// Create a part name from a ZIP member name (no leading slash).
    pub fn from_membername(member: &str) -> Self {
        PackURI {
            uri: format!("/{}", member.trim_start_matches('/')),
        }
    }

    /// Resolve a relationship target (like "../slideLayouts/slideLayout2.xml")
    /// against the directory of its source part (like "/ppt/slides").
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        if relative_ref.starts_with('/') {
            return Self::new(normalize_path(relative_ref)?);
        }
        let joined = if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(normalize_path(&joined)?)
    }

    /// Directory portion, e.g. "/ppt/slides" for "/ppt/slides/slide1.xml".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// File name portion, e.g. "slide1.xml".
    pub fn filename(&self) -> &str {
        self.uri
            .rfind('/')
            .map(|pos| &self.uri[pos + 1..])
            .unwrap_or("")
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        filename
            .rfind('.')
            .map(|pos| &filename[pos + 1..])
            .unwrap_or("")
    }

    /// ZIP member name for this part.
    #[inline]
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// The `.rels` part holding this part's relationships,
    /// e.g. "/ppt/slides/_rels/slide1.xml.rels".
    pub fn rels_uri(&self) -> PackURI {
        let base = self.base_uri();
        let uri = if base == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base, self.filename())
        };
        PackURI { uri }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

/// Collapse "." and ".." segments. Climbing above the root is an error.
fn normalize_path(path: &str) -> Result<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    return Err(OpcError::InvalidPackUri(format!(
                        "'{}' escapes the package root",
                        path
                    )));
                }
            },
            _ => segments.push(segment),
        }
    }
    Ok(format!("/{}", segments.join("/")))
}

impl fmt::Display for PackURI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// Part name of the package-level relationships.
pub const PACKAGE_RELS_URI: &str = "/_rels/.rels";

/// Part name of the content types stream.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";
