//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! Every member is inflated once when the package is opened and the ZIP
//! archive is dropped before the constructor returns, so no file handle or
//! archive state outlives construction, including on error paths. Presentation
//! packages and the small workbooks embedded behind charts are both read this way.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_RELS_URI, PackURI};
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

/// Upper bound on the buffer reserved from a member's declared size.
/// Larger members still read in full; the buffer grows as bytes arrive.
const MAX_RESERVED_MEMBER_SIZE: u64 = 8 * 1024 * 1024;

/// Initial buffer capacity for a member declaring `declared` bytes.
fn reserved_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_RESERVED_MEMBER_SIZE)).unwrap_or(0)
}

/// Physical package contents, keyed by part name.
#[derive(Debug, Clone, Default)]
pub struct PhysPkgReader {
    /// Inflated member bytes
    parts: HashMap<PackURI, Vec<u8>>,
    /// Content type overrides from `[Content_Types].xml`
    overrides: HashMap<PackURI, String>,
    /// Content type defaults by lower-case extension
    defaults: HashMap<String, String>,
}

impl PhysPkgReader {
    /// Open an OPC package from a file path.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist, isn't a valid ZIP file,
    /// or one of its members cannot be inflated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Read a package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Read a package from bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut parts = HashMap::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut member = archive.by_index(index)?;
            if member.is_dir() {
                continue;
            }
            let uri = PackURI::from_membername(member.name());
            let mut blob = Vec::with_capacity(reserved_capacity(member.size()));
            member.read_to_end(&mut blob)?;
            parts.insert(uri, blob);
        }

        let mut pkg = Self {
            parts,
            overrides: HashMap::new(),
            defaults: HashMap::new(),
        };
        pkg.load_content_types()?;
        Ok(pkg)
    }

    fn load_content_types(&mut self) -> Result<()> {
        let Some(xml) = self.parts.get(&PackURI::from_membername(&CONTENT_TYPES_URI[1..])) else {
            return Ok(());
        };

        let mut reader = Reader::from_reader(xml.as_slice());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut overrides = HashMap::new();
        let mut defaults = HashMap::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"PartName" | b"Extension" => {
                                key = Some(attr.unescape_value()?.into_owned())
                            },
                            b"ContentType" => {
                                content_type = Some(attr.unescape_value()?.into_owned())
                            },
                            _ => {},
                        }
                    }
                    if let (Some(key), Some(content_type)) = (key, content_type) {
                        match e.local_name().as_ref() {
                            b"Override" => {
                                overrides.insert(PackURI::new(key)?, content_type);
                            },
                            b"Default" => {
                                defaults.insert(key.to_ascii_lowercase(), content_type);
                            },
                            _ => {},
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!("Content types parse error: {}", e)));
                },
                _ => {},
            }
            buf.clear();
        }

        self.overrides = overrides;
        self.defaults = defaults;
        Ok(())
    }

    /// Bytes of a part.
    pub fn blob_for(&self, uri: &PackURI) -> Result<&[u8]> {
        self.parts
            .get(uri)
            .map(Vec::as_slice)
            .ok_or_else(|| OpcError::PartNotFound(uri.to_string()))
    }

    /// Content type of a part: override first, then the extension default.
    pub fn content_type(&self, uri: &PackURI) -> Option<&str> {
        self.overrides
            .get(uri)
            .or_else(|| self.defaults.get(&uri.ext().to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Relationships whose source is `uri`; a part without a `.rels` part has none.
    pub fn rels_for(&self, uri: &PackURI) -> Result<Relationships> {
        match self.parts.get(&uri.rels_uri()) {
            Some(xml) => Relationships::from_xml(uri.base_uri(), xml),
            None => Ok(Relationships::new(uri.base_uri())),
        }
    }

    /// Package-level relationships (`/_rels/.rels`).
    pub fn package_rels(&self) -> Result<Relationships> {
        match self.parts.get(&PackURI::from_membername(&PACKAGE_RELS_URI[1..])) {
            Some(xml) => Relationships::from_xml("/", xml),
            None => Ok(Relationships::new("/")),
        }
    }

    #[inline]
    pub fn contains(&self, uri: &PackURI) -> bool {
        self.parts.contains_key(uri)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Part names in sorted order.
    pub fn partnames(&self) -> Vec<&PackURI> {
        let mut names: Vec<&PackURI> = self.parts.keys().collect();
        names.sort();
        names
    }
}
