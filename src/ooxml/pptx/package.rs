//! Package entry point for PowerPoint presentations.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::PackURI;
use crate::ooxml::opc::PhysPkgReader;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::pptx::presentation::Presentation;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// A PowerPoint (.pptx) package.
///
/// Every part is read into memory when the package is opened; the file
/// handle is not kept.
///
/// # Examples
///
/// ```rust,no_run
/// use pptx_resolve::ooxml::pptx::Package;
///
/// let pkg = Package::open("presentation.pptx")?;
/// let pres = pkg.presentation()?;
/// println!("Presentation has {} slides", pres.slide_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    phys: Arc<PhysPkgReader>,
    main_part: PackURI,
}

impl Package {
    /// Open a .pptx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_phys(PhysPkgReader::open(path)?)
    }

    /// Read a .pptx package from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_phys(PhysPkgReader::from_reader(reader)?)
    }

    /// Read a .pptx package held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_phys(PhysPkgReader::from_bytes(bytes)?)
    }

    fn from_phys(phys: PhysPkgReader) -> Result<Self> {
        let rels = phys.package_rels()?;
        let main_rel = rels.first_of_type(rt::OFFICE_DOCUMENT).ok_or_else(|| {
            OoxmlError::PartNotFound("main presentation part (officeDocument relationship)".into())
        })?;
        let main_part = rels.target_partname(main_rel.r_id())?;

        // Regular, macro-enabled, template and slideshow presentations
        let content_type = phys.content_type(&main_part).unwrap_or_default();
        if !ct::PRESENTATION_MAIN_TYPES.contains(&content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::PML_PRESENTATION_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        Ok(Self {
            phys: Arc::new(phys),
            main_part,
        })
    }

    /// Part name of the main presentation part (usually `/ppt/presentation.xml`).
    #[inline]
    pub fn main_part(&self) -> &PackURI {
        &self.main_part
    }

    /// Parse the presentation, its slides and their layouts and masters.
    pub fn presentation(&self) -> Result<Presentation> {
        Presentation::load(Arc::clone(&self.phys), self.main_part.clone())
    }
}
