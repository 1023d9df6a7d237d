//! PDF header sniffing.
//!
//! Collections are assembled by hand, so a `.pdf` name says little about the
//! file. The header is checked before handing the file to the parser.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;
const HEADER_LEN: u64 = 16;

/// Information read from a PDF header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// Declared version, e.g. "1.7"
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Read and check the header of the file at `path`.
///
/// Files shorter than a header are reported as [`Error::UnknownFormat`].
pub fn sniff_header<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    File::open(path)?.take(HEADER_LEN).read_to_end(&mut header)?;
    parse_header(&header)
}

/// Check that `data` starts with a `%PDF-x.y` header.
pub fn parse_header(data: &[u8]) -> Result<PdfHeader> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    if rest.len() < VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&rest[..VERSION_LEN]).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == VERSION_LEN
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit()
}

/// Check whether the file at `path` looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    sniff_header(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid_header() {
        let header = parse_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_parse_pdf_2_0() {
        assert_eq!(parse_header(b"%PDF-2.0\n").unwrap().version, "2.0");
    }

    #[test]
    fn test_not_a_pdf() {
        assert!(matches!(
            parse_header(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(parse_header(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(parse_header(b""), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_bad_version() {
        assert!(matches!(
            parse_header(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_sniff_short_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PD").unwrap();
        assert!(matches!(sniff_header(file.path()), Err(Error::UnknownFormat)));
        assert!(!is_pdf(file.path()));
    }

    #[test]
    fn test_sniff_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\n%rest of the file").unwrap();
        assert_eq!(sniff_header(file.path()).unwrap().version, "1.4");
        assert!(is_pdf(file.path()));
    }

    #[test]
    fn test_sniff_missing_file() {
        assert!(matches!(
            sniff_header("/nonexistent/file.pdf"),
            Err(Error::Io(_))
        ));
    }
}
