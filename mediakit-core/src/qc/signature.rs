//! File signature sniffing.
//!
//! Reads the first bytes of a file and matches them against known image
//! magic numbers. Used to flag files whose extension does not match their
//! actual content, typically after a careless rename.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected.
const SNIFF_LEN: usize = 16;

/// A recognized signature and the extensions that naturally carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureMatch {
    pub format: &'static str,
    /// Lowercase, dot-prefixed. Equivalent spellings (.jpg/.jpeg, .tif/.tiff)
    /// are listed together.
    pub extensions: &'static [&'static str],
}

const JPEG: SignatureMatch = SignatureMatch {
    format: "JPEG",
    extensions: &[".jpg", ".jpeg"],
};
const PNG: SignatureMatch = SignatureMatch {
    format: "PNG",
    extensions: &[".png"],
};
const GIF: SignatureMatch = SignatureMatch {
    format: "GIF",
    extensions: &[".gif"],
};
const BMP: SignatureMatch = SignatureMatch {
    format: "BMP",
    extensions: &[".bmp"],
};
const TIFF: SignatureMatch = SignatureMatch {
    format: "TIFF",
    extensions: &[".tif", ".tiff"],
};
const WEBP: SignatureMatch = SignatureMatch {
    format: "WEBP",
    extensions: &[".webp"],
};
const HEIC: SignatureMatch = SignatureMatch {
    format: "HEIC",
    extensions: &[".heic", ".heif"],
};
const HEIF: SignatureMatch = SignatureMatch {
    format: "HEIF",
    extensions: &[".heic", ".heif", ".avif"],
};
const AVIF: SignatureMatch = SignatureMatch {
    format: "AVIF",
    extensions: &[".avif"],
};

/// Identifies an image format from its leading bytes.
pub fn sniff_signature(header: &[u8]) -> Option<SignatureMatch> {
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(JPEG);
    }
    if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(PNG);
    }
    if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
        return Some(GIF);
    }
    if header.starts_with(b"BM") {
        return Some(BMP);
    }
    if header.starts_with(b"II*\0") || header.starts_with(b"MM\0*") {
        return Some(TIFF);
    }
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Some(WEBP);
    }
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return match &header[8..12] {
            b"heic" | b"heix" | b"hevc" | b"hevx" => Some(HEIC),
            b"mif1" | b"msf1" => Some(HEIF),
            b"avif" | b"avis" => Some(AVIF),
            _ => None,
        };
    }
    None
}

/// Compares a file's signature with its extension.
///
/// Returns a warning when the signature is recognized and the extension is
/// not one of its natural extensions. Unreadable files and unknown
/// signatures produce nothing.
pub fn check_signature(path: &Path, container: &str) -> Option<String> {
    let header = read_header(path)?;
    let found = sniff_signature(&header)?;
    if found.extensions.contains(&container) {
        return None;
    }
    let shown = if container.is_empty() { "(none)" } else { container };
    Some(format!(
        "File signature is {} but extension is {}; expected one of {}",
        found.format,
        shown,
        found.extensions.join(", ")
    ))
}

fn read_header(path: &Path) -> Option<Vec<u8>> {
    let file = File::open(path).ok()?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header).ok()?;
    Some(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn test_sniff_known_signatures() {
        assert_eq!(sniff_signature(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(JPEG));
        assert_eq!(sniff_signature(PNG_HEADER), Some(PNG));
        assert_eq!(sniff_signature(b"GIF89a...."), Some(GIF));
        assert_eq!(sniff_signature(b"BM\x00\x00"), Some(BMP));
        assert_eq!(sniff_signature(b"MM\x00*\x00\x00"), Some(TIFF));
        assert_eq!(sniff_signature(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some(WEBP));
        assert_eq!(sniff_signature(b"\x00\x00\x00\x18ftypheic\x00\x00"), Some(HEIC));
        assert_eq!(sniff_signature(b"\x00\x00\x00\x1cftypavif\x00\x00"), Some(AVIF));
        assert_eq!(sniff_signature(b"\x00\x00\x00\x1cftypmif1\x00\x00"), Some(HEIF));
    }

    #[test]
    fn test_sniff_unknown_signatures() {
        assert_eq!(sniff_signature(b""), None);
        assert_eq!(sniff_signature(b"\x00\x00\x00\x20ftypisom\x00\x00"), None);
        assert_eq!(sniff_signature(b"RIFF\x10\x00\x00\x00AVI LIST"), None);
        assert_eq!(sniff_signature(b"plain text file"), None);
    }

    #[test]
    fn test_check_signature_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, PNG_HEADER).unwrap();

        let warning = check_signature(&path, ".jpg").unwrap();
        assert!(warning.contains("PNG"));
        assert!(warning.contains(".jpg"));
    }

    #[test]
    fn test_check_signature_equivalent_extensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpeg");
        fs::write(&path, [0xFF, 0xD8, 0xFF, 0xDB, 0, 0]).unwrap();
        assert_eq!(check_signature(&path, ".jpeg"), None);
        assert_eq!(check_signature(&path, ".jpg"), None);

        let tiff = dir.path().join("scan.tif");
        fs::write(&tiff, b"II*\x00\x08\x00").unwrap();
        assert_eq!(check_signature(&tiff, ".tif"), None);
        assert_eq!(check_signature(&tiff, ".tiff"), None);
    }

    #[test]
    fn test_check_signature_missing_file() {
        assert_eq!(check_signature(Path::new("/nonexistent/file.png"), ".png"), None);
    }
}
