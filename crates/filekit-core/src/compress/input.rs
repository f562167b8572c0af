//! Upload acceptance rules.

use serde::{Deserialize, Serialize};

use super::CompressError;

/// Largest accepted image upload (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest accepted PDF upload (50 MiB).
pub const MAX_PDF_BYTES: u64 = 50 * 1024 * 1024;

/// Smallest target size accepted for PDF compression (20 KB).
pub const MIN_PDF_TARGET_BYTES: u64 = 20 * 1024;

/// What an upload was accepted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Image,
    Pdf,
}

impl InputKind {
    pub fn max_bytes(self) -> u64 {
        match self {
            InputKind::Image => MAX_IMAGE_BYTES,
            InputKind::Pdf => MAX_PDF_BYTES,
        }
    }
}

/// Returns true for an `image/*` MIME type.
pub fn is_image(mime: &str) -> bool {
    mime.trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Returns true for `application/pdf` or a file name ending in `.pdf`.
pub fn is_pdf(file_name: &str, mime: &str) -> bool {
    mime.trim().eq_ignore_ascii_case("application/pdf") || has_pdf_extension(file_name)
}

pub(crate) fn has_pdf_extension(file_name: &str) -> bool {
    let name = file_name.as_bytes();
    name.len() >= 4 && name[name.len() - 4..].eq_ignore_ascii_case(b".pdf")
}

/// Classify an upload and check it against the size limit for its kind.
///
/// PDFs are recognized first, by MIME type or extension. Anything else must
/// carry an `image/*` MIME type.
pub fn check_input(file_name: &str, mime: &str, size_bytes: u64) -> Result<InputKind, CompressError> {
    let kind = if is_pdf(file_name, mime) {
        InputKind::Pdf
    } else if is_image(mime) {
        InputKind::Image
    } else {
        return Err(CompressError::UnsupportedType(mime.to_string()));
    };

    check_size(kind, size_bytes)?;
    Ok(kind)
}

/// Check an upload's size against the limit for `kind`.
pub fn check_size(kind: InputKind, size_bytes: u64) -> Result<(), CompressError> {
    let limit_bytes = kind.max_bytes();
    if size_bytes > limit_bytes {
        return Err(CompressError::TooLarge {
            size_bytes,
            limit_bytes,
        });
    }
    Ok(())
}

/// Reject PDF target sizes below [`MIN_PDF_TARGET_BYTES`].
pub fn check_pdf_target(target_bytes: u64) -> Result<(), CompressError> {
    if target_bytes < MIN_PDF_TARGET_BYTES {
        return Err(CompressError::TargetTooSmall {
            target_bytes,
            min_bytes: MIN_PDF_TARGET_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image("image/jpeg"));
        assert!(is_image("Image/PNG"));
        assert!(is_image("image/svg+xml"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image("imag"));
        assert!(!is_image(""));
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf("report.bin", "application/pdf"));
        assert!(is_pdf("Report.PDF", ""));
        assert!(is_pdf("a.pdf", "application/octet-stream"));
        assert!(!is_pdf("pdf", ""));
        assert!(!is_pdf("notes.pdf.txt", "text/plain"));
    }

    #[test]
    fn test_check_input_classifies() {
        assert_eq!(check_input("a.jpg", "image/jpeg", 1000).unwrap(), InputKind::Image);
        assert_eq!(check_input("a.pdf", "", 1000).unwrap(), InputKind::Pdf);
    }

    #[test]
    fn test_image_limit_is_inclusive() {
        assert!(check_input("a.png", "image/png", MAX_IMAGE_BYTES).is_ok());
        assert!(matches!(
            check_input("a.png", "image/png", MAX_IMAGE_BYTES + 1),
            Err(CompressError::TooLarge {
                limit_bytes: MAX_IMAGE_BYTES,
                ..
            })
        ));
    }

    #[test]
    fn test_pdf_limit() {
        assert!(check_input("big.pdf", "application/pdf", 20 * 1024 * 1024).is_ok());
        assert!(check_input("big.pdf", "application/pdf", MAX_PDF_BYTES + 1).is_err());
    }

    #[test]
    fn test_unsupported_type() {
        assert!(matches!(
            check_input("notes.txt", "text/plain", 10),
            Err(CompressError::UnsupportedType(mime)) if mime == "text/plain"
        ));
    }

    #[test]
    fn test_pdf_target_minimum() {
        assert!(check_pdf_target(20 * 1024).is_ok());
        assert!(matches!(
            check_pdf_target(19 * 1024),
            Err(CompressError::TargetTooSmall {
                target_bytes: 19456,
                min_bytes: 20480
            })
        ));
    }
}
