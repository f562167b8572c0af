//! Output file names for compressed downloads.

use crate::compress::is_pdf;

const SUFFIX: &str = "-compressed";

/// Name for the compressed copy of `original`.
///
/// The stem gets a `-compressed` suffix. When `extension` is given it
/// replaces the original extension (the output was converted); otherwise the
/// original extension is kept. Names without an extension get the suffix
/// appended at the end. PDF names are handled by
/// [`compressed_pdf_name`] when no extension is forced.
pub fn compressed_file_name(original: &str, extension: Option<&str>) -> String {
    let (stem, original_ext) = split_extension(original);

    if extension.is_none() && is_pdf(original, "") {
        return compressed_pdf_name(original);
    }

    match extension.map(|ext| ext.trim_start_matches('.')) {
        Some(ext) if !ext.is_empty() => format!("{stem}{SUFFIX}.{ext}"),
        _ => match original_ext {
            Some(ext) => format!("{stem}{SUFFIX}.{ext}"),
            None => format!("{stem}{SUFFIX}"),
        },
    }
}

/// Name for a compressed PDF: a trailing `.pdf` (any case) is dropped and
/// `-compressed.pdf` appended.
pub fn compressed_pdf_name(original: &str) -> String {
    let stem = if is_pdf(original, "") {
        &original[..original.len() - 4]
    } else {
        original
    };
    format!("{stem}{SUFFIX}.pdf")
}

/// Replace every character outside `[A-Za-z0-9-_. ]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Split at the last dot. A leading dot (hidden file) is not an extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
    }
}
