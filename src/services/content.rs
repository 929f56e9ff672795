//! Body preparation for compressed uploads.

use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Number of leading bytes inspected when the extension gives no content type
pub const SNIFF_LEN: usize = 512;

pub const GZIP_ENCODING: &str = "gzip";
pub const GZIP_SUFFIX: &str = ".gz";

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Gzip a whole buffer in memory
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Content type of the uncompressed file: by extension first, then by
/// sniffing the first [`SNIFF_LEN`] bytes of `data`.
pub fn content_type(path: &Path, data: &[u8]) -> String {
    match mime_guess::from_path(path).first_raw() {
        Some(mime) => mime.to_string(),
        None => sniff(&data[..data.len().min(SNIFF_LEN)]).to_string(),
    }
}

/// Signature based detection for the common binary formats; anything else is
/// plain text unless it contains control bytes.
pub fn sniff(head: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"PK\x03\x04", "application/zip"),
        (b"\x1f\x8b\x08", "application/x-gzip"),
        (b"BZh", "application/x-bzip2"),
        (b"\x7fELF", "application/x-executable"),
        (b"OggS\x00", "application/ogg"),
        (b"RIFF", "application/octet-stream"),
    ];

    for &(magic, mime) in SIGNATURES {
        if head.starts_with(magic) {
            return mime;
        }
    }

    let trimmed = trim_leading_whitespace(head);
    if starts_with_ignore_case(trimmed, b"<!doctype html") || starts_with_ignore_case(trimmed, b"<html") {
        return "text/html; charset=utf-8";
    }
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if head.iter().any(|b| is_binary_byte(*b)) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f)
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}
