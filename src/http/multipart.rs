//! Minimal `multipart/form-data` decoding for single-file uploads.
//!
//! Only what the upload path needs: locate the part whose
//! `Content-Disposition` names the expected field and carries a filename,
//! and hand back that part's bytes.

use thiserror::Error;

use crate::http::request::Request;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("missing or invalid multipart boundary")]
    MissingBoundary,
    #[error("malformed multipart body")]
    Malformed,
    #[error("multipart field not found")]
    MissingField,
}

/// A file part extracted from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The client-supplied filename, as-is.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Extracts the file uploaded under `field` from the request body.
///
/// The whole body must fit within `max_bytes`. Every failure maps to a
/// 400 at the service layer.
pub fn extract_file(
    req: &Request,
    field: &str,
    max_bytes: usize,
) -> Result<UploadedFile, MultipartError> {
    if req.body.len() > max_bytes {
        return Err(MultipartError::TooLarge(max_bytes));
    }

    let content_type = req
        .header("Content-Type")
        .ok_or(MultipartError::MissingBoundary)?;
    let boundary = boundary_of(content_type).ok_or(MultipartError::MissingBoundary)?;

    for part in split_parts(&req.body, &boundary)? {
        if let Some(file) = file_from_part(part, field)? {
            return Ok(file);
        }
    }

    Err(MultipartError::MissingField)
}

/// Pulls the boundary parameter out of a `multipart/form-data` Content-Type.
fn boundary_of(content_type: &str) -> Option<String> {
    let (kind, params) = content_type.split_once(';')?;
    if !kind.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    for param in params.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("boundary") {
            let value = value.trim().trim_matches('"');
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }
    }
    None
}

/// Slices the body into the segments between `--boundary` markers.
///
/// Requires the closing `--boundary--` terminator; anything before the
/// first marker (the preamble) is ignored.
fn split_parts<'a>(body: &'a [u8], boundary: &str) -> Result<Vec<&'a [u8]>, MultipartError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut positions = Vec::new();
    let mut offset = 0;
    while let Some(pos) = find(&body[offset..], delimiter) {
        positions.push(offset + pos);
        offset += pos + delimiter.len();
    }

    let last = *positions.last().ok_or(MultipartError::Malformed)?;
    let after_last = &body[last + delimiter.len()..];
    if positions.len() < 2 || !after_last.starts_with(b"--") {
        return Err(MultipartError::Malformed);
    }

    Ok(positions
        .windows(2)
        .map(|w| &body[w[0] + delimiter.len()..w[1]])
        .collect())
}

/// Decodes one part; returns the file if this part is `field` with a
/// filename, `None` if it is some other form field.
fn file_from_part(part: &[u8], field: &str) -> Result<Option<UploadedFile>, MultipartError> {
    let part = part
        .strip_prefix(b"\r\n".as_slice())
        .ok_or(MultipartError::Malformed)?;
    let headers_end = find(part, b"\r\n\r\n").ok_or(MultipartError::Malformed)?;
    let header_text =
        std::str::from_utf8(&part[..headers_end]).map_err(|_| MultipartError::Malformed)?;
    let data = part[headers_end + 4..]
        .strip_suffix(b"\r\n".as_slice())
        .ok_or(MultipartError::Malformed)?;

    for line in header_text.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("content-disposition") {
            continue;
        }

        let disposition = Disposition::parse(value);
        if disposition.name.as_deref() == Some(field) {
            if let Some(filename) = disposition.filename {
                return Ok(Some(UploadedFile {
                    filename,
                    data: data.to_vec(),
                }));
            }
        }
    }

    Ok(None)
}

#[derive(Default)]
struct Disposition {
    name: Option<String>,
    filename: Option<String>,
}

impl Disposition {
    fn parse(value: &str) -> Self {
        let mut disposition = Disposition::default();
        for param in value.split(';') {
            let Some((key, val)) = param.split_once('=') else {
                continue;
            };
            let val = val.trim().trim_matches('"');
            match key.trim().to_ascii_lowercase().as_str() {
                "name" => disposition.name = Some(val.to_string()),
                "filename" => disposition.filename = Some(val.to_string()),
                _ => {}
            }
        }
        disposition
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
