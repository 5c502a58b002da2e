use base64::{Engine, engine::general_purpose::STANDARD};

use super::error::DomainError;

/// Decoded image payload received as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImageUpload {
    pub(crate) extension: &'static str,
    pub(crate) bytes: Vec<u8>,
}

impl ImageUpload {
    pub(crate) fn from_data_uri(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        let (header, payload) = raw
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or(invalid("must be a base64 data URI"))?;

        let mime = header
            .strip_suffix(";base64")
            .ok_or(invalid("must be a base64 data URI"))?;
        let extension = extension_for(mime).ok_or(invalid("unsupported image type"))?;

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| invalid("invalid base64 payload"))?;
        if bytes.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if !matches_signature(extension, &bytes) {
            return Err(invalid("content does not match declared type"));
        }

        Ok(Self { extension, bytes })
    }
}

fn invalid(message: &'static str) -> DomainError {
    DomainError::Validation {
        field: "image",
        message,
    }
}

fn extension_for(mime: &str) -> Option<&'static str> {
    match mime.to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn matches_signature(extension: &str, bytes: &[u8]) -> bool {
    match extension {
        "png" => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "jpg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "gif" => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        "webp" => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        _ => false,
    }
}
