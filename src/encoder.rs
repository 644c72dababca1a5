//! Turns an uploaded sketch into the base64 payload the wire format embeds.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{Result, SketchvarError};

/// The user's uploaded sketch, held in memory for the session only.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl SourceImage {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Reads a sketch from disk, inferring the MIME type from the
    /// extension. Read failures surface once and abort the caller's run.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_for_path(path).to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SketchvarError::Read(format!("{}: {}", path.display(), e)))?;
        Ok(Self { bytes, mime_type })
    }
}

/// What a run encodes at its start: either a sketch already in memory or a
/// file still to be read. The read is deferred so a failing file surfaces
/// through the run itself rather than before it.
#[derive(Debug, Clone)]
pub enum SourceHandle {
    Memory(SourceImage),
    File(std::path::PathBuf),
}

impl SourceHandle {
    pub async fn encode(&self) -> Result<EncodedImage> {
        match self {
            SourceHandle::Memory(source) => Ok(encode(source)),
            SourceHandle::File(path) => encode_file(path).await,
        }
    }
}

impl From<SourceImage> for SourceHandle {
    fn from(source: SourceImage) -> Self {
        SourceHandle::Memory(source)
    }
}

impl From<std::path::PathBuf> for SourceHandle {
    fn from(path: std::path::PathBuf) -> Self {
        SourceHandle::File(path)
    }
}

/// Base64 text encoding of the sketch bytes, with no data-URI header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| SketchvarError::Serialization(e.to_string()))
    }
}

pub fn encode(source: &SourceImage) -> EncodedImage {
    EncodedImage {
        data: STANDARD.encode(&source.bytes),
        mime_type: source.mime_type.clone(),
    }
}

pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let source = SourceImage::from_file(path).await?;
    Ok(encode(&source))
}

/// Drops a leading `data:<mime>;base64,` header if one is present.
pub fn strip_data_uri(value: &str) -> &str {
    match value.split_once(',') {
        Some((header, rest)) if header.starts_with("data:") => rest,
        _ => value,
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_FIXTURE: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    ];
    const JPEG_FIXTURE: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46, 0x49, 0x46];

    #[tokio::test]
    async fn png_round_trips_byte_identical() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(PNG_FIXTURE).unwrap();

        let encoded = encode_file(file.path()).await.unwrap();
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(encoded.decode().unwrap(), PNG_FIXTURE);
    }

    #[tokio::test]
    async fn jpeg_round_trips_byte_identical() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(JPEG_FIXTURE).unwrap();

        let encoded = encode_file(file.path()).await.unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(encoded.decode().unwrap(), JPEG_FIXTURE);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = encode_file("/nonexistent/sketch.png").await.unwrap_err();
        assert!(matches!(err, SketchvarError::Read(_)));
    }

    #[test]
    fn data_uri_header_strips_and_reapplies() {
        let source = SourceImage::from_bytes(PNG_FIXTURE.to_vec(), "image/png");
        let encoded = encode(&source);

        let uri = encoded.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(strip_data_uri(&uri), encoded.data);

        // Bare payloads pass through untouched.
        assert_eq!(strip_data_uri(&encoded.data), encoded.data);
    }
}
