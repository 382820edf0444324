//! Input capture: résumé file validation/encoding and the job description text.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::debug;

pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a PDF, Text file, or Image (PNG/JPEG).";
pub const MISSING_INPUTS_MESSAGE: &str = "Please provide both a resume and a job description.";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{}", UNSUPPORTED_FILE_MESSAGE)]
    UnsupportedMediaType {
        name: String,
        detected: Option<String>,
    },

    #[error("{}", MISSING_INPUTS_MESSAGE)]
    MissingInputs,

    #[error("Could not read {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a base64 data URL: {0}")]
    MalformedDataUrl(String),
}

/// The résumé formats the analysis service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    PlainText,
    Png,
    Jpeg,
    Webp,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Pdf,
        MediaType::PlainText,
        MediaType::Png,
        MediaType::Jpeg,
        MediaType::Webp,
    ];

    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::PlainText => "text/plain",
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Pdf => "pdf",
            MediaType::PlainText => "txt",
            MediaType::Png => "png",
            MediaType::Jpeg => "jpg",
            MediaType::Webp => "webp",
        }
    }

    /// Exact MIME match; parameters such as `;charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|t| t.mime().eq_ignore_ascii_case(essence))
    }

    /// Sniffs magic bytes first; plain text has none, so `.txt` is trusted
    /// only when nothing binary was detected.
    pub fn detect(name: &str, bytes: &[u8]) -> Result<Self, ValidationError> {
        if let Some(kind) = infer::get(bytes) {
            return Self::from_mime(kind.mime_type()).ok_or_else(|| {
                ValidationError::UnsupportedMediaType {
                    name: name.to_string(),
                    detected: Some(kind.mime_type().to_string()),
                }
            });
        }

        let is_txt = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if is_txt {
            Ok(MediaType::PlainText)
        } else {
            Err(ValidationError::UnsupportedMediaType {
                name: name.to_string(),
                detected: None,
            })
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// An accepted résumé, held in memory as base64. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    media_type: MediaType,
    data: String,
}

impl UploadedFile {
    pub fn from_bytes(name: impl Into<String>, media_type: MediaType, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            media_type,
            data: STANDARD.encode(bytes),
        }
    }

    /// Accepts `data:<mime>;base64,<payload>`; only the payload after the
    /// first comma is retained.
    pub fn from_data_url(name: impl Into<String>, url: &str) -> Result<Self, ValidationError> {
        let name = name.into();
        let malformed = || ValidationError::MalformedDataUrl(name.clone());

        let rest = url.trim().strip_prefix("data:").ok_or_else(malformed)?;
        let (header, payload) = rest.split_once(',').ok_or_else(malformed)?;
        let mime = header.strip_suffix(";base64").ok_or_else(malformed)?;

        let media_type =
            MediaType::from_mime(mime).ok_or_else(|| ValidationError::UnsupportedMediaType {
                name: name.clone(),
                detected: Some(mime.to_string()),
            })?;
        STANDARD.decode(payload).map_err(|_| malformed())?;

        Ok(Self {
            name,
            media_type,
            data: payload.to_string(),
        })
    }

    /// For data URLs that arrive without a file name; the file is called
    /// `resume.<ext>` after its media type.
    pub fn from_unnamed_data_url(url: &str) -> Result<Self, ValidationError> {
        let mut file = Self::from_data_url("data URL", url)?;
        file.name = format!("resume.{}", file.media_type.extension());
        Ok(file)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Base64 payload, without any data-URL prefix.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Reads a résumé from disk and validates its media type. This is the single
/// suspension point of file selection.
pub async fn read_resume(path: &Path) -> Result<UploadedFile, ValidationError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ValidationError::Unreadable {
            name: name.clone(),
            source,
        })?;

    let media_type = MediaType::detect(&name, &bytes)?;
    debug!("Accepted {} ({}, {} bytes)", name, media_type, bytes.len());
    Ok(UploadedFile::from_bytes(name, media_type, &bytes))
}

/// Free-form job posting text. No length bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDescription(String);

impl JobDescription {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}
