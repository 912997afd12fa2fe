//! Audio payload types
//!
//! Audio is never decoded or resampled here; recognizers receive the encoded
//! container bytes as uploaded by the client.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CapabilityError;

/// Encoded audio container formats accepted by the recognizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Webm,
    Wav,
    Ogg,
    Mp3,
    Flac,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "webm" | "audio/webm" => Some(Self::Webm),
            "wav" | "wave" | "audio/wav" | "audio/x-wav" => Some(Self::Wav),
            "ogg" | "opus" | "audio/ogg" => Some(Self::Ogg),
            "mp3" | "mpeg" | "audio/mpeg" => Some(Self::Mp3),
            "flac" | "audio/flac" => Some(Self::Flac),
            _ => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded audio clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioInput {
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self { bytes, format }
    }

    /// Decode a base64 payload, stripping a `data:...;base64,` prefix if present
    pub fn from_base64(encoded: &str, format: AudioFormat) -> Result<Self, CapabilityError> {
        let bytes = BASE64.decode(strip_data_url(encoded))?;
        Ok(Self { bytes, format })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Reject clips above `max_bytes` before they reach a remote service
    pub fn ensure_within(&self, max_bytes: usize) -> Result<(), CapabilityError> {
        if self.bytes.len() > max_bytes {
            return Err(CapabilityError::PayloadTooLarge {
                size: self.bytes.len(),
                max: max_bytes,
            });
        }
        Ok(())
    }
}

/// Strip a data-url prefix (`data:audio/webm;base64,`) from a base64 string
pub fn strip_data_url(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    if trimmed.starts_with("data:") {
        if let Some(idx) = trimmed.find(',') {
            return &trimmed[idx + 1..];
        }
    }
    trimmed
}
