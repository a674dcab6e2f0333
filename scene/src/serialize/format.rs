//! Format-specific encoding and decoding (feature-gated).
//!
//! Provides [`encode`] and [`decode`] functions that convert between
//! serde-serializable types and byte buffers in RON or bincode format.

use snapclip_core::CodecFormat;

use super::error::FormatError;

/// Supported serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// RON (Rusty Object Notation): human-readable text format.
    #[cfg(feature = "serialize-ron")]
    Ron,
    /// Bincode: compact binary format.
    #[cfg(feature = "serialize-bincode")]
    Bincode,
}

impl Format {
    /// Maps a configured format to a compiled-in one.
    pub fn from_config(format: CodecFormat) -> Result<Self, FormatError> {
        match format {
            #[cfg(feature = "serialize-ron")]
            CodecFormat::Ron => Ok(Self::Ron),
            #[cfg(feature = "serialize-bincode")]
            CodecFormat::Bincode => Ok(Self::Bincode),
            #[allow(unreachable_patterns)]
            other => Err(FormatError::Unsupported(other)),
        }
    }
}

/// Encode a serde-serializable value to bytes in the given format.
#[allow(unused_variables)]
pub fn encode<T: serde::Serialize>(value: &T, format: Format) -> Result<Vec<u8>, FormatError> {
    match format {
        #[cfg(feature = "serialize-ron")]
        Format::Ron => ron::to_string(value)
            .map(|s| s.into_bytes())
            .map_err(|e| FormatError::Encode(e.to_string())),
        #[cfg(feature = "serialize-bincode")]
        Format::Bincode => bincode::serialize(value).map_err(|e| FormatError::Encode(e.to_string())),
    }
}

/// Like [`encode`], but pretty-prints text formats.
#[allow(unused_variables)]
pub fn encode_pretty<T: serde::Serialize>(
    value: &T,
    format: Format,
) -> Result<Vec<u8>, FormatError> {
    match format {
        #[cfg(feature = "serialize-ron")]
        Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map(|s| s.into_bytes())
            .map_err(|e| FormatError::Encode(e.to_string())),
        #[cfg(feature = "serialize-bincode")]
        Format::Bincode => encode(value, format),
    }
}

/// Decode bytes in the given format to a serde-deserializable type.
#[allow(unused_variables)]
pub fn decode<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
    format: Format,
) -> Result<T, FormatError> {
    match format {
        #[cfg(feature = "serialize-ron")]
        Format::Ron => {
            let s = std::str::from_utf8(bytes).map_err(|e| FormatError::Decode(e.to_string()))?;
            ron::from_str(s).map_err(|e| FormatError::Decode(e.to_string()))
        }
        #[cfg(feature = "serialize-bincode")]
        Format::Bincode => {
            bincode::deserialize(bytes).map_err(|e| FormatError::Decode(e.to_string()))
        }
    }
}
