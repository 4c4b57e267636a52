// Text Boundary Encodings
// Base64 for ciphertext/signature text, character encodings for plaintext text

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::{Result, RsaError};

/// Standard base64 with padding
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| RsaError::InvalidParameter(format!("invalid base64: {}", e)))
}

/// Character encoding used to turn plaintext strings into bytes and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    /// ISO-8859-1
    Latin1,
    Ascii,
}

impl TextEncoding {
    pub const ALL: [TextEncoding; 5] = [
        TextEncoding::Utf8,
        TextEncoding::Utf16Le,
        TextEncoding::Utf16Be,
        TextEncoding::Latin1,
        TextEncoding::Ascii,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Utf16Le => "utf16le",
            TextEncoding::Utf16Be => "utf16be",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Encode `text`. Characters the encoding cannot represent are an error,
    /// never silently replaced.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            TextEncoding::Latin1 => encode_single_byte(text, 0xFF, *self),
            TextEncoding::Ascii => encode_single_byte(text, 0x7F, *self),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| RsaError::Encoding(format!("invalid UTF-8: {}", e))),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(RsaError::Encoding(format!("non-ASCII byte at offset {}", pos)));
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
        }
    }
}

fn encode_single_byte(text: &str, max: u32, encoding: TextEncoding) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code > max {
                Err(RsaError::Encoding(format!(
                    "character {:?} cannot be represented in {}",
                    c, encoding
                )))
            } else {
                Ok(code as u8)
            }
        })
        .collect()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(RsaError::Encoding(format!(
            "UTF-16 data has odd length {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]])).collect();
    String::from_utf16(&units).map_err(|e| RsaError::Encoding(format!("invalid UTF-16: {}", e)))
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "iso88591" => return Ok(TextEncoding::Latin1),
            "usascii" => return Ok(TextEncoding::Ascii),
            _ => {}
        }
        TextEncoding::ALL
            .into_iter()
            .find(|enc| enc.name() == normalized)
            .ok_or_else(|| RsaError::InvalidParameter(format!("unknown text encoding: {}", s)))
    }
}
