//! Digest payloads given on the command line

use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Failed to read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the bytes to hash come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text, hashed as-is
    Text(String),
    /// Hex string, decoded first (an optional `0x` prefix is accepted)
    Hex(String),
    /// Whole file contents
    File(PathBuf),
}

impl Payload {
    pub fn bytes(&self) -> Result<Vec<u8>, InputError> {
        match self {
            Payload::Text(text) => Ok(text.as_bytes().to_vec()),
            Payload::Hex(text) => {
                let trimmed = text.trim();
                let digits = trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                    .unwrap_or(trimmed);
                Ok(hex::decode(digits)?)
            }
            Payload::File(path) => fs::read(path).map_err(|source| InputError::File {
                path: path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_payload() {
        let payload = Payload::Text("abc".into());
        assert_eq!(payload.bytes().unwrap(), b"abc");
    }

    #[test]
    fn test_hex_payload_accepts_prefix() {
        assert_eq!(Payload::Hex("a3a2".into()).bytes().unwrap(), vec![0xa3, 0xa2]);
        assert_eq!(Payload::Hex(" 0xA3A2\n".into()).bytes().unwrap(), vec![0xa3, 0xa2]);
        assert_eq!(Payload::Hex(String::new()).bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bad_hex_is_reported() {
        let err = Payload::Hex("a3z".into()).bytes().unwrap_err();
        assert!(matches!(err, InputError::InvalidHex(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let path = std::env::temp_dir().join("msha3-definitely-missing-input.bin");
        let err = Payload::File(path.clone()).bytes().unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
