use serde::de::DeserializeOwned;

use crate::FetchError;

/// A remote payload checked against the shape we expect.
///
/// Responses are first read as plain JSON, so a payload that does not match
/// is kept around in `Malformed` for diagnostics instead of being lost in a
/// deserialize error.
#[derive(Debug, PartialEq)]
pub enum Decoded<T> {
    Parsed(T),
    Malformed {
        raw: serde_json::Value,
        reason: String,
    },
}

impl<T: DeserializeOwned> Decoded<T> {
    pub fn from_value(raw: serde_json::Value) -> Self {
        match T::deserialize(&raw) {
            Ok(parsed) => Self::Parsed(parsed),
            Err(e) => Self::Malformed {
                raw,
                reason: e.to_string(),
            },
        }
    }

    pub fn from_slice(content: &[u8]) -> Result<Self, FetchError> {
        let raw: serde_json::Value = serde_json::from_slice(content)?;
        Ok(Self::from_value(raw))
    }
}

impl<T> Decoded<T> {
    /// Turns a malformed payload into an error, logging the raw content.
    pub fn into_result(self) -> Result<T, FetchError> {
        match self {
            Self::Parsed(v) => Ok(v),
            Self::Malformed { raw, reason } => {
                tracing::debug!(%raw, "Malformed payload");
                Err(FetchError::Malformed(reason))
            }
        }
    }
}
