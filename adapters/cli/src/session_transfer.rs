#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use geocoin_core::SaveGame;

const SHARE_DOMAIN: &str = "geocoin";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded session payload.
pub(crate) const SHARE_HEADER: &str = "geocoin:v1";
/// Delimiter used to separate the prefix from the payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a saved session into a single-line share code.
pub(crate) fn encode(save: &SaveGame) -> Result<String, TransferError> {
    let json = serde_json::to_vec(save).map_err(TransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SHARE_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a saved session from a share code.
pub(crate) fn decode(value: &str) -> Result<SaveGame, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)
}

/// Errors that can occur while moving sessions through share codes.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("share code was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("share code is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("share code is missing the version")]
    MissingVersion,
    /// The payload segment was missing.
    #[error("share code is missing the payload")]
    MissingPayload,
    /// The code used an unexpected prefix segment.
    #[error("share code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The code used an unsupported version identifier.
    #[error("share code version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode share code payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be (de)serialised.
    #[error("could not parse share code payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}
