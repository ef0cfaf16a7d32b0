//! Single-line transfer strings for sharing projects through the clipboard.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use quadcaster_core::MapKind;
use quadcaster_world::Project;
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "quadcaster";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the map kind and encoded payload.
pub(crate) const TRANSFER_HEADER: &str = "quadcaster:v1";
/// Delimiter used to separate the prefix, map kind and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while decoding transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("transfer string was empty")]
    EmptyPayload,
    /// A segment was missing from the transfer string.
    #[error("transfer string is missing the {0}")]
    MissingSegment(&'static str),
    /// The transfer string used an unexpected prefix segment.
    #[error("transfer prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The transfer string used an unsupported version identifier.
    #[error("transfer version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The map kind segment named no known representation.
    #[error("unknown map kind '{0}'")]
    UnknownKind(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode transfer payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse transfer payload")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Encodes the project into a single-line string. The kind segment names the
/// active representation.
pub(crate) fn encode(project: &Project) -> Result<String, TransferError> {
    let json = serde_json::to_vec(project).map_err(TransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}:{encoded}",
        project.active_map_kind.as_str()
    ))
}

/// Decodes a project from a transfer string.
///
/// The kind segment takes precedence over the active kind stored in the payload.
pub(crate) fn decode(value: &str) -> Result<Project, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(4, FIELD_DELIMITER);
    let domain = parts.next().ok_or(TransferError::MissingSegment("prefix"))?;
    let version = parts
        .next()
        .ok_or(TransferError::MissingSegment("version"))?;
    let kind = parts.next().ok_or(TransferError::MissingSegment("map kind"))?;
    let payload = parts.next().ok_or(TransferError::MissingSegment("payload"))?;

    if domain != TRANSFER_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }
    let kind =
        MapKind::from_identifier(kind).ok_or_else(|| TransferError::UnknownKind(kind.to_owned()))?;

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TransferError::InvalidEncoding)?;
    let mut project: Project =
        serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;
    project.active_map_kind = kind;
    Ok(project)
}
