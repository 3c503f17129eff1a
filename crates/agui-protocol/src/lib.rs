// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]
//! Wire codecs for [`agui_core::Event`]: a camelCase JSON form and a
//! schema-defined binary form (CBOR, via `ciborium`, over the same
//! tagged-variant representation), both required to be interoperable with
//! sibling AG-UI SDKs using the same field and enum names (spec §4.2, §4.3).
//!
//! Both codecs are stateless: any validated [`Event`] can be encoded, and
//! any well-formed byte sequence in either form can be decoded, independent
//! of validator or tracker state.

use agui_core::Event;
use thiserror::Error;

/// Errors arising from encoding or decoding an [`Event`] in either wire
/// form. Returned directly to the caller — never aggregated into a
/// validation report (spec §7, channel 1).
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON encode/decode failure, including an unrecognized `type` tag.
    #[error("invalid JSON event: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encode failure.
    #[error("invalid binary event: {0}")]
    BinaryEncode(#[from] ciborium::ser::Error<std::io::Error>),

    /// Binary decode failure, including an unrecognized kind discriminant.
    #[error("invalid binary event: {0}")]
    BinaryDecode(#[from] ciborium::de::Error<std::io::Error>),
}

/// Encode an event to its canonical JSON wire form (camelCase field names,
/// omitted optional fields absent rather than null).
///
/// # Errors
/// Returns [`CodecError::Json`] if the event cannot be serialized; this
/// should not happen for any event that passed [`agui_core::Event::validate`].
pub fn encode_json(event: &Event) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

/// Encode an event to pretty-printed JSON, useful for CLI output and
/// snapshot tests.
///
/// # Errors
/// Returns [`CodecError::Json`] if the event cannot be serialized.
pub fn encode_json_pretty(event: &Event) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(event)?)
}

/// Decode an event from its JSON wire form.
///
/// Peeks the `type` discriminant first; an unrecognized value yields
/// [`CodecError::Json`] rather than silently defaulting to a variant.
///
/// # Errors
/// Returns [`CodecError::Json`] on malformed JSON, a missing/unknown `type`
/// tag, or a payload that doesn't satisfy the matching variant's shape.
pub fn decode_json(bytes: &[u8]) -> Result<Event, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode an event from a JSON string.
///
/// # Errors
/// Returns [`CodecError::Json`] on malformed JSON or an unknown `type` tag.
pub fn decode_json_str(s: &str) -> Result<Event, CodecError> {
    Ok(serde_json::from_str(s)?)
}

/// Encode an event to the binary wire form.
///
/// The binary form serializes the same variant-per-kind envelope (`Event`,
/// with `JsonPatchOperation`'s six-value op enum and free JSON values
/// carried structurally via `serde_json::Value`) as CBOR (RFC 8949), bit-
/// exact across runs for semantically equal events. CBOR is self-
/// describing, unlike `bincode`: `Event`'s internally-tagged, flattened
/// representation needs a format that can tell serde what's coming next
/// (map keys, which variant) rather than relying on the schema alone.
///
/// # Errors
/// Returns [`CodecError::BinaryEncode`] if the event cannot be serialized.
pub fn encode_binary(event: &Event) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    ciborium::into_writer(event, &mut buf)?;
    Ok(buf)
}

/// Decode an event from the binary wire form.
///
/// An unrecognized kind discriminant (e.g. bytes produced by a future,
/// wider enumeration) yields [`CodecError::BinaryDecode`] rather than
/// silently substituting a default variant.
///
/// # Errors
/// Returns [`CodecError::BinaryDecode`] on truncated input, an unrecognized
/// `type` tag, or a payload that doesn't satisfy the matching variant's
/// shape.
pub fn decode_binary(bytes: &[u8]) -> Result<Event, CodecError> {
    Ok(ciborium::from_reader(bytes)?)
}
