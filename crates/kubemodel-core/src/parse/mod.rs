pub mod components;
pub mod extensions;
pub mod ref_resolve;
pub mod schema;
pub mod spec;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use spec::{DocumentHeader, RawDocument};

/// Keys every document must carry, as JSON pointers paired with display names.
const REQUIRED_FIELDS: &[(&str, &str)] = &[
    ("/openapi", "openapi"),
    ("/info", "info"),
    ("/info/title", "info.title"),
    ("/info/version", "info.version"),
];

/// Parse an OpenAPI document from JSON text.
pub fn from_json(input: &str) -> Result<RawDocument, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(value)
}

/// Parse an OpenAPI document from an already decoded JSON value.
///
/// Missing structural keys are reported as [`ParseError::MissingField`];
/// the OpenAPI version is not checked here, see [`validate_version`].
pub fn from_value(value: Value) -> Result<RawDocument, ParseError> {
    check_required(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Read only `openapi` and `info` from a decoded document, so a document
/// can be classified before its components are looked at.
pub fn header(value: &Value) -> Result<DocumentHeader, ParseError> {
    check_required(value)?;
    Ok(DocumentHeader::deserialize(value)?)
}

fn check_required(value: &Value) -> Result<(), ParseError> {
    for (pointer, name) in REQUIRED_FIELDS {
        if value.pointer(pointer).is_none_or(Value::is_null) {
            return Err(ParseError::MissingField((*name).to_string()));
        }
    }
    Ok(())
}

/// Reject anything that is not OpenAPI 3.x.
pub fn validate_version(doc: &RawDocument) -> Result<(), ParseError> {
    if !doc.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(doc.openapi.clone()));
    }
    Ok(())
}
