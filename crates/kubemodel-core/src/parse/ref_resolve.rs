use crate::error::TransformError;

/// JSON pointer prefixes that address named schemas.
const SCHEMA_REF_PREFIXES: &[&str] = &["#/components/schemas/", "#/definitions/"];

/// Extract the schema name a local `$ref` points at.
///
/// Only document-local references are supported; merged documents are
/// self-contained so anything else is a malformed input.
pub fn ref_target(ref_path: &str) -> Result<&str, TransformError> {
    SCHEMA_REF_PREFIXES
        .iter()
        .find_map(|prefix| ref_path.strip_prefix(prefix))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TransformError::InvalidRefFormat(ref_path.to_string()))
}
