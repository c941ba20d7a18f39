use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Module that schemas without a dotted namespace are placed in.
pub const DEFAULT_MODULE: &str = "models";

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    // Handle names that start with numbers or contain special chars
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        screaming_snake: sanitized.to_shouty_snake_case(),
    }
}

/// A class name keeps its spelling; only the casing variants are derived.
pub fn class_name(name: &str) -> NormalizedName {
    NormalizedName {
        original: name.to_string(),
        ..normalize_name(name)
    }
}

/// Split a dotted schema name into its module namespace and class name.
///
/// - `io.k8s.api.apps.v1.Deployment` → (`[io, k8s, api, apps, v1]`, `Deployment`)
/// - `Deployment` → (`[models]`, `Deployment`)
pub fn split_schema_name(name: &str) -> (Vec<String>, String) {
    let mut segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
    let class = segments.pop().unwrap_or("unnamed").to_string();
    if segments.is_empty() {
        return (vec![DEFAULT_MODULE.to_string()], class);
    }
    (segments.into_iter().map(str::to_string).collect(), class)
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
