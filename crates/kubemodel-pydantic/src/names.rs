//! Python identifiers for fields, enum members and module segments.

/// Hard keywords plus the constants that cannot be assigned to.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn is_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Whether `name` can be used as-is as a Python identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric()) && !is_keyword(name)
}

/// Attribute name for a property, plus the alias to declare when it differs
/// from the wire name.
///
/// Invalid characters become `_`, a leading digit or underscore gains a
/// `field` prefix and keywords get a trailing `_` (`from` → `from_`).
pub fn field_name(property: &str) -> (String, Option<String>) {
    if is_identifier(property) && !property.starts_with('_') {
        return (property.to_string(), None);
    }

    let mut name: String = property
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("field_{name}");
    } else if name.starts_with('_') {
        name = format!("field{name}");
    }
    if is_keyword(&name) {
        name.push('_');
    }
    (name, Some(property.to_string()))
}

/// Member name for an enum value: the value itself when it is a valid
/// identifier, otherwise the same sanitising as fields.
pub fn enum_member_name(value: &str) -> String {
    if is_identifier(value) {
        return value.to_string();
    }
    field_name(value).0
}

/// A namespace segment usable as a Python module or package name.
pub fn module_segment(segment: &str) -> String {
    if segment == "__init__" {
        return segment.to_string();
    }
    let cleaned: String = segment
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{cleaned}");
    }
    if is_keyword(&cleaned) {
        return format!("{cleaned}_");
    }
    cleaned
}
