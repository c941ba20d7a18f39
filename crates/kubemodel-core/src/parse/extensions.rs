use indexmap::IndexMap;
use serde_json::Value;

pub const GROUP_VERSION_KIND: &str = "x-kubernetes-group-version-kind";
pub const INT_OR_STRING: &str = "x-kubernetes-int-or-string";
pub const PRESERVE_UNKNOWN_FIELDS: &str = "x-kubernetes-preserve-unknown-fields";

/// A Kubernetes group/version/kind triple. Empty strings mean "not known".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    fn from_record(record: &Value) -> Self {
        let field = |name: &str| {
            record
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            group: field("group"),
            version: field("version"),
            kind: field("kind"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.version.is_empty() && self.kind.is_empty()
    }

    /// `group/version`, only when both halves are known.
    pub fn api_version(&self) -> Option<String> {
        if self.group.is_empty() || self.version.is_empty() {
            return None;
        }
        Some(format!("{}/{}", self.group, self.version))
    }
}

/// Vendor extension keys (`x-*`) of a schema node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions(IndexMap<String, Value>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read `x-kubernetes-group-version-kind`.
    ///
    /// The value may be a single record or a list of them. A list with more
    /// than one entry is ambiguous and yields the empty triple.
    pub fn group_version_kind(&self) -> GroupVersionKind {
        match self.get(GROUP_VERSION_KIND) {
            Some(Value::Array(records)) => match records.as_slice() {
                [record] => GroupVersionKind::from_record(record),
                _ => GroupVersionKind::default(),
            },
            Some(record @ Value::Object(_)) => GroupVersionKind::from_record(record),
            _ => GroupVersionKind::default(),
        }
    }

    pub fn int_or_string(&self) -> bool {
        self.flag(INT_OR_STRING)
    }

    pub fn preserve_unknown_fields(&self) -> bool {
        self.flag(PRESERVE_UNKNOWN_FIELDS)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl FromIterator<(String, Value)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|(key, _)| key.starts_with("x-"))
                .collect(),
        )
    }
}
