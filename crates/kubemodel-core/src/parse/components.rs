use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Components object holding reusable definitions.
///
/// Only `schemas` is carried through extraction; the other component kinds
/// play no part in model generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, serde_json::Value>,
}
