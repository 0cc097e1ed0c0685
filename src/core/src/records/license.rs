use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Record, UpdatePolicy};
use crate::storage::{DataFile, Identified};

/// A license; everything but the id and stamp is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub license_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for License {
    fn id(&self) -> i64 {
        self.license_id
    }
}

impl Record for License {
    const FILE: DataFile = DataFile::Licenses;
    const POLICY: UpdatePolicy = UpdatePolicy::Replace;
    const PINNED: &'static [&'static str] = &["licenseId"];
}
