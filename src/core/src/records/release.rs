use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Record, UpdatePolicy};
use crate::storage::{DataFile, Identified};

fn default_release_type() -> String {
    "minor".to_string()
}

fn default_status() -> String {
    "draft".to_string()
}

/// A product release, owning its artifacts, install logs and dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub release_id: i64,
    pub product_id: i64,
    pub version: String,
    #[serde(default = "default_release_type")]
    pub release_type: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub release_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Kept as raw JSON: older data holds non-list values here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Value>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub artifacts: Vec<Artifact>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub update_logs: Vec<UpdateLog>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub dependencies: Vec<ReleaseDependency>,
    #[serde(default)]
    pub last_modified: Option<String>,
}

impl Identified for Release {
    fn id(&self) -> i64 {
        self.release_id
    }
}

impl Record for Release {
    const FILE: DataFile = DataFile::Releases;
    const POLICY: UpdatePolicy = UpdatePolicy::Replace;
    const PINNED: &'static [&'static str] = &[];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub artifact_id: i64,
    pub release_id: i64,
    pub file_url: String,
    pub hash: String,
    #[serde(default)]
    pub signature: Option<String>,
    /// Size in bytes.
    pub size: i64,
    pub created_at: String,
}

impl Identified for Artifact {
    fn id(&self) -> i64 {
        self.artifact_id
    }
}

/// Snapshot of the client embedded in an update log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub client_id: i64,
    pub name: String,
    #[serde(default)]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub client_location_id: i64,
    pub name: String,
}

/// One installation of a release at a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLog {
    pub update_log_id: i64,
    pub client_id: i64,
    pub release_id: i64,
    #[serde(default)]
    pub client_location_id: Option<i64>,
    pub installed_at: String,
    pub status: String,
    pub client: ClientSummary,
    #[serde(default)]
    pub location: Option<LocationSummary>,
}

impl Identified for UpdateLog {
    fn id(&self) -> i64 {
        self.update_log_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDependency {
    pub release_dependency_id: i64,
    pub release_id: i64,
    pub depends_on_release_id: i64,
    #[serde(default)]
    pub depends_on: Map<String, Value>,
}

impl Identified for ReleaseDependency {
    fn id(&self) -> i64 {
        self.release_dependency_id
    }
}
