//! Data model of the admin backend.
//!
//! Each persisted collection has a record type here. All wire and file
//! names are camelCase. Free-form records keep unknown fields in a
//! flattened `extra` map so whatever a client stored survives a rewrite.
//!
//! Submodules:
//! - `product`, `release`, `client`, `license`, `settings`, `assignment`: record types.
//! - `update_policy`: how an update body is folded into a stored record.
//! - `timestamp`: ISO-8601 stamps written into records.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::storage::{DataFile, Identified};

pub mod assignment;
pub mod client;
pub mod license;
pub mod product;
pub mod release;
pub mod settings;
pub mod timestamp;
pub mod update_policy;

pub use assignment::ClientProduct;
pub use client::{Client, ClientLocation};
pub use license::License;
pub use product::{Product, ProductWithReleases};
pub use release::{Artifact, ClientSummary, LocationSummary, Release, ReleaseDependency, UpdateLog};
pub use settings::{Notification, Settings};
pub use update_policy::{revise, UpdatePolicy};

/// A top-level record kept in its own collection file.
pub trait Record: Identified + serde::Serialize + serde::de::DeserializeOwned + Clone {
    const FILE: DataFile;
    const POLICY: UpdatePolicy;
    /// Fields copied from the stored record into every updated version.
    const PINNED: &'static [&'static str];

    /// Called on every freshly revised record before it is stored.
    fn on_revised(&mut self, _now: &str) {}
}

/// Reads an explicit `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// JSON truthiness: null, false, 0, "", [] and {} are falsy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
