use std::sync::Arc;

use log::{info, warn};
use serde_json::{Map, Value};

use crate::catalog::from_body;
use crate::error_handling::types::CatalogError;
use crate::records::{revise, timestamp, Artifact, Release, ReleaseDependency, UpdateLog};
use crate::storage::{DataFile, Identified, RecordStore};

const RELEASE_NOT_FOUND: &str = "Release not found";

/// Releases and the artifacts, update logs and dependencies embedded in them.
#[derive(Clone)]
pub struct ReleaseManager {
    store: Arc<RecordStore>,
}

impl ReleaseManager {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Release>, CatalogError> {
        Ok(self.store.load(DataFile::Releases)?)
    }

    /// Stores `body` as a release. An existing release with the same id is
    /// revised under the release update policy, so the body replaces it wholesale.
    pub fn upsert(&self, body: Map<String, Value>) -> Result<Release, CatalogError> {
        let mut incoming: Release = from_body(body.clone())?;
        let now = timestamp::now();

        let _locks = self.store.lock(&[DataFile::Releases])?;
        let mut releases: Vec<Release> = self.store.load(DataFile::Releases)?;
        let release = match releases.iter_mut().find(|r| r.release_id == incoming.release_id) {
            Some(slot) => {
                *slot = revise(&*slot, body, &now)?;
                info!("Replaced release {}", slot.release_id);
                slot.clone()
            }
            None => {
                incoming.last_modified = Some(now);
                releases.push(incoming.clone());
                info!("Added release {}", incoming.release_id);
                incoming
            }
        };
        self.store.save(DataFile::Releases, &releases)?;
        Ok(release)
    }

    /// Removes release `release_id`. Succeeds whether or not it existed.
    pub fn delete(&self, release_id: i64) -> Result<(), CatalogError> {
        let _locks = self.store.lock(&[DataFile::Releases])?;
        let mut releases: Vec<Release> = self.store.load(DataFile::Releases)?;
        let before = releases.len();
        releases.retain(|r| r.release_id != release_id);
        if releases.len() == before {
            info!("Release {} was already absent", release_id);
        } else {
            info!("Deleted release {}", release_id);
        }
        self.store.save(DataFile::Releases, &releases)?;
        Ok(())
    }

    pub fn add_artifact(&self, release_id: i64, body: Map<String, Value>) -> Result<Artifact, CatalogError> {
        let artifact: Artifact = from_body(body)?;
        self.upsert_child(release_id, artifact, |r| &mut r.artifacts)
    }

    pub fn delete_artifact(&self, release_id: i64, artifact_id: i64) -> Result<(), CatalogError> {
        self.remove_child(release_id, artifact_id, |r| &mut r.artifacts)
    }

    pub fn add_update_log(&self, release_id: i64, body: Map<String, Value>) -> Result<UpdateLog, CatalogError> {
        let log: UpdateLog = from_body(body)?;
        self.upsert_child(release_id, log, |r| &mut r.update_logs)
    }

    pub fn delete_update_log(&self, release_id: i64, log_id: i64) -> Result<(), CatalogError> {
        self.remove_child(release_id, log_id, |r| &mut r.update_logs)
    }

    pub fn add_dependency(
        &self,
        release_id: i64,
        body: Map<String, Value>,
    ) -> Result<ReleaseDependency, CatalogError> {
        let dependency: ReleaseDependency = from_body(body)?;
        self.upsert_child(release_id, dependency, |r| &mut r.dependencies)
    }

    pub fn delete_dependency(&self, release_id: i64, dependency_id: i64) -> Result<(), CatalogError> {
        self.remove_child(release_id, dependency_id, |r| &mut r.dependencies)
    }

    fn upsert_child<C, F>(&self, release_id: i64, child: C, children: F) -> Result<C, CatalogError>
    where
        C: Identified + Clone,
        F: FnOnce(&mut Release) -> &mut Vec<C>,
    {
        let _locks = self.store.lock(&[DataFile::Releases])?;
        let mut releases: Vec<Release> = self.store.load(DataFile::Releases)?;
        let release = find_release(&mut releases, release_id)?;

        let list = children(&mut *release);
        match list.iter_mut().find(|c| c.id() == child.id()) {
            Some(slot) => *slot = child.clone(),
            None => list.push(child.clone()),
        }
        release.last_modified = Some(timestamp::now());

        self.store.save(DataFile::Releases, &releases)?;
        info!("Stored item {} on release {}", child.id(), release_id);
        Ok(child)
    }

    fn remove_child<C, F>(&self, release_id: i64, child_id: i64, children: F) -> Result<(), CatalogError>
    where
        C: Identified,
        F: FnOnce(&mut Release) -> &mut Vec<C>,
    {
        let _locks = self.store.lock(&[DataFile::Releases])?;
        let mut releases: Vec<Release> = self.store.load(DataFile::Releases)?;
        let release = find_release(&mut releases, release_id)?;

        children(&mut *release).retain(|c| c.id() != child_id);
        release.last_modified = Some(timestamp::now());

        self.store.save(DataFile::Releases, &releases)?;
        info!("Removed item {} from release {}", child_id, release_id);
        Ok(())
    }
}

fn find_release(releases: &mut [Release], release_id: i64) -> Result<&mut Release, CatalogError> {
    releases
        .iter_mut()
        .find(|r| r.release_id == release_id)
        .ok_or_else(|| {
            warn!("Release {} not found", release_id);
            CatalogError::NotFound(RELEASE_NOT_FOUND.into())
        })
}
