use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::ProjectStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{DemRecord, Project};

const PROJECTS_FILE: &str = "projects.json";

// One JSON document per key under a data directory:
//   <dir>/projects.json           all projects
//   <dir>/dems-<projectId>.json   DEMs of one project
// Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn dems_path(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("dems-{}.json", file_key(project_id)))
    }

    // A missing or unparseable document reads as an empty list. A document
    // that parses but holds an invalid record is an error, and the file is
    // left untouched.
    async fn read_list<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<Vec<T>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable store file, treating as empty");
                return Ok(Vec::new());
            }
        };
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "invalid record in store file");
            StoreError::InvalidRecord {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    async fn write_list<T: Serialize>(&self, path: &Path, list: &[T]) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec_pretty(list)?;
        fs::write(path, bytes).await?;
        tracing::debug!(path = %path.display(), records = list.len(), "wrote store file");
        Ok(())
    }
}

// Keep ids from escaping the data directory
fn file_key(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl ProjectStore for JsonFileStore {
    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        self.read_list(&self.dir.join(PROJECTS_FILE)).await
    }

    async fn save_projects(&self, projects: &[Project]) -> StoreResult<()> {
        self.write_list(&self.dir.join(PROJECTS_FILE), projects)
            .await
    }

    async fn list_dems(&self, project_id: &str) -> StoreResult<Vec<DemRecord>> {
        self.read_list(&self.dems_path(project_id)).await
    }

    async fn save_dems(&self, project_id: &str, dems: &[DemRecord]) -> StoreResult<()> {
        self.write_list(&self.dems_path(project_id), dems).await
    }

    async fn delete_dems(&self, project_id: &str) -> StoreResult<()> {
        match fs::remove_file(self.dems_path(project_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
