//storage holds project & DEM records behind one async trait,
//backed either by JSON files or by MongoDB

pub mod error;
pub mod file;
pub mod models;
pub mod mongo;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use models::{Bounds, DemKind, DemRecord, Project};
pub use mongo::MongoStore;

// Key-value style record store used by the request layer.
// Saves replace the whole list for their key (all projects, or all DEMs of
// one project); there is no partial update.
#[allow(async_fn_in_trait)]
pub trait ProjectStore {
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    async fn save_projects(&self, projects: &[Project]) -> StoreResult<()>;

    async fn list_dems(&self, project_id: &str) -> StoreResult<Vec<DemRecord>>;

    async fn save_dems(&self, project_id: &str, dems: &[DemRecord]) -> StoreResult<()>;

    async fn delete_dems(&self, project_id: &str) -> StoreResult<()>;

    async fn get_project(&self, id: &str) -> StoreResult<Option<Project>> {
        Ok(self
            .list_projects()
            .await?
            .into_iter()
            .find(|p| p.id == id))
    }

    async fn find_dem(&self, project_id: &str, dem_id: &str) -> StoreResult<Option<DemRecord>> {
        Ok(self
            .list_dems(project_id)
            .await?
            .into_iter()
            .find(|d| d.id == dem_id))
    }
}
