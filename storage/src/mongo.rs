use bson::doc;
use futures_util::stream::TryStreamExt;
use mongodb::{Client, Collection, IndexModel, options::ClientOptions};

use crate::ProjectStore;
use crate::error::StoreResult;
use crate::models::{DemRecord, Project};

// MongoDB-backed store: one `projects` and one `dems` collection.
// Records are matched on their own `id` field (uuid), not on `_id`.
#[derive(Debug, Clone)]
pub struct MongoStore {
    projects: Collection<Project>,
    dems: Collection<DemRecord>,
}

impl MongoStore {
    // Connect and make sure the lookup indexes exist
    pub async fn init(uri: &str, db_name: &str) -> StoreResult<Self> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some("Earthwork".to_string());
        let client = Client::with_options(opts)?;
        let db = client.database(db_name);

        let projects: Collection<Project> = db.collection("projects");
        let dems: Collection<DemRecord> = db.collection("dems");

        projects
            .create_index(IndexModel::builder().keys(doc! { "id": 1 }).build())
            .await?;
        dems.create_index(
            IndexModel::builder()
                .keys(doc! { "projectId": 1, "id": 1 })
                .build(),
        )
        .await?;

        tracing::info!(db = db_name, "connected to MongoDB");
        Ok(Self { projects, dems })
    }
}

impl ProjectStore for MongoStore {
    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut cursor = self.projects.find(doc! {}).await?;
        let mut out = Vec::new();
        while let Some(project) = cursor.try_next().await? {
            out.push(project);
        }
        Ok(out)
    }

    // Replace the whole collection, like rewriting projects.json
    async fn save_projects(&self, projects: &[Project]) -> StoreResult<()> {
        self.projects.delete_many(doc! {}).await?;
        if !projects.is_empty() {
            self.projects.insert_many(projects).await?;
        }
        tracing::debug!(records = projects.len(), "saved projects");
        Ok(())
    }

    async fn list_dems(&self, project_id: &str) -> StoreResult<Vec<DemRecord>> {
        let mut cursor = self.dems.find(doc! { "projectId": project_id }).await?;
        let mut out = Vec::new();
        while let Some(dem) = cursor.try_next().await? {
            out.push(dem);
        }
        Ok(out)
    }

    async fn save_dems(&self, project_id: &str, dems: &[DemRecord]) -> StoreResult<()> {
        self.delete_dems(project_id).await?;
        if !dems.is_empty() {
            self.dems.insert_many(dems).await?;
        }
        tracing::debug!(project_id, records = dems.len(), "saved DEMs");
        Ok(())
    }

    async fn delete_dems(&self, project_id: &str) -> StoreResult<()> {
        self.dems
            .delete_many(doc! { "projectId": project_id })
            .await?;
        Ok(())
    }

    async fn get_project(&self, id: &str) -> StoreResult<Option<Project>> {
        Ok(self.projects.find_one(doc! { "id": id }).await?)
    }

    async fn find_dem(&self, project_id: &str, dem_id: &str) -> StoreResult<Option<DemRecord>> {
        Ok(self
            .dems
            .find_one(doc! { "projectId": project_id, "id": dem_id })
            .await?)
    }
}
