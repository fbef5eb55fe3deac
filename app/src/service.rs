// Request layer: turns project/DEM/analysis requests into store lookups
// and engine calls. The store is injected; the engine never sees it.

use chrono::Utc;
use earthwork_core::{
    ContourSet, CutFill, DEFAULT_CONTOUR_INTERVAL_FT, DEFAULT_DESIGN_ELEVATION_FT,
    DEMO_RESOLUTION_M, ElevationGrid, GridStats, SlopeField, SlopeHistogram, contours, cut_fill,
    site_area_acres, slope, stats, synthesize,
};
use earthwork_storage::{Bounds, DemKind, DemRecord, Project, ProjectStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};

// Lat/lon box the demo DEM is pinned to
pub const DEMO_BOUNDS: Bounds = Bounds {
    north: 30.2672,
    south: 30.2642,
    east: -97.7391,
    west: -97.7421,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_true")]
    pub generate_demo: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CreateProject {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            location: None,
            generate_demo: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Analysis {
    CutFill {
        #[serde(default, rename = "designElevation")]
        design_elevation: Option<f64>,
    },
    Contours {
        #[serde(default, rename = "contourInterval")]
        contour_interval: Option<f64>,
    },
    Slope,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub project_id: String,
    pub dem_id: String,
    #[serde(flatten)]
    pub analysis: Analysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    CutFill(CutFill),
    Contours { contours: ContourSet },
    Slope(SlopeField),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub width: usize,
    pub height: usize,
    pub stats: GridStats,
    pub relief: f64,
    pub area_acres: f64,
    pub slope_classes: SlopeHistogram,
}

// Zero or missing means "use the default", as form posts send 0 for blanks
fn or_default(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| *v != 0.0).unwrap_or(default)
}

pub struct AnalysisService<S> {
    store: S,
    grid_size: usize,
    cell_size_ft: f64,
}

impl<S: ProjectStore> AnalysisService<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            grid_size: config.grid_size,
            cell_size_ft: config.cell_size_ft,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    // Create a project and, unless told otherwise, seed it with a demo DEM.
    pub async fn create_project(&self, req: CreateProject) -> ServiceResult<Project> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let mut dems = Vec::new();
        if req.generate_demo {
            let grid = synthesize(self.grid_size, self.grid_size)?;
            dems.push(DemRecord {
                id: Uuid::new_v4().to_string(),
                project_id: id.clone(),
                name: "Existing Terrain".to_string(),
                kind: DemKind::Existing,
                created_at: now,
                resolution: DEMO_RESOLUTION_M,
                width: grid.width() as u32,
                height: grid.height() as u32,
                bounds: DEMO_BOUNDS,
                stats: stats(&grid),
                elevation_data: grid,
            });
        }

        let project = Project {
            id: id.clone(),
            name: req
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Untitled Project".to_string()),
            description: req.description.unwrap_or_default(),
            location: req.location.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            bounds: None,
            dem_count: dems.len() as u32,
            image_count: 0,
        };

        // DEMs are written before the project that counts them
        let mut projects = self.store.list_projects().await?;
        projects.push(project.clone());
        if !dems.is_empty() {
            self.store.save_dems(&id, &dems).await?;
        }
        if let Err(e) = self.store.save_projects(&projects).await {
            if let Err(cleanup) = self.store.delete_dems(&id).await {
                tracing::warn!(project_id = %id, error = %cleanup, "could not remove orphaned DEMs");
            }
            return Err(e.into());
        }

        tracing::info!(project_id = %id, name = %project.name, dems = dems.len(), "created project");
        Ok(project)
    }

    pub async fn delete_project(&self, id: &str) -> ServiceResult<()> {
        let mut projects = self.store.list_projects().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(ServiceError::not_found("project", id));
        }

        self.store.save_projects(&projects).await?;
        self.store.delete_dems(id).await?;
        tracing::info!(project_id = %id, "deleted project");
        Ok(())
    }

    pub async fn list_dems(&self, project_id: &str) -> ServiceResult<Vec<DemRecord>> {
        if project_id.trim().is_empty() {
            return Err(ServiceError::BadRequest("missing projectId".to_string()));
        }
        Ok(self.store.list_dems(project_id).await?)
    }

    pub async fn load_dem(&self, project_id: &str, dem_id: &str) -> ServiceResult<DemRecord> {
        self.store
            .find_dem(project_id, dem_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("DEM", dem_id))
    }

    pub async fn analyze(&self, req: AnalyzeRequest) -> ServiceResult<AnalysisResponse> {
        let dem = self.load_dem(&req.project_id, &req.dem_id).await?;
        let grid = &dem.elevation_data;
        tracing::info!(
            project_id = %req.project_id,
            dem_id = %req.dem_id,
            analysis = ?req.analysis,
            "running analysis"
        );

        let response = match req.analysis {
            Analysis::CutFill { design_elevation } => {
                AnalysisResponse::CutFill(self.cut_fill(grid, design_elevation)?)
            }
            Analysis::Contours { contour_interval } => AnalysisResponse::Contours {
                contours: self.contours(grid, contour_interval)?,
            },
            Analysis::Slope => AnalysisResponse::Slope(self.slope(grid)?),
        };
        Ok(response)
    }

    // Typed entry points, applying the same defaults as `analyze`

    pub fn cut_fill(
        &self,
        grid: &ElevationGrid,
        design_elevation: Option<f64>,
    ) -> ServiceResult<CutFill> {
        let design = or_default(design_elevation, DEFAULT_DESIGN_ELEVATION_FT);
        Ok(cut_fill(grid, design, self.cell_size_ft)?)
    }

    pub fn contours(
        &self,
        grid: &ElevationGrid,
        contour_interval: Option<f64>,
    ) -> ServiceResult<ContourSet> {
        let interval = or_default(contour_interval, DEFAULT_CONTOUR_INTERVAL_FT);
        Ok(contours(grid, interval)?)
    }

    pub fn slope(&self, grid: &ElevationGrid) -> ServiceResult<SlopeField> {
        Ok(slope(grid, self.cell_size_ft)?)
    }

    pub async fn summary(&self, project_id: &str, dem_id: &str) -> ServiceResult<SiteSummary> {
        let dem = self.load_dem(project_id, dem_id).await?;
        let grid = &dem.elevation_data;
        let s = stats(grid);
        Ok(SiteSummary {
            width: grid.width(),
            height: grid.height(),
            stats: s,
            relief: s.relief(),
            area_acres: site_area_acres(grid, self.cell_size_ft)?,
            slope_classes: slope(grid, self.cell_size_ft)?.class_histogram(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthwork_storage::{JsonFileStore, StoreError, StoreResult};
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> AnalysisService<JsonFileStore> {
        let config = Config {
            grid_size: 24,
            ..Config::default()
        };
        AnalysisService::new(JsonFileStore::new(dir.path()), &config)
    }

    async fn demo(svc: &AnalysisService<JsonFileStore>) -> (Project, DemRecord) {
        let project = svc
            .create_project(CreateProject {
                name: Some("North pad".to_string()),
                ..CreateProject::default()
            })
            .await
            .unwrap();
        let dem = svc.list_dems(&project.id).await.unwrap().remove(0);
        (project, dem)
    }

    #[tokio::test]
    async fn create_project_seeds_demo_dem() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, dem) = demo(&svc).await;

        assert_eq!(project.name, "North pad");
        assert_eq!(project.dem_count, 1);
        assert_eq!(dem.project_id, project.id);
        assert_eq!(dem.kind, DemKind::Existing);
        assert_eq!((dem.width, dem.height), (24, 24));
        assert_eq!(dem.stats, stats(&dem.elevation_data));
        assert_eq!(dem.bounds, DEMO_BOUNDS);
        assert_eq!(svc.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_project_without_demo() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let project = svc
            .create_project(CreateProject {
                name: Some("  ".to_string()),
                generate_demo: false,
                ..CreateProject::default()
            })
            .await
            .unwrap();

        assert_eq!(project.name, "Untitled Project");
        assert_eq!(project.dem_count, 0);
        assert!(svc.list_dems(&project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyze_dispatches_each_kind() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, dem) = demo(&svc).await;

        let req = |analysis| AnalyzeRequest {
            project_id: project.id.clone(),
            dem_id: dem.id.clone(),
            analysis,
        };

        match svc
            .analyze(req(Analysis::CutFill {
                design_elevation: None,
            }))
            .await
            .unwrap()
        {
            AnalysisResponse::CutFill(cf) => {
                let expected = cut_fill(&dem.elevation_data, 845.0, 5.0).unwrap();
                assert_eq!(cf, expected);
            }
            other => panic!("unexpected response {other:?}"),
        }

        match svc
            .analyze(req(Analysis::Contours {
                contour_interval: Some(0.0),
            }))
            .await
            .unwrap()
        {
            AnalysisResponse::Contours { contours: set } => {
                assert_eq!(set, contours(&dem.elevation_data, 5.0).unwrap());
            }
            other => panic!("unexpected response {other:?}"),
        }

        match svc.analyze(req(Analysis::Slope)).await.unwrap() {
            AnalysisResponse::Slope(field) => assert_eq!(field.gradient.len(), 24),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_unknown_dem_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, _) = demo(&svc).await;

        let err = svc
            .analyze(AnalyzeRequest {
                project_id: project.id,
                dem_id: "missing".to_string(),
                analysis: Analysis::Slope,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "DEM", .. }));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn negative_interval_is_an_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, dem) = demo(&svc).await;

        let err = svc
            .analyze(AnalyzeRequest {
                project_id: project.id,
                dem_id: dem.id,
                analysis: Analysis::Contours {
                    contour_interval: Some(-5.0),
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Engine(_)));
        assert_eq!(err.status_code(), 400);
    }

    // File store that can be told to fail one kind of save
    struct FailingStore {
        inner: JsonFileStore,
        fail_projects: bool,
        fail_dems: bool,
    }

    fn disk_full() -> StoreError {
        StoreError::Io(std::io::Error::other("disk full"))
    }

    impl ProjectStore for FailingStore {
        async fn list_projects(&self) -> StoreResult<Vec<Project>> {
            self.inner.list_projects().await
        }

        async fn save_projects(&self, projects: &[Project]) -> StoreResult<()> {
            if self.fail_projects {
                return Err(disk_full());
            }
            self.inner.save_projects(projects).await
        }

        async fn list_dems(&self, project_id: &str) -> StoreResult<Vec<DemRecord>> {
            self.inner.list_dems(project_id).await
        }

        async fn save_dems(&self, project_id: &str, dems: &[DemRecord]) -> StoreResult<()> {
            if self.fail_dems {
                return Err(disk_full());
            }
            self.inner.save_dems(project_id, dems).await
        }

        async fn delete_dems(&self, project_id: &str) -> StoreResult<()> {
            self.inner.delete_dems(project_id).await
        }
    }

    fn failing(dir: &TempDir, fail_projects: bool, fail_dems: bool) -> AnalysisService<FailingStore> {
        let store = FailingStore {
            inner: JsonFileStore::new(dir.path()),
            fail_projects,
            fail_dems,
        };
        let config = Config {
            grid_size: 8,
            ..Config::default()
        };
        AnalysisService::new(store, &config)
    }

    fn dem_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_name().to_string_lossy().starts_with("dems-"))
                    .count()
            })
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn failed_dem_save_leaves_no_project() {
        let dir = tempfile::tempdir().unwrap();
        let svc = failing(&dir, false, true);

        let err = svc.create_project(CreateProject::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Io(_))));
        assert!(svc.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_project_save_removes_its_dems() {
        let dir = tempfile::tempdir().unwrap();
        let svc = failing(&dir, true, false);

        let err = svc.create_project(CreateProject::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Io(_))));
        assert!(svc.list_projects().await.unwrap().is_empty());
        assert_eq!(dem_files(&dir), 0);
    }

    #[tokio::test]
    async fn ragged_stored_grid_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, dem) = demo(&svc).await;

        let path = dir.path().join(format!("dems-{}.json", project.id));
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value[0]["elevationData"][1] = serde_json::json!([1.0]);
        std::fs::write(&path, value.to_string()).unwrap();

        let err = svc
            .analyze(AnalyzeRequest {
                project_id: project.id.clone(),
                dem_id: dem.id,
                analysis: Analysis::Slope,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::InvalidRecord { .. })));
        assert_eq!(err.status_code(), 422);

        // The file is left as it was
        let after: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(after, value);
    }

    #[tokio::test]
    async fn delete_project_drops_its_dems() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, _) = demo(&svc).await;

        svc.delete_project(&project.id).await.unwrap();
        assert!(svc.list_projects().await.unwrap().is_empty());
        assert!(svc.list_dems(&project.id).await.unwrap().is_empty());

        let err = svc.delete_project(&project.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "project", .. }));
    }

    #[tokio::test]
    async fn summary_reports_area_and_relief() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let (project, dem) = demo(&svc).await;

        let summary = svc.summary(&project.id, &dem.id).await.unwrap();
        assert_eq!(summary.width, 24);
        assert_eq!(summary.relief, summary.stats.relief());
        // 120 ft × 120 ft
        assert!((summary.area_acres - 14_400.0 / 43_560.0).abs() < 1e-9);
        let h = summary.slope_classes;
        assert_eq!(h.gentle + h.moderate + h.steep + h.very_steep, 24 * 24);
    }

    #[test]
    fn analyze_request_json_shape() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"projectId":"p","demId":"d","type":"cutfill","designElevation":850}"#,
        )
        .unwrap();
        assert_eq!(
            req.analysis,
            Analysis::CutFill {
                design_elevation: Some(850.0)
            }
        );

        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"projectId":"p","demId":"d","type":"contours"}"#).unwrap();
        assert_eq!(
            req.analysis,
            Analysis::Contours {
                contour_interval: None
            }
        );

        assert!(
            serde_json::from_str::<AnalyzeRequest>(r#"{"projectId":"p","demId":"d","type":"volume"}"#)
                .is_err()
        );
    }

    #[test]
    fn create_project_defaults_to_demo() {
        let req: CreateProject = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert!(req.generate_demo);
    }
}
