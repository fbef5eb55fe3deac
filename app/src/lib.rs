// app holds the request layer around the engine, its configuration,
// and PNG rendering for the command-line front end
pub mod config;
pub mod error;
pub mod render;
pub mod service;

pub use config::{Config, StoreBackend};
pub use error::{ServiceError, ServiceResult};
pub use service::{
    Analysis, AnalysisResponse, AnalysisService, AnalyzeRequest, CreateProject, SiteSummary,
};
