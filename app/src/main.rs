use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use earthwork_app::render::{contour_image, cut_fill_image, elevation_image, slope_image};
use earthwork_app::{
    Analysis, AnalysisService, AnalyzeRequest, Config, CreateProject, StoreBackend,
};
use earthwork_core::stats;
use earthwork_storage::{JsonFileStore, MongoStore, ProjectStore};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "earthwork", about = "Site terrain analysis: cut/fill, contours, slope")]
struct Cli {
    /// Record store backend (overrides EARTHWORK_STORE)
    #[arg(long, value_enum)]
    store: Option<BackendArg>,

    /// Data directory for the file store (overrides EARTHWORK_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    File,
    Mongo,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, list or delete projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// List the DEMs of a project
    Dems { project_id: String },
    /// Run an analysis and print the result as JSON
    Analyze {
        project_id: String,
        dem_id: String,
        #[command(subcommand)]
        kind: AnalyzeKind,
    },
    /// Elevation stats, relief, site area and slope classes
    Summary { project_id: String, dem_id: String },
    /// Write a PNG view of a DEM
    Render {
        project_id: String,
        dem_id: String,
        #[arg(value_enum)]
        view: View,
        #[arg(long, short)]
        out: PathBuf,
        /// Pixels per cell
        #[arg(long, default_value_t = 3)]
        scale: u32,
        #[arg(long)]
        design_elevation: Option<f64>,
        #[arg(long)]
        interval: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Skip generating the demo DEM
        #[arg(long)]
        no_demo: bool,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum AnalyzeKind {
    Cutfill {
        #[arg(long)]
        design_elevation: Option<f64>,
    },
    Contours {
        #[arg(long)]
        interval: Option<f64>,
    },
    Slope,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum View {
    Elevation,
    Cutfill,
    Slope,
    Contours,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run<S: ProjectStore>(
    service: AnalysisService<S>,
    command: Command,
    config: &Config,
) -> Result<()> {
    match command {
        Command::Project(ProjectCommand::Create {
            name,
            description,
            location,
            no_demo,
        }) => {
            let project = service
                .create_project(CreateProject {
                    name,
                    description,
                    location,
                    generate_demo: !no_demo,
                })
                .await?;
            print_json(&project)
        }
        Command::Project(ProjectCommand::List) => print_json(&service.list_projects().await?),
        Command::Project(ProjectCommand::Delete { id }) => {
            service.delete_project(&id).await?;
            print_json(&serde_json::json!({ "ok": true }))
        }
        Command::Dems { project_id } => {
            // Listing without the grids keeps the output readable
            let dems: Vec<_> = service
                .list_dems(&project_id)
                .await?
                .into_iter()
                .map(|d| {
                    serde_json::json!({
                        "id": d.id,
                        "name": d.name,
                        "type": d.kind,
                        "width": d.width,
                        "height": d.height,
                        "resolution": d.resolution,
                        "stats": d.stats,
                    })
                })
                .collect();
            print_json(&dems)
        }
        Command::Analyze {
            project_id,
            dem_id,
            kind,
        } => {
            let analysis = match kind {
                AnalyzeKind::Cutfill { design_elevation } => Analysis::CutFill { design_elevation },
                AnalyzeKind::Contours { interval } => Analysis::Contours {
                    contour_interval: interval,
                },
                AnalyzeKind::Slope => Analysis::Slope,
            };
            let start = Instant::now();
            let response = service
                .analyze(AnalyzeRequest {
                    project_id,
                    dem_id,
                    analysis,
                })
                .await?;
            tracing::info!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "analysis done");
            print_json(&response)
        }
        Command::Summary { project_id, dem_id } => {
            print_json(&service.summary(&project_id, &dem_id).await?)
        }
        Command::Render {
            project_id,
            dem_id,
            view,
            out,
            scale,
            design_elevation,
            interval,
        } => {
            let dem = service.load_dem(&project_id, &dem_id).await?;
            let grid = &dem.elevation_data;

            let img = match view {
                View::Elevation => elevation_image(grid, &stats(grid), config.cell_size_ft, scale),
                View::Cutfill => {
                    let cf = service.cut_fill(grid, design_elevation)?;
                    cut_fill_image(&cf.heatmap, scale)
                }
                View::Slope => slope_image(&service.slope(grid)?, scale),
                View::Contours => {
                    let set = service.contours(grid, interval)?;
                    contour_image(grid, &stats(grid), &set, scale)
                }
            };

            img.save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(path = %out.display(), "saved image");
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(
                    "earthwork=info,earthwork_app=info,earthwork_storage=info,earthwork_core=info",
                )),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(store) = cli.store {
        config.store = match store {
            BackendArg::File => StoreBackend::File,
            BackendArg::Mongo => StoreBackend::Mongo,
        };
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(?config, "loaded configuration");

    match config.store {
        StoreBackend::File => {
            let store = JsonFileStore::new(config.data_dir.clone());
            run(AnalysisService::new(store, &config), cli.command, &config).await
        }
        StoreBackend::Mongo => {
            let store = MongoStore::init(&config.mongo_uri, &config.mongo_db)
                .await
                .context("connecting to MongoDB")?;
            run(AnalysisService::new(store, &config), cli.command, &config).await
        }
    }
}
