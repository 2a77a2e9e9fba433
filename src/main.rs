//! # knitgrid CLI
//!
//! Command-line interface for the grid editor backend.
//!
//! ## Usage
//!
//! ```bash
//! # Run the project API
//! knitgrid serve --listen 127.0.0.1:3000 --data-dir data/projects
//!
//! # List stored projects
//! knitgrid list --data-dir data/projects
//!
//! # Render a project file to PNG, fitted to its content
//! knitgrid render data/projects/lx3k9v2a.json --png view.png
//!
//! # Export a numbered A4 chart (file name taken from the project name)
//! knitgrid export data/projects/lx3k9v2a.json
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `knitgrid=info,tower_http=info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use knitgrid::{
    KnitError, ProjectDocument, ProjectStore,
    export::pdf,
    geometry::Offset,
    render::{self, canvas},
    server::{self, ServerConfig},
    viewport::{DEFAULT_ZOOM, Viewport, ViewportSize},
};

/// knitgrid - Pixel and knitting pattern grid editor backend
#[derive(Parser, Debug)]
#[command(name = "knitgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the project API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "KNITGRID_LISTEN", default_value = "127.0.0.1:3000")]
        listen: String,

        /// Directory holding project JSON files
        #[arg(long, env = "KNITGRID_DATA_DIR", default_value = "data/projects")]
        data_dir: PathBuf,
    },

    /// List stored projects
    List {
        /// Directory holding project JSON files
        #[arg(long, env = "KNITGRID_DATA_DIR", default_value = "data/projects")]
        data_dir: PathBuf,
    },

    /// Render a viewport of a project file as PNG
    Render {
        /// Project JSON file
        file: PathBuf,

        /// Output PNG path
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Viewport width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Pixels per cell (clamped to 5..=100)
        #[arg(long, default_value_t = DEFAULT_ZOOM)]
        zoom: i32,
    },

    /// Export a project file as a numbered A4 PDF chart
    Export {
        /// Project JSON file
        file: PathBuf,

        /// Output PDF path (defaults to the sanitized project name)
        #[arg(long, value_name = "FILE")]
        pdf: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("knitgrid=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> Result<(), KnitError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, data_dir } => {
            let config = ServerConfig {
                listen_addr: listen,
                data_dir,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
        Commands::List { data_dir } => {
            let store = ProjectStore::open(data_dir)?;
            let projects = store.list()?;
            if projects.is_empty() {
                println!("No projects in {}", store.dir().display());
            }
            for project in projects {
                println!("{:<40} {}", project.id, project.name);
            }
        }
        Commands::Render {
            file,
            png,
            width,
            height,
            zoom,
        } => {
            let doc = read_document(&file)?;
            let mut viewport = Viewport::new(Offset::default(), zoom);
            viewport.fit_to_content(&doc.grid, ViewportSize::new(width as f64, height as f64));

            let img = canvas::render_canvas(&doc.grid, width, height, viewport.offset(), viewport.zoom());
            std::fs::write(&png, render::encode_png(&img)?)?;
            info!(path = %png.display(), width, height, "saved preview");
        }
        Commands::Export { file, pdf: output } => {
            let doc = read_document(&file)?;
            let export = pdf::export_document(&doc)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));
            std::fs::write(&path, &export.bytes)?;
            println!("Saved to {}", path.display());
        }
    }

    Ok(())
}

/// Read a project document from a JSON file (either grid encoding).
fn read_document(path: &Path) -> Result<ProjectDocument, KnitError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
