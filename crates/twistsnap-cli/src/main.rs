//! twistsnap CLI - build and export twist-snap PTFE fittings
//!
//! Reads an optional fitting catalog and connector config, then writes STEP
//! and STL files or reports on single fittings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use twistsnap::fittings::ptfe_connector;
use twistsnap::{export_catalog, Catalog, ExportFormat, TwistSnapConnector};

#[derive(Parser)]
#[command(name = "twistsnap")]
#[command(about = "Twist-and-snap PTFE tube fittings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Stl,
    Step,
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Stl => vec![ExportFormat::Stl],
            FormatArg::Step => vec![ExportFormat::Step],
            FormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build catalog fittings and write them to disk
    Build {
        /// Fitting catalog (default: the built-in fittings)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Connector config overlay (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory; files go to <out>/step and <out>/stl
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Which formats to write
        #[arg(short, long, value_enum, default_value_t = FormatArg::All)]
        format: FormatArg,
        /// Only build these fittings (repeatable)
        #[arg(long)]
        only: Vec<String>,
    },
    /// List catalog fittings
    List {
        /// Fitting catalog (default: the built-in fittings)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Build one fitting and print its measurements
    Info {
        /// Fitting name
        name: String,
        /// Fitting catalog (default: the built-in fittings)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Connector config overlay (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective connector configuration as TOML
    Config {
        /// Connector config overlay (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            catalog,
            config,
            out,
            format,
            only,
        } => {
            build(catalog.as_deref(), config.as_deref(), &out, format, &only)?;
        }
        Commands::List { catalog } => {
            list(catalog.as_deref())?;
        }
        Commands::Info {
            name,
            catalog,
            config,
            json,
        } => {
            show_info(&name, catalog.as_deref(), config.as_deref(), json)?;
        }
        Commands::Config { config } => {
            let connector = load_connector(config.as_deref())?;
            let text = connector
                .effective_config()
                .to_toml_string()
                .context("failed to serialise config")?;
            print!("{text}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TWISTSNAP_LOG")
        .unwrap_or_else(|_| EnvFilter::new("twistsnap=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => {
            Catalog::load(p).with_context(|| format!("failed to load catalog {}", p.display()))
        }
        None => Ok(Catalog::default()),
    }
}

fn load_connector(path: Option<&Path>) -> Result<TwistSnapConnector> {
    let mut connector = ptfe_connector();
    if let Some(p) = path {
        connector
            .load_config(p)
            .with_context(|| format!("failed to load config {}", p.display()))?;
    }
    connector.validate().context("invalid connector config")?;
    Ok(connector)
}

fn build(
    catalog: Option<&Path>,
    config: Option<&Path>,
    out: &Path,
    format: FormatArg,
    only: &[String],
) -> Result<()> {
    let mut catalog = load_catalog(catalog)?;
    if !only.is_empty() {
        catalog = catalog.select(only)?;
    }
    let connector = load_connector(config)?;
    tracing::debug!(
        fittings = catalog.fittings.len(),
        out = %out.display(),
        "building catalog"
    );

    let records = export_catalog(&catalog, &connector, out, &format.formats())
        .with_context(|| format!("failed to export to {}", out.display()))?;
    for r in &records {
        println!("{} ({} triangles)", r.path.display(), r.triangles);
    }
    Ok(())
}

fn list(catalog: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let width = catalog
        .fittings
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);
    for f in &catalog.fittings {
        println!("{:<width$}  {}", f.name, f.kind);
    }
    Ok(())
}

#[derive(Serialize)]
struct BoundingBox {
    min: [f64; 3],
    max: [f64; 3],
}

#[derive(Serialize)]
struct FittingInfo {
    name: String,
    kind: String,
    label: String,
    bodies: Vec<String>,
    volume: f64,
    surface_area: f64,
    bounding_box: BoundingBox,
    triangles: usize,
}

fn show_info(
    name: &str,
    catalog: Option<&Path>,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let spec = catalog
        .get(name)
        .with_context(|| format!("no fitting named {name:?} in catalog"))?;
    let connector = load_connector(config)?;
    let assembly = spec
        .build(&connector)
        .with_context(|| format!("failed to build {name}"))?;

    let (min, max) = assembly.bounding_box();
    let info = FittingInfo {
        name: spec.name.clone(),
        kind: spec.kind.to_string(),
        label: assembly.label.clone(),
        bodies: assembly.children.iter().map(|p| p.name.clone()).collect(),
        volume: assembly.volume(),
        surface_area: assembly.surface_area(),
        bounding_box: BoundingBox { min, max },
        triangles: assembly.num_triangles(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("twistsnap fitting: {}", info.name);
    println!("  Kind: {}", info.kind);
    println!("  Label: {}", info.label);
    println!("  Bodies: {}", info.bodies.join(", "));
    println!("  Volume: {:.3} mm³", info.volume);
    println!("  Surface area: {:.3} mm²", info.surface_area);
    println!(
        "  Bounds: [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
        min[0], min[1], min[2], max[0], max[1], max[2]
    );
    println!("  Triangles: {}", info.triangles);
    Ok(())
}
