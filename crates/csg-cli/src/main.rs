mod input;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use brush_csg::{CsgCompiler, CsgConfig, CsgError};
use clap::Parser;
use log::{debug, error, info};
use thiserror::Error;

use input::MapFile;
use report::Report;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Csg(#[from] CsgError),

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("entity {entity}, brush {brush}: no hull {hull}")]
    InvalidHull { entity: usize, brush: usize, hull: usize },

    #[error("could not encode report: {0}")]
    Encode(#[source] serde_json::Error),
}

/// brushcsg - CSG stage of a brush-based level compiler
#[derive(Parser, Debug)]
#[command(name = "brushcsg", version, about)]
struct Cli {
    /// Brush file (JSON)
    input: PathBuf,

    /// Configuration file (JSON); flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Hull definition file
    #[arg(long, value_name = "FILE")]
    hullfile: Option<PathBuf>,

    /// Number of worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Only build the point hull
    #[arg(long)]
    noclip: bool,

    /// Warn about brushes overlapping by more than this percentage
    #[arg(long, value_name = "PERCENT")]
    brushunion: Option<f64>,

    /// Report file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Cli {
    /// Loads the configuration file, if any, and applies the flags on top.
    fn config(&self) -> Result<CsgConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => CsgConfig::from_json_file(path)?,
            None => CsgConfig::default(),
        };
        if let Some(path) = &self.hullfile {
            config.hull_file = Some(path.clone());
        }
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }
        if let Some(threshold) = self.brushunion {
            config.brush_union_threshold = Some(threshold);
        }
        config.noclip |= self.noclip;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.config()?;
    let map = MapFile::load(&cli.input)?;

    let start = std::time::Instant::now();
    let mut compiler = CsgCompiler::new(config)?;
    for (number, entity) in map.entities.iter().enumerate() {
        let brushes = entity.to_map_brushes(number)?;
        debug!("entity {} ({}): {} brushes", number, entity.name(), brushes.len());
        if brushes.is_empty() {
            continue;
        }
        compiler.add_entity(&brushes)?;
    }
    let output = compiler.run()?;
    info!("csg done in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    let report = Report::from_output(&output);
    let json = serde_json::to_string_pretty(&report).map_err(CliError::Encode)?;
    match &cli.output {
        Some(path) => std::fs::write(path, json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => println!("{json}"),
    }
    Ok(())
}
