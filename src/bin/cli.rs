// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! cloudseg CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use cloudseg::cli::{Reporter, Runner};
use cloudseg::config::ExtractionParams;
use cloudseg::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cloudseg")]
#[command(about = "Octree connected-component extraction for point clouds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Command line overrides of [`ExtractionParams`]
#[derive(clap::Args, Debug)]
struct ParamArgs {
    /// Octree level (0-21)
    #[arg(short = 'l', long)]
    octree_level: Option<u8>,

    /// Minimum number of points per component
    #[arg(short = 'm', long)]
    min_size: Option<usize>,

    /// Abort when a cloud has more components than this
    #[arg(long)]
    max_components: Option<usize>,

    /// Assign a random color to each component
    #[arg(long)]
    random_colors: bool,

    /// Connect cells through faces only
    #[arg(long)]
    six_connexity: bool,

    /// Keep discovery order instead of largest first
    #[arg(long)]
    no_sort: bool,

    /// Seed for random colors
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file (defaults to ./cloudseg.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<ExtractionParams> {
        let mut params = match &self.config {
            Some(path) => {
                let mut params = ExtractionParams::from_file(path)?;
                params.apply_env_overrides(|key| std::env::var(key).ok())?;
                params
            }
            None => ExtractionParams::load()?,
        };

        if let Some(level) = self.octree_level {
            params.octree_level = level;
        }
        if let Some(min) = self.min_size {
            params.min_component_size = min;
        }
        if let Some(max) = self.max_components {
            params.max_number_components = max;
        }
        if self.random_colors {
            params.random_colors = true;
        }
        if self.six_connexity {
            params.six_connexity = true;
        }
        if self.no_sort {
            params.sort_by_size = false;
        }
        if self.seed.is_some() {
            params.color_seed = self.seed;
        }
        Ok(params)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract connected components from cloud files
    Extract {
        /// Cloud files (.json) or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for components and report
        #[arg(short, long, default_value = "components")]
        out: PathBuf,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Summarize cloud files
    Info {
        /// Cloud files (.json) or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        params: ParamArgs,

        /// Write it to this file instead
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        Reporter::report_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract { inputs, out, params } => extract_command(&inputs, out, &params),
        Commands::Info { inputs } => info_command(&inputs),
        Commands::Config { params, output } => config_command(&params, output),
        Commands::Version => {
            println!("cloudseg v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn extract_command(inputs: &[PathBuf], out: PathBuf, args: &ParamArgs) -> Result<()> {
    let params = args.resolve()?;
    log::debug!("Effective parameters: {:?}", params);

    let summary = Runner::new(params).with_progress(true).run(inputs, &out)?;
    Reporter::report_extraction(&summary.result, summary.duration);

    if summary.result.is_complete() {
        Reporter::success(&format!(
            "{} component(s) written to {}",
            summary.report.component_count(),
            out.display()
        ));
    }
    Ok(())
}

fn info_command(inputs: &[PathBuf]) -> Result<()> {
    let files = io::discover_cloud_files(inputs)?;
    if files.is_empty() {
        Reporter::report_warning("No cloud file found");
        return Ok(());
    }
    for file in &files {
        match io::load_entities(file) {
            Ok(entities) => Reporter::report_entities(&file.display().to_string(), &entities),
            Err(e) => Reporter::report_error(&format!("{:#}", e)),
        }
    }
    Ok(())
}

fn config_command(args: &ParamArgs, output: Option<PathBuf>) -> Result<()> {
    let params = args.resolve()?;
    match output {
        Some(path) => {
            params.save(&path)?;
            Reporter::report_info(&format!("Configuration written to {}", path.display()));
        }
        None => print!("{}", toml::to_string_pretty(&params)?),
    }
    Ok(())
}
