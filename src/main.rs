//! srdtool - Command-line tool for SRD resource container inspection and
//! model extraction.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use srd::{extract_mesh, mesh, AuxBuffers, ObjWriter, SrdFile, Warning};

/// srdtool - SRD resource container inspection and model extraction
#[derive(Parser)]
#[command(name = "srdtool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the block tree of an SRD container
    PrintBlocks {
        /// Path to the SRD file
        #[arg(short, long, env = "INPUT_SRD")]
        input: PathBuf,
    },

    /// Extract mesh geometry to a Wavefront OBJ file
    ExtractModels {
        /// Path to the SRD file (sibling .srdi/.srdv files are picked up
        /// automatically)
        #[arg(short, long, env = "INPUT_SRD")]
        input: PathBuf,

        /// Output OBJ file (defaults to `<input>.obj` beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::PrintBlocks { input } => {
            cmd_print_blocks(&input)?;
        }
        Commands::ExtractModels { input, output } => {
            cmd_extract_models(&input, output)?;
        }
    }

    Ok(())
}

fn cmd_print_blocks(input: &PathBuf) -> Result<()> {
    let file = SrdFile::load(input).context("Failed to load SRD file")?;

    println!("\"{}\" contains the following blocks:\n", input.display());
    print!("{}", file.dump());

    report_warnings(file.warnings());

    Ok(())
}

fn cmd_extract_models(input: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("Loading SRD container: {}", input.display());

    let start = Instant::now();
    let file = SrdFile::load(input).context("Failed to load SRD file")?;
    let aux = AuxBuffers::load_beside(input).context("Failed to load auxiliary files")?;

    println!(
        "Parsed {} top-level blocks in {:?} (srdi: {} bytes, srdv: {} bytes)",
        file.blocks().len(),
        start.elapsed(),
        aux.index.len(),
        aux.bulk.len()
    );

    let pairs: Vec<_> = mesh::mesh_pairs(file.blocks()).collect();
    println!("Extracting {} meshes...", pairs.len());

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    report_warnings(file.warnings());

    let mut obj = ObjWriter::new();
    let mut warnings: Vec<Warning> = Vec::new();
    let mut extracted = 0;
    let mut skipped = 0;

    for (vtx, rsi) in &pairs {
        match extract_mesh(vtx, rsi, &aux, &mut warnings) {
            Ok(mesh) => {
                obj.append_mesh(&mesh);
                extracted += 1;
            }
            Err(e) => {
                warnings.push(Warning::MeshSkipped {
                    name: rsi.resource_name().unwrap_or("unnamed").to_string(),
                    reason: e.to_string(),
                });
                skipped += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let output = output.unwrap_or_else(|| {
        let mut os = input.clone().into_os_string();
        os.push(".obj");
        PathBuf::from(os)
    });
    fs::write(&output, obj.finish()).context("Failed to write OBJ file")?;

    println!(
        "Wrote {} meshes to {} ({} skipped)",
        extracted,
        output.display(),
        skipped
    );
    report_warnings(&warnings);

    Ok(())
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("WARNING: {warning}");
    }
}
