//! Convert GoldSrc studio models into Wavefront OBJ + MTL.

mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, error::ErrorKind};
use mdl2obj_core::{
    ConversionReport, ConversionRequest, ExternalToolExporter, StudioLoader,
    batch::{DEFAULT_OUT_DIR, batch_output_path, discover_models},
    convert_model,
};
use snafu::ResultExt;

use crate::error::{
    BatchFailedSnafu, BatchOnlyFlagSnafu, BatchWithOutputSnafu, CliResult, ConvertSnafu,
    DiscoverSnafu,
};

/// INPUT value that switches to batch mode.
const BATCH_WILDCARD: &str = "*";

#[derive(Debug, Parser)]
#[command(
    name = "mdl2obj",
    version,
    about = "Convert GoldSrc studio models (.mdl) into Wavefront OBJ + MTL"
)]
struct Cli {
    /// Studio model to convert, or `*` for every .mdl in the current directory
    input: PathBuf,

    /// Mesh output path (e.g. out.obj); the material is written beside it as
    /// out.mtl. When omitted, only the mesh is written, to test.obj
    output: Option<PathBuf>,

    /// Converter program invoked as `<PROGRAM> export <model> <mesh.obj>`
    #[arg(long, env = "MDL2OBJ_EXPORTER", default_value = ExternalToolExporter::DEFAULT_PROGRAM)]
    exporter: PathBuf,

    /// Batch mode only: also convert models in subdirectories
    #[arg(long, default_value_t = false)]
    recursive: bool,

    /// Batch mode only: root directory for converted models
    /// [default: models/mdlConvert]
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,
}

fn print_report(report: &ConversionReport) {
    println!(
        "Saved OBJ → {} (model '{}')",
        report.mesh_path.display(),
        report.model_name
    );
    if let Some(material) = &report.material_path {
        println!("Saved MTL → {}", material.display());
    }
}

async fn cmd_convert(
    exporter: &ExternalToolExporter,
    input: PathBuf,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let request = ConversionRequest { input, output };
    let report = convert_model(&StudioLoader, exporter, &request)
        .await
        .context(ConvertSnafu {
            input: request.input.display().to_string(),
        })?;
    print_report(&report);
    Ok(())
}

async fn cmd_batch(exporter: &ExternalToolExporter, recursive: bool, out_dir: &Path) -> CliResult<()> {
    let root = Path::new(".");
    let models = discover_models(root, recursive).context(DiscoverSnafu)?;
    if models.is_empty() {
        println!("No .mdl files found");
        return Ok(());
    }

    let total = models.len();
    let mut failed = 0usize;
    for model in models {
        let output = batch_output_path(root, out_dir, &model);
        let request = ConversionRequest::new(model, output);
        match convert_model(&StudioLoader, exporter, &request).await {
            Ok(report) => print_report(&report),
            Err(e) => {
                failed += 1;
                log::warn!("skipping {}: {e}", request.input.display());
                eprintln!("Failed to convert {}: {e}", request.input.display());
            }
        }
    }

    if failed > 0 {
        return BatchFailedSnafu { failed, total }.fail();
    }
    Ok(())
}

async fn run() -> CliResult<()> {
    // Usage errors exit with 1 like every other failure; help/version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let exporter = ExternalToolExporter::new(cli.exporter);
    log::debug!("using exporter {}", exporter.program().display());

    if cli.input.as_os_str() == BATCH_WILDCARD {
        let out_dir = cli.out_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
        if cli.output.is_some() {
            return BatchWithOutputSnafu {
                out_dir: out_dir.display().to_string(),
            }
            .fail();
        }
        return cmd_batch(&exporter, cli.recursive, &out_dir).await;
    }

    if cli.recursive {
        return BatchOnlyFlagSnafu { flag: "--recursive" }.fail();
    }
    if cli.out_dir.is_some() {
        return BatchOnlyFlagSnafu { flag: "--out-dir" }.fail();
    }

    cmd_convert(&exporter, cli.input, cli.output).await
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
