use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{debug, warn};
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use padtex::{decrypt_container, export_texture, scan_textures, ExportOptions, Texture};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

mod naming;

use crate::naming::{is_contained, OutputNames};

const ZIP_SIGNATURE: [u8; 4] = *b"PK\x03\x04";
/// Texture container inside a game package.
const PACKAGE_MEMBER: &str = "assets/DATA001.BIN";

#[derive(Parser, Debug)]
#[command(name = "Puzzle & Dragons Texture Tool")]
#[command(about, author, version, long_about = None)]
struct Cli {
    /// Print debugging information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract textures from a texture file, or from every file in a folder
    #[command(arg_required_else_help = true)]
    Extract {
        /// Texture file (usually ending in ".bc"), game package (".apk") or a folder of them
        input: PathBuf,
        /// Outbound directory (defaults to the folder of each input file)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Keep the empty space textures are padded with
        #[arg(long)]
        notrim: bool,
        /// Keep the colour of fully transparent pixels
        #[arg(long)]
        noblacken: bool,
    },
    /// Print a list of textures in a texture file or folder
    #[command(arg_required_else_help = true)]
    Ls {
        /// Texture file or folder
        input: PathBuf,
    },
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let stdout = console::Term::stdout();

    match cli.command {
        Commands::Extract {
            input,
            out,
            notrim,
            noblacken,
        } => {
            let options = ExportOptions {
                trim: !notrim,
                blacken: !noblacken,
            };
            command_extract(&stdout, &input, out.as_deref(), &options)?
        }
        Commands::Ls { input } => command_ls(&stdout, &input)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn command_extract(
    stdout: &console::Term,
    input: &Path,
    out: Option<&Path>,
    options: &ExportOptions,
) -> Result<()> {
    let mut names = OutputNames::default();
    let mut failures = 0usize;

    for path in collect_inputs(input)? {
        let output_dir = match out {
            Some(dir) => dir.to_path_buf(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        match extract_file(stdout, &path, &output_dir, options, &mut names) {
            Ok(failed) => failures += failed,
            Err(report) => {
                failures += 1;
                eprintln!("{report:?}");
            }
        }
    }

    if failures > 0 {
        return Err(miette!("{failures} input file(s) or texture(s) could not be extracted"));
    }
    Ok(())
}

/// Extracts every texture of one input file. Returns the number of textures
/// that failed to export.
fn extract_file(
    stdout: &console::Term,
    path: &Path,
    output_dir: &Path,
    options: &ExportOptions,
    names: &mut OutputNames,
) -> Result<usize> {
    stdout
        .write_line(&format!("\nReading {}... ", path.display()))
        .into_diagnostic()?;

    let bytes = read_input(path)?;
    let container = decrypt_container(&bytes)
        .wrap_err_with(|| format!("failed to decrypt {}", path.display()))?;
    let textures = scan_textures(container.as_slice())
        .collect::<padtex::Result<Vec<_>>>()
        .wrap_err_with(|| format!("failed to read textures from {}", path.display()))?;

    stdout
        .write_line(&found_message(textures.len()))
        .into_diagnostic()?;

    // Names are handed out in scan order so numbering stays deterministic.
    let jobs: Vec<(Texture<'_>, PathBuf)> = textures
        .into_iter()
        .filter_map(|texture| {
            if !is_contained(texture.name()) {
                warn!(
                    "skipping texture {:?} in {}: its name leaves the output folder",
                    texture.name(),
                    path.display()
                );
                return None;
            }
            let file_name = names.assign(texture.name());
            Some((texture, output_dir.join(file_name)))
        })
        .collect();

    let bar = indicatif::ProgressBar::new(jobs.len() as u64);
    bar.set_style(get_bar_style()?);

    let results: Vec<padtex::Result<bool>> = jobs
        .par_iter()
        .map(|(texture, target)| {
            let result = export_texture(texture, target, options);
            bar.inc(1);
            result
        })
        .collect();

    bar.finish_and_clear();

    let mut failed = 0usize;
    for ((texture, target), result) in jobs.iter().zip(results) {
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match result {
            Ok(true) => stdout
                .write_line(&format!(
                    "  Writing {} ({} x {})",
                    file_name,
                    texture.width(),
                    texture.height()
                ))
                .into_diagnostic()?,
            Ok(false) => debug!("nothing to write for {file_name}"),
            Err(err) => {
                failed += 1;
                let report = miette::Report::new(err)
                    .wrap_err(format!("failed to write {}", target.display()));
                eprintln!("{report:?}");
            }
        }
    }

    Ok(failed)
}

fn command_ls(stdout: &console::Term, input: &Path) -> Result<()> {
    let inputs = collect_inputs(input)?;
    let show_path = inputs.len() > 1;

    for path in inputs {
        let bytes = read_input(&path)?;
        let container = decrypt_container(&bytes)?;

        if show_path {
            stdout
                .write_line(&format!("{}:", path.display()))
                .into_diagnostic()?;
        }
        for texture in scan_textures(container.as_slice()) {
            let texture = texture?;
            let text = format!(
                "{}\t{} x {}\t{}\t{} bytes",
                texture.name(),
                texture.width(),
                texture.height(),
                texture.encoding(),
                texture.data.len()
            );
            stdout.write_line(&text).into_diagnostic()?;
        }
    }

    Ok(())
}

/// Files to process: the input itself, or every file below an input folder.
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(miette!(
            "the input path \"{}\" does not exist",
            input.display()
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.into_diagnostic()?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Reads a container file. For a game package, the container stored inside
/// it is returned instead.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    if !bytes.starts_with(&ZIP_SIGNATURE) {
        return Ok(bytes);
    }

    debug!("{} is a package, reading {PACKAGE_MEMBER}", path.display());
    read_package_member(bytes)
        .wrap_err_with(|| format!("failed to read {PACKAGE_MEMBER} from {}", path.display()))
}

fn read_package_member(package: Vec<u8>) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).into_diagnostic()?;
    let mut member = archive.by_name(PACKAGE_MEMBER).into_diagnostic()?;
    let mut bytes = Vec::new();
    member.read_to_end(&mut bytes).into_diagnostic()?;
    Ok(bytes)
}

fn found_message(count: usize) -> String {
    match count {
        0 => "no textures found.".to_string(),
        1 => "1 texture found.".to_string(),
        n => format!("{n} textures found."),
    }
}

fn get_bar_style() -> Result<indicatif::ProgressStyle> {
    Ok(
        indicatif::ProgressStyle::with_template("[{bar:32}] {pos:>7}/{len:7} {msg}")
            .into_diagnostic()?
            .progress_chars("=>-"),
    )
}
