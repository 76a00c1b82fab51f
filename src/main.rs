//! bindery - Book export ingestion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use bindery::{
    AssetFetcher, BookExport, CURRENT_VERSION, Error, ProgressReporter, StandardNormalizer,
    build_toc,
};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(version, about = "Book export ingestion tool", long_about = None)]
#[command(after_help = "EXAMPLES:
    bindery export/                  Show export metadata
    bindery export/ out/             Build TOC and resolve assets into out/
    bindery export/ out/ -b v2       Use version v2 instead of the default")]
struct Cli {
    /// Export directory (must contain revision.json)
    #[arg(value_name = "EXPORT_DIR")]
    export_dir: PathBuf,

    /// Output directory; omit to just show export metadata
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Version to build the TOC for
    #[arg(short = 'b', long, default_value = CURRENT_VERSION)]
    book_version: String,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.output_dir {
        None => show_info(&cli.export_dir, &cli.book_version),
        Some(ref out) => ingest(&cli.export_dir, out, &cli.book_version, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(export_dir: &Path, version: &str) -> bindery::Result<()> {
    let export = BookExport::open(export_dir)?;

    println!("Export: {}", export_dir.display());
    println!("Title: {}", export.title);
    println!("Primary version: {}", export.manifest.primary_version_id);
    for (id, v) in &export.manifest.versions {
        println!("  {id}: {}", v.title);
    }
    println!("Assets: {}", export.manifest.assets.len());

    let toc = build_toc(&export.manifest, version);
    println!("TOC entries: {}", toc.len());
    Ok(())
}

fn ingest(export_dir: &Path, out_dir: &Path, version: &str, quiet: bool) -> bindery::Result<()> {
    let export = BookExport::open(export_dir)?;
    fs::create_dir_all(out_dir)?;

    if !quiet {
        println!("Building TOC for version '{version}'...");
    }
    let toc = build_toc(&export.manifest, version);
    let toc_path = out_dir.join("toc.json");
    fs::write(&toc_path, serde_json::to_vec_pretty(&toc)?)?;
    if !quiet {
        println!("Wrote {} entries to {}", toc.len(), toc_path.display());
    }

    if !quiet {
        println!("Resolving {} assets...", export.manifest.assets.len());
    }
    let mut fetcher = BundledOnly;
    let mut progress = ConsoleProgress { quiet };
    export.resolve_assets(
        &out_dir.join("assets"),
        &mut fetcher,
        &StandardNormalizer::default(),
        &mut progress,
    )?;
    if !quiet {
        println!("Done.");
    }
    Ok(())
}

/// The shipped binary carries no download transport; assets that are not
/// bundled in the export (or whose names are ambiguous) fail resolution.
struct BundledOnly;

impl AssetFetcher for BundledOnly {
    fn fetch(&mut self, url: &str, target: &Path) -> bindery::Result<()> {
        Err(Error::AssetFetch {
            uid: target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            url: url.to_string(),
            reason: "no download transport configured".to_string(),
        })
    }
}

struct ConsoleProgress {
    quiet: bool,
}

impl ProgressReporter for ConsoleProgress {
    fn on_asset(&mut self, done: usize, total: usize, name: &str) {
        if !self.quiet {
            println!("  [{done}/{total}] {name}");
        }
    }
}
