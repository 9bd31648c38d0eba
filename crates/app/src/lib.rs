//! libshelf CLI
//!
//! Small command-line front end over the library core: initialize the
//! config, scan the roots, list what was found, and render a single
//! item's preview to disk through the same adapter/normalizer pipeline
//! the browser uses.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use libshelf_cache::normalize;
use libshelf_core::{scan_roots, AppConfig, LibraryItem, ScanStats};
use libshelf_render::{DocumentKind, RendererRegistry, VisualNode};
use libshelf_scheduler::{wait_ready, READY_POLL_INTERVAL, READY_TIMEOUT};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "libshelf")]
#[command(about = "Personal document-library indexer")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a default config if none exists.
    Init,
    /// Scan the configured roots for documents.
    Scan {
        /// Override and persist the roots to scan
        #[arg(long, num_args = 0.., value_name = "DIR")]
        roots: Vec<PathBuf>,
    },
    /// List the documents found under the configured roots.
    List {
        /// Only list items with this extension
        #[arg(long, value_name = "EXT")]
        ext: Option<String>,
    },
    /// Render an item's first visual (page or cover) to an image file.
    Thumb {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print CLI version.
    Version,
}

/// Entry point shared by `main` and the tests
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Init => cmd_init(&cli.config),
        Commands::Scan { roots } => cmd_scan(&cli.config, roots),
        Commands::List { ext } => cmd_list(&cli.config, ext),
        Commands::Thumb { file, output } => cmd_thumb(&file, output),
        Commands::Version => {
            println!("libshelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn cmd_init(config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    println!("config: {}", config_path.display());
    println!("database: {}", config.database);
    println!("roots: {}", config.normalized_roots().len());
    Ok(())
}

/// Roots from `LIBRARY_ROOTS`, split on the platform path separator
fn env_roots() -> Option<Vec<PathBuf>> {
    let env = std::env::var("LIBRARY_ROOTS").ok()?;
    let sep = if cfg!(windows) { ';' } else { ':' };
    let roots: Vec<PathBuf> = env
        .split(sep)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();
    if roots.is_empty() {
        None
    } else {
        Some(roots)
    }
}

fn scan_with_config(config_path: &Path, roots: Vec<PathBuf>) -> Result<(Vec<LibraryItem>, ScanStats)> {
    let mut config = AppConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let override_roots = if roots.is_empty() { env_roots() } else { Some(roots) };
    if let Some(roots) = override_roots {
        config.roots = roots
            .iter()
            .map(|r| r.to_string_lossy().into_owned())
            .collect();
        config.save(config_path)?;
    }

    Ok(scan_roots(
        &config.normalized_roots(),
        &config.normalized_extensions(),
    ))
}

fn cmd_scan(config_path: &Path, roots: Vec<PathBuf>) -> Result<()> {
    let (_items, stats) = scan_with_config(config_path, roots)?;
    println!(
        "scanned: {}, indexed: {}, skipped: {}",
        stats.scanned, stats.indexed, stats.skipped
    );
    Ok(())
}

fn cmd_list(config_path: &Path, ext: Option<String>) -> Result<()> {
    let (items, _stats) = scan_with_config(config_path, Vec::new())?;
    let filter = ext.map(|e| e.trim_start_matches('.').to_ascii_lowercase());
    for item in &items {
        if let Some(ref ext) = filter {
            if item.ext != *ext {
                continue;
            }
        }
        println!("{:>6}  {:>12}  {}", item.id, item.size, item.path.display());
    }
    Ok(())
}

/// Render the first visual of one document through the preview pipeline
fn render_thumb(file: &Path) -> Result<Option<VisualNode>> {
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let Some(kind) = DocumentKind::from_ext(&ext) else {
        bail!("unsupported document type: {:?}", ext);
    };

    let registry = RendererRegistry::with_default_backends();
    let adapter = registry
        .adapter_for(kind)
        .context("no renderer registered for this document kind")?;

    if !wait_ready(|| adapter.is_ready(), READY_TIMEOUT, READY_POLL_INTERVAL) {
        bail!("renderer backend did not become ready");
    }

    let raw = adapter
        .render_first_visual(file)
        .with_context(|| format!("rendering {}", file.display()))?;
    Ok(raw.map(normalize))
}

fn cmd_thumb(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let Some(node) = render_thumb(file)? else {
        println!("no preview available for {}", file.display());
        return Ok(());
    };

    let output = output.unwrap_or_else(|| {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preview".to_string());
        PathBuf::from(format!("{}.{}", stem, node.image().format().extension()))
    });
    fs::write(&output, node.image().bytes())
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} ({}x{}) -> {}",
        file.display(),
        node.width(),
        node.height(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["libshelf", "init"]);
        assert!(matches!(cli.command, Commands::Init));

        let cli = Cli::parse_from(["libshelf", "scan", "--roots", "/a", "/b"]);
        match cli.command {
            Commands::Scan { roots } => assert_eq!(roots.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["libshelf", "thumb", "book.pdf", "--output", "out.png"]);
        match cli.command {
            Commands::Thumb { file, output } => {
                assert_eq!(file, PathBuf::from("book.pdf"));
                assert_eq!(output, Some(PathBuf::from("out.png")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_init_creates_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        run(["libshelf", "--config", config_path.to_str().unwrap(), "init"]).unwrap();
        assert!(config_path.exists());
    }

    #[test]
    fn test_scan_persists_roots_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let library = dir.path().join("library");
        fs::create_dir(&library).unwrap();
        touch(&library.join("a.pdf"));
        touch(&library.join("b.epub"));
        touch(&library.join("notes.md"));

        let (items, stats) =
            scan_with_config(&config_path, vec![library.clone()]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(stats.indexed, 2);

        // The override was persisted; a later scan without roots reuses it.
        let (items, _) = scan_with_config(&config_path, Vec::new()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_render_thumb_rejects_unsupported_type() {
        let err = render_thumb(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
